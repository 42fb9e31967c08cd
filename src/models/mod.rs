// Wire and state models (camelCase JSON, the shape the dashboard reads)

mod history;
mod jobs;
mod system;

pub use history::{HistoryPoint, ResourceHistory};
pub use jobs::{
    JobLastRun, JobNextRun, JobRecord, JobSchedule, RawJob, RawJobList, RawJobState, RawSchedule,
    SourceInfo, StatusDocument,
};
pub use system::{CounterSample, CpuBaseline, LoadAverages, SystemSnapshot, ThrottlingFlags};

use chrono::{SecondsFormat, TimeZone, Utc};

/// ISO-8601 UTC form of an epoch-ms timestamp. Zero or negative ms maps to
/// None: a cleared timestamp, not the epoch.
pub fn iso_utc(ms: i64) -> Option<String> {
    if ms <= 0 {
        return None;
    }
    Utc.timestamp_millis_opt(ms)
        .single()
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// All published percentages and temperatures carry one decimal.
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
