// Normalized job records, raw scheduler CLI shapes, and the published document

use serde::{Deserialize, Serialize};

use super::{SystemSnapshot, iso_utc};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSchedule {
    pub kind: Option<String>,
    pub expr: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobLastRun {
    pub status: Option<String>,
    pub at_ms: Option<i64>,
    pub at_iso: Option<String>,
    pub duration_ms: Option<i64>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobNextRun {
    pub at_ms: Option<i64>,
    pub at_iso: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub enabled: bool,
    pub schedule: JobSchedule,
    pub last_run: JobLastRun,
    pub next_run: JobNextRun,
}

impl JobRecord {
    /// Normalize a raw CLI record. Absent nested objects are treated as
    /// empty; normalization never fails on missing fields.
    pub fn from_raw(raw: RawJob) -> Self {
        let schedule = raw.schedule.unwrap_or_default();
        let state = raw.state.unwrap_or_default();
        Self {
            id: raw.id,
            name: raw.name,
            enabled: raw.enabled,
            schedule: JobSchedule {
                kind: schedule.kind,
                expr: schedule.expr,
            },
            last_run: JobLastRun {
                status: state.last_status,
                at_ms: state.last_run_at_ms,
                at_iso: state.last_run_at_ms.and_then(iso_utc),
                duration_ms: state.last_duration_ms,
                error: state.last_error,
            },
            next_run: JobNextRun {
                at_ms: state.next_run_at_ms,
                at_iso: state.next_run_at_ms.and_then(iso_utc),
            },
        }
    }
}

// Raw shapes emitted by the scheduler CLI. Everything is optional so a
// partially filled record still normalizes.

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawJobList {
    #[serde(default)]
    pub jobs: Vec<RawJob>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawJob {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    pub schedule: Option<RawSchedule>,
    pub state: Option<RawJobState>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSchedule {
    pub kind: Option<String>,
    pub expr: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawJobState {
    pub last_status: Option<String>,
    pub last_run_at_ms: Option<i64>,
    pub last_duration_ms: Option<i64>,
    pub last_error: Option<String>,
    pub next_run_at_ms: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub command: String,
}

/// The published artifact, rebuilt whole and atomically replaced every
/// invocation. Failure markers appear only on a stale publish; `source`
/// only on a fresh one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDocument {
    pub generated_at_ms: i64,
    pub generated_at_iso: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceInfo>,
    pub system: SystemSnapshot,
    pub jobs: Vec<JobRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cron_stale: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cron_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_generated_at_iso: Option<String>,
}
