// Assembles and atomically publishes the status document.

use crate::models::{JobRecord, SourceInfo, StatusDocument, SystemSnapshot, iso_utc};
use crate::state_store::StateStore;

/// Outcome of the job feed for one invocation.
pub enum JobsOutcome {
    Fresh {
        jobs: Vec<JobRecord>,
        command_line: String,
    },
    Stale {
        jobs: Vec<JobRecord>,
        error: String,
        previous_generated_at_iso: Option<String>,
    },
}

pub fn build_document(now_ms: i64, system: SystemSnapshot, outcome: JobsOutcome) -> StatusDocument {
    let generated_at_iso = iso_utc(now_ms);
    match outcome {
        JobsOutcome::Fresh { jobs, command_line } => StatusDocument {
            generated_at_ms: now_ms,
            generated_at_iso,
            source: Some(SourceInfo {
                command: command_line,
            }),
            system,
            jobs,
            cron_stale: None,
            cron_error: None,
            previous_generated_at_iso: None,
        },
        JobsOutcome::Stale {
            jobs,
            error,
            previous_generated_at_iso,
        } => StatusDocument {
            generated_at_ms: now_ms,
            generated_at_iso,
            source: None,
            system,
            jobs,
            cron_stale: Some(true),
            cron_error: Some(error),
            previous_generated_at_iso,
        },
    }
}

/// Pretty-printed atomic replace. This is the one write whose failure is
/// allowed to fail the whole run.
pub fn publish<S: StateStore>(store: &S, document: &StatusDocument) -> anyhow::Result<()> {
    store.save_pretty(document)
}
