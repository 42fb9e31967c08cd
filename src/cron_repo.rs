// Job status from the external scheduler CLI. Fetch and fallback are two
// separate stages: a failed fetch never surfaces as an error to the
// publisher, it surfaces as the previously published jobs marked stale.

use crate::models::{JobRecord, RawJobList, StatusDocument};
use crate::state_store::StateStore;
use std::process::ExitStatus;
use std::time::Duration;
use tokio::process::Command;
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("cron command is empty")]
    EmptyCommand,
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
    #[error("{command} timed out after {timeout_secs}s")]
    Timeout { command: String, timeout_secs: u64 },
    #[error("{command} exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("{command} output did not parse: {source}")]
    Parse {
        command: String,
        source: serde_json::Error,
    },
}

pub struct CronRepo {
    command: Vec<String>,
    timeout: Duration,
}

impl CronRepo {
    pub fn new(command: Vec<String>, timeout: Duration) -> Self {
        Self { command, timeout }
    }

    /// The invoked command line, published as source.command for traceability.
    pub fn command_line(&self) -> String {
        self.command.join(" ")
    }

    /// Fresh fetch: run the CLI with a bounded timeout, require exit 0 and a
    /// JSON object carrying a jobs array, normalize every record.
    #[instrument(skip(self), fields(repo = "cron", operation = "fetch_jobs"))]
    pub async fn fetch_jobs(&self) -> Result<Vec<JobRecord>, FetchError> {
        let (program, args) = self.command.split_first().ok_or(FetchError::EmptyCommand)?;
        let command = self.command_line();

        let running = Command::new(program)
            .args(args)
            .stdin(std::process::Stdio::null())
            .kill_on_drop(true)
            .output();
        let output = match tokio::time::timeout(self.timeout, running).await {
            Ok(Ok(output)) => output,
            Ok(Err(source)) => return Err(FetchError::Spawn { command, source }),
            Err(_) => {
                return Err(FetchError::Timeout {
                    command,
                    timeout_secs: self.timeout.as_secs(),
                });
            }
        };

        if !output.status.success() {
            return Err(FetchError::Failed {
                command,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let raw: RawJobList = serde_json::from_slice(&output.stdout)
            .map_err(|source| FetchError::Parse { command, source })?;
        Ok(raw.jobs.into_iter().map(JobRecord::from_raw).collect())
    }
}

/// Recovery stage: recycle the jobs array and generation timestamp of the
/// last published document, so a transient scheduler outage keeps the last
/// known-good list on the dashboard. Nothing ever published means an empty
/// list, not an error.
pub fn recycle_previous_jobs<S: StateStore>(store: &S) -> (Vec<JobRecord>, Option<String>) {
    match store.load::<StatusDocument>() {
        Some(previous) => (previous.jobs, previous.generated_at_iso),
        None => (Vec::new(), None),
    }
}
