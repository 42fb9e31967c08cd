// One run-to-completion invocation: probe, track, append, fetch, publish.
// Ordering matters: the previous status document must be read for fallback
// before the new one replaces it.

use crate::config::AppConfig;
use crate::cpu_tracker::CpuTracker;
use crate::cron_repo::{self, CronRepo};
use crate::history_repo::HistoryRepo;
use crate::metrics_repo;
use crate::publisher::{self, JobsOutcome};
use crate::state_store::FileStore;
use std::time::Duration;

pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let now_ms = epoch_ms()?;

    let status_store = FileStore::new(config.output.status_path());
    let baseline_store = FileStore::new(config.output.cpu_state_path());
    let history_store = FileStore::new(config.output.history_path());

    let mut system = metrics_repo::snapshot(&config.metrics.disk_path);
    system.throttling = metrics_repo::read_throttling().await;
    system.cpu_usage_pct =
        CpuTracker::new(&baseline_store).usage_pct(metrics_repo::read_cpu_sample(), now_ms)?;

    let history = HistoryRepo::new(
        &history_store,
        config.history.retention_ms(),
        config.history.max_points,
    );
    if let Err(e) = history.append(now_ms, &system) {
        tracing::warn!(
            error = %e,
            operation = "history_append",
            "history append failed; continuing without it"
        );
    }

    let cron = CronRepo::new(
        config.cron.command.clone(),
        Duration::from_secs(config.cron.timeout_secs),
    );
    let outcome = match cron.fetch_jobs().await {
        Ok(jobs) => {
            tracing::debug!(operation = "fetch_jobs", jobs = jobs.len(), "cron list fetched");
            JobsOutcome::Fresh {
                jobs,
                command_line: cron.command_line(),
            }
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                operation = "fetch_jobs",
                "cron list failed; falling back to previously published jobs"
            );
            let (jobs, previous_generated_at_iso) =
                cron_repo::recycle_previous_jobs(&status_store);
            JobsOutcome::Stale {
                jobs,
                error: e.to_string(),
                previous_generated_at_iso,
            }
        }
    };

    let document = publisher::build_document(now_ms, system, outcome);
    publisher::publish(&status_store, &document)?;
    tracing::info!(
        operation = "publish",
        jobs = document.jobs.len(),
        stale = document.cron_stale.unwrap_or(false),
        path = %status_store.path().display(),
        "status published"
    );
    Ok(())
}

fn epoch_ms() -> anyhow::Result<i64> {
    Ok(std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)?
        .as_millis() as i64)
}
