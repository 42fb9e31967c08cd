// End-to-end collector tests against a temp output directory and a fake
// scheduler CLI (sh -c).

use cronstatus::collector;
use cronstatus::config::AppConfig;
use cronstatus::models::{ResourceHistory, StatusDocument};
use std::path::Path;

fn test_config(dir: &Path, script: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.output.dir = dir.to_path_buf();
    config.cron.command = vec!["sh".into(), "-c".into(), script.into()];
    config.cron.timeout_secs = 5;
    config
}

const JOBS_JSON: &str = r#"echo '{"jobs":[{"id":"a","name":"Backup","enabled":true,"state":{"lastStatus":"ok","lastRunAtMs":1700000000000}}]}'"#;

#[tokio::test]
async fn run_publishes_all_three_artifacts() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = test_config(dir.path(), JOBS_JSON);

    collector::run(&config).await.expect("run");

    let status: StatusDocument = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("cron_status.json")).unwrap(),
    )
    .unwrap();
    assert!(status.generated_at_ms > 0);
    assert!(status.generated_at_iso.is_some());
    assert_eq!(status.jobs.len(), 1);
    assert_eq!(status.jobs[0].id.as_deref(), Some("a"));
    assert!(status.cron_stale.is_none());
    assert_eq!(
        status.source.as_ref().map(|s| s.command.as_str()),
        Some(config.cron.command.join(" ").as_str())
    );
    // First-ever invocation has no CPU baseline to diff against.
    assert!(status.system.cpu_usage_pct.is_none());

    let history: ResourceHistory = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("resource_history.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(history.points.len(), 1);
    assert_eq!(history.points[0].at_ms, status.generated_at_ms);

    // A baseline was persisted for the next invocation.
    assert!(dir.path().join(".cpu_state.json").exists());
}

#[tokio::test]
async fn failed_fetch_recycles_previously_published_jobs() {
    let dir = tempfile::TempDir::new().unwrap();

    collector::run(&test_config(dir.path(), JOBS_JSON))
        .await
        .expect("first run");
    let first: StatusDocument = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("cron_status.json")).unwrap(),
    )
    .unwrap();

    // Scheduler outage: the run still succeeds and keeps the old jobs.
    collector::run(&test_config(dir.path(), "exit 7"))
        .await
        .expect("second run");
    let second: StatusDocument = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("cron_status.json")).unwrap(),
    )
    .unwrap();

    assert_eq!(second.cron_stale, Some(true));
    assert!(second.cron_error.is_some());
    assert_eq!(
        serde_json::to_value(&second.jobs).unwrap(),
        serde_json::to_value(&first.jobs).unwrap()
    );
    assert_eq!(second.previous_generated_at_iso, first.generated_at_iso);
    assert!(second.source.is_none());
}

#[tokio::test]
async fn failed_fetch_with_no_previous_publish_yields_empty_jobs() {
    let dir = tempfile::TempDir::new().unwrap();

    collector::run(&test_config(dir.path(), "exit 1"))
        .await
        .expect("run completes despite fetch failure");

    let status: StatusDocument = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("cron_status.json")).unwrap(),
    )
    .unwrap();
    assert!(status.jobs.is_empty());
    assert_eq!(status.cron_stale, Some(true));
    assert!(status.previous_generated_at_iso.is_none());
}

#[tokio::test]
async fn consecutive_runs_grow_history_and_compute_cpu() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = test_config(dir.path(), JOBS_JSON);

    collector::run(&config).await.expect("first run");
    // Burn a little CPU time so the counters move between samples.
    std::thread::sleep(std::time::Duration::from_millis(50));
    collector::run(&config).await.expect("second run");

    let history: ResourceHistory = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("resource_history.json")).unwrap(),
    )
    .unwrap();
    // Two runs in the same millisecond collapse to one point; otherwise two.
    assert!(!history.points.is_empty() && history.points.len() <= 2);
    assert!(
        history
            .points
            .windows(2)
            .all(|w| w[0].at_ms <= w[1].at_ms)
    );

    let status: StatusDocument = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("cron_status.json")).unwrap(),
    )
    .unwrap();
    if let Some(cpu) = status.system.cpu_usage_pct {
        assert!((0.0..=100.0).contains(&cpu));
    }
}
