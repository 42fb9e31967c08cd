// HistoryRepo tests: append, collapse, dual retention, corruption recovery

use cronstatus::history_repo::HistoryRepo;
use cronstatus::models::{HistoryPoint, LoadAverages, ResourceHistory, SystemSnapshot, iso_utc};
use cronstatus::state_store::{FileStore, MemStore, StateStore};

fn snapshot(cpu: Option<f64>, mem: Option<f64>) -> SystemSnapshot {
    SystemSnapshot {
        hostname: Some("host".into()),
        os: Some("Linux".into()),
        release: None,
        arch: None,
        uptime_sec: Some(100),
        cpu_usage_pct: cpu,
        mem_usage_pct: mem,
        disk_usage_pct: Some(40.0),
        temp_c: Some(45.0),
        load: Some(LoadAverages {
            load1: 0.5,
            load5: 0.4,
            load15: 0.3,
        }),
        throttling: None,
    }
}

fn seeded(points: Vec<HistoryPoint>, retention_ms: i64, max_points: usize) -> MemStore {
    let store = MemStore::new();
    store
        .save(&ResourceHistory {
            generated_at_ms: points.last().map(|p| p.at_ms).unwrap_or(0),
            generated_at_iso: None,
            retention_ms,
            max_points,
            points,
        })
        .unwrap();
    store
}

fn point(at_ms: i64) -> HistoryPoint {
    HistoryPoint {
        at_ms,
        cpu: Some(10.0),
        mem: Some(20.0),
        disk: None,
        temp_c: None,
        load1: None,
    }
}

#[test]
fn append_to_empty_store_projects_snapshot() {
    let store = MemStore::new();
    let repo = HistoryRepo::new(&store, 60_000, 100);

    repo.append(1_000, &snapshot(Some(75.0), Some(50.0))).unwrap();

    let history: ResourceHistory = store.load().expect("history");
    assert_eq!(history.points.len(), 1);
    let p = &history.points[0];
    assert_eq!(p.at_ms, 1_000);
    assert_eq!(p.cpu, Some(75.0));
    assert_eq!(p.mem, Some(50.0));
    assert_eq!(p.disk, Some(40.0));
    assert_eq!(p.temp_c, Some(45.0));
    assert_eq!(p.load1, Some(0.5));
    assert_eq!(history.retention_ms, 60_000);
    assert_eq!(history.max_points, 100);
    assert_eq!(history.generated_at_ms, 1_000);
    assert_eq!(history.generated_at_iso, iso_utc(1_000));
}

#[test]
fn same_timestamp_collapses_to_one_point() {
    let store = MemStore::new();
    let repo = HistoryRepo::new(&store, 60_000, 100);

    repo.append(1_000, &snapshot(Some(10.0), None)).unwrap();
    repo.append(1_000, &snapshot(Some(99.0), Some(1.0))).unwrap();

    let history: ResourceHistory = store.load().expect("history");
    assert_eq!(history.points.len(), 1);
    // Latter values win.
    assert_eq!(history.points[0].cpu, Some(99.0));
    assert_eq!(history.points[0].mem, Some(1.0));
}

#[test]
fn retention_window_prunes_old_points() {
    // Points at 0 and 30000, retention 60000, new point at 70000:
    // cutoff is 10000, so the point at 0 is dropped.
    let store = seeded(vec![point(0), point(30_000)], 60_000, 100);
    let repo = HistoryRepo::new(&store, 60_000, 100);

    repo.append(70_000, &snapshot(Some(5.0), None)).unwrap();

    let history: ResourceHistory = store.load().expect("history");
    let at: Vec<i64> = history.points.iter().map(|p| p.at_ms).collect();
    assert_eq!(at, vec![30_000, 70_000]);
}

#[test]
fn point_cap_keeps_most_recent_after_window_prune() {
    let store = seeded(
        vec![point(1_000), point(2_000), point(3_000), point(4_000)],
        1_000_000,
        3,
    );
    let repo = HistoryRepo::new(&store, 1_000_000, 3);

    repo.append(5_000, &snapshot(None, None)).unwrap();

    let history: ResourceHistory = store.load().expect("history");
    let at: Vec<i64> = history.points.iter().map(|p| p.at_ms).collect();
    assert_eq!(at, vec![3_000, 4_000, 5_000]);
}

#[test]
fn points_never_exceed_cap_or_window() {
    let store = MemStore::new();
    let repo = HistoryRepo::new(&store, 10_000, 5);

    for i in 0..50 {
        repo.append(i * 1_000, &snapshot(Some(i as f64), None)).unwrap();
    }

    let history: ResourceHistory = store.load().expect("history");
    assert!(history.points.len() <= 5);
    let newest = history.points.last().unwrap().at_ms;
    assert!(history.points.iter().all(|p| p.at_ms >= newest - 10_000));
    // Ordered by non-decreasing atMs.
    assert!(history.points.windows(2).all(|w| w[0].at_ms <= w[1].at_ms));
}

#[test]
fn corrupt_history_starts_empty_series() {
    let store = MemStore::with_contents("{\"points\": not json");
    let repo = HistoryRepo::new(&store, 60_000, 100);

    repo.append(1_000, &snapshot(Some(5.0), None)).unwrap();

    let history: ResourceHistory = store.load().expect("history rewritten");
    assert_eq!(history.points.len(), 1);
}

#[test]
fn file_store_round_trip_is_deep_equal() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("resource_history.json");
    let store = FileStore::new(&path);
    let repo = HistoryRepo::new(&store, 60_000, 100);

    repo.append(1_000, &snapshot(Some(75.0), Some(50.0))).unwrap();
    repo.append(2_000, &snapshot(Some(80.0), Some(55.0))).unwrap();

    let on_disk: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let in_memory: ResourceHistory = store.load().unwrap();
    assert_eq!(on_disk, serde_json::to_value(&in_memory).unwrap());
    assert_eq!(in_memory.points.len(), 2);

    // Atomic replace leaves no temp file behind.
    assert!(!dir.path().join("resource_history.json.tmp").exists());
}
