// Bounded chart history, rewritten whole each invocation. This is
// best-effort telemetry: the collector logs append failures and still
// publishes the status document.

use crate::models::{HistoryPoint, ResourceHistory, SystemSnapshot, iso_utc};
use crate::state_store::StateStore;
use tracing::instrument;

pub struct HistoryRepo<'a, S: StateStore> {
    store: &'a S,
    retention_ms: i64,
    max_points: usize,
}

impl<'a, S: StateStore> HistoryRepo<'a, S> {
    pub fn new(store: &'a S, retention_ms: i64, max_points: usize) -> Self {
        Self {
            store,
            retention_ms,
            max_points,
        }
    }

    /// Append one point derived from the snapshot and persist the full
    /// series. A missing or corrupt existing file starts an empty series.
    /// A re-run at the exact same timestamp overwrites the last point
    /// instead of appending. Pruning drops points outside the retention
    /// window first, then enforces the point cap on whatever is left.
    #[instrument(skip(self, snapshot), fields(repo = "history", operation = "append"))]
    pub fn append(&self, now_ms: i64, snapshot: &SystemSnapshot) -> anyhow::Result<()> {
        let mut points = self
            .store
            .load::<ResourceHistory>()
            .map(|h| h.points)
            .unwrap_or_default();

        let point = HistoryPoint {
            at_ms: now_ms,
            cpu: snapshot.cpu_usage_pct,
            mem: snapshot.mem_usage_pct,
            disk: snapshot.disk_usage_pct,
            temp_c: snapshot.temp_c,
            load1: snapshot.load.map(|l| l.load1),
        };
        match points.last_mut() {
            // Idempotent re-run at an identical timestamp: latest values win.
            Some(last) if last.at_ms == now_ms => *last = point,
            _ => points.push(point),
        }

        let cutoff = now_ms - self.retention_ms;
        points.retain(|p| p.at_ms >= cutoff);
        if points.len() > self.max_points {
            let excess = points.len() - self.max_points;
            points.drain(..excess);
        }

        self.store.save(&ResourceHistory {
            generated_at_ms: now_ms,
            generated_at_iso: iso_utc(now_ms),
            retention_ms: self.retention_ms,
            max_points: self.max_points,
            points,
        })
    }
}
