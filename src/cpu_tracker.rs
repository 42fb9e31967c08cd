// CPU usage from the tick-counter delta between this invocation and the
// previous one. The baseline file is the only cross-invocation CPU state.

use crate::models::{CounterSample, CpuBaseline, round1};
use crate::state_store::StateStore;

pub struct CpuTracker<'a, S: StateStore> {
    store: &'a S,
}

impl<'a, S: StateStore> CpuTracker<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Usage percentage for the interval since the previous invocation.
    ///
    /// The current sample is always persisted as the next baseline, even
    /// when no percentage can be computed: first run, counter reset
    /// (totalDelta <= 0) and corrupt baseline all return None. Only a
    /// failed baseline write is an error.
    pub fn usage_pct(
        &self,
        current: Option<CounterSample>,
        now_ms: i64,
    ) -> anyhow::Result<Option<f64>> {
        let Some(current) = current else {
            return Ok(None);
        };
        let prev: Option<CpuBaseline> = self.store.load();
        self.store.save(&CpuBaseline {
            at_ms: now_ms,
            total: current.total,
            idle: current.idle,
        })?;
        let Some(prev) = prev else {
            return Ok(None);
        };

        let total_delta = current.total as i64 - prev.total as i64;
        let idle_delta = current.idle as i64 - prev.idle as i64;
        if total_delta <= 0 {
            return Ok(None);
        }
        let usage = (1.0 - idle_delta as f64 / total_delta as f64) * 100.0;
        Ok(Some(round1(usage.clamp(0.0, 100.0))))
    }
}
