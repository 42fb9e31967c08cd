// CPU counters, baseline state and the per-invocation host snapshot

use serde::{Deserialize, Serialize};

/// Cumulative tick counters from the aggregate "cpu" line since boot.
/// Only meaningful as a delta between two reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterSample {
    pub total: u64,
    pub idle: u64,
}

/// Persisted previous sample (.cpu_state.json), overwritten every invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuBaseline {
    pub at_ms: i64,
    pub total: u64,
    pub idle: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadAverages {
    pub load1: f64,
    pub load5: f64,
    pub load15: f64,
}

/// Firmware throttling flags decoded from the vcgencmd bitmask.
/// Bits 0-3 are the current state, bits 16-19 the occurred-since-boot mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThrottlingFlags {
    pub under_voltage: bool,
    pub freq_capped: bool,
    pub throttled: bool,
    pub soft_temp_limit: bool,
    pub under_voltage_occurred: bool,
    pub freq_capped_occurred: bool,
    pub throttled_occurred: bool,
    pub soft_temp_limit_occurred: bool,
}

impl ThrottlingFlags {
    pub fn from_bitmask(mask: u32) -> Self {
        let bit = |n: u32| mask & (1 << n) != 0;
        Self {
            under_voltage: bit(0),
            freq_capped: bit(1),
            throttled: bit(2),
            soft_temp_limit: bit(3),
            under_voltage_occurred: bit(16),
            freq_capped_occurred: bit(17),
            throttled_occurred: bit(18),
            soft_temp_limit_occurred: bit(19),
        }
    }
}

/// One invocation's host metrics. Every field is best-effort: a probe that
/// fails leaves null in the document instead of aborting the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSnapshot {
    pub hostname: Option<String>,
    pub os: Option<String>,
    pub release: Option<String>,
    pub arch: Option<String>,
    pub uptime_sec: Option<i64>,
    pub cpu_usage_pct: Option<f64>,
    pub mem_usage_pct: Option<f64>,
    pub disk_usage_pct: Option<f64>,
    pub temp_c: Option<f64>,
    pub load: Option<LoadAverages>,
    pub throttling: Option<ThrottlingFlags>,
}
