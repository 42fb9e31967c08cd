// Chart history series models

use serde::{Deserialize, Serialize};

/// One chart point. Deliberately minimal: only the fields the dashboard
/// graphs, not the full snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint {
    pub at_ms: i64,
    pub cpu: Option<f64>,
    pub mem: Option<f64>,
    pub disk: Option<f64>,
    pub temp_c: Option<f64>,
    pub load1: Option<f64>,
}

/// The persisted series. Points are ordered by non-decreasing atMs, capped
/// at maxPoints, and never older than retentionMs behind the newest point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceHistory {
    pub generated_at_ms: i64,
    pub generated_at_iso: Option<String>,
    pub retention_ms: i64,
    pub max_points: usize,
    pub points: Vec<HistoryPoint>,
}
