// Pure parsers over /proc and sysfs text, split out so tests can feed fixtures.

use crate::models::{CounterSample, LoadAverages, round1};

/// Aggregate "cpu" line of /proc/stat:
/// cpu  user nice system idle iowait irq softirq steal guest guest_nice
/// idle = idle + iowait; total = sum of all numeric fields. Fewer than 5
/// numeric fields means a line we do not understand.
pub fn parse_cpu_sample(stat: &str) -> Option<CounterSample> {
    let first = stat.lines().next()?;
    let mut parts = first.split_whitespace();
    if parts.next()? != "cpu" {
        return None;
    }
    let nums: Vec<u64> = parts.filter_map(|p| p.parse().ok()).collect();
    if nums.len() < 5 {
        return None;
    }
    Some(CounterSample {
        total: nums.iter().sum(),
        idle: nums[3] + nums[4],
    })
}

/// usage% = (MemTotal - MemAvailable) / MemTotal, from /proc/meminfo.
pub fn parse_mem_usage_pct(meminfo: &str) -> Option<f64> {
    let mut total_kb: Option<u64> = None;
    let mut avail_kb: Option<u64> = None;
    for line in meminfo.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let value = rest.split_whitespace().next();
        match key.trim() {
            "MemTotal" => total_kb = value.and_then(|v| v.parse().ok()),
            "MemAvailable" => avail_kb = value.and_then(|v| v.parse().ok()),
            _ => {}
        }
    }
    let total = total_kb.filter(|t| *t > 0)?;
    let used = total.saturating_sub(avail_kb?);
    Some(round1(used as f64 / total as f64 * 100.0))
}

/// First float of /proc/uptime ("12345.67 8910.11"), truncated to seconds.
pub fn parse_uptime_secs(uptime: &str) -> Option<i64> {
    let v: f64 = uptime.split_whitespace().next()?.parse().ok()?;
    v.is_finite().then(|| v as i64)
}

/// First three floats of /proc/loadavg.
pub fn parse_load_averages(loadavg: &str) -> Option<LoadAverages> {
    let mut parts = loadavg.split_whitespace();
    let load1 = parts.next()?.parse().ok()?;
    let load5 = parts.next()?.parse().ok()?;
    let load15 = parts.next()?.parse().ok()?;
    Some(LoadAverages {
        load1,
        load5,
        load15,
    })
}

/// Thermal readings come as millidegrees (45000) or whole degrees (45);
/// values above 1000 are scaled down.
pub fn parse_temp_c(raw: &str) -> Option<f64> {
    let v: f64 = raw.trim().parse().ok()?;
    if !v.is_finite() {
        return None;
    }
    let c = if v > 1000.0 { v / 1000.0 } else { v };
    Some(round1(c))
}

/// "throttled=0x50005" -> 0x50005.
pub fn parse_throttled_bitmask(output: &str) -> Option<u32> {
    let (_, value) = output.trim().split_once('=')?;
    let hex = value.trim().trim_start_matches("0x");
    u32::from_str_radix(hex, 16).ok()
}
