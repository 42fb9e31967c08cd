// Host metric probes. Every reader is best-effort: a failed probe yields
// None and the run continues.

mod proc;

pub use proc::{
    parse_cpu_sample, parse_load_averages, parse_mem_usage_pct, parse_temp_c,
    parse_throttled_bitmask, parse_uptime_secs,
};

use crate::models::{CounterSample, LoadAverages, SystemSnapshot, ThrottlingFlags, round1};
use std::path::{Path, PathBuf};
use std::time::Duration;
use sysinfo::{Disks, System};

const PROC_STAT: &str = "/proc/stat";
const PROC_MEMINFO: &str = "/proc/meminfo";
const PROC_UPTIME: &str = "/proc/uptime";
const PROC_LOADAVG: &str = "/proc/loadavg";

/// Tried in order; first parseable value wins.
const TEMP_CANDIDATES: &[&str] = &[
    "/sys/class/thermal/thermal_zone0/temp",
    "/sys/class/hwmon/hwmon0/temp1_input",
];

const THROTTLE_HELPER: &str = "vcgencmd";
const THROTTLE_TIMEOUT: Duration = Duration::from_secs(5);

pub fn read_cpu_sample() -> Option<CounterSample> {
    parse_cpu_sample(&std::fs::read_to_string(PROC_STAT).ok()?)
}

pub fn read_mem_usage_pct() -> Option<f64> {
    parse_mem_usage_pct(&std::fs::read_to_string(PROC_MEMINFO).ok()?)
}

pub fn read_uptime_secs() -> Option<i64> {
    parse_uptime_secs(&std::fs::read_to_string(PROC_UPTIME).ok()?)
}

pub fn read_load_averages() -> Option<LoadAverages> {
    parse_load_averages(&std::fs::read_to_string(PROC_LOADAVG).ok()?)
}

pub fn read_temp_c() -> Option<f64> {
    TEMP_CANDIDATES
        .iter()
        .filter_map(|p| std::fs::read_to_string(p).ok())
        .find_map(|raw| parse_temp_c(&raw))
}

/// used/total for the disk mounted at `mount`. Longest mount-point match, so
/// "/" does not shadow a dedicated data mount.
pub fn disk_usage_pct(mount: &str) -> Option<f64> {
    let disks = Disks::new_with_refreshed_list();
    let target = Path::new(mount);
    let disk = disks
        .list()
        .iter()
        .filter(|d| target.starts_with(d.mount_point()))
        .max_by_key(|d| d.mount_point().as_os_str().len())?;
    let total = disk.total_space();
    if total == 0 {
        return None;
    }
    let used = total.saturating_sub(disk.available_space());
    Some(round1(used as f64 / total as f64 * 100.0))
}

/// Firmware throttling flags via the vendor helper, if installed. Absent
/// helper, timeout, failure and malformed output all yield None; the field
/// is never partially populated.
pub async fn read_throttling() -> Option<ThrottlingFlags> {
    find_in_path(THROTTLE_HELPER)?;
    let output = tokio::process::Command::new(THROTTLE_HELPER)
        .arg("get_throttled")
        .stdin(std::process::Stdio::null())
        .kill_on_drop(true)
        .output();
    let output = tokio::time::timeout(THROTTLE_TIMEOUT, output)
        .await
        .ok()?
        .ok()?;
    if !output.status.success() {
        return None;
    }
    parse_throttled_bitmask(&String::from_utf8_lossy(&output.stdout))
        .map(ThrottlingFlags::from_bitmask)
}

fn find_in_path(name: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Identity plus all stateless metrics for one invocation. CPU usage and
/// throttling are filled in by the caller (one needs the persisted baseline,
/// the other is async).
pub fn snapshot(disk_mount: &str) -> SystemSnapshot {
    SystemSnapshot {
        hostname: System::host_name(),
        os: System::name(),
        release: System::kernel_version(),
        arch: Some(System::cpu_arch()).filter(|s| !s.is_empty()),
        uptime_sec: read_uptime_secs(),
        cpu_usage_pct: None,
        mem_usage_pct: read_mem_usage_pct(),
        disk_usage_pct: disk_usage_pct(disk_mount),
        temp_c: read_temp_c(),
        load: read_load_averages(),
        throttling: None,
    }
}
