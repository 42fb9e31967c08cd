use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub output: OutputConfig,
    pub cron: CronConfig,
    pub history: HistoryConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory holding all three published/persisted files.
    pub dir: PathBuf,
    pub status_file: String,
    pub history_file: String,
    pub cpu_state_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: ".".into(),
            status_file: "cron_status.json".into(),
            history_file: "resource_history.json".into(),
            cpu_state_file: ".cpu_state.json".into(),
        }
    }
}

impl OutputConfig {
    pub fn status_path(&self) -> PathBuf {
        self.dir.join(&self.status_file)
    }

    pub fn history_path(&self) -> PathBuf {
        self.dir.join(&self.history_file)
    }

    pub fn cpu_state_path(&self) -> PathBuf {
        self.dir.join(&self.cpu_state_file)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CronConfig {
    /// Scheduler CLI invocation, program first ("list all jobs, machine-readable").
    pub command: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for CronConfig {
    fn default() -> Self {
        Self {
            command: ["clawdbot", "cron", "list", "--all", "--json"]
                .map(String::from)
                .to_vec(),
            timeout_secs: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub retention_minutes: u64,
    pub max_points: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            retention_minutes: 360,
            max_points: 720,
        }
    }
}

impl HistoryConfig {
    pub fn retention_ms(&self) -> i64 {
        self.retention_minutes as i64 * 60_000
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Mount point for the disk usage probe.
    pub disk_path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            disk_path: "/".into(),
        }
    }
}

impl AppConfig {
    /// Load from CONFIG_FILE env or ./config.toml. A missing file means all
    /// defaults; the collector is expected to run bare from a timer.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        match std::fs::read_to_string(&path) {
            Ok(s) => Self::load_from_str(&s),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = AppConfig::default();
                config.validate()?;
                Ok(config)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.output.status_file.is_empty(),
            "output.status_file must be non-empty"
        );
        anyhow::ensure!(
            !self.output.history_file.is_empty(),
            "output.history_file must be non-empty"
        );
        anyhow::ensure!(
            !self.output.cpu_state_file.is_empty(),
            "output.cpu_state_file must be non-empty"
        );
        anyhow::ensure!(!self.cron.command.is_empty(), "cron.command must be non-empty");
        anyhow::ensure!(
            self.cron.command.iter().all(|part| !part.is_empty()),
            "cron.command must not contain empty arguments"
        );
        anyhow::ensure!(
            self.cron.timeout_secs > 0,
            "cron.timeout_secs must be > 0, got {}",
            self.cron.timeout_secs
        );
        anyhow::ensure!(
            self.history.retention_minutes > 0,
            "history.retention_minutes must be > 0, got {}",
            self.history.retention_minutes
        );
        anyhow::ensure!(
            self.history.max_points > 0,
            "history.max_points must be > 0, got {}",
            self.history.max_points
        );
        anyhow::ensure!(
            !self.metrics.disk_path.is_empty(),
            "metrics.disk_path must be non-empty"
        );
        Ok(())
    }
}
