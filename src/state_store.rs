// Persisted JSON state behind a swappable store: real files for the
// collector, in-memory for tests. Reads are forgiving (missing or corrupt
// state is absent, never fatal); writes replace atomically.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

pub trait StateStore {
    /// Raw contents, or None when missing/unreadable.
    fn load_raw(&self) -> Option<String>;

    fn save_raw(&self, contents: &str) -> anyhow::Result<()>;

    /// Parsed contents. Corruption is logged and treated as absent.
    fn load<T: DeserializeOwned>(&self) -> Option<T> {
        let raw = self.load_raw()?;
        match serde_json::from_str(&raw) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(error = %e, "state file corrupt, treating as absent");
                None
            }
        }
    }

    /// Compact JSON (internal state and the history series).
    fn save<T: Serialize>(&self, value: &T) -> anyhow::Result<()> {
        let mut s = serde_json::to_string(value)?;
        s.push('\n');
        self.save_raw(&s)
    }

    /// Pretty JSON (the dashboard-facing status document).
    fn save_pretty<T: Serialize>(&self, value: &T) -> anyhow::Result<()> {
        let mut s = serde_json::to_string_pretty(value)?;
        s.push('\n');
        self.save_raw(&s)
    }
}

/// File-backed store using write-temp-then-rename so a concurrent reader
/// never observes a partially written file.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for FileStore {
    fn load_raw(&self) -> Option<String> {
        std::fs::read_to_string(&self.path).ok()
    }

    fn save_raw(&self, contents: &str) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = tmp_path(&self.path);
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".tmp");
    PathBuf::from(os)
}

/// In-memory store for tests. Single-threaded, like the collector itself.
#[derive(Default)]
pub struct MemStore {
    contents: std::cell::RefCell<Option<String>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: &str) -> Self {
        Self {
            contents: std::cell::RefCell::new(Some(contents.to_string())),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }
}

impl StateStore for MemStore {
    fn load_raw(&self) -> Option<String> {
        self.contents.borrow().clone()
    }

    fn save_raw(&self, contents: &str) -> anyhow::Result<()> {
        *self.contents.borrow_mut() = Some(contents.to_string());
        Ok(())
    }
}
