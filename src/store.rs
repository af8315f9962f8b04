use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Storage key for the job-application collection.
pub const JOBS_KEY: &str = "job-applications";
/// Storage key for the kanban task collection.
pub const TASKS_KEY: &str = "kanban-tasks";

/// Current on-disk schema version. Bump on any incompatible shape change;
/// mismatched files load as absent and the caller re-seeds.
const STORE_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    version: u32,
    items: Vec<T>,
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    items: &'a [T],
}

/// JSON-file persistence for the owning collections. One file per key,
/// full-collection writes only. Reads never fail toward the caller: a
/// missing, corrupt, or wrong-version file is reported as absent.
///
/// No cross-process coordination is attempted; if two processes share the
/// same directory, the last writer wins.
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn open() -> Result<Self> {
        let dir = Self::default_dir();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data dir {}", dir.display()))?;
        Ok(Self { dir })
    }

    /// Opens a store rooted at an explicit directory. Used by tests and by
    /// anything that wants an isolated dataset.
    pub fn open_at(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data dir {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn default_dir() -> PathBuf {
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "jobtrack") {
            proj_dirs.data_dir().to_path_buf()
        } else {
            PathBuf::from(".jobtrack")
        }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Loads the collection stored under `key`, or `None` when nothing
    /// usable is there. Decode failures are swallowed deliberately: stored
    /// bytes we no longer understand are treated the same as no bytes.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<Vec<T>> {
        let raw = fs::read_to_string(self.path_for(key)).ok()?;
        let envelope: Envelope<T> = serde_json::from_str(&raw).ok()?;
        if envelope.version != STORE_VERSION {
            return None;
        }
        Some(envelope.items)
    }

    /// Writes the full collection under `key`, replacing whatever was there.
    pub fn save<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        let envelope = EnvelopeRef {
            version: STORE_VERSION,
            items,
        };
        let json = serde_json::to_string_pretty(&envelope)?;
        let path = self.path_for(key);
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}
