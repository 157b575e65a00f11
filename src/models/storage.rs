use anyhow::{Context, Result};
use flume::{Receiver, Sender};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const CODE_KEY: &str = "playground-code";
pub const THEME_KEY: &str = "playground-theme";
pub const SNIPPETS_KEY: &str = "playground-snippets";

/// Where the key/value pairs actually live
pub trait StorageBackend {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Flat JSON object of string values on disk, rewritten on every change
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileBackend {
    pub fn open(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir).context("Failed to create data directory")?;
        let path = data_dir.join("storage.json");

        let entries = if path.exists() {
            let content = fs::read_to_string(&path).context("Failed to read storage file")?;
            match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    log::warn!("Ignoring unreadable storage file {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, entries })
    }
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        let content =
            serde_json::to_string_pretty(&self.entries).context("Failed to serialize storage")?;
        fs::write(&self.path, content).context("Failed to write storage file")
    }
}

/// In-process backend, used by tests and when the data directory is unusable
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: BTreeMap<String, String>,
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A write that went through the storage manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    pub value: String,
}

/// Storage Manager: the single owner of persisted playground state
pub struct StorageManager {
    backend: Box<dyn StorageBackend>,
    subscribers: Vec<Sender<StorageEvent>>,
}

impl std::fmt::Debug for StorageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "StorageManager {{ subscribers: {} }}",
            self.subscribers.len()
        )
    }
}

impl StorageManager {
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self {
            backend,
            subscribers: Vec::new(),
        }
    }

    pub fn open(data_dir: &Path) -> Result<Self> {
        Ok(Self::new(Box::new(FileBackend::open(data_dir)?)))
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryBackend::default()))
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.backend.read(key)
    }

    /// Persists the value and notifies every live subscriber
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.backend.write(key, value)?;

        let event = StorageEvent {
            key: key.to_string(),
            value: value.to_string(),
        };
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());

        Ok(())
    }

    /// Returns a receiver that sees every subsequent `set`
    pub fn subscribe(&mut self) -> Receiver<StorageEvent> {
        let (sender, receiver) = flume::unbounded();
        self.subscribers.push(sender);
        receiver
    }
}
