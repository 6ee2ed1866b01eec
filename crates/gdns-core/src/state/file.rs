// # File State Store
//
// File-based implementation of StateStore with crash recovery.
//
// ## Purpose
//
// Keeps managed resources (identifier and declarative state) across runs of
// the CLI.
//
// ## Crash Recovery
//
// - Atomic writes: Uses write-then-rename for atomicity
// - Corruption detection: Validates JSON on load
// - Automatic backup: Keeps .backup of last known good state
// - Recovery: Falls back to backup if corruption detected
//
// ## File Format
//
// ```json
// {
//   "version": "1.0",
//   "resources": {
//     "example": {
//       "data": { "id": "1234", "domain": "example.com", "record": [] },
//       "last_updated": "2025-01-09T12:00:00Z"
//     }
//   }
// }
// ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::state_store::{StateRecord, StateStore};

/// State file format version
const STATE_FILE_VERSION: &str = "1.0";

/// File-based state store with crash recovery
///
/// # Example
///
/// ```rust,no_run
/// use gdns_core::state::FileStateStore;
/// use gdns_core::traits::{StateRecord, StateStore};
/// use gdns_core::ResourceData;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileStateStore::new("/var/lib/gdns/state.json").await?;
///
///     // Atomically written to disk
///     store.put("example", &StateRecord::new(ResourceData::new("example.com"))).await?;
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct FileStateStore {
    path: PathBuf,
    state: Arc<RwLock<FileState>>,
}

#[derive(Debug)]
struct FileState {
    resources: HashMap<String, StateRecord>,
    dirty: bool,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct StateFileFormat {
    version: String,
    resources: HashMap<String, StateRecord>,
}

impl FileStateStore {
    /// Create or load a file state store
    ///
    /// This will:
    /// 1. Create parent directories if needed
    /// 2. Load the existing state file
    /// 3. Fall back to the backup if the file is corrupted
    /// 4. Start empty if both are unusable
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::config(format!(
                    "Failed to create state directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let resources = Self::load_state_with_recovery(&path).await?;

        Ok(Self {
            path,
            state: Arc::new(RwLock::new(FileState {
                resources,
                dirty: false,
            })),
        })
    }

    /// Load state from file, recovering from the backup on corruption
    async fn load_state_with_recovery(
        path: &Path,
    ) -> Result<HashMap<String, StateRecord>, Error> {
        let err = match Self::load_state(path).await {
            Ok(LoadOutcome::Loaded(resources)) => {
                tracing::debug!("Loaded state from file: {} resources", resources.len());
                return Ok(resources);
            }
            Ok(LoadOutcome::Corrupted(err)) => err,
            Err(e) => return Err(e),
        };

        tracing::warn!(
            "State file appears corrupted: {}. Attempting recovery from backup.",
            err
        );

        let backup_path = Self::backup_path(path);
        if !backup_path.exists() {
            tracing::warn!("No backup file found. Starting with empty state.");
            return Ok(HashMap::new());
        }

        match Self::load_state(&backup_path).await {
            Ok(LoadOutcome::Loaded(resources)) => {
                tracing::info!("Recovered state from backup: {} resources", resources.len());

                if let Err(restore_err) = Self::restore_from_backup(path, &backup_path).await {
                    tracing::error!(
                        "Failed to restore state file from backup: {}",
                        restore_err
                    );
                }

                Ok(resources)
            }
            Ok(LoadOutcome::Corrupted(backup_err)) => {
                tracing::error!(
                    "Backup also corrupted: {}. Starting with empty state.",
                    backup_err
                );
                Ok(HashMap::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Load state from file
    ///
    /// I/O failures are errors; unparseable content is reported as
    /// corruption so the caller can recover.
    async fn load_state(path: &Path) -> Result<LoadOutcome, Error> {
        if !path.exists() {
            tracing::debug!("State file does not exist: {}", path.display());
            return Ok(LoadOutcome::Loaded(HashMap::new()));
        }

        let content = fs::read_to_string(path).await.map_err(|e| {
            Error::state_store(format!(
                "Failed to read state file {}: {}",
                path.display(),
                e
            ))
        })?;

        let state_file: StateFileFormat = match serde_json::from_str(&content) {
            Ok(state_file) => state_file,
            Err(e) => return Ok(LoadOutcome::Corrupted(e)),
        };

        if state_file.version != STATE_FILE_VERSION {
            tracing::warn!(
                "State file version mismatch: expected {}, got {}. \
                Attempting to load anyway.",
                STATE_FILE_VERSION,
                state_file.version
            );
        }

        Ok(LoadOutcome::Loaded(state_file.resources))
    }

    /// Write state to file atomically
    async fn write_state(&self) -> Result<(), Error> {
        let mut state_guard = self.state.write().await;

        let state_file = StateFileFormat {
            version: STATE_FILE_VERSION.to_string(),
            resources: state_guard.resources.clone(),
        };

        let json = serde_json::to_string_pretty(&state_file)
            .map_err(|e| Error::state_store(format!("Failed to serialize state: {}", e)))?;

        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::state_store(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.write_all(json.as_bytes()).await.map_err(|e| {
                Error::state_store(format!(
                    "Failed to write to temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.flush().await.map_err(|e| {
                Error::state_store(format!(
                    "Failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        if self.path.exists() {
            let backup_path = Self::backup_path(&self.path);
            if let Err(e) = fs::copy(&self.path, &backup_path).await {
                tracing::warn!("Failed to create backup: {}", e);
            }
        }

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::state_store(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        state_guard.dirty = false;

        tracing::trace!("State written to file: {}", self.path.display());
        Ok(())
    }

    async fn restore_from_backup(path: &Path, backup_path: &Path) -> Result<(), Error> {
        fs::copy(backup_path, path).await.map_err(|e| {
            Error::state_store(format!(
                "Failed to restore from backup {} to {}: {}",
                backup_path.display(),
                path.display(),
                e
            ))
        })?;

        tracing::info!("Restored state file from backup");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }

    fn backup_path(path: &Path) -> PathBuf {
        let mut backup = path.to_path_buf();
        backup.set_extension("backup");
        backup
    }

    /// Path of the state file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

enum LoadOutcome {
    Loaded(HashMap<String, StateRecord>),
    Corrupted(serde_json::Error),
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn get(&self, name: &str) -> Result<Option<StateRecord>, Error> {
        let state_guard = self.state.read().await;
        Ok(state_guard.resources.get(name).cloned())
    }

    async fn put(&self, name: &str, record: &StateRecord) -> Result<(), Error> {
        {
            let mut state_guard = self.state.write().await;
            state_guard
                .resources
                .insert(name.to_string(), record.clone());
            state_guard.dirty = true;
        }

        // Immediate write for durability
        self.write_state().await
    }

    async fn delete(&self, name: &str) -> Result<(), Error> {
        {
            let mut state_guard = self.state.write().await;
            state_guard.resources.remove(name);
            state_guard.dirty = true;
        }

        self.write_state().await
    }

    async fn list(&self) -> Result<Vec<String>, Error> {
        let state_guard = self.state.read().await;
        Ok(state_guard.resources.keys().cloned().collect())
    }

    async fn flush(&self) -> Result<(), Error> {
        let dirty = self.state.read().await.dirty;
        if dirty {
            self.write_state().await
        } else {
            Ok(())
        }
    }
}
