//! Policy persistence boundary

use duel_core::{DuelError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use crate::table::QTable;

/// Durable home for the learned table
pub trait PolicyStore: Send + Sync + 'static {
    /// Load the stored table; `Ok(None)` when nothing has been saved yet
    fn load(&self) -> Result<Option<QTable>>;

    /// Replace the stored table
    fn save(&self, table: &QTable) -> Result<()>;
}

/// Load from `store`, degrading to an empty table on a missing or corrupt file
pub fn load_or_empty(store: &dyn PolicyStore) -> QTable {
    match store.load() {
        Ok(Some(table)) => {
            info!(states = table.len(), "Loaded policy table");
            table
        }
        Ok(None) => {
            info!("No saved policy, starting from an empty table");
            QTable::new()
        }
        Err(e) => {
            warn!("Failed to load policy, starting from an empty table: {}", e);
            QTable::new()
        }
    }
}

/// JSON file, replaced atomically on save
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl PolicyStore for JsonFileStore {
    fn load(&self) -> Result<Option<QTable>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&self.path)?;
        let table = serde_json::from_str(&text).map_err(|e| {
            DuelError::Persistence(format!("{}: {}", self.path.display(), e))
        })?;
        Ok(Some(table))
    }

    fn save(&self, table: &QTable) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(table)?;
        let tmp = self.temp_path();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-process store for tests and throwaway runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    table: Arc<Mutex<Option<QTable>>>,
    saves: Arc<Mutex<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(table: QTable) -> Self {
        let store = Self::default();
        if let Ok(mut slot) = store.table.lock() {
            *slot = Some(table);
        }
        store
    }

    /// Last saved table
    pub fn snapshot(&self) -> Option<QTable> {
        self.table.lock().ok().and_then(|t| t.clone())
    }

    pub fn save_count(&self) -> usize {
        self.saves.lock().map(|n| *n).unwrap_or(0)
    }
}

impl PolicyStore for MemoryStore {
    fn load(&self) -> Result<Option<QTable>> {
        self.table
            .lock()
            .map(|t| t.clone())
            .map_err(|_| DuelError::Persistence("memory store poisoned".into()))
    }

    fn save(&self, table: &QTable) -> Result<()> {
        let mut slot = self
            .table
            .lock()
            .map_err(|_| DuelError::Persistence("memory store poisoned".into()))?;
        *slot = Some(table.clone());
        if let Ok(mut n) = self.saves.lock() {
            *n += 1;
        }
        Ok(())
    }
}
