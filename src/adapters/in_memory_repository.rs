//! In-memory table repository for testing.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{Result, error::Error, ports::TableRepository, q_learning::SavedQTable};

/// In-memory repository for testing.
///
/// Stores encoded tables in a shared map keyed by path. Clones share the
/// same storage.
///
/// # Examples
///
/// ```
/// use std::path::Path;
///
/// use tictactoe_rl::{
///     adapters::InMemoryRepository,
///     ports::TableRepository,
///     q_learning::{AgentConfig, QLearningAgent, SavedQTable, TrainingMetadata},
/// };
///
/// let repo = InMemoryRepository::new();
/// let agent = QLearningAgent::new(AgentConfig::default())?;
/// repo.save(
///     &SavedQTable::from_agent(&agent, TrainingMetadata::default()),
///     Path::new("table"),
/// )?;
/// let loaded = repo.load(Path::new("table"))?;
/// assert_eq!(loaded.table_size(), 0);
/// # Ok::<(), tictactoe_rl::Error>(())
/// ```
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn storage(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get the number of tables currently stored.
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    /// Check if a table exists at the given path.
    pub fn contains(&self, path: &Path) -> bool {
        self.storage().contains_key(path.to_string_lossy().as_ref())
    }
}

impl TableRepository for InMemoryRepository {
    fn save(&self, table: &SavedQTable, path: &Path) -> Result<()> {
        let key = path.to_string_lossy().to_string();

        let bytes = rmp_serde::to_vec(table).map_err(|e| Error::SerializationContext {
            operation: "serialize Q-table for in-memory storage".to_string(),
            message: e.to_string(),
        })?;

        self.storage().insert(key, bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedQTable> {
        let key = path.to_string_lossy().to_string();
        let storage = self.storage();

        let bytes = storage.get(&key).ok_or_else(|| Error::Io {
            operation: format!("load Q-table from in-memory storage at {path:?}"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "key not found in memory"),
        })?;

        rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
            operation: "deserialize Q-table from in-memory storage".to_string(),
            message: e.to_string(),
        })
    }
}
