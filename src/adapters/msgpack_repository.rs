//! MessagePack implementation of the table repository.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};

use crate::{Result, error::Error, ports::TableRepository, q_learning::SavedQTable};

/// File name prefix for saved tables in a model directory
pub const TABLE_PREFIX: &str = "q_table_";

/// File extension for saved tables
pub const TABLE_EXTENSION: &str = "msgpack";

/// MessagePack-based table repository.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
///
/// use tictactoe_rl::{
///     adapters::MsgPackRepository,
///     ports::TableRepository,
///     q_learning::{AgentConfig, QLearningAgent, SavedQTable, TrainingMetadata},
/// };
///
/// let agent = QLearningAgent::new(AgentConfig::default())?;
/// let repo = MsgPackRepository::new();
/// repo.save(
///     &SavedQTable::from_agent(&agent, TrainingMetadata::default()),
///     Path::new("models/q_table.msgpack"),
/// )?;
/// let loaded = repo.load(Path::new("models/q_table.msgpack"))?;
/// # Ok::<(), tictactoe_rl::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    pub fn new() -> Self {
        Self
    }
}

impl TableRepository for MsgPackRepository {
    fn save(&self, table: &SavedQTable, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, table).map_err(|e| Error::SerializationContext {
            operation: "serialize Q-table to MessagePack".to_string(),
            message: e.to_string(),
        })?;

        writer.flush().map_err(|source| Error::Io {
            operation: format!("flush file {path:?}"),
            source,
        })?;
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedQTable> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;

        rmp_serde::decode::from_read(BufReader::new(file)).map_err(|e| {
            Error::SerializationContext {
                operation: "deserialize Q-table from MessagePack".to_string(),
                message: e.to_string(),
            }
        })
    }
}

/// Path of the form `<dir>/q_table_<YYYYmmdd_HHMMSS>.msgpack`
pub fn timestamped_table_path(dir: &Path, at: DateTime<Local>) -> PathBuf {
    dir.join(format!(
        "{TABLE_PREFIX}{}.{TABLE_EXTENSION}",
        at.format("%Y%m%d_%H%M%S")
    ))
}

/// Saved tables in `dir`, sorted by file name (oldest first).
///
/// A missing directory yields an empty list.
///
/// # Errors
///
/// Returns an error if the directory exists but cannot be read.
pub fn list_saved_tables(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(dir).map_err(|source| Error::Io {
        operation: format!("read directory {dir:?}"),
        source,
    })?;

    let mut tables = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_table = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| {
                name.starts_with(TABLE_PREFIX) && name.ends_with(&format!(".{TABLE_EXTENSION}"))
            });
        if is_table {
            tables.push(path);
        }
    }
    tables.sort();
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use tempfile::TempDir;

    use super::*;
    use crate::q_learning::{AgentConfig, QLearningAgent, TrainingMetadata};

    #[test]
    fn test_msgpack_roundtrip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("table.msgpack");

        let agent = QLearningAgent::new(AgentConfig::default().with_seed(3)).unwrap();
        let saved = SavedQTable::from_agent(&agent, TrainingMetadata::new(10));

        let repo = MsgPackRepository::new();
        repo.save(&saved, &file_path).expect("Failed to save table");
        assert!(file_path.exists());

        let loaded = repo.load(&file_path).expect("Failed to load table");
        assert_eq!(loaded, saved);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = MsgPackRepository::new().load(&temp_dir.path().join("nope.msgpack"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_load_garbage_is_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("garbage.msgpack");
        fs::write(&path, b"not a table").unwrap();
        let result = MsgPackRepository::new().load(&path);
        assert!(matches!(result, Err(Error::SerializationContext { .. })));
    }

    #[test]
    fn test_timestamped_path() {
        let at = Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        let path = timestamped_table_path(Path::new("models"), at);
        assert_eq!(path, Path::new("models/q_table_20240305_140709.msgpack"));
    }

    #[test]
    fn test_list_saved_tables_filters_and_sorts() {
        let temp_dir = TempDir::new().unwrap();
        for name in [
            "q_table_20240102_000000.msgpack",
            "q_table_20240101_000000.msgpack",
            "notes.txt",
            "q_table_old.pkl",
        ] {
            fs::write(temp_dir.path().join(name), b"").unwrap();
        }

        let tables = list_saved_tables(temp_dir.path()).unwrap();
        let names: Vec<_> = tables
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(
            names,
            vec![
                "q_table_20240101_000000.msgpack",
                "q_table_20240102_000000.msgpack"
            ]
        );
    }

    #[test]
    fn test_list_missing_dir_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        assert!(
            list_saved_tables(&temp_dir.path().join("missing"))
                .unwrap()
                .is_empty()
        );
    }
}
