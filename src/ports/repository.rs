//! Repository port for Q-table persistence.

use std::path::Path;

use crate::{Result, q_learning::SavedQTable};

/// Port for persisting and loading saved Q-tables.
///
/// The learning core only produces and consumes [`SavedQTable`] values; the
/// encoding and the storage medium are up to the implementation.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
///
/// use tictactoe_rl::{ports::TableRepository, q_learning::SavedQTable};
///
/// fn save_table<R: TableRepository>(
///     repo: &R,
///     table: &SavedQTable,
///     path: &Path,
/// ) -> tictactoe_rl::Result<()> {
///     repo.save(table, path)
/// }
/// ```
pub trait TableRepository {
    /// Save a table to persistent storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be written or encoding fails.
    fn save(&self, table: &SavedQTable, path: &Path) -> Result<()>;

    /// Load a table from persistent storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the location does not exist or cannot be decoded.
    fn load(&self, path: &Path) -> Result<SavedQTable>;
}
