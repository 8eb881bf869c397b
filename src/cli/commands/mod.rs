//! Subcommands of the `ttt` binary

pub mod inspect;
pub mod play;
pub mod train;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::{
    adapters::{MsgPackRepository, list_saved_tables},
    ports::TableRepository,
    q_learning::SavedQTable,
    tictactoe::Player,
};

/// Directory for saved tables when none is given
pub const DEFAULT_MODEL_DIR: &str = "models";

pub(crate) fn parse_player_token(value: &str, flag: &str) -> Result<Player> {
    match value.trim().to_ascii_lowercase().as_str() {
        "x" | "first" | "p1" => Ok(Player::X),
        "o" | "second" | "p2" => Ok(Player::O),
        other => Err(anyhow!(
            "Invalid value '{other}' for {flag} (expected 'x' or 'o')"
        )),
    }
}

/// Resolve `--model`, falling back to the newest table in `model_dir`
pub(crate) fn resolve_model_path(model: Option<&Path>, model_dir: &Path) -> Result<PathBuf> {
    if let Some(path) = model {
        return Ok(path.to_path_buf());
    }

    let tables = list_saved_tables(model_dir)
        .with_context(|| format!("Failed to list tables in {}", model_dir.display()))?;
    tables
        .into_iter()
        .next_back()
        .ok_or_else(|| anyhow!("No saved tables in {}; pass --model", model_dir.display()))
}

pub(crate) fn load_table(path: &Path) -> Result<SavedQTable> {
    MsgPackRepository::new()
        .load(path)
        .with_context(|| format!("Failed to load Q-table from {}", path.display()))
}
