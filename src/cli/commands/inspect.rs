//! Inspect command - Show what a saved table knows

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use super::{DEFAULT_MODEL_DIR, load_table, resolve_model_path};
use crate::{
    cli::output,
    env::Observation,
    q_learning::SavedQTable,
    tictactoe::{BoardState, TOTAL_CELLS},
};

#[derive(Parser, Debug)]
#[command(about = "Inspect a saved Q-table")]
pub struct InspectArgs {
    /// Saved table to inspect (defaults to the newest in --model-dir)
    #[arg(long, short = 'm')]
    pub model: Option<PathBuf>,

    /// Directory searched when --model is omitted
    #[arg(long, default_value = DEFAULT_MODEL_DIR)]
    pub model_dir: PathBuf,

    /// Board to look up, 9 characters of X, O and '.' (defaults to empty)
    #[arg(long, short = 'b')]
    pub board: Option<String>,
}

/// Action values for one board, as stored or all zeros if unseen
#[derive(Debug, Clone, PartialEq)]
pub struct BoardValues {
    pub board: BoardState,
    pub values: Vec<f64>,
    pub seen: bool,
}

/// Look up `board` in a saved table without building an agent
pub fn lookup(saved: &SavedQTable, board: BoardState) -> BoardValues {
    let obs = Observation::from_board(&board);
    let stored = saved
        .entries
        .binary_search_by(|(key, _)| key.cmp(&obs))
        .ok()
        .map(|i| saved.entries[i].1.clone());

    BoardValues {
        board,
        seen: stored.is_some(),
        values: stored.unwrap_or_else(|| vec![0.0; TOTAL_CELLS]),
    }
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let path = resolve_model_path(args.model.as_deref(), &args.model_dir)?;
    let saved = load_table(&path)?;

    let board = match &args.board {
        Some(s) => BoardState::from_string(s).with_context(|| format!("Invalid board '{s}'"))?,
        None => BoardState::new(),
    };
    let found = lookup(&saved, board);

    output::print_section(&format!("Q-table {}", path.display()));
    output::print_kv("Entries", &output::format_number(saved.table_size()));
    output::print_kv("Epsilon", &format!("{:.4}", saved.epsilon));
    output::print_kv(
        "Episodes trained",
        &output::format_number(saved.metadata.episodes),
    );
    if let Some(at) = &saved.metadata.saved_at {
        output::print_kv("Saved at", at);
    }

    output::print_subsection(&format!("Board ({} to move)", found.board.to_move));
    println!("{}", found.board);
    output::print_subsection(if found.seen {
        "Action values"
    } else {
        "Action values (unseen, all zero)"
    });
    println!("{}", output::format_value_grid(&found.values));
    Ok(())
}
