//! Play command - Human versus a trained agent on the terminal

use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::debug;

use super::{DEFAULT_MODEL_DIR, load_table, parse_player_token, resolve_model_path};
use crate::{
    env::{ILLEGAL_MOVE_PENALTY, Step, TicTacToeEnv, Winner},
    q_learning::QLearningAgent,
    tictactoe::{Outcome, Player},
};

#[derive(Parser, Debug)]
#[command(about = "Play against a trained agent")]
pub struct PlayArgs {
    /// Saved table to play against (defaults to the newest in --model-dir)
    #[arg(long, short = 'm')]
    pub model: Option<PathBuf>,

    /// Directory searched when --model is omitted
    #[arg(long, default_value = DEFAULT_MODEL_DIR)]
    pub model_dir: PathBuf,

    /// Which mark the human plays (`x` or `o`)
    #[arg(long, default_value = "x")]
    pub human: String,
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let human = parse_player_token(&args.human, "--human")?;
    let path = resolve_model_path(args.model.as_deref(), &args.model_dir)?;
    let mut agent = greedy_agent(&path)?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();
    let mut env = TicTacToeEnv::new();

    loop {
        play_game(&mut env, &mut agent, human, &mut input, &mut out)?;
        writeln!(out, "Play again? [y/N]")?;
        out.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 || !line.trim().eq_ignore_ascii_case("y") {
            return Ok(());
        }
    }
}

fn greedy_agent(path: &Path) -> Result<QLearningAgent> {
    let saved = load_table(path)?;
    saved
        .to_agent_with_config(saved.config.clone().without_exploration())
        .with_context(|| format!("Failed to rebuild agent from {}", path.display()))
}

/// Play one game from a fresh reset, announcing the result on `out`.
///
/// The human enters cell indices 0-8; anything else, or an occupied cell,
/// is re-prompted without touching the environment. Running out of input
/// ends the game with an error.
pub fn play_game<R: BufRead, W: Write>(
    env: &mut TicTacToeEnv,
    agent: &mut QLearningAgent,
    human: Player,
    input: &mut R,
    out: &mut W,
) -> Result<Outcome> {
    let (mut obs, _) = env.reset();
    writeln!(out, "You are {human}. Cells are numbered 0-8, row by row.")?;

    let winner = loop {
        writeln!(out, "\n{}", env.render())?;

        let step = if env.current_player() == human {
            let action = read_human_move(env, input, out)?;
            env.step(action)?
        } else {
            agent_move(env, agent, &obs)?
        };

        obs = step.observation;
        if step.terminated {
            break step.info.winner;
        }
    };

    writeln!(out, "\n{}", env.render())?;
    match winner {
        Some(Winner::Player(p)) if p == human => writeln!(out, "You win!")?,
        Some(Winner::Player(p)) => writeln!(out, "{p} wins!")?,
        Some(Winner::Draw) | None => writeln!(out, "It's a draw!")?,
    }
    out.flush()?;
    Ok(env.outcome())
}

fn read_human_move<R: BufRead, W: Write>(
    env: &TicTacToeEnv,
    input: &mut R,
    out: &mut W,
) -> Result<usize> {
    loop {
        write!(out, "Your move: ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("Input closed before the game finished");
        }

        match line.trim().parse::<usize>() {
            Ok(cell) if cell < env.action_space_size() && env.board().is_empty(cell) => {
                return Ok(cell);
            }
            Ok(cell) if cell < env.action_space_size() => {
                writeln!(out, "Cell {cell} is taken.")?;
            }
            _ => writeln!(out, "Enter a free cell between 0 and 8.")?,
        }
    }
}

/// Let the agent move greedily through the environment.
///
/// A table that never visited this observation may rank an occupied cell
/// highest. The environment rejects that with a penalty and no state change,
/// after which the best-valued free cell is played instead.
fn agent_move(
    env: &mut TicTacToeEnv,
    agent: &mut QLearningAgent,
    obs: &crate::env::Observation,
) -> Result<Step> {
    let action = agent.greedy_action(obs);
    let step = env.step(action)?;
    if step.reward != ILLEGAL_MOVE_PENALTY {
        debug!(action, "agent move");
        return Ok(step);
    }

    let fallback = best_free_cell(env, agent, obs)
        .context("Agent has no free cell to play")?;
    debug!(rejected = action, action = fallback, "agent move after illegal pick");
    Ok(env.step(fallback)?)
}

fn best_free_cell(
    env: &TicTacToeEnv,
    agent: &QLearningAgent,
    obs: &crate::env::Observation,
) -> Option<usize> {
    let values = agent.action_values(obs);
    env.board()
        .valid_moves()
        .into_iter()
        .map(|cell| (cell, values.map_or(0.0, |v| v[cell])))
        .fold(None, |best: Option<(usize, f64)>, (cell, value)| match best {
            Some((_, best_value)) if best_value >= value => best,
            _ => Some((cell, value)),
        })
        .map(|(cell, _)| cell)
}
