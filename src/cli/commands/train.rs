//! Train command - Train a Q-learning agent by self-play

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::Parser;
use tracing::info;

use super::{DEFAULT_MODEL_DIR, load_table, parse_player_token};
use crate::{
    adapters::{MsgPackRepository, timestamped_table_path},
    analysis::LearningCurves,
    cli::{config::TrainFileConfig, output},
    env::TicTacToeEnv,
    export::CurvesCsvExporter,
    pipeline::{ProgressObserver, SelfPlayTrainer, TracingObserver, TrainingResult},
    ports::TableRepository,
    q_learning::{AgentConfig, QLearningAgent, SavedQTable, TrainingMetadata},
};

#[derive(Parser, Debug, Default)]
#[command(about = "Train a Q-learning agent by self-play")]
pub struct TrainArgs {
    /// Number of training episodes
    #[arg(long, short = 'e')]
    pub episodes: Option<usize>,

    /// Step size for value updates
    #[arg(long)]
    pub learning_rate: Option<f64>,

    /// Exploration rate at the first episode
    #[arg(long)]
    pub start_epsilon: Option<f64>,

    /// Floor for the exploration rate
    #[arg(long)]
    pub final_epsilon: Option<f64>,

    /// Discount factor for future value
    #[arg(long)]
    pub discount: Option<f64>,

    /// Steps after which an unfinished episode is cut off
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Mark whose wins are tallied (`x` or `o`)
    #[arg(long)]
    pub tracked_player: Option<String>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Resume from a saved table
    #[arg(long)]
    pub load: Option<PathBuf>,

    /// Directory for the timestamped output table
    #[arg(long, default_value = DEFAULT_MODEL_DIR)]
    pub model_dir: PathBuf,

    /// Directory for learning-curve CSVs
    #[arg(long)]
    pub curves: Option<PathBuf>,

    /// Window for learning-curve moving averages
    #[arg(long)]
    pub rolling_length: Option<usize>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// JSON file with agent and training settings; flags override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TrainPlan {
    pub agent: AgentConfig,
    pub training: crate::pipeline::TrainingConfig,
    pub rolling_length: usize,
}

/// Merge the config file (if any) with command-line overrides.
///
/// The epsilon schedule is derived from the final episode count and start
/// epsilon unless the file supplies an explicit agent section.
pub(crate) fn resolve_plan(args: &TrainArgs, file: &TrainFileConfig) -> Result<TrainPlan> {
    let mut training = file.training_or_default();
    if let Some(episodes) = args.episodes {
        training.episodes = episodes;
    }
    if let Some(max_steps) = args.max_steps {
        training.max_episode_steps = max_steps;
    }
    if let Some(token) = &args.tracked_player {
        training.tracked_player = parse_player_token(token, "--tracked-player")?;
    }
    training
        .validate()
        .context("Invalid training configuration")?;

    let mut agent = match (&file.agent, args.start_epsilon) {
        (None, Some(start)) => AgentConfig::schedule(start, training.episodes),
        _ => file.agent_or_schedule(training.episodes),
    };
    if let Some(lr) = args.learning_rate {
        agent.learning_rate = lr;
    }
    if let Some(eps) = args.start_epsilon {
        agent.initial_epsilon = eps;
    }
    if let Some(eps) = args.final_epsilon {
        agent.final_epsilon = eps;
    }
    if let Some(discount) = args.discount {
        agent.discount_factor = discount;
    }
    if let Some(seed) = args.seed {
        agent.seed = Some(seed);
    }
    agent.validate().context("Invalid agent configuration")?;

    Ok(TrainPlan {
        agent,
        training,
        rolling_length: args
            .rolling_length
            .unwrap_or_else(|| file.rolling_length_or_default()),
    })
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let file_config = match &args.config {
        Some(path) => TrainFileConfig::load(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => TrainFileConfig::default(),
    };
    let plan = resolve_plan(&args, &file_config)?;

    let mut prior_episodes = 0;
    let mut agent = match &args.load {
        Some(path) => {
            let saved = load_table(path)?;
            info!(
                path = %path.display(),
                entries = saved.table_size(),
                "resuming from saved table"
            );
            prior_episodes = saved.metadata.episodes;
            saved.to_agent_with_config(plan.agent.clone())?
        }
        None => QLearningAgent::new(plan.agent.clone())?,
    };

    output::print_section("Self-play training");
    output::print_kv("Episodes", &output::format_number(plan.training.episodes));
    output::print_kv("Learning rate", &plan.agent.learning_rate.to_string());
    output::print_kv(
        "Epsilon",
        &format!(
            "{} -> {} (decay {:.6})",
            agent.epsilon(),
            plan.agent.final_epsilon,
            plan.agent.epsilon_decay
        ),
    );
    output::print_kv("Discount", &plan.agent.discount_factor.to_string());
    if let Some(seed) = plan.agent.seed {
        output::print_kv("Seed", &seed.to_string());
    }

    let mut trainer = SelfPlayTrainer::new(plan.training.clone()).with_observer(Box::new(
        TracingObserver::new((plan.training.episodes / 10).max(1)),
    ));
    if !args.no_progress {
        trainer = trainer.with_observer(Box::new(ProgressObserver::new()));
    }

    let mut env = TicTacToeEnv::new();
    let result = trainer.train(&mut env, &mut agent)?;

    fs::create_dir_all(&args.model_dir)
        .with_context(|| format!("Failed to create {}", args.model_dir.display()))?;
    let table_path = timestamped_table_path(&args.model_dir, Local::now());
    let saved = SavedQTable::from_agent(
        &agent,
        TrainingMetadata::new(prior_episodes + result.episodes).stamped(Utc::now()),
    );
    MsgPackRepository::new()
        .save(&saved, &table_path)
        .with_context(|| format!("Failed to save Q-table to {}", table_path.display()))?;
    info!(path = %table_path.display(), entries = saved.table_size(), "saved Q-table");

    if let Some(dir) = &args.curves {
        let curves = LearningCurves::from_run(&result, agent.training_error(), plan.rolling_length);
        let paths = CurvesCsvExporter::new(dir)
            .export(&curves)
            .with_context(|| format!("Failed to export curves to {}", dir.display()))?;
        info!(files = paths.len(), window = curves.window, "exported learning curves");
    }

    if let Some(path) = &args.summary {
        result
            .save(path)
            .with_context(|| format!("Failed to write summary {}", path.display()))?;
    }

    print_results(&result, &plan);
    output::print_kv("Saved table", &table_path.display().to_string());
    Ok(())
}

fn print_results(result: &TrainingResult, plan: &TrainPlan) {
    output::print_subsection(&format!("Results ({} tally)", plan.training.tracked_player));
    output::print_kv("Wins", &output::format_count(result.wins, result.episodes));
    output::print_kv("Losses", &output::format_count(result.losses, result.episodes));
    output::print_kv("Draws", &output::format_count(result.draws, result.episodes));
    output::print_kv(
        "Truncated",
        &output::format_count(result.truncated, result.episodes),
    );
    output::print_kv("Final epsilon", &format!("{:.4}", result.final_epsilon));
    output::print_kv("Table size", &output::format_number(result.table_size));
}
