//! Tabular Q-learning
//!
//! Off-policy temporal difference control over exact board observations:
//!
//! - [`QTable`] stores one value per cell for every observation seen,
//!   materializing a zero vector the first time a key is looked up.
//! - [`QLearningAgent`] chooses actions ε-greedily, breaks ties between
//!   maximal actions uniformly at random, and applies the one-step update
//!   `Q(s,a) += α · (r + γ · max_a' Q(s',a') − Q(s,a))`, with the bootstrap
//!   term zeroed on terminal transitions.
//! - [`SavedQTable`] is the versioned form used for persistence.
//!
//! ## Usage Example
//!
//! ```
//! use tictactoe_rl::{
//!     env::TicTacToeEnv,
//!     q_learning::{AgentConfig, QLearningAgent},
//! };
//!
//! let mut env = TicTacToeEnv::new();
//! let mut agent = QLearningAgent::new(AgentConfig::for_episodes(100).with_seed(1))?;
//!
//! let (obs, _) = env.reset();
//! let action = agent.get_action(&obs);
//! let step = env.step(action)?;
//! agent.update(&obs, action, step.reward, step.terminated, &step.observation)?;
//! agent.decay_epsilon();
//! # Ok::<(), tictactoe_rl::Error>(())
//! ```

pub mod agent;
pub mod config;
pub mod q_table;
pub mod serialization;

// Public re-exports
pub use agent::QLearningAgent;
pub use config::{AgentConfig, DEFAULT_DISCOUNT_FACTOR};
pub use q_table::QTable;
pub use serialization::{SavedQTable, TrainingMetadata};
