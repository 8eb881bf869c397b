//! Self-play training pipeline
//!
//! - [`SelfPlayTrainer`] runs the episode loop: reset, act, step, update,
//!   and one epsilon decay per episode.
//! - Observers report progress (`ProgressObserver`), collect metrics
//!   (`MetricsObserver`), or log digests (`TracingObserver`).

pub mod observers;
pub mod training;

pub use observers::{MetricsObserver, MetricsSummary, ProgressObserver, TracingObserver};
pub use training::{SelfPlayTrainer, TrainingConfig, TrainingResult};

pub use crate::ports::{EpisodeSummary, Observer};
