//! Learning-curve analysis of training runs

pub mod curves;

pub use curves::{ConvolveMode, DEFAULT_ROLLING_LENGTH, LearningCurves, moving_average};
