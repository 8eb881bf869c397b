//! Moving averages over per-episode and per-update traces

use serde::{Deserialize, Serialize};

use crate::pipeline::TrainingResult;

/// Window used for learning curves unless told otherwise
pub const DEFAULT_ROLLING_LENGTH: usize = 500;

/// Which part of the convolution to keep, as in `numpy.convolve`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConvolveMode {
    /// Only windows fully inside the data: `n - w + 1` points
    Valid,
    /// Centred output of `max(n, w)` points, zero padded at the edges
    Same,
}

/// Convolve `values` with a box of `window` ones and divide by `window`.
///
/// Returns an empty vector for empty input, a zero window, or a `Valid`
/// window longer than the data.
pub fn moving_average(values: &[f64], window: usize, mode: ConvolveMode) -> Vec<f64> {
    let n = values.len();
    if n == 0 || window == 0 {
        return Vec::new();
    }

    // prefix[i] = sum of values[..i]
    let mut prefix = Vec::with_capacity(n + 1);
    prefix.push(0.0);
    for v in values {
        prefix.push(prefix[prefix.len() - 1] + v);
    }
    let w = window as f64;

    // Full convolution index k covers values[k+1-window ..= k], clipped to the data.
    let full_at = |k: usize| {
        let start = (k + 1).saturating_sub(window);
        let end = (k + 1).min(n);
        (prefix[end] - prefix[start]) / w
    };

    match mode {
        ConvolveMode::Valid => {
            if window > n {
                return Vec::new();
            }
            (window - 1..n).map(full_at).collect()
        }
        ConvolveMode::Same => {
            let full_len = n + window - 1;
            let out_len = n.max(window);
            let offset = (full_len - out_len) / 2;
            (offset..offset + out_len).map(full_at).collect()
        }
    }
}

/// Smoothed curves of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningCurves {
    /// Rolling mean of episode returns
    pub rewards: Vec<f64>,
    /// Rolling mean of episode lengths
    pub lengths: Vec<f64>,
    /// Rolling mean of TD errors, one point per update
    pub training_error: Vec<f64>,
    /// Window actually used for the episode curves
    pub window: usize,
}

impl LearningCurves {
    /// Build curves from a finished run and the agent's TD trace.
    ///
    /// The episode window shrinks to the number of episodes when the run is
    /// shorter than `rolling_length`, so a short run still yields a point.
    pub fn from_run(result: &TrainingResult, training_error: &[f64], rolling_length: usize) -> Self {
        let window = rolling_length.min(result.episode_returns.len()).max(1);
        let lengths: Vec<f64> = result.episode_lengths.iter().map(|&l| l as f64).collect();

        Self {
            rewards: moving_average(&result.episode_returns, window, ConvolveMode::Valid),
            lengths: moving_average(&lengths, window, ConvolveMode::Valid),
            training_error: moving_average(training_error, rolling_length, ConvolveMode::Same),
            window,
        }
    }
}
