//! CSV export for learning curves
//!
//! Each curve goes to its own file with an `index,value` header so the
//! output loads directly into a spreadsheet or plotting script.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Serialize;

use crate::{Error, Result, analysis::LearningCurves};

/// A single row in a curve CSV
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    pub index: usize,
    pub value: f64,
}

/// Writes `rewards.csv`, `lengths.csv` and `training_error.csv`
pub struct CurvesCsvExporter {
    output_dir: PathBuf,
}

impl CurvesCsvExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Export all three curves, creating the output directory if needed.
    ///
    /// Returns the written file paths in the order rewards, lengths,
    /// training error.
    pub fn export(&self, curves: &LearningCurves) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.output_dir).map_err(|source| Error::Io {
            operation: format!("create directory {}", self.output_dir.display()),
            source,
        })?;

        [
            ("rewards.csv", &curves.rewards),
            ("lengths.csv", &curves.lengths),
            ("training_error.csv", &curves.training_error),
        ]
        .into_iter()
        .map(|(name, values)| {
            let path = self.output_dir.join(name);
            write_curve(&path, values)?;
            Ok(path)
        })
        .collect()
    }
}

fn write_curve(path: &Path, values: &[f64]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for (index, &value) in values.iter().enumerate() {
        writer.serialize(CurvePoint { index, value })?;
    }
    writer.flush()?;
    Ok(())
}
