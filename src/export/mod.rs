//! Export functionality for training analysis
//!
//! Currently supports CSV export of smoothed learning curves.

mod curves_csv;

pub use curves_csv::{CurvePoint, CurvesCsvExporter};
