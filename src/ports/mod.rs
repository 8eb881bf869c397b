//! Ports (trait boundaries) for external dependencies.
//!
//! The training loop reports progress through [`Observer`] and persists
//! value tables through [`TableRepository`]; both are implemented outside the
//! learning core.

pub mod observer;
pub mod repository;

pub use observer::{EpisodeSummary, Observer};
pub use repository::TableRepository;
