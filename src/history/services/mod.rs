//! Categorisation and reconstruction services for the history domain.

mod categorizer;
mod reconstructor;

pub use categorizer::{Classification, MatchedRule, StatusCategorizer};
pub use reconstructor::{Diagnostics, HistoryReconstructor, ReconstructedBatch, ReconstructedItem};
