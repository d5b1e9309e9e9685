//! Port contracts for the history domain.

pub mod source;

pub use source::{ItemQuery, ItemSource, ItemSourceError, ItemSourceResult};
