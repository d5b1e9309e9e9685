//! In-memory adapters for the history domain.

mod source;

pub use source::InMemoryItemSource;
