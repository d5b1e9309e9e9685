//! Domain model for item history reconstruction.
//!
//! Items and transitions are caller-owned inputs. Timelines and category
//! decisions are derived from them and never mutate them.

mod category;
mod error;
mod ids;
mod item;
mod timeline;
mod vocabulary;

pub use category::CategoryBucket;
pub use error::{ItemInputError, ParseCategoryError, SkippedItem, VocabularyError};
pub use ids::ItemKey;
pub use item::{TrackedItem, Transition};
pub use timeline::{InitialStatusSource, StatusAt, StatusSegment, Timeline};
pub use vocabulary::{KEYWORD_PRECEDENCE, StatusVocabulary};
