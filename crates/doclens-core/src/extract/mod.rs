//! Rule-based entity extraction module.

mod extractor;
mod pattern;
pub mod rules;

pub use extractor::{group_by_type, EntityExtractor};
pub use pattern::{EntityPattern, PostProcessor};
