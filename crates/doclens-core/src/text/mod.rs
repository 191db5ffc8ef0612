//! Text normalization module.

mod normalizer;
pub mod patterns;
pub mod stopwords;

pub use normalizer::{Sentences, TextNormalizer};
pub use stopwords::DEFAULT_STOP_WORDS;
