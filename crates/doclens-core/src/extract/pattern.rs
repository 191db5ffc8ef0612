//! Entity pattern definition.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::error::PatternError;
use crate::models::entity::EntityKind;

/// Canonicalizes a matched string.
pub type PostProcessor = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// A typed matcher with optional canonicalization.
#[derive(Clone)]
pub struct EntityPattern {
    kind: EntityKind,
    regex: Regex,
    post_process: Option<PostProcessor>,
    confidence: Option<f32>,
}

impl EntityPattern {
    /// Compile a pattern, failing fast on invalid input.
    ///
    /// Empty sources and patterns that match the empty string are rejected.
    pub fn new(kind: impl Into<EntityKind>, pattern: &str) -> Result<Self, PatternError> {
        let kind = kind.into();

        if pattern.trim().is_empty() {
            return Err(PatternError::EmptyPattern {
                kind: kind.to_string(),
            });
        }

        let regex = Regex::new(pattern).map_err(|source| PatternError::InvalidRegex {
            kind: kind.to_string(),
            source,
        })?;

        Self::from_regex(kind, regex)
    }

    /// Wrap an already compiled regex.
    pub fn from_regex(kind: impl Into<EntityKind>, regex: Regex) -> Result<Self, PatternError> {
        let kind = kind.into();

        if regex.is_match("") {
            return Err(PatternError::MatchesEmpty {
                kind: kind.to_string(),
            });
        }

        Ok(Self::built_in(kind, regex))
    }

    /// Construct without validation, for the static built-in table.
    pub(crate) fn built_in(kind: EntityKind, regex: Regex) -> Self {
        Self {
            kind,
            regex,
            post_process: None,
            confidence: None,
        }
    }

    /// Set the canonicalization applied to each match.
    pub fn with_post_process<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.post_process = Some(Arc::new(f));
        self
    }

    /// Set a shared post-processor.
    pub fn with_post_processor(mut self, post_process: Option<PostProcessor>) -> Self {
        self.post_process = post_process;
        self
    }

    /// Set a fixed confidence for entities of a custom kind.
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn confidence(&self) -> Option<f32> {
        self.confidence
    }

    /// Apply post-processing, or return the match unchanged.
    pub fn canonicalize(&self, matched: &str) -> String {
        match &self.post_process {
            Some(f) => f(matched),
            None => matched.to_string(),
        }
    }
}

impl fmt::Debug for EntityPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityPattern")
            .field("kind", &self.kind)
            .field("regex", &self.regex.as_str())
            .field("post_process", &self.post_process.is_some())
            .field("confidence", &self.confidence)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_regex_fails_fast() {
        let err = EntityPattern::new("ticket", r"T-(\d+").unwrap_err();
        assert!(matches!(err, PatternError::InvalidRegex { ref kind, .. } if kind == "ticket"));
    }

    #[test]
    fn test_empty_pattern_rejected() {
        let err = EntityPattern::new("ticket", "  ").unwrap_err();
        assert!(matches!(err, PatternError::EmptyPattern { .. }));
    }

    #[test]
    fn test_empty_match_rejected() {
        let err = EntityPattern::new("ticket", r"\d*").unwrap_err();
        assert!(matches!(err, PatternError::MatchesEmpty { .. }));
    }

    #[test]
    fn test_canonicalize() {
        let plain = EntityPattern::new("ticket", r"T-\d+").unwrap();
        assert_eq!(plain.canonicalize("T-42"), "T-42");

        let upper = plain.clone().with_post_process(|s| s.to_uppercase());
        assert_eq!(upper.canonicalize("t-42"), "T-42");
        assert_eq!(upper.kind(), &EntityKind::Custom("ticket".into()));
    }
}
