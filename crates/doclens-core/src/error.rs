//! Error types for the doclens-core library.

use thiserror::Error;

/// Main error type for the doclens library.
#[derive(Error, Debug)]
pub enum DoclensError {
    /// Entity pattern registration error.
    #[error("pattern error: {0}")]
    Pattern(#[from] PatternError),

    /// Document analysis error.
    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while registering an entity pattern.
///
/// These are configuration mistakes made by the host application, so they
/// surface at registration time rather than during extraction.
#[derive(Error, Debug)]
pub enum PatternError {
    /// The pattern failed to compile.
    #[error("invalid regex for `{kind}` pattern: {source}")]
    InvalidRegex {
        kind: String,
        #[source]
        source: regex::Error,
    },

    /// The pattern source was empty.
    #[error("empty pattern for `{kind}`")]
    EmptyPattern { kind: String },

    /// The pattern accepts the empty string and would emit zero-width entities.
    #[error("pattern for `{kind}` matches the empty string")]
    MatchesEmpty { kind: String },
}

/// Internal failures of a single analysis run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// The extraction pipeline panicked.
    #[error("analysis panicked: {0}")]
    Panicked(String),

    /// The document exceeds the configured size ceiling.
    #[error("document is {len} bytes, limit is {max}")]
    InputTooLarge { len: usize, max: usize },
}

impl AnalysisError {
    /// Stable label used when reporting the failure as a metric.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Panicked(_) => "panic",
            Self::InputTooLarge { .. } => "input_too_large",
        }
    }
}

/// Result type for the doclens library.
pub type Result<T> = std::result::Result<T, DoclensError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_error_kind() {
        assert_eq!(AnalysisError::Panicked("boom".into()).kind(), "panic");
        assert_eq!(
            AnalysisError::InputTooLarge { len: 10, max: 5 }.kind(),
            "input_too_large"
        );
    }

    #[test]
    fn test_pattern_error_converts() {
        let err: DoclensError = PatternError::EmptyPattern {
            kind: "ticket".into(),
        }
        .into();
        assert_eq!(err.to_string(), "pattern error: empty pattern for `ticket`");
    }
}
