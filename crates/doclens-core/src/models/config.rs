//! Configuration structures for the analysis engine.

use serde::{Deserialize, Serialize};

/// Main configuration for document analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Maximum number of key phrases per document.
    pub max_key_phrases: usize,

    /// Detect and strip HTML markup before extraction.
    pub strip_html: bool,

    /// Reject documents larger than this many bytes (None = unlimited).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_input_bytes: Option<usize>,

    /// Per-kind confidence constants.
    pub confidence: ConfidencePolicy,

    /// Date canonicalization settings.
    pub dates: DateConfig,

    /// Replacement stop-word list (None = built-in English list).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_words: Option<Vec<String>>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_key_phrases: 15,
            strip_html: true,
            max_input_bytes: None,
            confidence: ConfidencePolicy::default(),
            dates: DateConfig::default(),
            stop_words: None,
        }
    }
}

/// Heuristic confidence scores assigned per entity kind.
///
/// These are policy values, not probabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidencePolicy {
    /// Score for any match without a more specific rule.
    pub base: f32,

    /// Date whose canonical value is a real calendar date.
    pub date_valid: f32,

    /// Date that could not be canonicalized or validated.
    pub date_invalid: f32,

    /// Any e-mail address.
    pub email: f32,

    /// Phone number with at least `phone_min_digits` digits.
    pub phone_complete: f32,

    /// Shorter phone number.
    pub phone_partial: f32,

    /// Digit count separating complete from partial phone numbers.
    pub phone_min_digits: usize,

    /// Two capitalized words taken as a person name.
    pub person: f32,
}

impl Default for ConfidencePolicy {
    fn default() -> Self {
        Self {
            base: 0.8,
            date_valid: 0.95,
            date_invalid: 0.7,
            email: 0.98,
            phone_complete: 0.95,
            phone_partial: 0.75,
            phone_min_digits: 10,
            person: 0.75,
        }
    }
}

/// Date canonicalization configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateConfig {
    /// Two-digit years more than this far past the current year's last two
    /// digits are placed in the previous century.
    pub century_window: i32,

    /// Year used as "now" for the century window (None = local clock).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_year: Option<i32>,
}

impl Default for DateConfig {
    fn default() -> Self {
        Self {
            century_window: 20,
            reference_year: None,
        }
    }
}

impl DateConfig {
    /// The year the century window is computed against.
    pub fn current_year(&self) -> i32 {
        use chrono::Datelike;

        self.reference_year
            .unwrap_or_else(|| chrono::Local::now().year())
    }
}

impl AnalyzerConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.max_key_phrases, 15);
        assert!(config.strip_html);
        assert_eq!(config.confidence.email, 0.98);
        assert_eq!(config.dates.century_window, 20);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AnalyzerConfig =
            serde_json::from_str(r#"{"max_key_phrases": 5, "confidence": {"person": 0.5}}"#)
                .unwrap();
        assert_eq!(config.max_key_phrases, 5);
        assert_eq!(config.confidence.person, 0.5);
        assert_eq!(config.confidence.email, 0.98);
        assert_eq!(config.dates, DateConfig::default());
    }

    #[test]
    fn test_reference_year_overrides_clock() {
        let dates = DateConfig {
            reference_year: Some(2031),
            ..DateConfig::default()
        };
        assert_eq!(dates.current_year(), 2031);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doclens.json");

        let mut config = AnalyzerConfig::default();
        config.max_key_phrases = 7;
        config.stop_words = Some(vec!["foo".to_string()]);
        config.save(&path).unwrap();

        let loaded = AnalyzerConfig::from_file(&path).unwrap();
        assert_eq!(loaded.max_key_phrases, 7);
        assert_eq!(loaded.stop_words, Some(vec!["foo".to_string()]));
        assert_eq!(loaded.confidence, ConfidencePolicy::default());
    }
}
