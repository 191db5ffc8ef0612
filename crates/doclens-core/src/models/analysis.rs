//! Document analysis result model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::entity::{EntityKind, ExtractedEntity};

/// Outcome marker for an analysis run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum AnalysisStatus {
    /// Analysis ran to completion (possibly finding nothing).
    #[default]
    Completed,
    /// Analysis failed internally; the result is the safe empty result.
    Failed {
        /// Stable failure label, e.g. "panic".
        error_type: String,
    },
}

/// Result of analyzing a single document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentAnalysisResult {
    /// All extracted entities, unique by kind and value.
    pub entities: Vec<ExtractedEntity>,

    /// The same entities grouped by kind.
    pub entities_by_type: BTreeMap<EntityKind, Vec<ExtractedEntity>>,

    /// Frequency-ranked keywords.
    pub key_phrases: Vec<String>,

    /// Mean entity confidence, or 0 when nothing was found.
    pub confidence: f32,

    /// Wall-clock processing time in milliseconds.
    pub processing_time_ms: u64,

    /// Whether the run completed or degraded to the empty result.
    #[serde(default)]
    pub status: AnalysisStatus,
}

impl DocumentAnalysisResult {
    /// Safe empty result returned when analysis fails.
    pub fn failed(error_type: impl Into<String>, processing_time_ms: u64) -> Self {
        Self {
            processing_time_ms,
            status: AnalysisStatus::Failed {
                error_type: error_type.into(),
            },
            ..Self::default()
        }
    }

    /// Number of extracted entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Entities of one kind, empty if none were found.
    pub fn entities_of(&self, kind: &EntityKind) -> &[ExtractedEntity] {
        self.entities_by_type
            .get(kind)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether the run degraded to the empty result.
    pub fn is_failed(&self) -> bool {
        matches!(self.status, AnalysisStatus::Failed { .. })
    }
}

/// Mean confidence of a set of entities, clamped to [0, 1].
///
/// Returns 0 for an empty set and never NaN.
pub fn aggregate_confidence(entities: &[ExtractedEntity]) -> f32 {
    if entities.is_empty() {
        return 0.0;
    }

    let sum: f64 = entities.iter().map(|e| f64::from(e.confidence)).sum();
    let mean = (sum / entities.len() as f64) as f32;

    if mean.is_nan() { 0.0 } else { mean.clamp(0.0, 1.0) }
}
