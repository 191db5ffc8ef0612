//! Document analysis orchestration.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::error::{AnalysisError, PatternError};
use crate::extract::{group_by_type, EntityExtractor, EntityPattern, PostProcessor};
use crate::metrics::{
    document_labels, MetricsCollector, DOCUMENT_PROCESSING_DURATION, ENTITY_EXTRACTION_COUNT,
    PROCESSING_ERRORS, UNKNOWN_DOCUMENT,
};
use crate::models::analysis::{aggregate_confidence, AnalysisStatus, DocumentAnalysisResult};
use crate::models::config::AnalyzerConfig;
use crate::models::entity::EntityKind;
use crate::text::TextNormalizer;

/// Runs normalization, extraction, and keyword ranking over one document.
///
/// An analyzer is immutable once shared: it is `Send + Sync`, so wrap it in
/// an `Arc` to analyze documents from several workers. Register custom
/// patterns while building it.
#[derive(Clone)]
pub struct DocumentAnalyzer {
    normalizer: TextNormalizer,
    extractor: EntityExtractor,
    config: AnalyzerConfig,
    metrics: Option<Arc<dyn MetricsCollector>>,
}

impl DocumentAnalyzer {
    /// Create an analyzer with default configuration.
    pub fn new() -> Self {
        Self::from_config(AnalyzerConfig::default())
    }

    /// Create an analyzer from a configuration.
    pub fn from_config(config: AnalyzerConfig) -> Self {
        let normalizer = match &config.stop_words {
            Some(words) => TextNormalizer::with_stop_words(words),
            None => TextNormalizer::new(),
        };

        Self {
            normalizer,
            extractor: EntityExtractor::from_config(&config),
            config,
            metrics: None,
        }
    }

    /// Report metrics to a collector.
    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Register a custom entity pattern, returning the extended analyzer.
    pub fn with_entity_pattern(
        mut self,
        kind: impl Into<EntityKind>,
        pattern: &str,
        post_process: Option<PostProcessor>,
    ) -> Result<Self, PatternError> {
        self.add_entity_pattern(kind, pattern, post_process)?;
        Ok(self)
    }

    /// Register a custom entity pattern.
    ///
    /// Invalid patterns are rejected here, never during analysis.
    pub fn add_entity_pattern(
        &mut self,
        kind: impl Into<EntityKind>,
        pattern: &str,
        post_process: Option<PostProcessor>,
    ) -> Result<(), PatternError> {
        self.extractor
            .add_entity_pattern(kind, pattern, post_process)
            .inspect_err(|e| warn!("Rejected entity pattern: {}", e))
    }

    /// Register a pre-built pattern.
    pub fn with_pattern(mut self, pattern: EntityPattern) -> Self {
        self.extractor.add_pattern(pattern);
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn extractor(&self) -> &EntityExtractor {
        &self.extractor
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// Analyze a document without ever failing.
    ///
    /// Internal failures are logged, reported as a `processing_errors`
    /// metric, and turned into an empty zero-confidence result whose
    /// `status` is [`AnalysisStatus::Failed`].
    pub fn analyze_document(&self, text: &str, document_id: Option<&str>) -> DocumentAnalysisResult {
        let start = Instant::now();

        match self.try_analyze_document(text, document_id) {
            Ok(result) => result,
            Err(e) => DocumentAnalysisResult::failed(e.kind(), elapsed_ms(start)),
        }
    }

    /// Analyze a document, surfacing internal failures as errors.
    pub fn try_analyze_document(
        &self,
        text: &str,
        document_id: Option<&str>,
    ) -> Result<DocumentAnalysisResult, AnalysisError> {
        let start = Instant::now();
        let id = document_id.unwrap_or(UNKNOWN_DOCUMENT);

        info!("Analyzing document {} ({} bytes)", id, text.len());

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run(text, start)))
            .unwrap_or_else(|payload| Err(AnalysisError::Panicked(panic_message(payload.as_ref()))));

        let labels = document_labels(document_id);

        match outcome {
            Ok(result) => {
                debug!(
                    "Document {}: {} entities, {} key phrases, confidence {:.2}",
                    id,
                    result.entities.len(),
                    result.key_phrases.len(),
                    result.confidence
                );

                self.record(DOCUMENT_PROCESSING_DURATION, result.processing_time_ms as f64, &labels);
                self.record(ENTITY_EXTRACTION_COUNT, result.entities.len() as f64, &labels);

                Ok(result)
            }
            Err(e) => {
                error!("Analysis of document {} failed: {}", id, e);

                let mut labels = labels;
                labels.insert("error_type".to_string(), e.kind().to_string());
                self.record(PROCESSING_ERRORS, 1.0, &labels);

                Err(e)
            }
        }
    }

    fn run(&self, text: &str, start: Instant) -> Result<DocumentAnalysisResult, AnalysisError> {
        if let Some(max) = self.config.max_input_bytes {
            if text.len() > max {
                warn!("Document of {} bytes exceeds limit of {}", text.len(), max);
                return Err(AnalysisError::InputTooLarge {
                    len: text.len(),
                    max,
                });
            }
        }

        let normalized = if self.config.strip_html && self.normalizer.looks_like_html(text) {
            debug!("Stripping HTML markup");
            self.normalizer.extract_text_from_html(text)
        } else {
            self.normalizer.normalize(text)
        };

        let entities = self.extractor.extract_entities(&normalized);
        let entities_by_type = group_by_type(&entities);
        let key_phrases = self
            .normalizer
            .extract_keywords(&normalized, self.config.max_key_phrases);
        let confidence = aggregate_confidence(&entities);

        Ok(DocumentAnalysisResult {
            entities,
            entities_by_type,
            key_phrases,
            confidence,
            processing_time_ms: elapsed_ms(start),
            status: AnalysisStatus::Completed,
        })
    }

    fn record(&self, name: &str, value: f64, labels: &crate::metrics::Labels) {
        let Some(metrics) = &self.metrics else {
            return;
        };

        if panic::catch_unwind(AssertUnwindSafe(|| metrics.record(name, value, labels))).is_err() {
            warn!("Metrics collector panicked while recording {}", name);
        }
    }
}

impl Default for DocumentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
