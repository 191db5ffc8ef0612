//! Metrics reporting seam.
//!
//! The analyzer reports through [`MetricsCollector`] when one is injected.
//! The sink itself (Prometheus, StatsD, a database table) belongs to the
//! host application.

use std::collections::BTreeMap;
use std::sync::Mutex;

/// Metric labels.
pub type Labels = BTreeMap<String, String>;

/// Duration of one `analyze_document` call, in milliseconds.
pub const DOCUMENT_PROCESSING_DURATION: &str = "document_processing_duration";

/// Number of entities found in one document.
pub const ENTITY_EXTRACTION_COUNT: &str = "entity_extraction_count";

/// One failed analysis, labeled with `error_type`.
pub const PROCESSING_ERRORS: &str = "processing_errors";

/// Document id label used when the caller supplies none.
pub const UNKNOWN_DOCUMENT: &str = "unknown";

/// Receives metric samples.
pub trait MetricsCollector: Send + Sync {
    fn record(&self, name: &str, value: f64, labels: &Labels);
}

/// A recorded metric sample.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub name: String,
    pub value: f64,
    pub labels: Labels,
}

/// Collector that keeps every sample in memory.
#[derive(Debug, Default)]
pub struct InMemoryMetrics {
    samples: Mutex<Vec<MetricSample>>,
}

impl InMemoryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all samples recorded so far.
    pub fn samples(&self) -> Vec<MetricSample> {
        self.samples
            .lock()
            .map(|samples| samples.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Samples with the given metric name.
    pub fn samples_named(&self, name: &str) -> Vec<MetricSample> {
        self.samples()
            .into_iter()
            .filter(|s| s.name == name)
            .collect()
    }

    /// Sum of all values recorded under a metric name.
    pub fn total(&self, name: &str) -> f64 {
        self.samples_named(name).iter().map(|s| s.value).sum()
    }
}

impl MetricsCollector for InMemoryMetrics {
    fn record(&self, name: &str, value: f64, labels: &Labels) {
        let sample = MetricSample {
            name: name.to_string(),
            value,
            labels: labels.clone(),
        };
        match self.samples.lock() {
            Ok(mut samples) => samples.push(sample),
            Err(poisoned) => poisoned.into_inner().push(sample),
        }
    }
}

/// Build a label set containing the document id.
pub fn document_labels(document_id: Option<&str>) -> Labels {
    let mut labels = Labels::new();
    labels.insert(
        "document_id".to_string(),
        document_id.unwrap_or(UNKNOWN_DOCUMENT).to_string(),
    );
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_records() {
        let metrics = InMemoryMetrics::new();
        metrics.record(ENTITY_EXTRACTION_COUNT, 3.0, &document_labels(Some("doc-1")));
        metrics.record(ENTITY_EXTRACTION_COUNT, 2.0, &document_labels(None));
        metrics.record(DOCUMENT_PROCESSING_DURATION, 12.0, &document_labels(None));

        assert_eq!(metrics.samples().len(), 3);
        assert_eq!(metrics.total(ENTITY_EXTRACTION_COUNT), 5.0);

        let counts = metrics.samples_named(ENTITY_EXTRACTION_COUNT);
        assert_eq!(counts[0].labels["document_id"], "doc-1");
        assert_eq!(counts[1].labels["document_id"], "unknown");
    }
}
