//! Core library for document text analysis.
//!
//! This crate provides:
//! - Text normalization (whitespace, HTML stripping, sentences, paragraphs)
//! - Rule-based entity extraction (dates, emails, phones, currency, names,
//!   organizations, plus custom kinds)
//! - Frequency-based keyword ranking
//! - Document analysis with aggregate confidence and metrics reporting
//!
//! ```
//! use doclens_core::{DocumentAnalyzer, EntityKind};
//!
//! let analyzer = DocumentAnalyzer::new();
//! let result = analyzer.analyze_document("Call 1234567890 before 12/31/2023.", Some("memo-1"));
//!
//! assert_eq!(result.entities_of(&EntityKind::Phone)[0].value, "(123) 456-7890");
//! assert_eq!(result.entities_of(&EntityKind::Date)[0].value, "2023-12-31");
//! ```

pub mod analyzer;
pub mod error;
pub mod extract;
pub mod metrics;
pub mod models;
pub mod text;

pub use analyzer::DocumentAnalyzer;
pub use error::{AnalysisError, DoclensError, PatternError, Result};
pub use extract::{EntityExtractor, EntityPattern, PostProcessor};
pub use metrics::{InMemoryMetrics, Labels, MetricsCollector};
pub use models::{
    AnalysisStatus, AnalyzerConfig, ConfidencePolicy, DateConfig, DocumentAnalysisResult,
    EntityKind, ExtractedEntity,
};
pub use text::TextNormalizer;
