//! Data models for entities, analysis results, and configuration.

pub mod analysis;
pub mod config;
pub mod entity;

pub use analysis::{aggregate_confidence, AnalysisStatus, DocumentAnalysisResult};
pub use config::{AnalyzerConfig, ConfidencePolicy, DateConfig};
pub use entity::{EntityKind, ExtractedEntity};
