//! Subcommand implementations.

pub mod analyze;
pub mod batch;
pub mod config;

use std::path::Path;

use doclens_core::AnalyzerConfig;
use tracing::debug;

/// Resolve the analyzer configuration.
///
/// An explicit `--config` path must load. Otherwise the user config file is
/// used when present, falling back to defaults.
pub(crate) fn load_config(config_path: Option<&str>) -> anyhow::Result<AnalyzerConfig> {
    if let Some(path) = config_path {
        return AnalyzerConfig::from_file(Path::new(path)).map_err(|e| {
            anyhow::anyhow!("Failed to load config from {}: {}", path, e)
        });
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Loading config from {}", default_path.display());
        Ok(AnalyzerConfig::from_file(&default_path)?)
    } else {
        Ok(AnalyzerConfig::default())
    }
}
