//! Batch command - analyze many documents with a bounded worker pool.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use doclens_core::metrics::{
    DOCUMENT_PROCESSING_DURATION, ENTITY_EXTRACTION_COUNT, PROCESSING_ERRORS,
};
use doclens_core::{
    AnalysisStatus, DocumentAnalysisResult, DocumentAnalyzer, EntityKind, InMemoryMetrics,
};

use super::analyze::{document_id_for, format_result, read_document, OutputFormat};

/// Extensions picked up from a glob expansion.
const DOCUMENT_EXTENSIONS: &[&str] = &["txt", "text", "md", "html", "htm", "eml"];

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Print collected metrics after the run
    #[arg(long)]
    metrics: bool,
}

/// Result of analyzing a single file.
struct FileResult {
    path: PathBuf,
    analysis: Option<DocumentAnalysisResult>,
    error: Option<String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_document(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to analyze",
        style("ℹ").blue(),
        files.len()
    );

    // Create output directory if specified
    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let metrics = Arc::new(InMemoryMetrics::new());
    let analyzer = Arc::new(DocumentAnalyzer::from_config(config).with_metrics(metrics.clone()));

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let results = analyze_files(files, analyzer, args.jobs, &pb).await;

    pb.finish_with_message("Complete");

    // Write outputs
    let successful: Vec<_> = results.iter().filter(|r| r.analysis.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &successful {
            let Some(analysis) = &result.analysis else {
                continue;
            };
            let document_id = document_id_for(&result.path);
            let output_name = document_id.as_deref().unwrap_or("document");
            let output_path =
                output_dir.join(format!("{}.{}", output_name, args.format.extension()));

            let content = format_result(analysis, document_id.as_deref(), args.format)?;
            fs::write(&output_path, content)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    // Generate summary if requested
    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    // Print summary
    println!();
    println!(
        "{} Analyzed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    if args.metrics {
        println!();
        println!("{}", style("Metrics:").blue());
        println!(
            "  {}: {} samples, {:.0}ms total",
            DOCUMENT_PROCESSING_DURATION,
            metrics.samples_named(DOCUMENT_PROCESSING_DURATION).len(),
            metrics.total(DOCUMENT_PROCESSING_DURATION)
        );
        println!(
            "  {}: {:.0}",
            ENTITY_EXTRACTION_COUNT,
            metrics.total(ENTITY_EXTRACTION_COUNT)
        );
        println!("  {}: {:.0}", PROCESSING_ERRORS, metrics.total(PROCESSING_ERRORS));
    }

    Ok(())
}

fn is_document(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    DOCUMENT_EXTENSIONS.contains(&ext.as_str())
}

/// Analyze files on the blocking pool, at most `jobs` at a time.
///
/// Results come back in input order. A file that fails to read or analyze
/// is reported in its result and never stops the batch.
async fn analyze_files(
    files: Vec<PathBuf>,
    analyzer: Arc<DocumentAnalyzer>,
    jobs: usize,
    pb: &ProgressBar,
) -> Vec<FileResult> {
    let semaphore = Arc::new(Semaphore::new(jobs.max(1)));
    let mut tasks = JoinSet::new();

    for (index, path) in files.iter().cloned().enumerate() {
        let semaphore = semaphore.clone();
        let analyzer = analyzer.clone();
        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await;
            let task_path = path.clone();
            let outcome =
                tokio::task::spawn_blocking(move || analyze_file(&analyzer, &task_path)).await;
            let result = match outcome {
                Ok(result) => result,
                Err(e) => FileResult {
                    path,
                    analysis: None,
                    error: Some(format!("worker failed: {}", e)),
                },
            };
            (index, result)
        });
    }

    let mut slots: Vec<Option<FileResult>> = files.iter().map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => slots[index] = Some(result),
            Err(e) => warn!("Batch task failed: {}", e),
        }
        pb.inc(1);
    }

    slots
        .into_iter()
        .zip(files)
        .map(|(slot, path)| {
            slot.unwrap_or_else(|| FileResult {
                path,
                analysis: None,
                error: Some("task did not complete".to_string()),
            })
        })
        .collect()
}

fn analyze_file(analyzer: &DocumentAnalyzer, path: &Path) -> FileResult {
    let text = match read_document(path) {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            return FileResult {
                path: path.to_path_buf(),
                analysis: None,
                error: Some(e.to_string()),
            };
        }
    };

    let document_id = document_id_for(path);
    let analysis = analyzer.analyze_document(&text, document_id.as_deref());

    match &analysis.status {
        AnalysisStatus::Completed => FileResult {
            path: path.to_path_buf(),
            analysis: Some(analysis),
            error: None,
        },
        AnalysisStatus::Failed { error_type } => {
            warn!("Failed to analyze {}: {}", path.display(), error_type);
            FileResult {
                path: path.to_path_buf(),
                analysis: None,
                error: Some(format!("analysis failed: {}", error_type)),
            }
        }
    }
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "entities",
        "dates",
        "emails",
        "phones",
        "key_phrases",
        "confidence",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(analysis) = &result.analysis {
            wtr.write_record([
                filename,
                "success",
                &analysis.entity_count().to_string(),
                &analysis.entities_of(&EntityKind::Date).len().to_string(),
                &analysis.entities_of(&EntityKind::Email).len().to_string(),
                &analysis.entities_of(&EntityKind::Phone).len().to_string(),
                &analysis.key_phrases.join("; "),
                &format!("{:.2}", analysis.confidence),
                &analysis.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_document() {
        assert!(is_document(Path::new("notes/memo.TXT")));
        assert!(is_document(Path::new("page.html")));
        assert!(!is_document(Path::new("scan.pdf")));
        assert!(!is_document(Path::new("README")));
    }

    #[tokio::test]
    async fn test_analyze_files_keeps_order_and_reports_errors() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.txt");
        let missing = dir.path().join("missing.txt");
        let last = dir.path().join("c.txt");
        fs::write(&first, "Contact ops@example.com").unwrap();
        fs::write(&last, "Due 12/31/2023").unwrap();

        let analyzer = Arc::new(DocumentAnalyzer::new());
        let pb = ProgressBar::hidden();
        let results = analyze_files(
            vec![first.clone(), missing.clone(), last.clone()],
            analyzer,
            2,
            &pb,
        )
        .await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].path, first);
        assert!(results[0].analysis.is_some());
        assert_eq!(results[1].path, missing);
        assert!(results[1].error.is_some());
        assert_eq!(results[2].path, last);
        let dates = results[2]
            .analysis
            .as_ref()
            .unwrap()
            .entities_of(&EntityKind::Date)
            .to_vec();
        assert_eq!(dates[0].value, "2023-12-31");
    }
}
