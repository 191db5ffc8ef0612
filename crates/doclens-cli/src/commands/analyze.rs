//! Analyze command - extract entities and key phrases from one document.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info, warn};

use doclens_core::{AnalysisStatus, DocumentAnalysisResult, DocumentAnalyzer};

/// Arguments for the analyze command.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input document (plain text or HTML)
    #[arg(required = true)]
    input: PathBuf,

    /// Document id used in logs and metrics (default: file name stem)
    #[arg(long)]
    document_id: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show aggregate confidence and timing
    #[arg(long)]
    show_confidence: bool,

    /// Treat the input as HTML even when it does not look like markup
    #[arg(long)]
    html: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// One CSV row per entity
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: AnalyzeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::load_config(config_path)?;

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Analyzing file: {}", args.input.display());

    let analyzer = DocumentAnalyzer::from_config(config);
    let text = read_document(&args.input)?;
    let text = if args.html {
        analyzer.normalizer().extract_text_from_html(&text)
    } else {
        text
    };

    let document_id = args
        .document_id
        .clone()
        .or_else(|| document_id_for(&args.input));

    let result = analyzer.analyze_document(&text, document_id.as_deref());

    // Format output
    let output = format_result(&result, document_id.as_deref(), args.format)?;

    // Write output
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_confidence {
        println!();
        println!(
            "{} Aggregate confidence: {:.1}%",
            style("ℹ").blue(),
            result.confidence * 100.0
        );
        println!(
            "{} Entities: {}, key phrases: {}",
            style("ℹ").blue(),
            result.entity_count(),
            result.key_phrases.len()
        );
        println!(
            "{} Processing time: {}ms",
            style("ℹ").blue(),
            result.processing_time_ms
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    if let AnalysisStatus::Failed { error_type } = &result.status {
        warn!("Analysis of {} failed: {}", args.input.display(), error_type);
        anyhow::bail!("Analysis failed: {}", error_type);
    }

    Ok(())
}

/// Read a document as text, replacing invalid UTF-8 sequences.
pub fn read_document(path: &Path) -> anyhow::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Default document id: the file name without extension.
pub fn document_id_for(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
}

pub fn format_result(
    result: &DocumentAnalysisResult,
    document_id: Option<&str>,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result, document_id)),
    }
}

fn format_csv(result: &DocumentAnalysisResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["type", "value", "confidence", "raw", "start", "end"])?;

    for entity in &result.entities {
        wtr.write_record([
            entity.kind.as_str(),
            &entity.value,
            &format!("{:.2}", entity.confidence),
            &entity.raw,
            &entity.start.to_string(),
            &entity.end.to_string(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &DocumentAnalysisResult, document_id: Option<&str>) -> String {
    let mut output = String::new();

    if let Some(id) = document_id {
        output.push_str(&format!("Document: {}\n", id));
    }
    match &result.status {
        AnalysisStatus::Completed => output.push_str("Status: completed\n"),
        AnalysisStatus::Failed { error_type } => {
            output.push_str(&format!("Status: failed ({})\n", error_type));
        }
    }
    output.push_str(&format!("Confidence: {:.2}\n", result.confidence));
    output.push('\n');

    output.push_str(&format!("Entities ({}):\n", result.entity_count()));
    for (kind, entities) in &result.entities_by_type {
        output.push_str(&format!("  {}:\n", kind));
        for entity in entities {
            output.push_str(&format!(
                "    {} ({:.2})\n",
                entity.value, entity.confidence
            ));
        }
    }
    output.push('\n');

    output.push_str("Key phrases:\n");
    for phrase in &result.key_phrases {
        output.push_str(&format!("  - {}\n", phrase));
    }

    output
}
