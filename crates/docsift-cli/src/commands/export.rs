//! Export command - render a document's extraction data to an artifact.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use docsift_core::export::{ExportFormat, MultiFormatExporter};
use docsift_core::extract::{StructuredDataExtractor, StructuredExtractor};
use docsift_core::models::config::DocsiftConfig;
use docsift_core::models::export::{ExportBundle, ExportPayload};
use docsift_core::source::{FileTextSource, TextSource};

use super::load_config;

/// Arguments for the export command.
#[derive(Args)]
pub struct ExportArgs {
    /// Input document; its file name labels the export
    #[arg(required = true)]
    input: PathBuf,

    /// Artifact format (default: from configuration)
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// Output directory (default: from configuration)
    #[arg(short = 'd', long)]
    output_dir: Option<PathBuf>,

    /// Export this JSON payload (e.g. user-edited data) instead of extracting the input
    #[arg(long)]
    payload: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum FormatArg {
    /// XLSX workbook with data and metadata sheets
    Spreadsheet,
    /// Sectioned CSV
    Delimited,
    /// Plain text report
    PlainText,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Spreadsheet => ExportFormat::Spreadsheet,
            FormatArg::Delimited => ExportFormat::Delimited,
            FormatArg::PlainText => ExportFormat::PlainText,
        }
    }
}

pub async fn run(args: ExportArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let format = args
        .format
        .map(ExportFormat::from)
        .unwrap_or(config.export.default_format);
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.export.output_dir.clone());

    let original_filename = args
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base_name = args
        .input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    info!("Exporting {} as {}", args.input.display(), format);

    let path = tokio::task::spawn_blocking(move || -> anyhow::Result<PathBuf> {
        let payload = match &args.payload {
            Some(payload_path) => load_payload(payload_path)?,
            None => extract_payload(&args.input, &config)?,
        };

        let bundle = ExportBundle::prepare(payload, &original_filename);
        let exporter = MultiFormatExporter::new(output_dir)?;
        Ok(exporter.export(format, &bundle, &base_name)?)
    })
    .await??;

    println!(
        "{} {} export written to {}",
        style("✓").green(),
        format,
        path.display()
    );

    debug!("Total export time: {:?}", start.elapsed());

    Ok(())
}

fn load_payload(path: &Path) -> anyhow::Result<ExportPayload> {
    let content = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read payload {}: {}", path.display(), e))?;
    serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Invalid payload {}: {}", path.display(), e))
}

fn extract_payload(input: &Path, config: &DocsiftConfig) -> docsift_core::Result<ExportPayload> {
    let text = FileTextSource::from_config(&config.source).read_text(input)?;
    let result = StructuredDataExtractor::from_config(&config.extraction).extract(&text);
    Ok(ExportPayload::from(result))
}
