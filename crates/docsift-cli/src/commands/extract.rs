//! Extract command - pull structured fields and tables out of one document.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use docsift_core::extract::{StructuredDataExtractor, StructuredExtractor};
use docsift_core::source::{FileTextSource, TextSource};

use super::load_config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input document (text, PDF or DOCX)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON result
    #[arg(long)]
    pretty: bool,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    info!("Extracting data from {}", args.input.display());

    let input = args.input.clone();
    let result = tokio::task::spawn_blocking(move || -> docsift_core::Result<_> {
        let text = FileTextSource::from_config(&config.source).read_text(&input)?;
        Ok(StructuredDataExtractor::from_config(&config.extraction).extract(&text))
    })
    .await??;

    let output = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };

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

    debug!("Total extraction time: {:?}", start.elapsed());

    Ok(())
}
