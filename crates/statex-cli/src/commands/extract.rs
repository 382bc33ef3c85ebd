//! Extract command - statement fields from a single filing.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use statex_core::models::statement::{CanonicalField, ExtractionResult};
use statex_core::{ExtractOptions, ExtractionReport};

use super::{build_extractor, load_config, supported_extension};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (PDF or scanned image)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// OCR model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Use only the digital text layer
    #[arg(long)]
    no_ocr: bool,

    /// Maximum number of pages to scan
    #[arg(long)]
    max_pages: Option<u32>,

    /// Include per-page diagnostics
    #[arg(long)]
    report: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    if supported_extension(&args.input).is_none() {
        anyhow::bail!("Unsupported file format: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message("Loading models...");

    let extractor = build_extractor(config, args.model_dir.clone(), args.no_ocr);

    pb.set_message("Extracting statements...");
    let data = fs::read(&args.input)?;
    let mut options = ExtractOptions::default();
    if let Some(max_pages) = args.max_pages {
        options = options.with_max_pages(max_pages);
    }
    let report = extractor.extract_bytes(&data, &options)?;

    pb.finish_and_clear();

    let output = if args.report {
        format_report(&report, args.format)?
    } else {
        format_result(&report.result, args.format)?
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

    for warning in &report.warnings {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn format_result(result: &ExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_report(report: &ExtractionReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Csv => format_pages_csv(report),
        OutputFormat::Text => {
            let mut output = format_text(&report.result);
            output.push_str("\nPages:\n");
            for page in &report.pages {
                let scale = page
                    .scale
                    .map(|s| s.multiplier().to_string())
                    .unwrap_or_else(|| "-".to_string());
                output.push_str(&format!(
                    "  {:>3}  {:<8} tokens={:<5} financial={:<5} scale={:<9} rows={:<4} updates={}\n",
                    page.page_index + 1,
                    format!("{:?}", page.modality).to_lowercase(),
                    page.tokens,
                    page.financial,
                    scale,
                    page.rows,
                    page.updates
                ));
            }
            output.push_str(&format!("\nProcessing time: {}ms\n", report.processing_time_ms));
            Ok(output)
        }
    }
}

/// Header and value cells of a result, in record order.
pub fn result_record(result: &ExtractionResult) -> (Vec<&'static str>, Vec<String>) {
    let mut header = vec!["parsing_status"];
    let mut values = vec![result.parsing_status.as_str().to_string()];
    for field in CanonicalField::ALL {
        header.push(field.as_str());
        values.push(result.get(field).map(|v| v.to_string()).unwrap_or_default());
    }
    (header, values)
}

fn format_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    let (header, values) = result_record(result);
    wtr.write_record(&header)?;
    wtr.write_record(&values)?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_pages_csv(report: &ExtractionReport) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "page", "modality", "tokens", "financial", "scale", "rows", "updates",
    ])?;

    for page in &report.pages {
        wtr.write_record([
            (page.page_index + 1).to_string(),
            format!("{:?}", page.modality).to_lowercase(),
            page.tokens.to_string(),
            page.financial.to_string(),
            page.scale.map(|s| s.multiplier().to_string()).unwrap_or_default(),
            page.rows.to_string(),
            page.updates.to_string(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

pub fn format_text(result: &ExtractionResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("Status: {}\n", result.parsing_status.as_str()));
    output.push('\n');

    for field in CanonicalField::ALL {
        let value = result
            .get(field)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        output.push_str(&format!("  {:<16} {}\n", field.as_str(), value));
    }

    output
}
