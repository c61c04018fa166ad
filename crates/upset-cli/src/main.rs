mod input;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::builder::NonEmptyStringValueParser;
use clap::{ArgGroup, Parser};
use tracing::{debug, info};
use upset_signals::{AnalysisResult, AnalyzerConfig, UpsetAnalyzer};

use crate::input::read_conversation;
use crate::render::{render_json, render_text};
use crate::utils::tracing::init_logging;

#[derive(Parser, Debug)]
#[command(name = "upsetai")]
#[command(about = "Detect upset in a message or chat transcript and suggest a reply")]
#[command(version)]
#[command(group(
    ArgGroup::new("input")
        .required(true)
        .args(["text", "from_file"])
))]
struct Cli {
    /// Single message to analyze
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    text: Option<String>,

    /// Path to a txt file with one message per line
    #[arg(long, value_name = "PATH")]
    from_file: Option<PathBuf>,

    /// Whose messages the file represents (e.g. 'sender' or 'her')
    #[arg(long, default_value = "sender")]
    role: String,

    /// Print raw JSON only
    #[arg(long)]
    json: bool,

    /// YAML file overriding the analyzer thresholds
    #[arg(long, env = "UPSETAI_CONFIG_PATH", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn build_analyzer(config_path: Option<&PathBuf>) -> Result<UpsetAnalyzer> {
    let Some(path) = config_path else {
        return Ok(UpsetAnalyzer::new());
    };

    info!("loading analyzer config from {}", path.display());
    let config = AnalyzerConfig::load(path)
        .with_context(|| format!("invalid analyzer config {}", path.display()))?;
    debug!(?config, "analyzer config loaded");

    Ok(UpsetAnalyzer::with_config(config)?)
}

fn analyze(cli: &Cli, analyzer: &UpsetAnalyzer) -> Result<AnalysisResult> {
    if let Some(text) = &cli.text {
        return Ok(analyzer.analyze_message(text));
    }

    let path = cli
        .from_file
        .as_ref()
        .context("either --text or --from-file is required")?;
    let entries = read_conversation(path, &cli.role)?;
    debug!(messages = entries.len(), role = %cli.role, "read conversation");

    Ok(analyzer.analyze_conversation(&entries, Some(cli.role.as_str())))
}

fn run(cli: &Cli, colored: bool) -> Result<String> {
    let analyzer = build_analyzer(cli.config.as_ref())?;
    let result = analyze(cli, &analyzer)?;

    if cli.json {
        Ok(render_json(&result)?)
    } else {
        Ok(render_text(&result, colored))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = run(&cli, console::colors_enabled())?;
    println!("{output}");

    Ok(())
}
