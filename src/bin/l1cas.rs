//! l1cas - dump TRS-80 Level I BASIC cassette images
//!
//! Reads a `.cas` file, decodes every program in it and prints each
//! program's header block and listing, as text or JSON.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

use l1cas::app::{Config, ConfigError, OutputFormat, Report};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "l1cas")]
#[command(version)]
#[command(about = "Decode TRS-80 Level I BASIC cassette files", long_about = None)]
struct Args {
    /// Cassette image to decode
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Path to a JSON config file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write the report as JSON
    #[arg(short, long, conflicts_with = "text")]
    json: bool,

    /// Write the report as text
    #[arg(short, long)]
    text: bool,

    /// Omit the tool banner
    #[arg(long)]
    no_banner: bool,

    /// Omit program header blocks
    #[arg(long)]
    no_metadata: bool,

    /// Ruler width for text output
    #[arg(short, long, value_name = "N")]
    width: Option<usize>,
}

impl Args {
    /// Resolve configuration: CLI > file > defaults
    fn resolve_config(&self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::load_or_default(),
        };

        if self.json {
            config.output = OutputFormat::Json;
        }
        if self.text {
            config.output = OutputFormat::Text;
        }
        if self.no_banner {
            config.show_banner = false;
        }
        if self.no_metadata {
            config.show_metadata = false;
        }
        if let Some(width) = self.width {
            config.rule_width = width;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging before config so config warnings are visible.
    // RUST_LOG wins; otherwise start at warn and switch to the configured filter.
    let env_filter = EnvFilter::try_from_default_env().ok();
    let from_env = env_filter.is_some();
    let (filter, filter_handle) =
        reload::Layer::new(env_filter.unwrap_or_else(|| EnvFilter::new("warn")));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = match args.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        },
    };

    if !from_env {
        if let Err(e) = filter_handle.reload(EnvFilter::new(&config.log_filter)) {
            eprintln!("Failed to apply log filter '{}': {}", config.log_filter, e);
        }
    }

    if !args.input.is_file() {
        eprintln!("Input file not found: {}", args.input.display());
        return ExitCode::FAILURE;
    }

    let data = match std::fs::read(&args.input) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", args.input.display(), e);
            return ExitCode::FAILURE;
        },
    };

    tracing::info!("Decoding {} ({} bytes)", args.input.display(), data.len());
    let report = Report::from_bytes(args.input.display().to_string(), &data);

    match config.output {
        OutputFormat::Text => print!("{}", report.to_text(&config)),
        OutputFormat::Json => match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing report: {}", e);
                return ExitCode::FAILURE;
            },
        },
    }

    if report.is_ok() {
        return ExitCode::SUCCESS;
    }

    match &report.error {
        None => ExitCode::SUCCESS,
        Some(err) if err.is_format_mismatch() => {
            eprintln!(
                "Input file does not appear to be a Level I BASIC cassette (offset {}).",
                err.offset()
            );
            ExitCode::FAILURE
        },
        Some(err) => {
            eprintln!("Decoding stopped at offset {}: {}", err.offset(), err);
            ExitCode::FAILURE
        },
    }
}
