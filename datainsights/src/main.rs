//! datainsights - emailed LLM insights for web analytics exports
//!
//! Reads every export file in the source directory, computes key metrics,
//! asks the LLM for commentary and emails the result. With `--dry-run` the
//! metrics are printed instead and no external service is contacted.

mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use datainsights_core::email::SmtpMailer;
use datainsights_core::ingest::discover_files;
use datainsights_core::llm::OpenAiClient;
use datainsights_core::{preview_file, Config, Pipeline};

#[derive(Parser)]
#[command(name = "datainsights")]
#[command(about = "Email LLM-written insights for web analytics exports")]
#[command(version)]
struct Args {
    /// Config file (defaults to $XDG_CONFIG_HOME/datainsights/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the export files (overrides FILE_DIR)
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Glob pattern for export files, relative to the directory
    #[arg(short, long)]
    pattern: Option<String>,

    /// Minimum records a group needs to be reported
    #[arg(long)]
    threshold: Option<usize>,

    /// Length of the top and bottom slices
    #[arg(long)]
    top: Option<usize>,

    /// Compute and print metrics without calling the LLM or sending email
    #[arg(long)]
    dry_run: bool,

    /// Output format for --dry-run: text (default) or json
    #[arg(short, long, default_value = "text")]
    format: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // .env is optional; real environment variables take precedence
    dotenv::dotenv().ok();
    Config::ensure_xdg_env();

    let mut config = match &args.config {
        Some(path) => {
            let mut config = Config::load_from(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?;
            config.apply_env().context("invalid environment configuration")?;
            config
        }
        None => Config::load().context("failed to load configuration")?,
    };
    apply_args(&mut config, &args);

    let _log_guard =
        datainsights_core::logging::init(&config.logging).context("failed to initialize logging")?;

    tracing::info!(dry_run = args.dry_run, "datainsights starting");

    if args.dry_run {
        dry_run(&config, &args.format)
    } else {
        send_reports(&config)
    }
}

fn apply_args(config: &mut Config, args: &Args) {
    if let Some(dir) = &args.dir {
        config.source.directory = Some(dir.clone());
    }
    if let Some(pattern) = &args.pattern {
        config.source.pattern = pattern.clone();
    }
    if let Some(threshold) = args.threshold {
        config.metrics.threshold = threshold;
    }
    if let Some(top) = args.top {
        config.metrics.top_bottom_count = top;
    }
}

fn dry_run(config: &Config, format: &str) -> Result<()> {
    config.validate_source().context("invalid configuration")?;
    let dir = config
        .source
        .directory
        .as_deref()
        .context("source directory is not configured")?;

    let files = discover_files(dir, &config.source.pattern)?;
    if files.is_empty() {
        eprintln!("No files matching '{}' in {}", config.source.pattern, dir.display());
        return Ok(());
    }

    let mut previews = Vec::new();
    let mut failures = 0;
    for path in &files {
        match preview_file(path, &config.metrics) {
            Ok(preview) => previews.push(preview),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read file");
                eprintln!("Skipping {}: {}", path.display(), e);
                failures += 1;
            }
        }
    }

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&previews)?);
    } else {
        for preview in &previews {
            output::print_preview(preview);
        }
        println!("---");
        println!(
            "Previewed {} file(s), {} failed",
            previews.len(),
            failures
        );
    }

    if previews.is_empty() {
        anyhow::bail!("all {} file(s) failed", failures);
    }
    Ok(())
}

fn send_reports(config: &Config) -> Result<()> {
    config.validate().context("invalid configuration")?;

    let llm = OpenAiClient::new(&config.llm).context("failed to create LLM client")?;
    let mailer = SmtpMailer::new(&config.email).context("failed to create mailer")?;

    let summary = Pipeline::new(config, &llm, &mailer).run()?;

    output::print_summary(&summary);

    if summary.all_failed() {
        anyhow::bail!("no reports were sent");
    }
    Ok(())
}
