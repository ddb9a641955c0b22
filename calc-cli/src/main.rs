use std::path::PathBuf;

use anyhow::{Context, Result};
use calc_cli::app::{self, Edit, Page};
use calc_cli::config::AppConfig;
use calc_cli::logging;
use calc_core::calculators::{find, validate_registry};
use calc_core::publish::{ComparisonTray, Summary};
use calc_core::CALCULATORS;
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Financial calculators driven by page URLs.
///
/// Each command loads a URL such as `https://calc.example/?in=emi&emi_tenure=36`,
/// mounts the calculator named by `in`, and prints the resulting URL and
/// calculation.
#[derive(Debug, Parser)]
#[command(name = "fincalc", version, about)]
struct Cli {
    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    /// TOML config file. A missing file means defaults.
    #[arg(long, global = true, default_value = "fincalc.toml")]
    config: PathBuf,

    /// Log level or EnvFilter directive; overrides the config file.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Append logs to this file; overrides the config file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every calculator with its namespace and fields.
    List,
    /// Show the calculation a URL describes.
    Show { url: String },
    /// Edit fields in place and print the rewritten URL.
    Set {
        url: String,
        /// Edits as name=value.
        #[arg(required = true)]
        edits: Vec<Edit>,
    },
    /// Restore the active calculator's defaults.
    Reset { url: String },
    /// Switch the page to another calculator.
    Switch { url: String, calculator: String },
    /// Build a share link for the calculation a URL describes.
    Share {
        url: String,
        /// Page the link points at; defaults to `base_url` from the config.
        #[arg(long)]
        base: Option<String>,
    },
    /// Apply edits as separate history entries, then go back.
    Replay {
        url: String,
        edits: Vec<Edit>,
        /// Number of back steps to take afterwards.
        #[arg(long, default_value_t = 1)]
        back: usize,
    },
    /// Collect several URLs into a comparison tray.
    Compare {
        #[arg(required = true)]
        urls: Vec<String>,
    },
}

// ─── logging ─────────────────────────────────────────────────────────────────

fn init_logging(
    cli: &Cli,
    config: &AppConfig,
) -> Result<()> {
    logging::init_logging(&config.log_level);
    if let Some(level) = &cli.log_level {
        logging::set_log_level(level)?;
    }
    if let Some(path) = cli.log_file.as_ref().or(config.log_file.as_ref()) {
        logging::enable_file_logging(path)?;
    }
    Ok(())
}

// ─── commands ────────────────────────────────────────────────────────────────

fn print_page(
    page: &Page,
    json: bool,
) -> Result<()> {
    let report = page.report();
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }
    Ok(())
}

fn list(json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(CALCULATORS)?);
    } else {
        for line in app::catalog() {
            println!("{line}");
        }
    }
    Ok(())
}

fn compare(
    urls: &[String],
    json: bool,
) -> Result<()> {
    let mut tray = ComparisonTray::new();
    for url in urls {
        let page = Page::open(url)?;
        if !page.add_to(&mut tray) {
            warn!(url = %url, "no result to compare; skipped");
        }
    }

    if json {
        let entries: Vec<_> = tray.entries().collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for entry in tray.entries() {
        let spec = find(&entry.calculator_id)
            .with_context(|| format!("unknown calculator '{}'", entry.calculator_id))?;
        let summary = Summary::new(spec, &entry.inputs, Some(&entry.result));
        println!("[{}]", entry.added_at.format("%H:%M:%S%.6f"));
        println!("{summary}");
    }
    Ok(())
}

fn run(
    command: Command,
    config: &AppConfig,
    json: bool,
) -> Result<()> {
    match command {
        Command::List => list(json),
        Command::Show { url } => print_page(&Page::open(&url)?, json),
        Command::Set { url, edits } => {
            let mut page = Page::open(&url)?;
            page.apply(&edits)?;
            print_page(&page, json)
        }
        Command::Reset { url } => {
            let mut page = Page::open(&url)?;
            page.reset();
            print_page(&page, json)
        }
        Command::Switch { url, calculator } => {
            let mut page = Page::open(&url)?;
            page.switch(&calculator)?;
            print_page(&page, json)
        }
        Command::Share { url, base } => {
            let page = Page::open(&url)?;
            let link = page.share_link(base.as_deref().unwrap_or(&config.base_url));
            if json {
                println!("{}", serde_json::json!({ "link": link }));
            } else {
                println!("{link}");
            }
            Ok(())
        }
        Command::Replay { url, edits, back } => {
            let mut page = Page::open(&url)?;
            let taken = page.replay(&edits, back)?;
            if taken < back {
                warn!(requested = back, taken, "ran out of history");
            }
            print_page(&page, json)
        }
        Command::Compare { urls } => compare(&urls, json),
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(Some(&cli.config))
        .with_context(|| format!("Failed to load config: {}", cli.config.display()))?;
    init_logging(&cli, &config)?;
    debug!(?config, "loaded config");

    validate_registry(CALCULATORS).context("Calculator registry is inconsistent")?;

    let Cli { command, json, .. } = cli;
    info!(?command, "running");
    run(command, &config, json)
}
