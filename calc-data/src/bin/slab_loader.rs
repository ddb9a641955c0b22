use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use calc_core::calculations::common::to_money;
use calc_core::calculations::compute_progressive_tax;
use calc_core::SlabTable;
use calc_data::SlabTableLoader;
use clap::Parser;
use tracing::info;

/// Validate progressive slab tables from a CSV file.
///
/// The CSV file should have the following columns:
/// - regime: Code of the regime the slab belongs to (e.g., new)
/// - min: Exclusive lower bound of the slab
/// - max: Inclusive upper bound (empty for the unbounded top slab)
/// - rate_percent: Rate inside the slab, in percent (e.g., 5)
#[derive(Parser, Debug)]
#[command(name = "slab-loader")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing slab data
    #[arg(short, long)]
    file: PathBuf,

    /// Only show this regime
    #[arg(short, long)]
    regime: Option<String>,

    /// Show the slab-by-slab tax on this taxable income
    #[arg(short, long)]
    income: Option<f64>,
}

fn print_table(
    regime: &str,
    table: &SlabTable,
) {
    println!("Regime '{}':", regime);
    for slab in table.slabs() {
        let upper = slab
            .max
            .map_or_else(|| "and above".to_string(), |max| format!("to {}", max));
        println!("  {} {}: {}%", slab.min, upper, slab.rate_percent);
    }
}

fn print_breakdown(
    regime: &str,
    table: &SlabTable,
    income: f64,
) {
    let tax = compute_progressive_tax(income, table.slabs());
    println!("Regime '{}', taxable income {}:", regime, income);
    for part in &tax.breakdown {
        let amount = to_money(part.tax).unwrap_or_default();
        println!(
            "  {} @ {}%: {}",
            part.taxable_amount, part.rate_percent, amount
        );
    }
    println!("  Total: {}", to_money(tax.total_tax).unwrap_or_default());
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    info!(file = %args.file.display(), "loading slab tables");

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let tables = SlabTableLoader::load(file)
        .with_context(|| format!("Failed to load slab tables: {}", args.file.display()))?;

    println!("Loaded {} regime(s) from {}", tables.len(), args.file.display());

    let selected: Vec<_> = match &args.regime {
        Some(code) => match tables.get_key_value(code) {
            Some(entry) => vec![entry],
            None => bail!("Regime '{}' not found in {}", code, args.file.display()),
        },
        None => tables.iter().collect(),
    };

    for (regime, table) in selected {
        match args.income {
            Some(income) => print_breakdown(regime, table, income),
            None => print_table(regime, table),
        }
    }

    Ok(())
}
