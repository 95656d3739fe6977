mod context;
mod orders;
mod prices;
mod stock;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::context::RunContext;
use crate::orders::OrdersCommands;
use crate::prices::PricesCommands;
use crate::stock::StockCommands;

#[derive(Debug, Parser)]
#[command(name = "mpcalc")]
#[command(about = "Marketplace profitability and recommended-price reports")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Profitability of the current catalog and recommended prices
    Prices {
        #[command(subcommand)]
        command: PricesCommands,
    },
    /// Profitability of the orders placed in a date range
    Orders {
        #[command(subcommand)]
        command: OrdersCommands,
    },
    /// Stock held in marketplace warehouses
    Stock {
        #[command(subcommand)]
        command: StockCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = mpcalc_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let ctx = RunContext::new(config)?;

    match cli.command {
        Commands::Prices { command } => prices::run(&ctx, command).await,
        Commands::Orders { command } => orders::run(&ctx, command).await,
        Commands::Stock { command } => stock::run(&ctx, command).await,
    }
}

/// Writes `report` under `output` (or the configured directory) and prints
/// the path; prints "no rows" when there is nothing to write.
pub(crate) fn emit(
    report: Option<mpcalc_report::Report>,
    output: Option<&Path>,
    default_dir: &Path,
) -> anyhow::Result<Option<PathBuf>> {
    let Some(report) = report else {
        println!("no rows");
        return Ok(None);
    };
    let dir = output.unwrap_or(default_dir);
    let path = mpcalc_report::write_report(&report, dir)?;
    println!("{}", path.display());
    Ok(Some(path))
}
