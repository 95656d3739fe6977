//! `stock` commands.

use std::path::PathBuf;

use clap::Subcommand;
use mpcalc_clients::moysklad::Project;
use mpcalc_report::{fbo_stock_report, FboStockRow};

use crate::context::RunContext;
use crate::emit;

/// Sub-commands available under `stock`.
#[derive(Debug, Subcommand)]
pub enum StockCommands {
    /// Goods held in Wildberries warehouses, valued at prime cost
    WbFbo {
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

pub(crate) async fn run(ctx: &RunContext, command: StockCommands) -> anyhow::Result<()> {
    match command {
        StockCommands::WbFbo { output } => {
            let rows = wildberries_fbo_rows(ctx).await?;
            emit(fbo_stock_report(&rows), output.as_deref(), ctx.output_dir())?;
        }
    }
    Ok(())
}

async fn wildberries_fbo_rows(ctx: &RunContext) -> anyhow::Result<Vec<FboStockRow>> {
    let ms = ctx.moysklad()?;
    let wb = ctx.wildberries_public()?;

    let inventory = ms.inventory(Project::Wildberries).await?;
    let nm_ids: Vec<u64> = inventory.keys().filter_map(|code| code.parse().ok()).collect();
    let splits = wb
        .card_stock(
            &nm_ids,
            ctx.config.wb_cards_batch,
            ctx.policy.wildberries.fbs_stock_warehouse_id,
        )
        .await;
    tracing::info!(requested = nm_ids.len(), fetched = splits.len(), "fetched card stock");

    Ok(inventory
        .values()
        .filter_map(|item| {
            let nm_id: u64 = item.code.parse().ok()?;
            let split = splits.get(&nm_id)?;
            Some(FboStockRow {
                name: item.name.clone(),
                nm_id: item.code.clone(),
                prime_cost: item.prime_cost,
                fbo_stock: split.fbo,
            })
        })
        .collect())
}
