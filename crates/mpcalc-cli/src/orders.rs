//! `orders` commands: profitability of every order in a date range, at the
//! catalog price and at the price the customer paid.

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use clap::Subcommand;
use mpcalc_clients::moysklad::Project;
use mpcalc_clients::{or_empty, ozon, wildberries, yandex};
use mpcalc_core::{FulfillmentModel, OrderLine};
use mpcalc_pricing::{OzonCalculator, ProfitabilityResult, YandexCalculator};
use mpcalc_report::{assemble, ReportKind};

use crate::context::{date_range, RunContext};
use crate::emit;
use crate::prices::{wildberries_calculator, wildberries_tariffs};

/// Sub-commands available under `orders`.
#[derive(Debug, Subcommand)]
pub enum OrdersCommands {
    /// Wildberries orders, FBS and FBO
    Wb {
        /// First day, inclusive (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,
        /// Last day, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: NaiveDate,
        /// Leave seller-shipped orders out of the report
        #[arg(long)]
        fbo_only: bool,
        #[arg(long)]
        margin: Option<f64>,
        #[arg(long)]
        acquiring: Option<f64>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Ozon FBS postings
    Ozon {
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
        #[arg(long)]
        margin: Option<f64>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Yandex Market orders
    Ym {
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
        #[arg(long)]
        express: bool,
        #[arg(long)]
        margin: Option<f64>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

pub(crate) async fn run(ctx: &RunContext, command: OrdersCommands) -> anyhow::Result<()> {
    let (kind, rows, output) = match command {
        OrdersCommands::Wb {
            from,
            to,
            fbo_only,
            margin,
            acquiring,
            output,
        } => {
            let range = date_range(from, to)?;
            let rows = wildberries_rows(ctx, range, fbo_only, margin, acquiring).await?;
            (ReportKind::WildberriesOrders, rows, output)
        }
        OrdersCommands::Ozon {
            from,
            to,
            margin,
            output,
        } => {
            let range = date_range(from, to)?;
            (ReportKind::OzonOrders, ozon_rows(ctx, range, margin).await?, output)
        }
        OrdersCommands::Ym {
            from,
            to,
            express,
            margin,
            output,
        } => {
            let range = date_range(from, to)?;
            let rows = yandex_rows(ctx, range, express, margin).await?;
            (ReportKind::YandexOrders { express }, rows, output)
        }
    };
    emit(assemble(kind, &rows), output.as_deref(), ctx.output_dir())?;
    Ok(())
}

fn warn_unknown(order: &OrderLine) {
    tracing::warn!(
        code = %order.code,
        order = %order.order_number,
        "ordered product has no inventory record; skipping"
    );
}

async fn wildberries_rows(
    ctx: &RunContext,
    range: mpcalc_core::DateRange,
    fbo_only: bool,
    margin: Option<f64>,
    acquiring: Option<f64>,
) -> anyhow::Result<Vec<ProfitabilityResult>> {
    let wb = ctx.wildberries()?;
    let ms = ctx.moysklad()?;

    let classified = wb
        .classified_orders(range, Duration::from_secs(ctx.config.wb_day_delay_secs))
        .await?;
    let tariffs = wildberries_tariffs(ctx, &wb).await;
    let fbs_calc = wildberries_calculator(ctx, &tariffs, FulfillmentModel::Fbs, margin, acquiring);
    let fbo_calc = wildberries_calculator(ctx, &tariffs, FulfillmentModel::Fbo, margin, acquiring);

    // order rows fall back to the charged price without a catalog price
    let listings = wildberries::listings(&or_empty(wb.goods().await, "wildberries catalog prices"));
    let inventory = ms.inventory(Project::Wildberries).await?;

    let mut nm_ids: Vec<u64> = classified
        .codes()
        .iter()
        .filter_map(|code| code.parse().ok())
        .collect();
    nm_ids.sort_unstable();
    let splits = wb
        .card_stock(
            &nm_ids,
            ctx.config.wb_cards_batch,
            ctx.policy.wildberries.fbs_stock_warehouse_id,
        )
        .await;

    let fbs: &[OrderLine] = if fbo_only { &[] } else { &classified.fbs };
    let mut rows = Vec::with_capacity(fbs.len() + classified.fbo.len());
    for order in fbs.iter().chain(&classified.fbo) {
        let Some(item) = inventory.get(&order.code) else {
            warn_unknown(order);
            continue;
        };
        let calc = match order.fulfillment {
            FulfillmentModel::Fbs => &fbs_calc,
            FulfillmentModel::Fbo => &fbo_calc,
        };
        let split = order
            .code
            .parse::<u64>()
            .ok()
            .and_then(|nm_id| splits.get(&nm_id).copied())
            .unwrap_or_default();
        rows.push(
            calc.order_row(item, listings.get(&order.code), order)
                .with_stock_split(split),
        );
    }
    Ok(rows)
}

async fn ozon_rows(
    ctx: &RunContext,
    range: mpcalc_core::DateRange,
    margin: Option<f64>,
) -> anyhow::Result<Vec<ProfitabilityResult>> {
    let oz = ctx.ozon()?;
    let ms = ctx.moysklad()?;

    let orders = ozon::order_lines(&oz.fbs_postings(range).await?);
    let listings = ozon::listings(&oz.products().await?);
    let inventory = ms.inventory(Project::Ozon).await?;
    let calc = OzonCalculator::new(&ctx.policy, ctx.margin(margin));

    let mut rows = Vec::with_capacity(orders.len());
    for order in &orders {
        match (inventory.get(&order.code), listings.get(&order.code)) {
            (Some(item), Some(listing)) => rows.push(calc.order_row(item, listing, order)),
            _ => warn_unknown(order),
        }
    }
    Ok(rows)
}

async fn yandex_rows(
    ctx: &RunContext,
    range: mpcalc_core::DateRange,
    express: bool,
    margin: Option<f64>,
) -> anyhow::Result<Vec<ProfitabilityResult>> {
    let ym = ctx.yandex()?;
    let ms = ctx.moysklad()?;

    let ids = ym
        .resolve_ids(
            ctx.config.yandex_campaign_id(express),
            ctx.config.yandex_business_id,
        )
        .await?;
    let orders = yandex::order_lines(&ym.orders(ids.campaign_id, range).await?);
    let listings = ym.listings(ids, &ctx.policy.yandex).await?;
    let inventory = ms.inventory(Project::YandexMarket).await?;
    let calc = YandexCalculator::new(&ctx.policy, ctx.margin(margin));

    Ok(orders
        .iter()
        .map(|order| {
            calc.order_row(
                inventory.get(&order.code),
                listings.get(&order.code),
                order,
            )
        })
        .collect())
}
