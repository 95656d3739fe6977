//! `prices` commands: profitability of every listed product at its current
//! price, with the price that would hit the target margin.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Subcommand;
use mpcalc_clients::moysklad::Project;
use mpcalc_clients::{ozon, wildberries, DayTariffs, WildberriesClient};
use mpcalc_core::{FulfillmentModel, SolverStrategy};
use mpcalc_pricing::{
    join_by_code, OzonCalculator, ProfitabilityResult, WildberriesCalculator, YandexCalculator,
};
use mpcalc_report::{assemble, ReportKind};

use crate::context::RunContext;
use crate::emit;

/// Sub-commands available under `prices`.
#[derive(Debug, Subcommand)]
pub enum PricesCommands {
    /// Wildberries catalog
    Wb {
        /// Price for FBO (goods stored at Wildberries) instead of FBS
        #[arg(long)]
        fbo: bool,
        /// Target profitability, percent (defaults to the policy plan margin)
        #[arg(long)]
        margin: Option<f64>,
        /// Acquiring rate override, percent
        #[arg(long)]
        acquiring: Option<f64>,
        /// Directory for the generated workbook
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Ozon catalog (FBS)
    Ozon {
        #[arg(long)]
        margin: Option<f64>,
        /// Use step-halving search instead of the closed form
        #[arg(long)]
        search: bool,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Yandex Market catalog
    Ym {
        /// Use the Express campaign instead of FBS
        #[arg(long)]
        express: bool,
        #[arg(long)]
        margin: Option<f64>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

pub(crate) async fn run(ctx: &RunContext, command: PricesCommands) -> anyhow::Result<()> {
    let (kind, rows, output) = match command {
        PricesCommands::Wb {
            fbo,
            margin,
            acquiring,
            output,
        } => {
            let model = if fbo {
                FulfillmentModel::Fbo
            } else {
                FulfillmentModel::Fbs
            };
            let rows = wildberries_rows(ctx, model, margin, acquiring).await?;
            (ReportKind::WildberriesPrices(model), rows, output)
        }
        PricesCommands::Ozon {
            margin,
            search,
            output,
        } => (ReportKind::OzonPrices, ozon_rows(ctx, margin, search).await?, output),
        PricesCommands::Ym {
            express,
            margin,
            output,
        } => (
            ReportKind::YandexPrices { express },
            yandex_rows(ctx, express, margin).await?,
            output,
        ),
    };
    emit(assemble(kind, &rows), output.as_deref(), ctx.output_dir())?;
    Ok(())
}

/// Builds the Wildberries calculator for `model` from today's tariffs.
pub(crate) fn wildberries_calculator(
    ctx: &RunContext,
    tariffs: &DayTariffs,
    model: FulfillmentModel,
    margin: Option<f64>,
    acquiring: Option<f64>,
) -> WildberriesCalculator {
    let calc = WildberriesCalculator::new(
        &ctx.policy,
        tariffs.commissions.clone(),
        tariffs.warehouses(model).clone(),
        model,
        ctx.margin(margin),
    );
    match acquiring {
        Some(percent) => calc.with_acquiring_percent(percent),
        None => calc,
    }
}

/// Today's tariffs; failed tariff requests degrade to the policy fallbacks.
pub(crate) async fn wildberries_tariffs(ctx: &RunContext, wb: &WildberriesClient) -> DayTariffs {
    let today = chrono::Local::now().date_naive();
    wb.day_tariffs(today, &ctx.policy.wildberries.fallback_warehouse)
        .await
}

async fn wildberries_rows(
    ctx: &RunContext,
    model: FulfillmentModel,
    margin: Option<f64>,
    acquiring: Option<f64>,
) -> anyhow::Result<Vec<ProfitabilityResult>> {
    let wb = ctx.wildberries()?;
    let ms = ctx.moysklad()?;

    let tariffs = wildberries_tariffs(ctx, &wb).await;
    let calc = wildberries_calculator(ctx, &tariffs, model, margin, acquiring);
    let listings = wildberries::listings(&wb.goods().await?);
    let inventory = ms.inventory(Project::Wildberries).await?;
    let joined = join_by_code(listings, inventory);

    let splits = if model == FulfillmentModel::Fbo {
        let nm_ids: Vec<u64> = joined.merged.values().map(|j| j.listing.nm_id).collect();
        wb.card_stock(
            &nm_ids,
            ctx.config.wb_cards_batch,
            ctx.policy.wildberries.fbs_stock_warehouse_id,
        )
        .await
    } else {
        BTreeMap::new()
    };

    Ok(joined
        .merged
        .values()
        .map(|j| {
            let row = calc.price_row(&j.inventory, &j.listing);
            match splits.get(&j.listing.nm_id) {
                Some(split) => row.with_stock_split(*split),
                None => row,
            }
        })
        .collect())
}

async fn ozon_rows(
    ctx: &RunContext,
    margin: Option<f64>,
    search: bool,
) -> anyhow::Result<Vec<ProfitabilityResult>> {
    let oz = ctx.ozon()?;
    let ms = ctx.moysklad()?;

    let listings = ozon::listings(&oz.products().await?);
    let inventory = ms.inventory(Project::Ozon).await?;
    let joined = join_by_code(listings, inventory);

    let mut calc = OzonCalculator::new(&ctx.policy, ctx.margin(margin));
    if search {
        calc = calc.with_strategy(SolverStrategy::Search);
    }
    Ok(joined
        .merged
        .values()
        .map(|j| calc.price_row(&j.inventory, &j.listing))
        .collect())
}

async fn yandex_rows(
    ctx: &RunContext,
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
    let listings = ym.listings(ids, &ctx.policy.yandex).await?;
    let inventory = ms.inventory(Project::YandexMarket).await?;
    let joined = join_by_code(listings, inventory);

    let calc = YandexCalculator::new(&ctx.policy, ctx.margin(margin));
    Ok(joined
        .merged
        .values()
        .map(|j| calc.price_row(&j.inventory, &j.listing))
        .collect())
}
