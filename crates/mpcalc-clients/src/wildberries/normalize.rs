//! Wildberries payloads into commission tables, warehouse tariffs, listings,
//! classified orders and stock splits.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use mpcalc_core::{FulfillmentModel, OrderLine};
use mpcalc_pricing::rounding::{parse_decimal, round_dp};
use mpcalc_pricing::{
    CommissionRates, CommissionTable, StockSplit, WarehouseLogistics, WarehouseTable,
    WildberriesListing,
};

use super::types::{BoxTariffRow, CardProduct, CommissionRow, Goods, SupplierOrder};

/// Slack added to both ends of the FBS order window, in seconds.
const FBS_WINDOW_PADDING_SECS: i64 = 3 * 60 * 60;

/// Category commissions keyed by subject name.
#[must_use]
pub fn commission_table(rows: &[CommissionRow]) -> CommissionTable {
    let rates = rows
        .iter()
        .map(|row| {
            (
                row.subject_name.clone(),
                CommissionRates {
                    fbs_percent: row.kgvp_marketplace,
                    fbo_percent: row.paid_storage_kgvp,
                },
            )
        })
        .collect();
    CommissionTable::new(rates)
}

/// Picks the box column, or for FBS the marketplace column when the box
/// column is not offered.
fn column<'a>(model: FulfillmentModel, boxed: &'a str, marketplace: &'a str) -> &'a str {
    if boxed.trim() == "-" && model == FulfillmentModel::Fbs {
        marketplace
    } else {
        boxed
    }
}

/// One warehouse row as logistics rates, or `None` when a needed column is
/// absent or unparseable.
#[must_use]
pub fn warehouse_logistics(row: &BoxTariffRow, model: FulfillmentModel) -> Option<WarehouseLogistics> {
    let first_liter = parse_decimal(column(
        model,
        &row.box_delivery_base,
        &row.box_delivery_marketplace_base,
    ))?;
    let extra_liter = parse_decimal(column(
        model,
        &row.box_delivery_liter,
        &row.box_delivery_marketplace_liter,
    ))?;
    let coefficient = parse_decimal(column(
        model,
        &row.box_delivery_coef_expr,
        &row.box_delivery_marketplace_coef_expr,
    ))?;
    Some(WarehouseLogistics {
        first_liter,
        extra_liter,
        coefficient: round_dp(coefficient / 100.0, 2),
    })
}

/// Warehouse tariffs for `model`, falling back to `fallback_warehouse`.
#[must_use]
pub fn warehouse_table(
    rows: &[BoxTariffRow],
    model: FulfillmentModel,
    fallback_warehouse: &str,
) -> WarehouseTable {
    let parsed: HashMap<String, WarehouseLogistics> = rows
        .iter()
        .filter_map(|row| match warehouse_logistics(row, model) {
            Some(logistics) => Some((row.warehouse_name.clone(), logistics)),
            None => {
                tracing::debug!(warehouse = %row.warehouse_name, %model, "warehouse has no box tariff");
                None
            }
        })
        .collect();
    tracing::info!(%model, count = parsed.len(), "parsed warehouse logistics tariffs");
    WarehouseTable::new(parsed, fallback_warehouse)
}

/// Current prices keyed by nm id. Multi-size cards take the highest
/// discounted size price.
#[must_use]
pub fn listings(goods: &[Goods]) -> BTreeMap<String, WildberriesListing> {
    goods
        .iter()
        .map(|g| {
            let price = g
                .sizes
                .iter()
                .map(|s| s.discounted_price)
                .fold(0.0, f64::max);
            (
                g.nm_id.to_string(),
                WildberriesListing {
                    nm_id: g.nm_id,
                    price,
                    discount_percent: g.discount,
                },
            )
        })
        .collect()
}

/// Unix-second bounds of the FBS order window for `from..=to`, padded by
/// three hours each side.
#[must_use]
pub fn fbs_window(from: NaiveDate, to: NaiveDate) -> (i64, i64) {
    let start = from.and_hms_opt(0, 0, 0).map_or(0, |t| t.and_utc().timestamp());
    let end = to
        .and_hms_opt(23, 59, 59)
        .map_or(0, |t| t.and_utc().timestamp());
    (start - FBS_WINDOW_PADDING_SECS, end + FBS_WINDOW_PADDING_SECS)
}

/// Orders split by fulfillment model, cancelled ones removed.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ClassifiedOrders {
    pub fbs: Vec<OrderLine>,
    pub fbo: Vec<OrderLine>,
    pub cancelled_fbs: usize,
    pub cancelled_fbo: usize,
}

impl ClassifiedOrders {
    /// Nm ids ordered under either model.
    #[must_use]
    pub fn codes(&self) -> HashSet<String> {
        self.fbs
            .iter()
            .chain(&self.fbo)
            .map(|o| o.code.clone())
            .collect()
    }
}

fn order_line(order: &SupplierOrder, model: FulfillmentModel) -> OrderLine {
    OrderLine {
        order_number: if order.sticker.is_empty() {
            "0".to_owned()
        } else {
            order.sticker.clone()
        },
        created_at: order.date.clone(),
        code: order.nm_id.to_string(),
        price: order.finished_price,
        quantity: 1.0,
        fulfillment: model,
        warehouse: order.warehouse_name.clone(),
        discount_percent: order.discount_percent,
    }
}

/// Orders whose `srid` matches a seller-shipped `rid` are FBS; the rest FBO.
#[must_use]
pub fn classify_orders(orders: &[SupplierOrder], fbs_rids: &HashSet<String>) -> ClassifiedOrders {
    let mut out = ClassifiedOrders::default();
    for order in orders {
        let is_fbs = fbs_rids.contains(&order.srid);
        match (order.is_cancel, is_fbs) {
            (true, true) => out.cancelled_fbs += 1,
            (true, false) => out.cancelled_fbo += 1,
            (false, true) => out.fbs.push(order_line(order, FulfillmentModel::Fbs)),
            (false, false) => out.fbo.push(order_line(order, FulfillmentModel::Fbo)),
        }
    }
    tracing::info!(
        total = orders.len(),
        fbs = out.fbs.len(),
        fbs_cancelled = out.cancelled_fbs,
        fbo = out.fbo.len(),
        fbo_cancelled = out.cancelled_fbo,
        "classified orders"
    );
    out
}

/// Card stock split into the seller warehouse (FBS) and everything else.
#[must_use]
pub fn stock_split(product: &CardProduct, fbs_warehouse_id: u64) -> StockSplit {
    product
        .sizes
        .iter()
        .flat_map(|size| &size.stocks)
        .fold(StockSplit::default(), |mut split, stock| {
            if stock.wh == fbs_warehouse_id {
                split.fbs += stock.qty;
            } else {
                split.fbo += stock.qty;
            }
            split
        })
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
