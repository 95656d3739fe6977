//! Ozon payloads into listings and order lines.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use mpcalc_core::{FulfillmentModel, OrderLine};
use mpcalc_pricing::OzonListing;

use super::types::{Posting, PriceItem};

const CANCELLED: &str = "cancelled";

/// Listings keyed by offer id (the seller article).
#[must_use]
pub fn listings(items: &[PriceItem]) -> BTreeMap<String, OzonListing> {
    items
        .iter()
        .filter(|item| !item.offer_id.is_empty())
        .map(|item| {
            (
                item.offer_id.clone(),
                OzonListing {
                    offer_id: item.offer_id.clone(),
                    product_id: item.product_id,
                    price: item.price.price,
                    sales_percent_fbs: item.commissions.sales_percent_fbs,
                    direct_flow_amount: item.commissions.fbs_direct_flow_trans_max_amount,
                    volume_weight: item.volume_weight,
                },
            )
        })
        .collect()
}

/// One order line per posting position; cancelled postings are dropped.
#[must_use]
pub fn order_lines(postings: &[Posting]) -> Vec<OrderLine> {
    let lines: Vec<OrderLine> = postings
        .iter()
        .filter(|p| p.status != CANCELLED)
        .flat_map(|p| {
            p.products.iter().map(|product| OrderLine {
                order_number: p.posting_number.clone(),
                created_at: p.in_process_at.clone(),
                code: product.offer_id.clone(),
                price: product.price,
                quantity: product.quantity,
                fulfillment: FulfillmentModel::Fbs,
                warehouse: None,
                discount_percent: 0.0,
            })
        })
        .collect();
    tracing::info!(
        postings = postings.len(),
        positions = lines.len(),
        "normalized ozon postings"
    );
    lines
}

/// `since`/`to` bounds covering whole days `from..=to` in UTC.
#[must_use]
pub fn posting_window(from: NaiveDate, to: NaiveDate) -> (String, String) {
    (
        format!("{}T00:00:00Z", from.format("%Y-%m-%d")),
        format!("{}T23:59:59.999999Z", to.format("%Y-%m-%d")),
    )
}
