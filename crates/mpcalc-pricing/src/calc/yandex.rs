//! Yandex Market: every fee comes from the tariff calculator API per offer,
//! already normalized into a [`TariffSet`].

use mpcalc_core::{InventoryItem, OrderLine, TariffPolicy};
use serde::{Deserialize, Serialize};

use super::{MarginTarget, OrderIdentity, ProfitabilityResult};
use crate::evaluate::evaluate;
use crate::solver::SolverConfig;
use crate::tariff::{DeliveryFee, TariffSet};

/// Name shown on order rows whose offer is unknown to the inventory system.
pub const MISSING_INVENTORY_NAME: &str = "Нет данных в МС";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YandexListing {
    pub offer_id: String,
    /// Basic price the tariffs were calculated for.
    pub price: f64,
    pub tariff: TariffSet,
}

pub struct YandexCalculator {
    solver: SolverConfig,
}

impl YandexCalculator {
    #[must_use]
    pub fn new(policy: &TariffPolicy, margin: MarginTarget) -> Self {
        let ym = &policy.yandex;
        Self {
            solver: SolverConfig {
                strategy: ym.solver,
                margin: margin.fraction(),
                min_price: ym.min_price,
                // clamped at the raw trial price, no 0.1 rounding
                trial: DeliveryFee::exact_amount,
            },
        }
    }

    fn row_at(&self, item: &InventoryItem, listing: &YandexListing, price: f64) -> ProfitabilityResult {
        let costs = evaluate(price, item.prime_cost, &listing.tariff);
        let recommended =
            self.solver
                .recommend(&listing.offer_id, item.prime_cost, &listing.tariff, price);
        ProfitabilityResult::for_item(item, price, recommended.price, costs)
    }

    #[must_use]
    pub fn price_row(&self, item: &InventoryItem, listing: &YandexListing) -> ProfitabilityResult {
        self.row_at(item, listing, listing.price)
    }

    /// Row for one order item. Offers without inventory or tariff data yield
    /// an all-zero row so the order still shows up in the report.
    #[must_use]
    pub fn order_row(
        &self,
        item: Option<&InventoryItem>,
        listing: Option<&YandexListing>,
        order: &OrderLine,
    ) -> ProfitabilityResult {
        let identity = OrderIdentity::from_line(order);
        match (item, listing) {
            (Some(item), Some(listing)) => self.row_at(item, listing, order.price).with_order(identity),
            _ => {
                tracing::warn!(
                    offer_id = %order.code,
                    "offer has no inventory data; adding zero row"
                );
                ProfitabilityResult::placeholder(&order.code, MISSING_INVENTORY_NAME)
                    .with_order(identity)
            }
        }
    }
}
