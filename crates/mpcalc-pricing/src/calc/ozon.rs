//! Ozon FBS: per-product commission and direct-flow logistics reported by the
//! API, flat acquiring and sorting, and a capped last-mile fee.

use mpcalc_core::{InventoryItem, OrderLine, OzonPolicy, SolverStrategy, TariffPolicy};
use serde::{Deserialize, Serialize};

use super::{MarginTarget, OrderIdentity, ProfitabilityResult};
use crate::evaluate::evaluate;
use crate::rounding::percent_to_fraction;
use crate::solver::SolverConfig;
use crate::tariff::{DeliveryFee, TariffSet, VolumeSchedule};

/// Price and commission data of one Ozon product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OzonListing {
    pub offer_id: String,
    pub product_id: u64,
    pub price: f64,
    /// FBS sales commission in whole percents.
    pub sales_percent_fbs: f64,
    /// Maximum direct-flow logistics charge; `0` when the API reports none.
    pub direct_flow_amount: f64,
    pub volume_weight: f64,
}

pub struct OzonCalculator {
    policy: OzonPolicy,
    solver: SolverConfig,
}

impl OzonCalculator {
    #[must_use]
    pub fn new(policy: &TariffPolicy, margin: MarginTarget) -> Self {
        let oz = &policy.ozon;
        Self {
            policy: oz.clone(),
            solver: SolverConfig {
                strategy: oz.solver,
                margin: margin.fraction(),
                min_price: oz.min_price,
                // the second pass prices last mile the way it is charged
                trial: DeliveryFee::amount,
            },
        }
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: SolverStrategy) -> Self {
        self.solver.strategy = strategy;
        self
    }

    #[must_use]
    pub fn tariff_for(&self, listing: &OzonListing) -> TariffSet {
        let logistics = if listing.direct_flow_amount > 0.0 {
            DeliveryFee::Fixed(listing.direct_flow_amount)
        } else {
            tracing::debug!(
                offer_id = %listing.offer_id,
                volume_weight = listing.volume_weight,
                "no direct-flow amount; using volume schedule"
            );
            DeliveryFee::BandedTable {
                schedule: VolumeSchedule::Stepped(self.policy.legacy_schedule),
                volume_liters: listing.volume_weight,
            }
        };

        TariffSet {
            commission_percent: percent_to_fraction(listing.sales_percent_fbs),
            payment_percent: percent_to_fraction(self.policy.acquiring_percent),
            agency_fee: 0.0,
            logistics,
            last_mile: DeliveryFee::CappedPercentage {
                percent: percent_to_fraction(self.policy.last_mile_percent),
                cap: self.policy.last_mile_cap,
            },
            cross_regional_fee: 0.0,
            sorting_fee: self.policy.sorting_fee,
        }
    }

    fn row_at(&self, item: &InventoryItem, listing: &OzonListing, price: f64) -> ProfitabilityResult {
        let tariff = self.tariff_for(listing);
        let costs = evaluate(price, item.prime_cost, &tariff);
        let recommended = self
            .solver
            .recommend(&listing.offer_id, item.prime_cost, &tariff, price);
        ProfitabilityResult::for_item(item, price, recommended.price, costs)
    }

    #[must_use]
    pub fn price_row(&self, item: &InventoryItem, listing: &OzonListing) -> ProfitabilityResult {
        self.row_at(item, listing, listing.price)
    }

    /// Row for one posting position at the price it was sold for.
    #[must_use]
    pub fn order_row(
        &self,
        item: &InventoryItem,
        listing: &OzonListing,
        order: &OrderLine,
    ) -> ProfitabilityResult {
        self.row_at(item, listing, order.price)
            .with_order(OrderIdentity::from_line(order))
    }
}

#[cfg(test)]
mod tests {
    use mpcalc_core::{FulfillmentModel, TariffPolicy};

    use super::*;
    use crate::calc::fixtures::item;
    use crate::solver::SolveMethod;

    fn listing(price: f64, direct_flow_amount: f64) -> OzonListing {
        OzonListing {
            offer_id: "ART-1".to_string(),
            product_id: 77,
            price,
            sales_percent_fbs: 12.0,
            direct_flow_amount,
            volume_weight: 1.0,
        }
    }

    fn calculator() -> OzonCalculator {
        OzonCalculator::new(&TariffPolicy::default(), MarginTarget::new(28.0))
    }

    #[test]
    fn price_row_charges_every_component() {
        let row = calculator().price_row(&item("1", 400.0), &listing(1000.0, 63.0));
        let c = row.costs;
        assert_eq!(c.commission, 120.0);
        assert_eq!(c.acquiring, 19.0);
        assert_eq!(c.logistics, 63.0);
        assert_eq!(c.last_mile, 55.0);
        assert_eq!(c.sorting, 20.0);
        assert_eq!(c.reward, 277.0);
        assert_eq!(c.profit, 323.0);
        assert_eq!(c.profitability, 32.3);
    }

    #[test]
    fn missing_direct_flow_uses_volume_schedule() {
        let tariff = calculator().tariff_for(&listing(1000.0, 0.0));
        assert_eq!(tariff.logistics.amount(1000.0), 76.0);
    }

    #[test]
    fn algebraic_recommendation_uses_two_pass_for_capped_last_mile() {
        let calc = calculator();
        let row = calc.price_row(&item("1", 9000.0), &listing(20_000.0, 63.0));
        assert_eq!(row.recommended_price, 16_494.0);
        let rec = calc
            .solver
            .recommend("ART-1", 9000.0, &calc.tariff_for(&listing(20_000.0, 63.0)), 20_000.0);
        assert_eq!(rec.method, SolveMethod::TwoPass);
    }

    #[test]
    fn search_strategy_walks_from_current_price() {
        let calc = calculator().with_strategy(SolverStrategy::Search);
        let row = calc.price_row(&item("1", 400.0), &listing(1000.0, 63.0));
        assert_eq!(row.recommended_price, 919.0);
    }

    #[test]
    fn order_row_uses_sold_price() {
        let order = OrderLine {
            order_number: "0123-0001-1".to_string(),
            created_at: "2024-12-12T10:00:00Z".to_string(),
            code: "ART-1".to_string(),
            price: 900.0,
            quantity: 2.0,
            fulfillment: FulfillmentModel::Fbs,
            warehouse: None,
            discount_percent: 0.0,
        };
        let row = calculator().order_row(&item("1", 400.0), &listing(1000.0, 63.0), &order);
        assert_eq!(row.price, 900.0);
        assert_eq!(row.costs.last_mile, 49.5);
        let identity = row.order.unwrap();
        assert_eq!(identity.order_number, "0123-0001-1");
        assert_eq!(identity.quantity, 2.0);
    }
}
