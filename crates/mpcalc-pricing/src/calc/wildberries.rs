//! Wildberries: category commission by fulfillment model, flat acquiring,
//! and volume-banded logistics per warehouse.

use mpcalc_core::{FulfillmentModel, InventoryItem, OrderLine, TariffPolicy, WildberriesPolicy};
use serde::{Deserialize, Serialize};

use super::{ChargedOutcome, MarginTarget, OrderIdentity, ProfitabilityResult};
use crate::evaluate::evaluate;
use crate::rounding::{percent_to_fraction, round_dp};
use crate::solver::SolverConfig;
use crate::tariff::{CommissionTable, DeliveryFee, TariffSet, WarehouseTable};

/// Current storefront price of one nomenclature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WildberriesListing {
    pub nm_id: u64,
    /// Highest discounted size price.
    pub price: f64,
    pub discount_percent: f64,
}

pub struct WildberriesCalculator {
    policy: WildberriesPolicy,
    commissions: CommissionTable,
    warehouses: WarehouseTable,
    model: FulfillmentModel,
    acquiring_percent: f64,
    default_commission_percent: f64,
    solver: SolverConfig,
}

impl WildberriesCalculator {
    /// `warehouses` must be normalized for the same `model`: FBS rows carry
    /// the marketplace columns where box columns are not offered.
    #[must_use]
    pub fn new(
        policy: &TariffPolicy,
        commissions: CommissionTable,
        warehouses: WarehouseTable,
        model: FulfillmentModel,
        margin: MarginTarget,
    ) -> Self {
        let wb = &policy.wildberries;
        Self {
            policy: wb.clone(),
            commissions,
            warehouses,
            model,
            acquiring_percent: wb.acquiring_percent,
            default_commission_percent: policy.default_commission_percent,
            solver: SolverConfig {
                strategy: wb.solver,
                margin: margin.fraction(),
                min_price: wb.min_price,
                trial: DeliveryFee::amount,
            },
        }
    }

    /// Overrides the policy acquiring rate for this run.
    #[must_use]
    pub fn with_acquiring_percent(mut self, percent: f64) -> Self {
        self.acquiring_percent = percent;
        self
    }

    #[must_use]
    pub fn model(&self) -> FulfillmentModel {
        self.model
    }

    fn default_warehouse(&self) -> &str {
        match self.model {
            FulfillmentModel::Fbs => &self.policy.fbs_warehouse,
            FulfillmentModel::Fbo => &self.policy.fbo_warehouse,
        }
    }

    /// Tariff for `item` shipped through `warehouse`.
    #[must_use]
    pub fn tariff_for(&self, item: &InventoryItem, warehouse: &str) -> TariffSet {
        let commission = self.commissions.commission_fraction(
            &item.code,
            item.category.as_deref(),
            self.model,
            self.policy.fbs_commission_uplift_percent,
            self.default_commission_percent,
        );
        let logistics = self
            .warehouses
            .resolve(warehouse)
            .schedule(&self.policy.sub_liter_bands, self.policy.ktr);

        TariffSet {
            logistics: DeliveryFee::BandedTable {
                schedule: logistics,
                volume_liters: item.volume_liters,
            },
            ..TariffSet::percent_only(commission, percent_to_fraction(self.acquiring_percent))
        }
    }

    /// Catalog row at the current storefront price.
    #[must_use]
    pub fn price_row(&self, item: &InventoryItem, listing: &WildberriesListing) -> ProfitabilityResult {
        let tariff = self.tariff_for(item, self.default_warehouse());
        let costs = evaluate(listing.price, item.prime_cost, &tariff);
        let recommended = self
            .solver
            .recommend(&item.code, item.prime_cost, &tariff, listing.price);

        ProfitabilityResult::for_item(item, listing.price, recommended.price, costs)
            .with_discount(listing.discount_percent)
    }

    /// Order row: profitability at the catalog price and at the price the
    /// customer was charged.
    ///
    /// Without a catalog price the charged price is used for both. FBO orders
    /// take logistics from the warehouse that shipped them.
    #[must_use]
    pub fn order_row(
        &self,
        item: &InventoryItem,
        listing: Option<&WildberriesListing>,
        order: &OrderLine,
    ) -> ProfitabilityResult {
        let order_price = round_dp(order.price, 1);
        let price = listing
            .map(|l| l.price)
            .filter(|p| *p > 0.0)
            .unwrap_or(order_price);
        let discount = listing
            .map(|l| l.discount_percent)
            .filter(|d| *d != 0.0)
            .unwrap_or(order.discount_percent);

        let warehouse = match self.model {
            FulfillmentModel::Fbs => self.policy.fbs_warehouse.as_str(),
            FulfillmentModel::Fbo => order
                .warehouse
                .as_deref()
                .unwrap_or(&self.policy.fbo_warehouse),
        };
        let tariff = self.tariff_for(item, warehouse);

        let costs = evaluate(price, item.prime_cost, &tariff);
        let charged = evaluate(order_price, item.prime_cost, &tariff);
        let recommended = self
            .solver
            .recommend(&item.code, item.prime_cost, &tariff, price);

        let identity = OrderIdentity {
            order_number: format!("{}_{}", self.model, order.order_number),
            ..OrderIdentity::from_line(order)
        };

        ProfitabilityResult::for_item(item, price, recommended.price, costs)
            .with_order(identity)
            .with_discount(discount)
            .with_charged(ChargedOutcome {
                order_price,
                profit: charged.profit,
                profitability: charged.profitability,
            })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use mpcalc_core::{FulfillmentModel, OrderLine, TariffPolicy};

    use super::*;
    use crate::calc::fixtures::item;
    use crate::tariff::{CommissionRates, WarehouseLogistics};

    fn calculator(model: FulfillmentModel) -> WildberriesCalculator {
        let mut rates = HashMap::new();
        rates.insert(
            "Шланги".to_string(),
            CommissionRates {
                fbs_percent: 20.0,
                fbo_percent: 15.0,
            },
        );
        let logistics = |first_liter, coefficient| WarehouseLogistics {
            first_liter,
            extra_liter: 14.0,
            coefficient,
        };
        let mut rows = HashMap::new();
        rows.insert(
            "Маркетплейс: Центральный федеральный округ".to_string(),
            logistics(46.0, 1.0),
        );
        rows.insert("Подольск".to_string(), logistics(46.0, 2.0));
        rows.insert("Коледино".to_string(), logistics(46.0, 1.5));

        WildberriesCalculator::new(
            &TariffPolicy::default(),
            CommissionTable::new(rates),
            WarehouseTable::new(rows, "Коледино"),
            model,
            MarginTarget::new(28.0),
        )
    }

    fn listing(price: f64) -> WildberriesListing {
        WildberriesListing {
            nm_id: 1,
            price,
            discount_percent: 40.0,
        }
    }

    fn order(price: f64, warehouse: Option<&str>) -> OrderLine {
        OrderLine {
            order_number: "123456".to_string(),
            created_at: "2024-12-12T10:00:00".to_string(),
            code: "1".to_string(),
            price,
            quantity: 1.0,
            fulfillment: FulfillmentModel::Fbo,
            warehouse: warehouse.map(str::to_string),
            discount_percent: 35.0,
        }
    }

    #[test]
    fn fbs_price_row_uses_fbs_rate_and_band_logistics() {
        let calc = calculator(FulfillmentModel::Fbs);
        let row = calc.price_row(&item("1", 400.0), &listing(1000.0));
        assert_eq!(row.costs.commission, 200.0);
        assert_eq!(row.costs.acquiring, 16.0);
        assert_eq!(row.costs.logistics, 29.0);
        assert_eq!(row.costs.profit, 355.0);
        assert_eq!(row.costs.profitability, 35.5);
        assert_eq!(row.discount_percent, Some(40.0));
    }

    #[test]
    fn recommended_price_round_trips_to_margin() {
        let calc = calculator(FulfillmentModel::Fbs);
        let row = calc.price_row(&item("1", 400.0), &listing(1000.0));
        assert_eq!(row.recommended_price, 851.0);
        let tariff = calc.tariff_for(&item("1", 400.0), "Маркетплейс: Центральный федеральный округ");
        let check = evaluate(row.recommended_price, 400.0, &tariff);
        assert!((check.profitability - 28.0).abs() <= 0.1);
    }

    #[test]
    fn cheap_item_is_lifted_to_minimum_price() {
        let calc = calculator(FulfillmentModel::Fbs);
        let row = calc.price_row(&item("1", 0.0), &listing(100.0));
        assert_eq!(row.recommended_price, 60.0);
    }

    #[test]
    fn fbo_order_uses_shipping_warehouse_logistics() {
        let calc = calculator(FulfillmentModel::Fbo);
        let row = calc.order_row(&item("1", 400.0), Some(&listing(1000.0)), &order(950.0, Some("Подольск")));
        assert_eq!(row.costs.commission, 150.0);
        assert_eq!(row.costs.logistics, 58.0);
        assert_eq!(row.order.as_ref().map(|o| o.order_number.as_str()), Some("FBO_123456"));
    }

    #[test]
    fn unknown_warehouse_falls_back() {
        let calc = calculator(FulfillmentModel::Fbo);
        let row = calc.order_row(&item("1", 400.0), Some(&listing(1000.0)), &order(950.0, Some("Казань")));
        assert_eq!(row.costs.logistics, 43.5);
    }

    #[test]
    fn order_without_listing_uses_charged_price_and_order_discount() {
        let calc = calculator(FulfillmentModel::Fbo);
        let row = calc.order_row(&item("1", 400.0), None, &order(949.96, None));
        assert_eq!(row.price, 950.0);
        assert_eq!(row.discount_percent, Some(35.0));
        let charged = row.charged.unwrap();
        assert_eq!(charged.order_price, 950.0);
        assert_eq!(charged.profit, row.costs.profit);
    }

    #[test]
    fn charged_outcome_uses_order_price() {
        let calc = calculator(FulfillmentModel::Fbs);
        let row = calc.order_row(&item("1", 400.0), Some(&listing(1000.0)), &order(800.0, None));
        let charged = row.charged.unwrap();
        assert_eq!(row.costs.profit, 355.0);
        assert_eq!(charged.order_price, 800.0);
        assert_eq!(charged.profit, 198.2);
        assert_eq!(charged.profitability, 24.8);
    }

    #[test]
    fn zero_order_price_yields_zero_profitability() {
        let calc = calculator(FulfillmentModel::Fbs);
        let row = calc.order_row(&item("1", 400.0), None, &order(0.0, None));
        assert_eq!(row.costs.profitability, 0.0);
        assert_eq!(row.charged.unwrap().profitability, 0.0);
    }
}
