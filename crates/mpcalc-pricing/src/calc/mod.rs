//! Per-marketplace calculators and the result row they produce.

pub mod ozon;
pub mod wildberries;
pub mod yandex;

use mpcalc_core::InventoryItem;
use serde::{Deserialize, Serialize};

use crate::evaluate::CostBreakdown;
use crate::rounding::percent_to_fraction;

pub use ozon::{OzonCalculator, OzonListing};
pub use wildberries::{WildberriesCalculator, WildberriesListing};
pub use yandex::{YandexCalculator, YandexListing, MISSING_INVENTORY_NAME};

/// Target profitability in whole percents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarginTarget {
    pub percent: f64,
}

impl MarginTarget {
    #[must_use]
    pub fn new(percent: f64) -> Self {
        Self { percent }
    }

    /// Margin as a fraction rounded to three places, matching tariff rates.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        percent_to_fraction(self.percent)
    }
}

/// Order identity echoed on per-order rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderIdentity {
    pub order_number: String,
    pub created_at: String,
    pub quantity: f64,
}

/// Profit at the price the customer was actually charged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChargedOutcome {
    pub order_price: f64,
    pub profit: f64,
    pub profitability: f64,
}

/// Units held by the seller and by marketplace warehouses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StockSplit {
    pub fbs: f64,
    pub fbo: f64,
}

/// One output row of a profitability report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitabilityResult {
    pub code: String,
    pub name: String,
    pub article: String,
    pub stock: f64,
    pub order: Option<OrderIdentity>,
    pub discount_percent: Option<f64>,
    pub price: f64,
    pub recommended_price: f64,
    pub prime_cost: f64,
    pub costs: CostBreakdown,
    pub charged: Option<ChargedOutcome>,
    pub stock_split: Option<StockSplit>,
}

impl ProfitabilityResult {
    /// Row for `item` with identity fields copied from the inventory record.
    #[must_use]
    pub fn for_item(
        item: &InventoryItem,
        price: f64,
        recommended_price: f64,
        costs: CostBreakdown,
    ) -> Self {
        Self {
            code: item.code.clone(),
            name: item.name.clone(),
            article: item.article.clone(),
            stock: item.stock,
            order: None,
            discount_percent: None,
            price,
            recommended_price,
            prime_cost: item.prime_cost,
            costs,
            charged: None,
            stock_split: None,
        }
    }

    /// All-zero row for an order whose product has no inventory data.
    #[must_use]
    pub fn placeholder(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            article: code.to_string(),
            stock: 0.0,
            order: None,
            discount_percent: None,
            price: 0.0,
            recommended_price: 0.0,
            prime_cost: 0.0,
            costs: CostBreakdown::default(),
            charged: None,
            stock_split: None,
        }
    }

    #[must_use]
    pub fn with_order(mut self, order: OrderIdentity) -> Self {
        self.order = Some(order);
        self
    }

    #[must_use]
    pub fn with_discount(mut self, discount_percent: f64) -> Self {
        self.discount_percent = Some(discount_percent);
        self
    }

    #[must_use]
    pub fn with_charged(mut self, charged: ChargedOutcome) -> Self {
        self.charged = Some(charged);
        self
    }

    #[must_use]
    pub fn with_stock_split(mut self, split: StockSplit) -> Self {
        self.stock_split = Some(split);
        self
    }
}

impl OrderIdentity {
    #[must_use]
    pub fn from_line(line: &mpcalc_core::OrderLine) -> Self {
        Self {
            order_number: line.order_number.clone(),
            created_at: line.created_at.clone(),
            quantity: line.quantity,
        }
    }
}
