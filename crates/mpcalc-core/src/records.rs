use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Who ships the order: the seller (FBS) or the marketplace warehouse (FBO).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FulfillmentModel {
    Fbs,
    Fbo,
}

impl std::fmt::Display for FulfillmentModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FulfillmentModel::Fbs => write!(f, "FBS"),
            FulfillmentModel::Fbo => write!(f, "FBO"),
        }
    }
}

/// A product as the inventory system knows it, scoped to one marketplace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Inventory-system entity id.
    pub id: String,
    /// Inventory code; for Wildberries products this holds the numeric nm id.
    pub code: String,
    /// Seller article, the join key for Ozon and Yandex Market offers.
    pub article: String,
    pub name: String,
    pub stock: f64,
    /// Cost of goods per unit.
    pub prime_cost: f64,
    pub category: Option<String>,
    pub volume_liters: f64,
}

/// One order position, after cancelled orders have been dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub order_number: String,
    /// Creation timestamp exactly as the marketplace reported it.
    pub created_at: String,
    pub code: String,
    /// Unit price actually charged.
    pub price: f64,
    pub quantity: f64,
    pub fulfillment: FulfillmentModel,
    /// Shipping warehouse, when the marketplace reports one.
    pub warehouse: Option<String>,
    pub discount_percent: f64,
}

/// Inclusive calendar date range for order reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Returns `None` when `from` is after `to`.
    #[must_use]
    pub fn new(from: NaiveDate, to: NaiveDate) -> Option<Self> {
        (from <= to).then_some(Self { from, to })
    }

    /// Every calendar day in the range, in order.
    #[must_use]
    pub fn days(&self) -> Vec<NaiveDate> {
        let span = (self.to - self.from).num_days();
        (0..=span).map(|i| self.from + Duration::days(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn date_range_rejects_reversed_bounds() {
        assert!(DateRange::new(date("2025-03-02"), date("2025-03-01")).is_none());
    }

    #[test]
    fn date_range_days_are_inclusive() {
        let range = DateRange::new(date("2024-12-30"), date("2025-01-02")).unwrap();
        let days: Vec<String> = range.days().iter().map(ToString::to_string).collect();
        assert_eq!(
            days,
            vec!["2024-12-30", "2024-12-31", "2025-01-01", "2025-01-02"]
        );
    }

    #[test]
    fn single_day_range_has_one_day() {
        let range = DateRange::new(date("2025-03-01"), date("2025-03-01")).unwrap();
        assert_eq!(range.days().len(), 1);
    }

    #[test]
    fn fulfillment_model_display() {
        assert_eq!(FulfillmentModel::Fbs.to_string(), "FBS");
        assert_eq!(FulfillmentModel::Fbo.to_string(), "FBO");
    }

    #[test]
    fn fulfillment_model_serializes_lowercase() {
        let json = serde_json::to_string(&FulfillmentModel::Fbo).unwrap();
        assert_eq!(json, "\"fbo\"");
    }
}
