//! Raw MoySklad JSON API 1.2 shapes, limited to the fields the reports use.

use serde::Deserialize;

/// One page of an entity listing.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub meta: PageMeta,
    #[serde(default = "Vec::new")]
    pub rows: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageMeta {
    /// Total number of rows across all pages.
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub id: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub article: String,
    pub name: String,
    /// Folder path, e.g. `"Озон/Шланги"`.
    #[serde(default)]
    pub path_name: String,
    #[serde(default)]
    pub sale_prices: Vec<SalePrice>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub components: Components,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalePrice {
    /// Amount in kopecks.
    #[serde(default)]
    pub value: f64,
    pub price_type: PriceType,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PriceType {
    pub name: String,
}

/// Custom attribute. `value` is a string, a number, or a custom entity
/// reference carrying a `name`.
#[derive(Debug, Clone, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Components {
    #[serde(default)]
    pub rows: Vec<Component>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Component {
    pub quantity: f64,
    pub assortment: Assortment,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Assortment {
    pub meta: Meta,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Meta {
    pub href: String,
}

/// Row of the current stock report.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRow {
    pub assortment_id: String,
    #[serde(default)]
    pub quantity: f64,
}
