//! Raw Ozon Seller API shapes.

use serde::{Deserialize, Deserializer, Serialize};

/// Ozon reports money either as JSON numbers or as decimal strings
/// (`"1299.0000"`); both decode to `f64`, anything else to `0`.
fn flexible_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or_default(),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0.0,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductFilter {
    pub offer_id: Vec<String>,
    pub product_id: Vec<u64>,
    pub visibility: &'static str,
}

/// `POST /v3/product/list`
#[derive(Debug, Clone, Serialize)]
pub struct ProductListRequest {
    pub filter: ProductFilter,
    pub last_id: String,
    pub limit: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductListResponse {
    #[serde(default)]
    pub result: ProductListResult,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductListResult {
    #[serde(default)]
    pub items: Vec<ProductListItem>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub last_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductListItem {
    pub product_id: u64,
    #[serde(default)]
    pub offer_id: String,
    #[serde(default)]
    pub archived: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PricesFilter {
    pub product_id: Vec<u64>,
    pub visibility: &'static str,
}

/// `POST /v4/product/info/prices`
#[derive(Debug, Clone, Serialize)]
pub struct PricesRequest {
    pub filter: PricesFilter,
    pub last_id: String,
    pub limit: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct PricesResponse {
    #[serde(default)]
    pub result: PricesResult,
}

#[derive(Debug, Default, Deserialize)]
pub struct PricesResult {
    #[serde(default)]
    pub items: Vec<PriceItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PriceItem {
    pub product_id: u64,
    #[serde(default)]
    pub offer_id: String,
    #[serde(default)]
    pub price: PriceBlock,
    #[serde(default)]
    pub commissions: Commissions,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub volume_weight: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceBlock {
    #[serde(default, deserialize_with = "flexible_f64")]
    pub price: f64,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub marketing_price: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Commissions {
    #[serde(default, deserialize_with = "flexible_f64")]
    pub sales_percent_fbs: f64,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub fbs_direct_flow_trans_max_amount: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostingFilter {
    pub since: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostingWith {
    pub analytics_data: bool,
    pub financial_data: bool,
}

/// `POST /v3/posting/fbs/list`
#[derive(Debug, Clone, Serialize)]
pub struct PostingListRequest {
    pub dir: &'static str,
    pub filter: PostingFilter,
    pub limit: u64,
    pub offset: u64,
    pub with: PostingWith,
}

#[derive(Debug, Default, Deserialize)]
pub struct PostingListResponse {
    #[serde(default)]
    pub result: PostingListResult,
}

#[derive(Debug, Default, Deserialize)]
pub struct PostingListResult {
    #[serde(default)]
    pub postings: Vec<Posting>,
    #[serde(default)]
    pub has_next: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Posting {
    pub posting_number: String,
    #[serde(default)]
    pub in_process_at: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub products: Vec<PostingProduct>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostingProduct {
    #[serde(default)]
    pub offer_id: String,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub price: f64,
    #[serde(default)]
    pub quantity: f64,
}
