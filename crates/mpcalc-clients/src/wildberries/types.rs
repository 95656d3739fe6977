//! Raw Wildberries API shapes.

use serde::Deserialize;

/// `GET /api/v1/tariffs/commission`
#[derive(Debug, Default, Deserialize)]
pub struct CommissionReport {
    #[serde(default)]
    pub report: Vec<CommissionRow>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionRow {
    pub subject_name: String,
    /// Marketplace (FBS) commission, %.
    #[serde(default)]
    pub kgvp_marketplace: f64,
    /// Warehouse (FBO) commission, %.
    #[serde(default)]
    pub paid_storage_kgvp: f64,
}

/// `GET /api/v1/tariffs/box`
#[derive(Debug, Default, Deserialize)]
pub struct BoxTariffsEnvelope {
    #[serde(default)]
    pub response: BoxTariffsResponse,
}

#[derive(Debug, Default, Deserialize)]
pub struct BoxTariffsResponse {
    #[serde(default)]
    pub data: BoxTariffsData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxTariffsData {
    #[serde(default)]
    pub warehouse_list: Vec<BoxTariffRow>,
}

/// Box logistics tariff of one warehouse. Amounts are comma-decimal strings;
/// `"-"` means the column does not apply to this warehouse.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxTariffRow {
    pub warehouse_name: String,
    #[serde(default = "dash")]
    pub box_delivery_base: String,
    #[serde(default = "dash")]
    pub box_delivery_liter: String,
    #[serde(default = "dash")]
    pub box_delivery_coef_expr: String,
    #[serde(default = "dash")]
    pub box_delivery_marketplace_base: String,
    #[serde(default = "dash")]
    pub box_delivery_marketplace_liter: String,
    #[serde(default = "dash")]
    pub box_delivery_marketplace_coef_expr: String,
}

fn dash() -> String {
    "-".to_owned()
}

/// `GET /api/v2/list/goods/filter`
#[derive(Debug, Default, Deserialize)]
pub struct GoodsEnvelope {
    #[serde(default)]
    pub data: GoodsData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoodsData {
    #[serde(default)]
    pub list_goods: Vec<Goods>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Goods {
    #[serde(rename = "nmID")]
    pub nm_id: u64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub sizes: Vec<GoodsSize>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoodsSize {
    #[serde(default)]
    pub discounted_price: f64,
}

/// `GET /api/v1/supplier/orders` row.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierOrder {
    #[serde(default)]
    pub date: String,
    pub nm_id: u64,
    #[serde(default)]
    pub srid: String,
    #[serde(default)]
    pub is_cancel: bool,
    #[serde(default)]
    pub finished_price: f64,
    #[serde(default)]
    pub discount_percent: f64,
    #[serde(default)]
    pub warehouse_name: Option<String>,
    #[serde(default)]
    pub sticker: String,
}

/// `GET /api/v3/orders` page.
#[derive(Debug, Default, Deserialize)]
pub struct MarketplaceOrdersPage {
    #[serde(default)]
    pub orders: Vec<MarketplaceOrder>,
    #[serde(default)]
    pub next: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketplaceOrder {
    #[serde(default)]
    pub rid: String,
}

/// Public `cards/v2/detail` response.
#[derive(Debug, Default, Deserialize)]
pub struct CardsEnvelope {
    #[serde(default)]
    pub data: CardsData,
}

#[derive(Debug, Default, Deserialize)]
pub struct CardsData {
    #[serde(default)]
    pub products: Vec<CardProduct>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CardProduct {
    pub id: u64,
    #[serde(default)]
    pub sizes: Vec<CardSize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CardSize {
    #[serde(default)]
    pub stocks: Vec<CardStock>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CardStock {
    pub wh: u64,
    #[serde(default)]
    pub qty: f64,
}
