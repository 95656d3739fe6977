//! Raw Yandex Market Partner API shapes.

use serde::{Deserialize, Serialize};

/// Status every successful partner API envelope carries.
pub const STATUS_OK: &str = "OK";

#[derive(Debug, Default, Deserialize)]
pub struct CampaignsResponse {
    #[serde(default)]
    pub campaigns: Vec<Campaign>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Campaign {
    pub id: u64,
    pub business: Business,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Business {
    pub id: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// `POST /businesses/{id}/offer-mappings`
#[derive(Debug, Clone, Serialize)]
pub struct OfferMappingsRequest {
    pub archived: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct OfferMappingsResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub result: OfferMappingsResult,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferMappingsResult {
    #[serde(default)]
    pub offer_mappings: Vec<OfferMappingEntry>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OfferMappingEntry {
    pub offer: Offer,
    #[serde(default)]
    pub mapping: Option<Mapping>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub offer_id: String,
    #[serde(default)]
    pub basic_price: Option<BasicPrice>,
    #[serde(default)]
    pub weight_dimensions: Option<WeightDimensions>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BasicPrice {
    #[serde(default)]
    pub value: f64,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct WeightDimensions {
    #[serde(default)]
    pub length: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub weight: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mapping {
    #[serde(default)]
    pub market_category_id: u64,
    #[serde(default)]
    pub market_category_name: String,
}

/// `POST /tariffs/calculate`
#[derive(Debug, Clone, Serialize)]
pub struct TariffsRequest {
    pub parameters: TariffsParameters,
    pub offers: Vec<TariffOffer>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TariffsParameters {
    pub campaign_id: u64,
    pub frequency: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TariffOffer {
    pub category_id: u64,
    pub price: f64,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
    pub quantity: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct TariffsResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub result: TariffsResult,
}

#[derive(Debug, Default, Deserialize)]
pub struct TariffsResult {
    #[serde(default)]
    pub offers: Vec<OfferTariffs>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfferTariffs {
    #[serde(default)]
    pub tariffs: Vec<Tariff>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tariff {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub parameters: Vec<TariffParameter>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TariffParameter {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// `POST /categories/tree`
#[derive(Debug, Default, Deserialize)]
pub struct CategoriesTreeResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub result: Option<Category>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub children: Vec<Category>,
}

/// `GET /campaigns/{id}/orders`
#[derive(Debug, Default, Deserialize)]
pub struct OrdersResponse {
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: u64,
    #[serde(default)]
    pub creation_date: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub offer_id: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub subsidy: f64,
    #[serde(default)]
    pub count: f64,
}
