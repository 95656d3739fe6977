//! Bundles and stock rows into [`InventoryItem`]s.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use mpcalc_core::InventoryItem;
use regex::Regex;

use super::types::{Attribute, Bundle, SalePrice, StockRow};

const PRIME_COST_PRICE_TYPE: &str = "Цена продажи";
const CATEGORY_ATTRIBUTE: &str = "Категория товара";
const DIMENSION_ATTRIBUTES: [&str; 3] = ["Длина", "Ширина", "Высота"];

static PRODUCT_HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/product/([0-9a-fA-F-]+)").expect("valid regex"));

/// Marketplace project folder that scopes inventory bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Project {
    Wildberries,
    Ozon,
    YandexMarket,
}

impl Project {
    /// Folder name that must appear in a bundle's `pathName`.
    #[must_use]
    pub fn folder(self) -> &'static str {
        match self {
            Project::Wildberries => "WB",
            Project::Ozon => "Озон",
            Project::YandexMarket => "ЯндексМаркет",
        }
    }

    /// Wildberries bundles are keyed by nm id (their code); the others by
    /// seller article.
    fn key(self, bundle: &Bundle) -> Option<String> {
        match self {
            Project::Wildberries => bundle
                .code
                .trim()
                .parse::<u64>()
                .ok()
                .map(|nm_id| nm_id.to_string()),
            Project::Ozon | Project::YandexMarket => {
                Some(bundle.article.trim().to_owned()).filter(|a| !a.is_empty())
            }
        }
    }
}

/// Product id from a component `href`.
#[must_use]
pub fn component_id(href: &str) -> Option<String> {
    PRODUCT_HREF
        .captures(href)
        .and_then(|cap| cap.get(1).map(|m| m.as_str().to_owned()))
}

/// Sellable bundle count: the best of `floor(stock / quantity)` over the
/// components that have stock.
#[must_use]
pub fn bundle_stock(bundle: &Bundle, stocks: &HashMap<String, f64>) -> f64 {
    bundle
        .components
        .rows
        .iter()
        .filter(|c| c.quantity > 0.0)
        .filter_map(|c| {
            let id = component_id(&c.assortment.meta.href)?;
            stocks.get(&id).map(|stock| (stock / c.quantity).floor())
        })
        .fold(0.0, f64::max)
}

/// Unit cost from the sale price type used for cost of goods, in rubles.
#[must_use]
pub fn prime_cost(prices: &[SalePrice]) -> f64 {
    prices
        .iter()
        .find(|p| p.price_type.name == PRIME_COST_PRICE_TYPE)
        .map_or(0.0, |p| p.value / 100.0)
}

fn attribute<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a serde_json::Value> {
    attributes.iter().find(|a| a.name == name).map(|a| &a.value)
}

fn category(attributes: &[Attribute]) -> Option<String> {
    let value = attribute(attributes, CATEGORY_ATTRIBUTE)?;
    let name = match value {
        serde_json::Value::String(s) => s.as_str(),
        serde_json::Value::Object(map) => map.get("name")?.as_str()?,
        _ => return None,
    };
    Some(name.trim().to_owned()).filter(|n| !n.is_empty())
}

fn number(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().replace(',', ".").parse().ok(),
        _ => None,
    }
}

/// Parcel volume in liters from centimeter dimensions; `0` when any is missing.
#[must_use]
pub fn volume_liters(attributes: &[Attribute]) -> f64 {
    DIMENSION_ATTRIBUTES
        .iter()
        .map(|name| attribute(attributes, name).and_then(number))
        .try_fold(1.0, |acc, dim| dim.map(|d| acc * d))
        .map_or(0.0, |cubic_cm| cubic_cm / 1000.0)
}

/// Bundles of `project` as inventory items keyed by marketplace code.
#[must_use]
pub fn inventory_items(
    bundles: &[Bundle],
    stock: &[StockRow],
    project: Project,
) -> BTreeMap<String, InventoryItem> {
    let stocks: HashMap<String, f64> = stock
        .iter()
        .map(|row| (row.assortment_id.clone(), row.quantity))
        .collect();

    let items: BTreeMap<String, InventoryItem> = bundles
        .iter()
        .filter(|b| b.path_name.contains(project.folder()))
        .filter_map(|b| {
            let Some(key) = project.key(b) else {
                tracing::warn!(bundle = %b.name, code = %b.code, "bundle has no usable marketplace code");
                return None;
            };
            let item = InventoryItem {
                id: b.id.clone(),
                code: key.clone(),
                article: b.article.clone(),
                name: b.name.clone(),
                stock: bundle_stock(b, &stocks),
                prime_cost: prime_cost(&b.sale_prices),
                category: category(&b.attributes),
                volume_liters: volume_liters(&b.attributes),
            };
            Some((key, item))
        })
        .collect();

    tracing::info!(project = project.folder(), count = items.len(), "normalized inventory items");
    items
}
