//! Column layouts of every report.

use mpcalc_core::FulfillmentModel;
use mpcalc_pricing::ProfitabilityResult;

use crate::table::Cell;

/// Public product page of a Wildberries card.
#[must_use]
pub fn wildberries_url(nm_id: &str) -> String {
    format!("https://www.wildberries.ru/catalog/{nm_id}/detail.aspx")
}

/// A value taken from a [`ProfitabilityResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Article,
    Code,
    Link,
    Stock,
    StockFbs,
    StockFbo,
    OrderDate,
    OrderNumber,
    Quantity,
    Discount,
    Price,
    OrderPrice,
    RecommendedPrice,
    PrimeCost,
    Commission,
    Acquiring,
    Logistics,
    LastMile,
    /// Logistics and last mile in one column.
    Delivery,
    CrossRegional,
    Sorting,
    Profit,
    Profitability,
    OrderProfit,
    OrderProfitability,
}

impl Field {
    #[must_use]
    pub fn value(self, row: &ProfitabilityResult) -> Cell {
        let split = row.stock_split.unwrap_or_default();
        match self {
            Field::Name => Cell::text(&row.name),
            Field::Article => Cell::text(&row.article),
            Field::Code => Cell::text(&row.code),
            Field::Link => Cell::Text(wildberries_url(&row.code)),
            Field::Stock => Cell::Count(row.stock),
            Field::StockFbs => Cell::Count(split.fbs),
            Field::StockFbo => Cell::Count(split.fbo),
            Field::OrderDate => row
                .order
                .as_ref()
                .map_or(Cell::Empty, |o| Cell::text(&o.created_at)),
            Field::OrderNumber => row
                .order
                .as_ref()
                .map_or(Cell::Empty, |o| Cell::text(&o.order_number)),
            Field::Quantity => Cell::Count(row.order.as_ref().map_or(0.0, |o| o.quantity)),
            Field::Discount => row.discount_percent.map_or(Cell::Empty, Cell::Percent),
            Field::Price => Cell::Money(row.price),
            Field::OrderPrice => Cell::Money(row.charged.map_or(row.price, |c| c.order_price)),
            Field::RecommendedPrice => Cell::Money(row.recommended_price),
            Field::PrimeCost => Cell::Money(row.prime_cost),
            Field::Commission => Cell::Money(row.costs.commission),
            Field::Acquiring => Cell::Money(row.costs.acquiring),
            Field::Logistics => Cell::Money(row.costs.logistics),
            Field::LastMile => Cell::Money(row.costs.last_mile),
            Field::Delivery => Cell::Money(row.costs.delivery()),
            Field::CrossRegional => Cell::Money(row.costs.cross_regional),
            Field::Sorting => Cell::Money(row.costs.sorting),
            Field::Profit => Cell::Money(row.costs.profit),
            Field::Profitability => Cell::Percent(row.costs.profitability),
            Field::OrderProfit => {
                Cell::Money(row.charged.map_or(row.costs.profit, |c| c.profit))
            }
            Field::OrderProfitability => Cell::Percent(
                row.charged
                    .map_or(row.costs.profitability, |c| c.profitability),
            ),
        }
    }

    /// `true` for columns the totals row sums.
    #[must_use]
    pub fn is_summed(self) -> bool {
        matches!(
            self,
            Field::Stock
                | Field::StockFbs
                | Field::StockFbo
                | Field::Quantity
                | Field::Price
                | Field::OrderPrice
                | Field::RecommendedPrice
                | Field::PrimeCost
                | Field::Commission
                | Field::Acquiring
                | Field::Logistics
                | Field::LastMile
                | Field::Delivery
                | Field::CrossRegional
                | Field::Sorting
                | Field::Profit
                | Field::OrderProfit
        )
    }
}

/// Every profitability report the CLI can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    WildberriesPrices(FulfillmentModel),
    WildberriesOrders,
    OzonPrices,
    OzonOrders,
    /// `true` for the express campaign.
    YandexPrices { express: bool },
    YandexOrders { express: bool },
}

const WB_IDENTITY: [(&str, Field); 5] = [
    ("Номенклатура", Field::Name),
    ("Артикул", Field::Article),
    ("NmId", Field::Code),
    ("Ссылка", Field::Link),
    ("Остаток", Field::Stock),
];

const WB_SPLIT: [(&str, Field); 2] = [
    ("FBS остаток в корзине", Field::StockFbs),
    ("FBO остаток в корзине", Field::StockFbo),
];

const WB_COSTS: [(&str, Field); 5] = [
    ("Себестоимость", Field::PrimeCost),
    ("Комиссия", Field::Commission),
    ("Эквайринг", Field::Acquiring),
    ("Логистика", Field::Logistics),
    ("Прибыль", Field::Profit),
];

const OZON_COSTS: [(&str, Field); 8] = [
    ("Себестоимость", Field::PrimeCost),
    ("Комиссия", Field::Commission),
    ("Эквайринг", Field::Acquiring),
    ("Логистика", Field::Logistics),
    ("Доставка до места выдачи", Field::LastMile),
    ("Обработка", Field::Sorting),
    ("Прибыль", Field::Profit),
    ("Рентабельность", Field::Profitability),
];

const YANDEX_COSTS: [(&str, Field); 8] = [
    ("Себестоимость", Field::PrimeCost),
    ("Комиссия", Field::Commission),
    ("Эквайринг", Field::Acquiring),
    ("Доставка", Field::Delivery),
    ("Доставка в округ", Field::CrossRegional),
    ("Обработка", Field::Sorting),
    ("Прибыль", Field::Profit),
    ("Рентабельность", Field::Profitability),
];

const ORDER_IDENTITY: [(&str, Field); 3] = [
    ("Номер заказа", Field::OrderNumber),
    ("Дата заказа", Field::OrderDate),
    ("Продано", Field::Quantity),
];

const ITEM_IDENTITY: [(&str, Field); 3] = [
    ("Номенклатура", Field::Name),
    ("Артикул", Field::Article),
    ("Остаток", Field::Stock),
];

impl ReportKind {
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            ReportKind::WildberriesPrices(FulfillmentModel::Fbs) => "wb_fbs_prices.xlsx",
            ReportKind::WildberriesPrices(FulfillmentModel::Fbo) => "wb_fbo_prices.xlsx",
            ReportKind::WildberriesOrders => "wb_orders.xlsx",
            ReportKind::OzonPrices => "ozon_fbs_prices.xlsx",
            ReportKind::OzonOrders => "ozon_fbs_orders.xlsx",
            ReportKind::YandexPrices { express: false } => "ym_fbs_prices.xlsx",
            ReportKind::YandexPrices { express: true } => "ym_express_prices.xlsx",
            ReportKind::YandexOrders { express: false } => "ym_fbs_orders.xlsx",
            ReportKind::YandexOrders { express: true } => "ym_express_orders.xlsx",
        }
    }

    #[must_use]
    pub fn sheet_title(self) -> &'static str {
        match self {
            ReportKind::WildberriesPrices(_) => "Номенклатура WB",
            ReportKind::WildberriesOrders => "Заказы WB",
            ReportKind::OzonPrices => "Номенклатура Ozon",
            ReportKind::OzonOrders => "Заказы Ozon",
            ReportKind::YandexPrices { .. } => "Номенклатура YA",
            ReportKind::YandexOrders { .. } => "Заказы YA",
        }
    }

    /// Headers and fields in column order.
    #[must_use]
    pub fn columns(self) -> Vec<(&'static str, Field)> {
        let mut columns = Vec::new();
        match self {
            ReportKind::WildberriesPrices(model) => {
                columns.extend(WB_IDENTITY);
                if model == FulfillmentModel::Fbo {
                    columns.extend(WB_SPLIT);
                }
                columns.extend([
                    ("Дисконт, %", Field::Discount),
                    ("Текущая цена", Field::Price),
                    ("Рекомендуемая цена", Field::RecommendedPrice),
                ]);
                columns.extend(WB_COSTS);
                columns.push(("Рентабельность", Field::Profitability));
            }
            ReportKind::WildberriesOrders => {
                columns.extend(WB_IDENTITY);
                columns.extend(WB_SPLIT);
                columns.extend([
                    ("Дата заказа", Field::OrderDate),
                    ("Номер заказа", Field::OrderNumber),
                    ("Количество", Field::Quantity),
                    ("Дисконт, %", Field::Discount),
                    ("Текущая цена", Field::Price),
                    ("Цена заказа", Field::OrderPrice),
                    ("Рекомендуемая цена", Field::RecommendedPrice),
                ]);
                columns.extend(WB_COSTS);
                columns.extend([
                    ("Рентабельность", Field::Profitability),
                    ("Прибыль по заказу", Field::OrderProfit),
                    ("Рентабельность по заказу", Field::OrderProfitability),
                ]);
            }
            ReportKind::OzonPrices | ReportKind::OzonOrders => {
                if self == ReportKind::OzonOrders {
                    columns.extend(ORDER_IDENTITY);
                }
                columns.extend(ITEM_IDENTITY);
                columns.extend([
                    ("Цена продажи", Field::Price),
                    ("Рекомендуемая цена", Field::RecommendedPrice),
                ]);
                columns.extend(OZON_COSTS);
            }
            ReportKind::YandexPrices { .. } | ReportKind::YandexOrders { .. } => {
                if matches!(self, ReportKind::YandexOrders { .. }) {
                    columns.extend(ORDER_IDENTITY);
                }
                columns.extend(ITEM_IDENTITY);
                columns.extend([
                    ("Текущая цена", Field::Price),
                    ("Рекомендуемая цена", Field::RecommendedPrice),
                ]);
                columns.extend(YANDEX_COSTS);
            }
        }
        columns
    }
}
