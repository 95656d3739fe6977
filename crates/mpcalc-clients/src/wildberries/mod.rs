//! Wildberries seller APIs and the public card-detail endpoint.

mod cards;
mod normalize;
pub mod types;

use std::collections::HashSet;
use std::time::Duration;

use chrono::NaiveDate;
use mpcalc_core::{DateRange, FulfillmentModel};
use mpcalc_pricing::{CommissionTable, WarehouseTable};
use reqwest::header::{HeaderMap, AUTHORIZATION};

use crate::error::ClientError;
use crate::http::{header_value, or_empty, HttpSettings, JsonApi};
use types::{
    BoxTariffRow, BoxTariffsEnvelope, CommissionReport, CommissionRow, Goods, GoodsEnvelope,
    MarketplaceOrdersPage, SupplierOrder,
};

pub use cards::CARD_DETAIL_PARAMS;
pub use normalize::{
    classify_orders, commission_table, fbs_window, listings, stock_split, warehouse_logistics,
    warehouse_table, ClassifiedOrders,
};

const GOODS_PAGE_LIMIT: usize = 1000;
const MARKETPLACE_PAGE_LIMIT: usize = 1000;

/// Base URLs of the Wildberries hosts the client talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildberriesHosts {
    pub common: String,
    pub prices: String,
    pub statistics: String,
    pub marketplace: String,
    pub cards: String,
}

impl WildberriesHosts {
    #[must_use]
    pub fn production() -> Self {
        Self {
            common: "https://common-api.wildberries.ru/".to_owned(),
            prices: "https://discounts-prices-api.wildberries.ru/".to_owned(),
            statistics: "https://statistics-api.wildberries.ru/".to_owned(),
            marketplace: "https://marketplace-api.wildberries.ru/".to_owned(),
            cards: "https://card.wb.ru/".to_owned(),
        }
    }

    /// Every host pointed at one base URL (for testing with wiremock).
    #[must_use]
    pub fn single(base_url: &str) -> Self {
        Self {
            common: base_url.to_owned(),
            prices: base_url.to_owned(),
            statistics: base_url.to_owned(),
            marketplace: base_url.to_owned(),
            cards: base_url.to_owned(),
        }
    }
}

/// Commission and warehouse tariffs of one day, normalized for both models.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayTariffs {
    pub commissions: CommissionTable,
    pub fbs: WarehouseTable,
    pub fbo: WarehouseTable,
}

impl DayTariffs {
    #[must_use]
    pub fn warehouses(&self, model: FulfillmentModel) -> &WarehouseTable {
        match model {
            FulfillmentModel::Fbs => &self.fbs,
            FulfillmentModel::Fbo => &self.fbo,
        }
    }
}

pub struct WildberriesClient {
    common: JsonApi,
    prices: JsonApi,
    statistics: JsonApi,
    marketplace: JsonApi,
    cards: JsonApi,
}

impl WildberriesClient {
    /// # Errors
    ///
    /// Returns [`ClientError`] if an HTTP client cannot be constructed or the
    /// token is not a valid header value.
    pub fn new(token: &str, settings: HttpSettings) -> Result<Self, ClientError> {
        Self::with_hosts(token, settings, &WildberriesHosts::production())
    }

    /// # Errors
    ///
    /// See [`WildberriesClient::new`].
    pub fn with_hosts(
        token: &str,
        settings: HttpSettings,
        hosts: &WildberriesHosts,
    ) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, header_value(token)?);
        Ok(Self {
            common: JsonApi::new(&hosts.common, headers.clone(), settings)?,
            prices: JsonApi::new(&hosts.prices, headers.clone(), settings)?,
            statistics: JsonApi::new(&hosts.statistics, headers.clone(), settings)?,
            marketplace: JsonApi::new(&hosts.marketplace, headers, settings)?,
            // public endpoint; the seller token stays off it
            cards: JsonApi::new(&hosts.cards, HeaderMap::new(), settings)?,
        })
    }

    /// Category commissions, one row per subject.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails after retries.
    pub async fn commission(&self) -> Result<Vec<CommissionRow>, ClientError> {
        let report: CommissionReport = self
            .common
            .get("api/v1/tariffs/commission", &[("locale", "ru".to_owned())])
            .await?;
        tracing::info!(count = report.report.len(), "fetched wildberries commissions");
        Ok(report.report)
    }

    /// Box logistics tariffs of every warehouse, effective on `date`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails after retries.
    pub async fn box_tariffs(&self, date: NaiveDate) -> Result<Vec<BoxTariffRow>, ClientError> {
        let envelope: BoxTariffsEnvelope = self
            .common
            .get(
                "api/v1/tariffs/box",
                &[("date", date.format("%Y-%m-%d").to_string())],
            )
            .await?;
        Ok(envelope.response.data.warehouse_list)
    }

    /// Commissions and box tariffs effective on `date`. A failed request
    /// leaves its table empty, so calculators fall back to the default
    /// commission and the fallback warehouse instead of aborting the run.
    pub async fn day_tariffs(&self, date: NaiveDate, fallback_warehouse: &str) -> DayTariffs {
        let commissions = or_empty(self.commission().await, "wildberries commissions");
        let box_rows = or_empty(self.box_tariffs(date).await, "wildberries box tariffs");
        DayTariffs {
            commissions: commission_table(&commissions),
            fbs: warehouse_table(&box_rows, FulfillmentModel::Fbs, fallback_warehouse),
            fbo: warehouse_table(&box_rows, FulfillmentModel::Fbo, fallback_warehouse),
        }
    }

    /// Current prices and discounts of every card, paged by offset until an
    /// empty page.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if any page fails after retries.
    pub async fn goods(&self) -> Result<Vec<Goods>, ClientError> {
        let mut goods = Vec::new();
        let mut offset = 0usize;
        loop {
            let envelope: GoodsEnvelope = self
                .prices
                .get(
                    "api/v2/list/goods/filter",
                    &[
                        ("limit", GOODS_PAGE_LIMIT.to_string()),
                        ("offset", offset.to_string()),
                    ],
                )
                .await?;
            let page = envelope.data.list_goods;
            if page.is_empty() {
                break;
            }
            offset += page.len();
            goods.extend(page);
        }
        tracing::info!(count = goods.len(), "fetched wildberries goods");
        Ok(goods)
    }

    /// Statistics orders created on `date`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails after retries.
    pub async fn supplier_orders(&self, date: NaiveDate) -> Result<Vec<SupplierOrder>, ClientError> {
        self.statistics
            .get(
                "api/v1/supplier/orders",
                &[
                    ("dateFrom", date.format("%Y-%m-%d").to_string()),
                    ("flag", "1".to_owned()),
                ],
            )
            .await
    }

    /// Statistics orders for every day of `range`, pausing `day_delay`
    /// between days to stay under the endpoint's rate limit.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if any day fails after retries.
    pub async fn orders_for_range(
        &self,
        range: DateRange,
        day_delay: Duration,
    ) -> Result<Vec<SupplierOrder>, ClientError> {
        let days = range.days();
        let mut orders = Vec::new();
        for (i, day) in days.iter().enumerate() {
            if i > 0 && !day_delay.is_zero() {
                tokio::time::sleep(day_delay).await;
            }
            let batch = self.supplier_orders(*day).await?;
            tracing::debug!(%day, count = batch.len(), "fetched wildberries orders for day");
            orders.extend(batch);
        }
        Ok(orders)
    }

    /// `rid`s of seller-shipped orders created between the two unix
    /// timestamps, following the `next` cursor.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if any page fails after retries.
    pub async fn fbs_rids(&self, from_ts: i64, to_ts: i64) -> Result<HashSet<String>, ClientError> {
        let mut rids = HashSet::new();
        let mut next = 0i64;
        loop {
            let page: MarketplaceOrdersPage = self
                .marketplace
                .get(
                    "api/v3/orders",
                    &[
                        ("limit", MARKETPLACE_PAGE_LIMIT.to_string()),
                        ("next", next.to_string()),
                        ("dateFrom", from_ts.to_string()),
                        ("dateTo", to_ts.to_string()),
                    ],
                )
                .await?;
            let fetched = page.orders.len();
            rids.extend(page.orders.into_iter().map(|o| o.rid));
            if fetched < MARKETPLACE_PAGE_LIMIT || page.next == 0 || page.next == next {
                break;
            }
            next = page.next;
        }
        tracing::info!(count = rids.len(), "fetched wildberries fbs order ids");
        Ok(rids)
    }

    /// Orders of `range` split into FBS and FBO with cancellations dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the statistics or marketplace requests fail.
    pub async fn classified_orders(
        &self,
        range: DateRange,
        day_delay: Duration,
    ) -> Result<ClassifiedOrders, ClientError> {
        let orders = self.orders_for_range(range, day_delay).await?;
        let (from_ts, to_ts) = fbs_window(range.from, range.to);
        let rids = self.fbs_rids(from_ts, to_ts).await?;
        Ok(classify_orders(&orders, &rids))
    }
}
