//! Yandex Market Partner API client.

mod normalize;
pub mod types;

use std::collections::{BTreeMap, HashSet};

use mpcalc_core::{DateRange, YandexPolicy};
use mpcalc_pricing::YandexListing;
use reqwest::header::{HeaderMap, AUTHORIZATION};

use crate::error::ClientError;
use crate::http::{bearer, header_value, HttpSettings, JsonApi};
use types::{
    CampaignsResponse, CategoriesTreeResponse, OfferMappingEntry, OfferMappingsRequest,
    OfferMappingsResponse, Order, OrdersResponse, Tariff, TariffOffer, TariffsParameters,
    TariffsRequest, TariffsResponse, STATUS_OK,
};

pub use normalize::{
    flatten_category_ids, listings, order_date, order_lines, priced_offers,
    remap_stale_categories, tariff_set, PricedOffer,
};

const DEFAULT_BASE_URL: &str = "https://api.partner.market.yandex.ru/";
const OFFER_PAGE_LIMIT: u32 = 200;
const ORDER_PAGE_LIMIT: u32 = 1000;

/// Campaign and business the reports run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampaignIds {
    pub campaign_id: u64,
    pub business_id: u64,
}

pub struct YandexClient {
    api: JsonApi,
}

fn ensure_ok(status: &str, context: &str) -> Result<(), ClientError> {
    if status == STATUS_OK {
        Ok(())
    } else {
        Err(ClientError::Api {
            context: context.to_owned(),
            status: status.to_owned(),
        })
    }
}

fn next_token(paging: Option<types::Paging>) -> Option<String> {
    paging
        .and_then(|p| p.next_page_token)
        .filter(|token| !token.is_empty())
}

impl YandexClient {
    /// # Errors
    ///
    /// Returns [`ClientError`] if the HTTP client cannot be constructed or the
    /// token is not a valid header value.
    pub fn new(token: &str, settings: HttpSettings) -> Result<Self, ClientError> {
        Self::with_base_url(token, settings, DEFAULT_BASE_URL)
    }

    /// Client against a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// See [`YandexClient::new`].
    pub fn with_base_url(
        token: &str,
        settings: HttpSettings,
        base_url: &str,
    ) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, header_value(&bearer(token))?);
        Ok(Self {
            api: JsonApi::new(base_url, headers, settings)?,
        })
    }

    /// Configured ids when both are known, otherwise the first campaign of
    /// the account.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] if ids are missing and the account has no
    /// campaigns, or the lookup request fails.
    pub async fn resolve_ids(
        &self,
        campaign_id: Option<u64>,
        business_id: Option<u64>,
    ) -> Result<CampaignIds, ClientError> {
        if let (Some(campaign_id), Some(business_id)) = (campaign_id, business_id) {
            return Ok(CampaignIds {
                campaign_id,
                business_id,
            });
        }
        let response: CampaignsResponse = self.api.get("campaigns", &[]).await?;
        let first = response
            .campaigns
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::Api {
                context: "campaigns".to_owned(),
                status: "no campaigns in account".to_owned(),
            })?;
        tracing::info!(
            campaign_id = first.id,
            business_id = first.business.id,
            "using first campaign of the account"
        );
        Ok(CampaignIds {
            campaign_id: first.id,
            business_id: first.business.id,
        })
    }

    /// Every non-archived offer of the business, following `nextPageToken`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if a page fails or reports a non-OK status.
    pub async fn offer_mappings(&self, business_id: u64) -> Result<Vec<OfferMappingEntry>, ClientError> {
        let path = format!("businesses/{business_id}/offer-mappings");
        let body = OfferMappingsRequest { archived: false };
        let mut offers = Vec::new();
        let mut page_token = String::new();
        loop {
            let response: OfferMappingsResponse = self
                .api
                .post(
                    &path,
                    &[
                        ("page_token", page_token.clone()),
                        ("limit", OFFER_PAGE_LIMIT.to_string()),
                    ],
                    &body,
                )
                .await?;
            ensure_ok(&response.status, "offer-mappings")?;
            let result = response.result;
            let fetched = result.offer_mappings.len();
            offers.extend(result.offer_mappings);
            match next_token(result.paging) {
                Some(token) if fetched > 0 => page_token = token,
                _ => break,
            }
        }
        tracing::info!(count = offers.len(), "fetched yandex offer mappings");
        Ok(offers)
    }

    /// Ids of every category in the live category tree.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails or reports a non-OK status.
    pub async fn category_ids(&self) -> Result<HashSet<u64>, ClientError> {
        let response: CategoriesTreeResponse = self
            .api
            .post("categories/tree", &[], &serde_json::json!({ "language": "RU" }))
            .await?;
        ensure_ok(&response.status, "categories/tree")?;
        let ids = response
            .result
            .as_ref()
            .map(flatten_category_ids)
            .unwrap_or_default();
        tracing::info!(count = ids.len(), "fetched yandex category tree");
        Ok(ids)
    }

    /// Tariffs for one chunk of offers, in request order.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails or reports a non-OK status.
    pub async fn calculate_tariffs(
        &self,
        campaign_id: u64,
        offers: Vec<TariffOffer>,
    ) -> Result<Vec<Vec<Tariff>>, ClientError> {
        let body = TariffsRequest {
            parameters: TariffsParameters {
                campaign_id,
                frequency: "BIWEEKLY",
            },
            offers,
        };
        let response: TariffsResponse = self.api.post("tariffs/calculate", &[], &body).await?;
        ensure_ok(&response.status, "tariffs/calculate")?;
        Ok(response
            .result
            .offers
            .into_iter()
            .map(|o| o.tariffs)
            .collect())
    }

    /// Listings with normalized tariffs for every priceable offer. Stale
    /// categories are remapped before calculation; when the category tree
    /// cannot be fetched offers keep their own categories.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the offers or any tariff chunk fail.
    pub async fn listings(
        &self,
        ids: CampaignIds,
        policy: &YandexPolicy,
    ) -> Result<BTreeMap<String, YandexListing>, ClientError> {
        let mut offers = self.offer_mappings(ids.business_id).await?;
        match self.category_ids().await {
            Ok(live) if !live.is_empty() => {
                let remapped = remap_stale_categories(&mut offers, &live, policy);
                tracing::info!(remapped, "checked offer categories");
            }
            Ok(_) => tracing::warn!("category tree is empty; categories left as mapped"),
            Err(err) => {
                tracing::error!(error = %err, "category tree fetch failed; categories left as mapped");
            }
        }

        let priced = priced_offers(&offers);
        let mut result = BTreeMap::new();
        for chunk in priced.chunks(policy.tariff_chunk_size.max(1)) {
            let requests = chunk.iter().map(|o| o.request.clone()).collect();
            let answers = self.calculate_tariffs(ids.campaign_id, requests).await?;
            result.extend(listings(chunk, &answers, &policy.sorting_warehouse_type));
        }
        tracing::info!(count = result.len(), "calculated yandex tariffs");
        Ok(result)
    }

    /// Orders of the campaign created within `range`, following
    /// `nextPageToken`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if any page fails after retries.
    pub async fn orders(&self, campaign_id: u64, range: DateRange) -> Result<Vec<Order>, ClientError> {
        let path = format!("campaigns/{campaign_id}/orders");
        let mut orders = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut query = vec![
                ("fake", "false".to_owned()),
                ("fromDate", order_date(range.from)),
                ("toDate", order_date(range.to)),
                ("limit", ORDER_PAGE_LIMIT.to_string()),
            ];
            if let Some(token) = &page_token {
                query.push(("page_token", token.clone()));
            }
            let response: OrdersResponse = self.api.get(&path, &query).await?;
            let fetched = response.orders.len();
            orders.extend(response.orders);
            match next_token(response.paging) {
                Some(token) if fetched > 0 => page_token = Some(token),
                _ => break,
            }
        }
        tracing::info!(count = orders.len(), "fetched yandex orders");
        Ok(orders)
    }
}
