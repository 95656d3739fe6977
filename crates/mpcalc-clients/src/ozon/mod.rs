//! Ozon Seller API client.

mod normalize;
pub mod types;

use mpcalc_core::DateRange;
use reqwest::header::{HeaderMap, HeaderName};

use crate::error::ClientError;
use crate::http::{header_value, HttpSettings, JsonApi};
use types::{
    Posting, PostingFilter, PostingListRequest, PostingListResponse, PostingWith, PriceItem,
    PricesFilter, PricesRequest, PricesResponse, ProductFilter, ProductListRequest,
    ProductListResponse,
};

pub use normalize::{listings, order_lines, posting_window};

const DEFAULT_BASE_URL: &str = "https://api-seller.ozon.ru/";
const PAGE_LIMIT: u64 = 1000;
const VISIBILITY_ALL: &str = "ALL";

pub struct OzonClient {
    api: JsonApi,
}

impl OzonClient {
    /// # Errors
    ///
    /// Returns [`ClientError`] if the HTTP client cannot be constructed or a
    /// credential is not a valid header value.
    pub fn new(client_id: &str, api_key: &str, settings: HttpSettings) -> Result<Self, ClientError> {
        Self::with_base_url(client_id, api_key, settings, DEFAULT_BASE_URL)
    }

    /// Client against a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// See [`OzonClient::new`].
    pub fn with_base_url(
        client_id: &str,
        api_key: &str,
        settings: HttpSettings,
        base_url: &str,
    ) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static("client-id"), header_value(client_id)?);
        headers.insert(HeaderName::from_static("api-key"), header_value(api_key)?);
        Ok(Self {
            api: JsonApi::new(base_url, headers, settings)?,
        })
    }

    /// Prices and commissions of the given products.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails after retries.
    pub async fn prices(&self, product_ids: Vec<u64>) -> Result<Vec<PriceItem>, ClientError> {
        let body = PricesRequest {
            filter: PricesFilter {
                product_id: product_ids,
                visibility: VISIBILITY_ALL,
            },
            last_id: String::new(),
            limit: PAGE_LIMIT,
        };
        let response: PricesResponse = self.api.post("v4/product/info/prices", &[], &body).await?;
        Ok(response.result.items)
    }

    /// Prices of every non-archived product. The product list is walked by
    /// `last_id`; prices are fetched once per list page.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if any list or prices request fails.
    pub async fn products(&self) -> Result<Vec<PriceItem>, ClientError> {
        let mut request = ProductListRequest {
            filter: ProductFilter {
                offer_id: Vec::new(),
                product_id: Vec::new(),
                visibility: VISIBILITY_ALL,
            },
            last_id: String::new(),
            limit: PAGE_LIMIT,
        };
        let mut items = Vec::new();
        let mut covered = PAGE_LIMIT;
        loop {
            let page: ProductListResponse =
                self.api.post("v3/product/list", &[], &request).await?;
            let result = page.result;
            if result.items.is_empty() {
                break;
            }
            let ids: Vec<u64> = result
                .items
                .iter()
                .filter(|p| !p.archived)
                .map(|p| p.product_id)
                .collect();
            if !ids.is_empty() {
                items.extend(self.prices(ids).await?);
            }
            if result.total < covered || result.last_id.is_empty() {
                break;
            }
            request.last_id = result.last_id;
            covered += PAGE_LIMIT;
        }
        tracing::info!(count = items.len(), "fetched ozon product prices");
        Ok(items)
    }

    /// FBS postings processed within `range`, walking offset pages while the
    /// API reports more.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if any page fails after retries.
    pub async fn fbs_postings(&self, range: DateRange) -> Result<Vec<Posting>, ClientError> {
        let (since, to) = posting_window(range.from, range.to);
        let mut request = PostingListRequest {
            dir: "ASC",
            filter: PostingFilter { since, to },
            limit: PAGE_LIMIT,
            offset: 0,
            with: PostingWith {
                analytics_data: false,
                financial_data: true,
            },
        };
        let mut postings = Vec::new();
        loop {
            let page: PostingListResponse =
                self.api.post("v3/posting/fbs/list", &[], &request).await?;
            let fetched = page.result.postings.len() as u64;
            postings.extend(page.result.postings);
            if !page.result.has_next || fetched == 0 {
                break;
            }
            request.offset += fetched;
        }
        tracing::info!(count = postings.len(), "fetched ozon fbs postings");
        Ok(postings)
    }
}
