//! MoySklad inventory client.

mod normalize;
pub mod types;

use std::collections::BTreeMap;

use mpcalc_core::InventoryItem;
use reqwest::header::{HeaderMap, AUTHORIZATION};

use crate::error::ClientError;
use crate::http::{bearer, header_value, HttpSettings, JsonApi};
use types::{Bundle, Page, StockRow};

pub use normalize::{bundle_stock, component_id, inventory_items, prime_cost, volume_liters, Project};

const DEFAULT_BASE_URL: &str = "https://api.moysklad.ru/api/remap/1.2/";
const BUNDLE_PAGE_LIMIT: u64 = 100;

pub struct MoySkladClient {
    api: JsonApi,
}

impl MoySkladClient {
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
    /// See [`MoySkladClient::new`].
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

    /// Every bundle with its components expanded, walking offset pages until
    /// the reported total is covered.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if any page fails after retries.
    pub async fn bundles(&self) -> Result<Vec<Bundle>, ClientError> {
        let mut bundles = Vec::new();
        let mut offset = 0u64;
        loop {
            let page: Page<Bundle> = self
                .api
                .get(
                    "entity/bundle",
                    &[
                        ("expand", "components.rows.assortment".to_owned()),
                        ("limit", BUNDLE_PAGE_LIMIT.to_string()),
                        ("offset", offset.to_string()),
                    ],
                )
                .await?;
            bundles.extend(page.rows);
            offset += BUNDLE_PAGE_LIMIT;
            if page.meta.size < offset {
                break;
            }
        }
        tracing::info!(count = bundles.len(), "fetched inventory bundles");
        Ok(bundles)
    }

    /// Current quantity of every assortment, zero lines included.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the report request fails after retries.
    pub async fn current_stock(&self) -> Result<Vec<StockRow>, ClientError> {
        let rows: Vec<StockRow> = self
            .api
            .get(
                "report/stock/all/current",
                &[
                    ("stockType", "quantity".to_owned()),
                    ("include", "zeroLines".to_owned()),
                ],
            )
            .await?;
        tracing::info!(count = rows.len(), "fetched inventory stock");
        Ok(rows)
    }

    /// Inventory items of one marketplace project with bundle stock resolved.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the bundle or stock requests fail.
    pub async fn inventory(
        &self,
        project: Project,
    ) -> Result<BTreeMap<String, InventoryItem>, ClientError> {
        let bundles = self.bundles().await?;
        let stock = self.current_stock().await?;
        Ok(inventory_items(&bundles, &stock, project))
    }
}
