//! Concurrent card-detail fan-out used by the FBO stock report.

use std::collections::BTreeMap;

use futures::stream::{self, StreamExt};
use mpcalc_pricing::StockSplit;

use super::normalize::stock_split;
use super::types::{CardProduct, CardsEnvelope};
use super::WildberriesClient;
use crate::error::ClientError;

/// Fixed query parameters of the public card-detail endpoint.
pub const CARD_DETAIL_PARAMS: [(&str, &str); 4] = [
    ("appType", "1"),
    ("curr", "rub"),
    ("dest", "-1257786"),
    ("spp", "30"),
];

impl WildberriesClient {
    /// Card details for one batch of nm ids.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails after retries.
    pub async fn card_details(&self, nm_ids: &[u64]) -> Result<Vec<CardProduct>, ClientError> {
        let joined = nm_ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(";");
        let mut query: Vec<(&str, String)> = CARD_DETAIL_PARAMS
            .iter()
            .map(|(k, v)| (*k, (*v).to_owned()))
            .collect();
        query.push(("nm", joined));
        let envelope: CardsEnvelope = self.cards.get("cards/v2/detail", &query).await?;
        Ok(envelope.data.products)
    }

    /// Stock split of every nm id, fetched in batches of `batch_size` with all
    /// batches in flight at once. Failed batches are logged and left out.
    pub async fn card_stock(
        &self,
        nm_ids: &[u64],
        batch_size: usize,
        fbs_warehouse_id: u64,
    ) -> BTreeMap<u64, StockSplit> {
        let chunks: Vec<&[u64]> = nm_ids.chunks(batch_size.max(1)).collect();
        let concurrency = chunks.len().max(1);

        let results: Vec<(usize, Result<Vec<CardProduct>, ClientError>)> = stream::iter(chunks)
            .map(|chunk| async move { (chunk.len(), self.card_details(chunk).await) })
            .buffer_unordered(concurrency)
            .collect()
            .await;

        let mut stock = BTreeMap::new();
        let mut failed = 0usize;
        for (requested, result) in results {
            match result {
                Ok(products) => {
                    for product in &products {
                        stock.insert(product.id, stock_split(product, fbs_warehouse_id));
                    }
                }
                Err(err) => {
                    failed += 1;
                    tracing::error!(requested, error = %err, "card detail batch failed");
                }
            }
        }
        tracing::info!(
            requested = nm_ids.len(),
            found = stock.len(),
            failed_batches = failed,
            "fetched card stock"
        );
        stock
    }
}
