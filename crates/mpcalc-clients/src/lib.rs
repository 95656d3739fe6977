//! HTTP clients for the inventory system and the three marketplaces, with
//! normalizers that turn their payloads into pricing inputs.

mod error;
mod http;
mod retry;

pub mod moysklad;
pub mod ozon;
pub mod wildberries;
pub mod yandex;

pub use error::ClientError;
pub use http::{or_empty, HttpSettings};
pub use moysklad::MoySkladClient;
pub use ozon::OzonClient;
pub use wildberries::{DayTariffs, WildberriesClient, WildberriesHosts};
pub use yandex::{CampaignIds, YandexClient};
