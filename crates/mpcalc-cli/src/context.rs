//! Configuration, tariff policy and client construction shared by every
//! command of one run.

use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use mpcalc_clients::{HttpSettings, MoySkladClient, OzonClient, WildberriesClient, YandexClient};
use mpcalc_core::{AppConfig, DateRange, TariffPolicy};
use mpcalc_pricing::MarginTarget;

pub(crate) struct RunContext {
    pub config: AppConfig,
    pub policy: TariffPolicy,
    pub http: HttpSettings,
}

impl RunContext {
    /// Loads the policy file named by the config, or the built-in policy.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let policy = match &config.policy_path {
            Some(path) => mpcalc_core::load_policy(path)
                .with_context(|| format!("loading tariff policy {}", path.display()))?,
            None => {
                tracing::debug!("no policy file configured; using built-in tariffs");
                TariffPolicy::default()
            }
        };
        let http = HttpSettings::from_config(&config);
        Ok(Self {
            config,
            policy,
            http,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    /// `--margin` if given, else the policy's plan margin.
    pub fn margin(&self, flag: Option<f64>) -> MarginTarget {
        MarginTarget::new(flag.unwrap_or(self.policy.plan_margin_percent))
    }

    pub fn moysklad(&self) -> anyhow::Result<MoySkladClient> {
        let token = self.config.require_moysklad_token()?;
        Ok(MoySkladClient::new(token, self.http)?)
    }

    pub fn wildberries(&self) -> anyhow::Result<WildberriesClient> {
        let token = self.config.require_wildberries_token()?;
        Ok(WildberriesClient::new(token, self.http)?)
    }

    /// Client for the public card endpoints only; works without a seller token.
    pub fn wildberries_public(&self) -> anyhow::Result<WildberriesClient> {
        let token = self.config.wildberries_token.as_deref().unwrap_or_default();
        Ok(WildberriesClient::new(token, self.http)?)
    }

    pub fn ozon(&self) -> anyhow::Result<OzonClient> {
        let (client_id, api_key) = self.config.require_ozon_credentials()?;
        Ok(OzonClient::new(client_id, api_key, self.http)?)
    }

    pub fn yandex(&self) -> anyhow::Result<YandexClient> {
        let token = self.config.require_yandex_token()?;
        Ok(YandexClient::new(token, self.http)?)
    }
}

/// Inclusive date range from the `--from`/`--to` flags.
pub(crate) fn date_range(from: NaiveDate, to: NaiveDate) -> anyhow::Result<DateRange> {
    DateRange::new(from, to)
        .with_context(|| format!("--from {from} is after --to {to}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_range_rejects_reversed_bounds() {
        let from = NaiveDate::from_ymd_opt(2025, 3, 2).expect("valid date");
        let to = NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date");
        let result = date_range(from, to);
        assert!(result.is_err(), "expected error, got: {result:?}");
    }

    #[test]
    fn date_range_accepts_single_day() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date");
        let range = date_range(day, day).expect("valid range");
        assert_eq!(range.days(), vec![day]);
    }
}
