use std::path::PathBuf;

use crate::ConfigError;

/// Process-level settings: marketplace credentials, HTTP behavior and output
/// locations. Credentials are optional at load time; each command asks for
/// the ones it needs through the `require_*` accessors.
#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub policy_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub moysklad_token: Option<String>,
    pub wildberries_token: Option<String>,
    pub ozon_client_id: Option<String>,
    pub ozon_token: Option<String>,
    pub yandex_token: Option<String>,
    pub yandex_business_id: Option<u64>,
    pub yandex_fbs_campaign_id: Option<u64>,
    pub yandex_express_campaign_id: Option<u64>,
    pub http_timeout_secs: u64,
    pub http_max_retries: u32,
    pub http_retry_delay_secs: u64,
    pub wb_day_delay_secs: u64,
    pub wb_cards_batch: usize,
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `MS_API_TOKEN` is unset.
    pub fn require_moysklad_token(&self) -> Result<&str, ConfigError> {
        required(self.moysklad_token.as_deref(), "MS_API_TOKEN")
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `WB_API_TOKEN` is unset.
    pub fn require_wildberries_token(&self) -> Result<&str, ConfigError> {
        required(self.wildberries_token.as_deref(), "WB_API_TOKEN")
    }

    /// Returns `(client_id, api_key)` for the Ozon seller API.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] naming the first unset variable.
    pub fn require_ozon_credentials(&self) -> Result<(&str, &str), ConfigError> {
        Ok((
            required(self.ozon_client_id.as_deref(), "OZ_CLIENT_ID")?,
            required(self.ozon_token.as_deref(), "OZ_API_TOKEN")?,
        ))
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `YM_API_TOKEN` is unset.
    pub fn require_yandex_token(&self) -> Result<&str, ConfigError> {
        required(self.yandex_token.as_deref(), "YM_API_TOKEN")
    }

    /// Campaign id configured for the FBS or the Express storefront.
    #[must_use]
    pub fn yandex_campaign_id(&self, express: bool) -> Option<u64> {
        if express {
            self.yandex_express_campaign_id
        } else {
            self.yandex_fbs_campaign_id
        }
    }
}

fn required<'a>(value: Option<&'a str>, var: &str) -> Result<&'a str, ConfigError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[redacted]");
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("policy_path", &self.policy_path)
            .field("output_dir", &self.output_dir)
            .field("moysklad_token", &redact(&self.moysklad_token))
            .field("wildberries_token", &redact(&self.wildberries_token))
            .field("ozon_client_id", &self.ozon_client_id)
            .field("ozon_token", &redact(&self.ozon_token))
            .field("yandex_token", &redact(&self.yandex_token))
            .field("yandex_business_id", &self.yandex_business_id)
            .field("yandex_fbs_campaign_id", &self.yandex_fbs_campaign_id)
            .field(
                "yandex_express_campaign_id",
                &self.yandex_express_campaign_id,
            )
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("http_max_retries", &self.http_max_retries)
            .field("http_retry_delay_secs", &self.http_retry_delay_secs)
            .field("wb_day_delay_secs", &self.wb_day_delay_secs)
            .field("wb_cards_batch", &self.wb_cards_batch)
            .finish()
    }
}
