use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric setting cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric setting cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can feed a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_id = |var: &str| -> Result<Option<u64>, ConfigError> {
        optional(var)
            .map(|raw| raw.parse::<u64>().map_err(|e| invalid(var, e.to_string())))
            .transpose()
    };

    let wb_cards_batch = or_default("MPCALC_WB_CARDS_BATCH", "100")
        .parse::<usize>()
        .map_err(|e| invalid("MPCALC_WB_CARDS_BATCH", e.to_string()))?;
    if wb_cards_batch == 0 {
        return Err(invalid(
            "MPCALC_WB_CARDS_BATCH",
            "batch size must be at least 1".to_string(),
        ));
    }

    Ok(AppConfig {
        log_level: or_default("MPCALC_LOG_LEVEL", "info"),
        policy_path: optional("MPCALC_POLICY_PATH").map(PathBuf::from),
        output_dir: PathBuf::from(or_default("MPCALC_OUTPUT_DIR", ".")),
        moysklad_token: optional("MS_API_TOKEN"),
        wildberries_token: optional("WB_API_TOKEN"),
        ozon_client_id: optional("OZ_CLIENT_ID"),
        ozon_token: optional("OZ_API_TOKEN"),
        yandex_token: optional("YM_API_TOKEN"),
        yandex_business_id: parse_id("YA_BUSINESS_ID")?,
        yandex_fbs_campaign_id: parse_id("YA_FBS_CAMPAIGN_ID")?,
        yandex_express_campaign_id: parse_id("YA_EXPRESS_CAMPAIGN_ID")?,
        http_timeout_secs: parse_u64("MPCALC_HTTP_TIMEOUT_SECS", "30")?,
        http_max_retries: parse_u32("MPCALC_HTTP_MAX_RETRIES", "3")?,
        http_retry_delay_secs: parse_u64("MPCALC_HTTP_RETRY_DELAY_SECS", "10")?,
        wb_day_delay_secs: parse_u64("MPCALC_WB_DAY_DELAY_SECS", "20")?,
        wb_cards_batch,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
