use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with every credential populated.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("MS_API_TOKEN", "ms-token");
    m.insert("WB_API_TOKEN", "wb-token");
    m.insert("OZ_CLIENT_ID", "123456");
    m.insert("OZ_API_TOKEN", "oz-token");
    m.insert("YM_API_TOKEN", "ym-token");
    m.insert("YA_BUSINESS_ID", "700");
    m.insert("YA_FBS_CAMPAIGN_ID", "800");
    m.insert("YA_EXPRESS_CAMPAIGN_ID", "900");
    m
}

#[test]
fn build_app_config_succeeds_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.policy_path.is_none());
    assert_eq!(cfg.output_dir.to_string_lossy(), ".");
    assert!(cfg.moysklad_token.is_none());
    assert_eq!(cfg.http_timeout_secs, 30);
    assert_eq!(cfg.http_max_retries, 3);
    assert_eq!(cfg.http_retry_delay_secs, 10);
    assert_eq!(cfg.wb_day_delay_secs, 20);
    assert_eq!(cfg.wb_cards_batch, 100);
}

#[test]
fn build_app_config_reads_credentials_and_ids() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.require_moysklad_token().unwrap(), "ms-token");
    assert_eq!(cfg.require_wildberries_token().unwrap(), "wb-token");
    assert_eq!(
        cfg.require_ozon_credentials().unwrap(),
        ("123456", "oz-token")
    );
    assert_eq!(cfg.require_yandex_token().unwrap(), "ym-token");
    assert_eq!(cfg.yandex_business_id, Some(700));
    assert_eq!(cfg.yandex_campaign_id(false), Some(800));
    assert_eq!(cfg.yandex_campaign_id(true), Some(900));
}

#[test]
fn require_reports_the_missing_variable() {
    let mut map = full_env();
    map.remove("OZ_API_TOKEN");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let result = cfg.require_ozon_credentials();
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "OZ_API_TOKEN"),
        "expected MissingEnvVar(OZ_API_TOKEN), got: {result:?}"
    );
}

#[test]
fn blank_credential_counts_as_missing() {
    let mut map = full_env();
    map.insert("WB_API_TOKEN", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(matches!(
        cfg.require_wildberries_token(),
        Err(ConfigError::MissingEnvVar(ref v)) if v == "WB_API_TOKEN"
    ));
}

#[test]
fn build_app_config_fails_with_invalid_campaign_id() {
    let mut map = full_env();
    map.insert("YA_FBS_CAMPAIGN_ID", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "YA_FBS_CAMPAIGN_ID"),
        "expected InvalidEnvVar(YA_FBS_CAMPAIGN_ID), got: {result:?}"
    );
}

#[test]
fn http_max_retries_override() {
    let mut map = full_env();
    map.insert("MPCALC_HTTP_MAX_RETRIES", "5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.http_max_retries, 5);
}

#[test]
fn http_retry_delay_invalid() {
    let mut map = full_env();
    map.insert("MPCALC_HTTP_RETRY_DELAY_SECS", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MPCALC_HTTP_RETRY_DELAY_SECS"),
        "expected InvalidEnvVar(MPCALC_HTTP_RETRY_DELAY_SECS), got: {result:?}"
    );
}

#[test]
fn wb_cards_batch_rejects_zero() {
    let mut map = full_env();
    map.insert("MPCALC_WB_CARDS_BATCH", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MPCALC_WB_CARDS_BATCH"),
        "expected InvalidEnvVar(MPCALC_WB_CARDS_BATCH), got: {result:?}"
    );
}

#[test]
fn policy_and_output_paths_override() {
    let mut map = full_env();
    map.insert("MPCALC_POLICY_PATH", "./config/tariffs.yaml");
    map.insert("MPCALC_OUTPUT_DIR", "/tmp/reports");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.policy_path.as_deref().map(|p| p.to_string_lossy().into_owned()),
        Some("./config/tariffs.yaml".to_string())
    );
    assert_eq!(cfg.output_dir.to_string_lossy(), "/tmp/reports");
}

#[test]
fn debug_output_redacts_credentials() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("ms-token"), "token leaked: {rendered}");
    assert!(!rendered.contains("oz-token"), "token leaked: {rendered}");
    assert!(rendered.contains("[redacted]"));
}
