//! Tariff policy: the named constants every calculator is built from.
//!
//! The built-in [`TariffPolicy::default`] mirrors the marketplace tariffs in
//! force when the calculators were last audited. A YAML file can override any
//! subset of fields; missing fields keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// How a calculator inverts the margin equation to find a recommended price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverStrategy {
    /// Closed-form division, with a second pass when a capped fee is present.
    Algebraic,
    /// Step-halving search on the profitability curve.
    Search,
}

/// One band of a volume tariff: volumes up to and including `up_to_liters`
/// are charged `fee`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeBand {
    pub up_to_liters: f64,
    pub fee: f64,
}

/// Stepped volume schedule: small parcels, a base liter, a per-liter rate up
/// to the bulky threshold, and a flat bulky fee beyond it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepSchedule {
    pub small_max_liters: f64,
    pub small_fee: f64,
    pub base_max_liters: f64,
    pub base_fee: f64,
    pub per_extra_liter: f64,
    pub bulky_threshold_liters: f64,
    pub bulky_fee: f64,
}

impl Default for StepSchedule {
    fn default() -> Self {
        Self {
            small_max_liters: 0.4,
            small_fee: 43.0,
            base_max_liters: 1.0,
            base_fee: 76.0,
            per_extra_liter: 12.0,
            bulky_threshold_liters: 190.0,
            bulky_fee: 2344.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WildberriesPolicy {
    pub acquiring_percent: f64,
    /// Added on top of the FBS category commission.
    pub fbs_commission_uplift_percent: f64,
    pub min_price: Option<f64>,
    pub fbs_warehouse: String,
    pub fbo_warehouse: String,
    pub fallback_warehouse: String,
    pub ktr: f64,
    pub sub_liter_bands: Vec<VolumeBand>,
    /// Seller warehouse id in public card stock data.
    pub fbs_stock_warehouse_id: u64,
    pub solver: SolverStrategy,
}

impl Default for WildberriesPolicy {
    fn default() -> Self {
        let band = |up_to_liters, fee| VolumeBand { up_to_liters, fee };
        Self {
            acquiring_percent: 1.6,
            fbs_commission_uplift_percent: 0.0,
            min_price: Some(60.0),
            fbs_warehouse: "Маркетплейс: Центральный федеральный округ".to_string(),
            fbo_warehouse: "Подольск".to_string(),
            fallback_warehouse: "Коледино".to_string(),
            ktr: 1.0,
            sub_liter_bands: vec![
                band(0.2, 23.0),
                band(0.4, 26.0),
                band(0.6, 29.0),
                band(0.8, 30.0),
                band(1.0, 32.0),
            ],
            fbs_stock_warehouse_id: 119_261,
            solver: SolverStrategy::Algebraic,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OzonPolicy {
    pub sorting_fee: f64,
    pub acquiring_percent: f64,
    pub last_mile_percent: f64,
    pub last_mile_cap: f64,
    /// Used when the API reports no direct-flow logistics amount.
    pub legacy_schedule: StepSchedule,
    pub min_price: Option<f64>,
    pub solver: SolverStrategy,
}

impl Default for OzonPolicy {
    fn default() -> Self {
        Self {
            sorting_fee: 20.0,
            acquiring_percent: 1.85,
            last_mile_percent: 5.5,
            last_mile_cap: 500.0,
            legacy_schedule: StepSchedule::default(),
            min_price: None,
            solver: SolverStrategy::Algebraic,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YandexPolicy {
    /// Transit warehouse type whose `SORTING` tariff applies to our shipments.
    pub sorting_warehouse_type: String,
    /// Category substituted for offers whose category left the live tree.
    pub template_category_id: u64,
    pub template_category_name: String,
    pub tariff_chunk_size: usize,
    pub min_price: Option<f64>,
    pub solver: SolverStrategy,
}

impl Default for YandexPolicy {
    fn default() -> Self {
        Self {
            sorting_warehouse_type: "central_sorting_center".to_string(),
            template_category_id: 13_793_401,
            template_category_name: "Шланги и комплекты для полива".to_string(),
            tariff_chunk_size: 200,
            min_price: None,
            solver: SolverStrategy::Algebraic,
        }
    }
}

/// Tariff constants for one report run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TariffPolicy {
    /// Commission applied when a category has no tariff entry.
    pub default_commission_percent: f64,
    pub plan_margin_percent: f64,
    pub wildberries: WildberriesPolicy,
    pub ozon: OzonPolicy,
    pub yandex: YandexPolicy,
}

impl Default for TariffPolicy {
    fn default() -> Self {
        Self {
            default_commission_percent: 30.0,
            plan_margin_percent: 28.0,
            wildberries: WildberriesPolicy::default(),
            ozon: OzonPolicy::default(),
            yandex: YandexPolicy::default(),
        }
    }
}

/// Load and validate a tariff policy from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_policy(path: &Path) -> Result<TariffPolicy, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::PolicyFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let policy: TariffPolicy = serde_yaml::from_str(&content)?;
    policy.validate()?;

    Ok(policy)
}

impl TariffPolicy {
    /// Checks that percentages are fractions of a whole, fees are not
    /// negative, and volume bands ascend.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] describing the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_percent("default_commission_percent", self.default_commission_percent)?;
        check_percent("plan_margin_percent", self.plan_margin_percent)?;

        let wb = &self.wildberries;
        check_percent("wildberries.acquiring_percent", wb.acquiring_percent)?;
        check_percent(
            "wildberries.fbs_commission_uplift_percent",
            wb.fbs_commission_uplift_percent,
        )?;
        check_fee("wildberries.ktr", wb.ktr)?;
        if let Some(min_price) = wb.min_price {
            check_fee("wildberries.min_price", min_price)?;
        }
        check_bands("wildberries.sub_liter_bands", &wb.sub_liter_bands)?;

        let oz = &self.ozon;
        check_fee("ozon.sorting_fee", oz.sorting_fee)?;
        check_percent("ozon.acquiring_percent", oz.acquiring_percent)?;
        check_percent("ozon.last_mile_percent", oz.last_mile_percent)?;
        check_fee("ozon.last_mile_cap", oz.last_mile_cap)?;
        let s = &oz.legacy_schedule;
        if !(s.small_max_liters <= s.base_max_liters
            && s.base_max_liters <= s.bulky_threshold_liters)
        {
            return Err(ConfigError::Validation(
                "ozon.legacy_schedule thresholds must ascend".to_string(),
            ));
        }
        for (field, fee) in [
            ("small_fee", s.small_fee),
            ("base_fee", s.base_fee),
            ("per_extra_liter", s.per_extra_liter),
            ("bulky_fee", s.bulky_fee),
        ] {
            check_fee(&format!("ozon.legacy_schedule.{field}"), fee)?;
        }

        if self.yandex.tariff_chunk_size == 0 {
            return Err(ConfigError::Validation(
                "yandex.tariff_chunk_size must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

fn check_percent(field: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..100.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "{field} must be within [0, 100), got {value}"
        )))
    }
}

fn check_fee(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "{field} must be a non-negative amount, got {value}"
        )))
    }
}

fn check_bands(field: &str, bands: &[VolumeBand]) -> Result<(), ConfigError> {
    let mut previous = 0.0;
    for band in bands {
        if band.up_to_liters <= previous {
            return Err(ConfigError::Validation(format!(
                "{field} must have strictly ascending positive bounds, got {} after {previous}",
                band.up_to_liters
            )));
        }
        check_fee(field, band.fee)?;
        previous = band.up_to_liters;
    }
    Ok(())
}

#[cfg(test)]
#[path = "policy_test.rs"]
mod tests;
