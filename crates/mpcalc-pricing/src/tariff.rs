//! Normalized tariff structures consumed by the calculators.
//!
//! Percent fields are fractions (`0.15` for 15%). Marketplace normalizers
//! build these from raw API payloads; the calculators never look at raw data.

use std::collections::HashMap;

use mpcalc_core::{FulfillmentModel, StepSchedule, VolumeBand};
use serde::{Deserialize, Serialize};

use crate::rounding::{percent_to_fraction, round_dp};

/// Volume-dependent logistics schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VolumeSchedule {
    /// Flat small-parcel fee, flat base fee, per-extra-liter steps up to the
    /// bulky threshold, then a flat bulky fee.
    Stepped(StepSchedule),
    /// Sub-liter bands scaled by the warehouse coefficient; above one liter a
    /// first-liter fee plus a per-extra-liter fee, scaled by `ktr`.
    SubLiter {
        bands: Vec<VolumeBand>,
        coefficient: f64,
        first_liter: f64,
        extra_liter: f64,
        ktr: f64,
    },
}

impl VolumeSchedule {
    /// Fee for a parcel of `volume_liters`. Band bounds are closed above, so a
    /// volume exactly on a bound takes the lower band's fee.
    #[must_use]
    pub fn fee(&self, volume_liters: f64) -> f64 {
        match self {
            VolumeSchedule::Stepped(s) => {
                if volume_liters <= s.small_max_liters {
                    s.small_fee
                } else if volume_liters <= s.base_max_liters {
                    s.base_fee
                } else if volume_liters <= s.bulky_threshold_liters {
                    s.base_fee + (volume_liters - s.base_max_liters).ceil() * s.per_extra_liter
                } else {
                    s.bulky_fee
                }
            }
            VolumeSchedule::SubLiter {
                bands,
                coefficient,
                first_liter,
                extra_liter,
                ktr,
            } => {
                let top = bands.last().map_or(1.0, |b| b.up_to_liters);
                if volume_liters > top {
                    let extra = (volume_liters - 1.0).max(0.0);
                    return round_dp((first_liter + extra_liter * extra) * ktr, 2);
                }
                if volume_liters <= 0.0 {
                    // unknown volume: charge the first liter
                    return *first_liter;
                }
                bands
                    .iter()
                    .find(|b| volume_liters <= b.up_to_liters)
                    .map_or(*first_liter, |b| round_dp(b.fee * coefficient, 2))
            }
        }
    }
}

/// One component of delivery cost and how it depends on price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeliveryFee {
    None,
    /// Flat amount per unit.
    Fixed(f64),
    /// Uncapped share of price.
    Percentage { percent: f64 },
    /// `min(price * percent, cap)`
    CappedPercentage { percent: f64, cap: f64 },
    /// `max(min(price * percent, max), min)`
    FloorCappedPercentage { percent: f64, min: f64, max: f64 },
    /// Flat fee looked up by parcel volume.
    BandedTable {
        schedule: VolumeSchedule,
        volume_liters: f64,
    },
}

impl DeliveryFee {
    /// Charged amount at `price`, with the percentage part rounded to 0.1
    /// before clamping.
    #[must_use]
    pub fn amount(&self, price: f64) -> f64 {
        match self {
            DeliveryFee::None => 0.0,
            DeliveryFee::Fixed(amount) => *amount,
            DeliveryFee::Percentage { percent } => round_dp(price * percent, 1),
            DeliveryFee::CappedPercentage { percent, cap } => round_dp(price * percent, 1).min(*cap),
            DeliveryFee::FloorCappedPercentage { percent, min, max } => {
                round_dp(price * percent, 1).min(*max).max(*min)
            }
            DeliveryFee::BandedTable {
                schedule,
                volume_liters,
            } => schedule.fee(*volume_liters),
        }
    }

    /// Amount at a trial price without intermediate rounding.
    #[must_use]
    pub fn exact_amount(&self, price: f64) -> f64 {
        match self {
            DeliveryFee::Percentage { percent } => price * percent,
            DeliveryFee::CappedPercentage { percent, cap } => (price * percent).min(*cap),
            DeliveryFee::FloorCappedPercentage { percent, min, max } => {
                (price * percent).min(*max).max(*min)
            }
            other => other.amount(price),
        }
    }

    /// Percent-of-price rate before any clamping.
    #[must_use]
    pub fn percent(&self) -> f64 {
        match self {
            DeliveryFee::Percentage { percent }
            | DeliveryFee::CappedPercentage { percent, .. }
            | DeliveryFee::FloorCappedPercentage { percent, .. } => *percent,
            _ => 0.0,
        }
    }

    /// `true` when the fee is a clamped share of price, which makes the
    /// margin equation nonlinear.
    #[must_use]
    pub fn is_clamped(&self) -> bool {
        matches!(
            self,
            DeliveryFee::CappedPercentage { .. } | DeliveryFee::FloorCappedPercentage { .. }
        )
    }

    /// Price-independent part of the fee.
    #[must_use]
    pub fn fixed_amount(&self) -> f64 {
        match self {
            DeliveryFee::Fixed(_) | DeliveryFee::BandedTable { .. } => self.amount(0.0),
            _ => 0.0,
        }
    }
}

/// Complete fee structure for one item under one fulfillment model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffSet {
    pub commission_percent: f64,
    pub payment_percent: f64,
    /// Flat agency commission charged with the payment fee.
    pub agency_fee: f64,
    /// Carriage to the marketplace or between its warehouses.
    pub logistics: DeliveryFee,
    /// Last-mile delivery to the customer.
    pub last_mile: DeliveryFee,
    pub cross_regional_fee: f64,
    pub sorting_fee: f64,
}

impl TariffSet {
    /// Tariff with only commission and payment fees.
    #[must_use]
    pub fn percent_only(commission_percent: f64, payment_percent: f64) -> Self {
        Self {
            commission_percent,
            payment_percent,
            agency_fee: 0.0,
            logistics: DeliveryFee::None,
            last_mile: DeliveryFee::None,
            cross_regional_fee: 0.0,
            sorting_fee: 0.0,
        }
    }

    /// Fees that do not depend on price.
    #[must_use]
    pub fn fixed_costs(&self) -> f64 {
        self.agency_fee
            + self.cross_regional_fee
            + self.sorting_fee
            + self.logistics.fixed_amount()
            + self.last_mile.fixed_amount()
    }

    /// Sum of percent-of-price rates, clamped fees included at their
    /// nominal rate.
    #[must_use]
    pub fn price_rates(&self) -> f64 {
        self.commission_percent
            + self.payment_percent
            + self.logistics.percent()
            + self.last_mile.percent()
    }

    /// Fees whose amount is clamped, in evaluation order.
    pub fn clamped_fees(&self) -> impl Iterator<Item = &DeliveryFee> {
        [&self.logistics, &self.last_mile]
            .into_iter()
            .filter(|fee| fee.is_clamped())
    }
}

/// Category commission pair as published by the marketplace, in whole
/// percents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommissionRates {
    pub fbs_percent: f64,
    pub fbo_percent: f64,
}

/// Commission rates keyed by category name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommissionTable {
    rates: HashMap<String, CommissionRates>,
}

impl CommissionTable {
    #[must_use]
    pub fn new(rates: HashMap<String, CommissionRates>) -> Self {
        Self { rates }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    #[must_use]
    pub fn get(&self, category: &str) -> Option<&CommissionRates> {
        self.rates.get(category)
    }

    /// Commission fraction for `category` under `model`.
    ///
    /// `fbs_uplift_percent` is added to FBS rates. An unknown or empty
    /// category falls back to `default_percent` with a warning.
    #[must_use]
    pub fn commission_fraction(
        &self,
        code: &str,
        category: Option<&str>,
        model: FulfillmentModel,
        fbs_uplift_percent: f64,
        default_percent: f64,
    ) -> f64 {
        let found = category.and_then(|c| self.rates.get(c));
        let percent = match (found, model) {
            (Some(rates), FulfillmentModel::Fbs) => rates.fbs_percent + fbs_uplift_percent,
            (Some(rates), FulfillmentModel::Fbo) => rates.fbo_percent,
            (None, _) => {
                tracing::warn!(
                    code,
                    category = category.unwrap_or(""),
                    default_percent,
                    "no commission for category; using default rate"
                );
                default_percent
            }
        };
        percent_to_fraction(percent)
    }
}

/// Logistics tariff of one warehouse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WarehouseLogistics {
    pub first_liter: f64,
    pub extra_liter: f64,
    /// Warehouse multiplier as a fraction (`1.6` for 160%).
    pub coefficient: f64,
}

impl WarehouseLogistics {
    /// Volume schedule combining this warehouse's rates with the sub-liter
    /// bands and `ktr`.
    #[must_use]
    pub fn schedule(&self, bands: &[VolumeBand], ktr: f64) -> VolumeSchedule {
        VolumeSchedule::SubLiter {
            bands: bands.to_vec(),
            coefficient: self.coefficient,
            first_liter: self.first_liter,
            extra_liter: self.extra_liter,
            ktr,
        }
    }
}

/// Per-warehouse logistics tariffs with a designated fallback warehouse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WarehouseTable {
    rows: HashMap<String, WarehouseLogistics>,
    fallback: String,
}

impl WarehouseTable {
    #[must_use]
    pub fn new(rows: HashMap<String, WarehouseLogistics>, fallback: impl Into<String>) -> Self {
        Self {
            rows,
            fallback: fallback.into(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Tariff of `warehouse`, else of the fallback warehouse, else zeros.
    #[must_use]
    pub fn resolve(&self, warehouse: &str) -> WarehouseLogistics {
        if let Some(row) = self.rows.get(warehouse) {
            return *row;
        }
        if let Some(row) = self.rows.get(&self.fallback) {
            tracing::debug!(warehouse, fallback = %self.fallback, "warehouse tariff missing; using fallback");
            return *row;
        }
        tracing::warn!(
            warehouse,
            fallback = %self.fallback,
            "no logistics tariff for warehouse or fallback; logistics treated as zero"
        );
        WarehouseLogistics::default()
    }
}

#[cfg(test)]
#[path = "tariff_test.rs"]
mod tests;
