//! Profitability at a known price.

use serde::{Deserialize, Serialize};

use crate::rounding::round_dp;
use crate::tariff::TariffSet;

/// Every cost component charged on one unit, plus the resulting profit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub commission: f64,
    pub acquiring: f64,
    pub logistics: f64,
    pub last_mile: f64,
    pub cross_regional: f64,
    pub sorting: f64,
    /// Everything the marketplace keeps, rounded to 0.1.
    pub reward: f64,
    pub profit: f64,
    /// Profit as a percentage of price; `0` when price is `0`.
    pub profitability: f64,
}

impl CostBreakdown {
    /// Logistics and last-mile together, for reports with one delivery column.
    #[must_use]
    pub fn delivery(&self) -> f64 {
        self.logistics + self.last_mile
    }
}

/// Profitability ratio in percent, rounded to 0.1. A zero price yields `0`.
#[must_use]
pub fn profitability(profit: f64, price: f64) -> f64 {
    if price == 0.0 {
        return 0.0;
    }
    round_dp(profit / price * 100.0, 1)
}

/// Computes every cost component at `price` under `tariff`.
#[must_use]
pub fn evaluate(price: f64, prime_cost: f64, tariff: &TariffSet) -> CostBreakdown {
    let commission = round_dp(price * tariff.commission_percent, 1);
    let acquiring = round_dp(price * tariff.payment_percent + tariff.agency_fee, 1);
    let logistics = tariff.logistics.amount(price);
    let last_mile = tariff.last_mile.amount(price);
    let cross_regional = tariff.cross_regional_fee;
    let sorting = tariff.sorting_fee;

    let reward = round_dp(
        commission + acquiring + logistics + last_mile + cross_regional + sorting,
        1,
    );
    let profit = round_dp(price - prime_cost - reward, 1);

    CostBreakdown {
        commission,
        acquiring,
        logistics,
        last_mile,
        cross_regional,
        sorting,
        reward,
        profit,
        profitability: profitability(profit, price),
    }
}
