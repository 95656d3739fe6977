//! Recommended price from a target margin.
//!
//! Three solvers share the cost model of [`evaluate`](crate::evaluate()):
//!
//! * closed form: `(prime + fixed) / (1 - margin - rates)`, exact while every
//!   percentage fee is linear in price;
//! * two-pass: a closed-form pass with clamped fees at their nominal rate,
//!   then a second pass with each clamped fee priced at the first result and
//!   treated as a fixed cost. This does not iterate to a fixed point and can
//!   land slightly off target near a cap boundary;
//! * search: step-halving walk on the profitability curve until it is within
//!   0.1 percentage points of the target.

use mpcalc_core::SolverStrategy;
use serde::{Deserialize, Serialize};

use crate::error::PricingError;
use crate::evaluate::evaluate;
use crate::rounding::round_whole;
use crate::tariff::{DeliveryFee, TariffSet};

const SEARCH_INITIAL_STEP: f64 = 100.0;
const SEARCH_MIN_STEP: f64 = 1.0;
const SEARCH_TOLERANCE: f64 = 0.1;
const SEARCH_MAX_ITERATIONS: u32 = 20_000;
const SEARCH_FALLBACK_START: f64 = 100.0;

/// Which solver produced a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveMethod {
    ClosedForm,
    TwoPass,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub price: f64,
    pub method: SolveMethod,
    /// `false` when the search hit its iteration limit before reaching the
    /// tolerance band.
    pub converged: bool,
}

/// How a clamped fee is priced at the first-pass trial price.
pub type TrialFee = fn(&DeliveryFee, f64) -> f64;

/// `round((prime + fixed) / (1 - margin - rates))`.
///
/// # Errors
///
/// Returns [`PricingError::UnreachableMargin`] when `margin + rates >= 1`.
pub fn closed_form(prime_cost: f64, fixed: f64, rates: f64, margin: f64) -> Result<f64, PricingError> {
    let denominator = 1.0 - margin - rates;
    if denominator <= 0.0 {
        return Err(PricingError::UnreachableMargin { margin, rates });
    }
    Ok(round_whole((prime_cost + fixed) / denominator))
}

/// Closed-form solve with clamped fees counted at their nominal rate.
///
/// # Errors
///
/// See [`closed_form`].
pub fn solve_linear(prime_cost: f64, tariff: &TariffSet, margin: f64) -> Result<f64, PricingError> {
    closed_form(prime_cost, tariff.fixed_costs(), tariff.price_rates(), margin)
}

/// Two-pass solve for tariffs with clamped percentage fees.
///
/// # Errors
///
/// See [`closed_form`]; either pass may fail.
pub fn solve_two_pass(
    prime_cost: f64,
    tariff: &TariffSet,
    margin: f64,
    trial: TrialFee,
) -> Result<f64, PricingError> {
    let first = solve_linear(prime_cost, tariff, margin)?;

    let (clamped_amount, clamped_rate) = tariff
        .clamped_fees()
        .fold((0.0, 0.0), |(amount, rate), fee| {
            (amount + trial(fee, first), rate + fee.percent())
        });

    closed_form(
        prime_cost,
        tariff.fixed_costs() + clamped_amount,
        tariff.price_rates() - clamped_rate,
        margin,
    )
}

/// Step-halving search starting from `start_price`.
///
/// The price moves down by the current step while profitability is above
/// target and up while it is below; the step halves every move down to a
/// floor of one currency unit. Returns the rounded price and whether the
/// tolerance band was reached.
#[must_use]
pub fn solve_search(prime_cost: f64, tariff: &TariffSet, margin: f64, start_price: f64) -> (f64, bool) {
    let target = margin * 100.0;
    let mut price = if start_price > 0.0 {
        start_price
    } else {
        SEARCH_FALLBACK_START
    };
    let mut step = SEARCH_INITIAL_STEP;
    let mut best = (price, f64::INFINITY);

    for _ in 0..SEARCH_MAX_ITERATIONS {
        let profitability = evaluate(price, prime_cost, tariff).profitability;
        let gap = (profitability - target).abs();
        if gap < best.1 {
            best = (price, gap);
        }
        if gap < SEARCH_TOLERANCE {
            return (round_whole(price), true);
        }

        if profitability > target {
            price = (price - step).max(SEARCH_MIN_STEP);
        } else {
            price += step;
        }
        step = (step / 2.0).max(SEARCH_MIN_STEP);
    }

    tracing::warn!(
        target_margin = target,
        best_price = best.0,
        gap = best.1,
        "price search did not reach tolerance; using closest price"
    );
    (round_whole(best.0), false)
}

/// Inputs shared by every recommendation request of one calculator.
#[derive(Debug, Clone, Copy)]
pub struct SolverConfig {
    pub strategy: SolverStrategy,
    /// Target margin as a fraction.
    pub margin: f64,
    pub min_price: Option<f64>,
    pub trial: TrialFee,
}

impl SolverConfig {
    /// Recommends a price for one item.
    ///
    /// `Algebraic` picks the closed form for linear tariffs and the two-pass
    /// refinement when any fee is clamped. An unreachable margin yields a
    /// price of `0` with a warning. The result is lifted to `min_price`.
    #[must_use]
    pub fn recommend(
        &self,
        code: &str,
        prime_cost: f64,
        tariff: &TariffSet,
        current_price: f64,
    ) -> Recommendation {
        let (price, method, converged) = match self.strategy {
            SolverStrategy::Search => {
                let (price, converged) =
                    solve_search(prime_cost, tariff, self.margin, current_price);
                (Ok(price), SolveMethod::Search, converged)
            }
            SolverStrategy::Algebraic if tariff.clamped_fees().next().is_some() => (
                solve_two_pass(prime_cost, tariff, self.margin, self.trial),
                SolveMethod::TwoPass,
                true,
            ),
            SolverStrategy::Algebraic => (
                solve_linear(prime_cost, tariff, self.margin),
                SolveMethod::ClosedForm,
                true,
            ),
        };

        let price = match price {
            Ok(price) => price,
            Err(err) => {
                tracing::warn!(code, error = %err, "cannot recommend a price");
                return Recommendation {
                    price: 0.0,
                    method,
                    converged: false,
                };
            }
        };

        let price = match self.min_price {
            Some(min) if price < min => min,
            _ => price,
        };

        Recommendation {
            price,
            method,
            converged,
        }
    }
}

#[cfg(test)]
#[path = "solver_test.rs"]
mod tests;
