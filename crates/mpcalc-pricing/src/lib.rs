//! Profitability and price-recommendation engine.
//!
//! Everything in this crate is a pure function of its inputs: normalized
//! tariffs, inventory records and marketplace listings go in, result rows come
//! out. Fetching and rendering live in sibling crates.

pub mod calc;
pub mod error;
pub mod evaluate;
pub mod join;
pub mod rounding;
pub mod solver;
pub mod tariff;

pub use calc::{
    ChargedOutcome, MarginTarget, OrderIdentity, OzonCalculator, OzonListing, ProfitabilityResult,
    StockSplit, WildberriesCalculator, WildberriesListing, YandexCalculator, YandexListing,
    MISSING_INVENTORY_NAME,
};
pub use error::PricingError;
pub use evaluate::{evaluate, CostBreakdown};
pub use join::{join_by_code, JoinOutcome, Joined};
pub use solver::{Recommendation, SolveMethod, SolverConfig};
pub use tariff::{
    CommissionRates, CommissionTable, DeliveryFee, TariffSet, VolumeSchedule, WarehouseLogistics,
    WarehouseTable,
};
