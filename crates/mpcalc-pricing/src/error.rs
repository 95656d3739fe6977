use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// The requested margin plus percent-of-price fees leave nothing to cover
    /// fixed costs, so no finite price reaches the target.
    #[error("margin {margin} plus percentage fees {rates} reach or exceed 100% of price")]
    UnreachableMargin { margin: f64, rates: f64 },
}
