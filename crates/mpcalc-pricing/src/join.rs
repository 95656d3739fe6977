//! Product join between inventory records and marketplace listings.

use std::collections::BTreeMap;
use std::fmt::Display;

/// One code present on both sides.
#[derive(Debug, Clone, PartialEq)]
pub struct Joined<M, I> {
    pub listing: M,
    pub inventory: I,
}

/// Intersection of both sides plus the codes each side is missing.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutcome<K, M, I> {
    pub merged: BTreeMap<K, Joined<M, I>>,
    /// Codes known to inventory but not listed on the marketplace.
    pub missing_from_marketplace: Vec<K>,
    /// Codes listed on the marketplace but not linked in inventory.
    pub missing_from_inventory: Vec<K>,
}

impl<K, M, I> JoinOutcome<K, M, I> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.merged.is_empty()
    }
}

/// Intersects `marketplace` and `inventory` by code.
///
/// Unmatched codes are returned and logged as a diagnostic, never treated as
/// an error.
pub fn join_by_code<K, M, I>(
    marketplace: BTreeMap<K, M>,
    mut inventory: BTreeMap<K, I>,
) -> JoinOutcome<K, M, I>
where
    K: Ord + Clone + Display,
{
    let mut merged = BTreeMap::new();
    let mut missing_from_inventory = Vec::new();

    for (code, listing) in marketplace {
        match inventory.remove(&code) {
            Some(item) => {
                merged.insert(
                    code,
                    Joined {
                        listing,
                        inventory: item,
                    },
                );
            }
            None => missing_from_inventory.push(code),
        }
    }
    let missing_from_marketplace: Vec<K> = inventory.into_keys().collect();

    if !missing_from_inventory.is_empty() {
        tracing::warn!(
            count = missing_from_inventory.len(),
            codes = %join_codes(&missing_from_inventory),
            "listed on marketplace but not linked in inventory"
        );
    }
    if !missing_from_marketplace.is_empty() {
        tracing::info!(
            count = missing_from_marketplace.len(),
            codes = %join_codes(&missing_from_marketplace),
            "in inventory but not listed on marketplace"
        );
    }
    tracing::debug!(matched = merged.len(), "joined inventory with marketplace");

    JoinOutcome {
        merged,
        missing_from_marketplace,
        missing_from_inventory,
    }
}

fn join_codes<K: Display>(codes: &[K]) -> String {
    codes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
