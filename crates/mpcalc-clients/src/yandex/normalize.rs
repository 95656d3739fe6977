//! Tariff calculator results into [`TariffSet`]s, plus category remapping
//! and order flattening.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use mpcalc_core::{FulfillmentModel, OrderLine, YandexPolicy};
use mpcalc_pricing::rounding::{parse_decimal, percent_to_fraction, round_dp};
use mpcalc_pricing::{DeliveryFee, TariffSet, YandexListing};

use super::types::{Category, Mapping, OfferMappingEntry, Order, Tariff, TariffOffer};

const CANCELLED: &str = "CANCELLED";

/// Every category id in the tree, the root included.
#[must_use]
pub fn flatten_category_ids(root: &Category) -> HashSet<u64> {
    let mut ids = HashSet::new();
    let mut stack = vec![root];
    while let Some(category) = stack.pop() {
        ids.insert(category.id);
        stack.extend(category.children.iter());
    }
    ids
}

/// Points offers whose category left the live tree at the template category.
/// Returns how many were remapped.
pub fn remap_stale_categories(
    offers: &mut [OfferMappingEntry],
    live: &HashSet<u64>,
    policy: &YandexPolicy,
) -> usize {
    let mut remapped = 0;
    for entry in offers.iter_mut() {
        let current = entry.mapping.as_ref().map_or(0, |m| m.market_category_id);
        if live.contains(&current) {
            continue;
        }
        tracing::warn!(
            offer_id = %entry.offer.offer_id,
            category_id = current,
            category = entry.mapping.as_ref().map_or("", |m| m.market_category_name.as_str()),
            template = policy.template_category_id,
            "stale category; using template category"
        );
        entry.mapping = Some(Mapping {
            market_category_id: policy.template_category_id,
            market_category_name: policy.template_category_name.clone(),
        });
        remapped += 1;
    }
    remapped
}

/// An offer as sent to the tariff calculator, with the id and price the
/// answer is matched back to.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedOffer {
    pub offer_id: String,
    pub price: f64,
    pub request: TariffOffer,
}

/// Offers that can be priced. Offers without weight and dimensions are
/// skipped since the calculator rejects them.
#[must_use]
pub fn priced_offers(offers: &[OfferMappingEntry]) -> Vec<PricedOffer> {
    offers
        .iter()
        .filter_map(|entry| {
            let Some(dims) = entry.offer.weight_dimensions else {
                tracing::warn!(offer_id = %entry.offer.offer_id, "offer has no dimensions; skipped");
                return None;
            };
            let price = entry.offer.basic_price.map_or(0.0, |p| p.value);
            Some(PricedOffer {
                offer_id: entry.offer.offer_id.clone(),
                price,
                request: TariffOffer {
                    category_id: entry.mapping.as_ref().map_or(0, |m| m.market_category_id),
                    price,
                    length: dims.length,
                    width: dims.width,
                    height: dims.height,
                    weight: dims.weight,
                    quantity: 1,
                },
            })
        })
        .collect()
}

fn parameter(tariff: &Tariff, name: &str) -> Option<f64> {
    tariff
        .parameters
        .iter()
        .find(|p| p.name == name)
        .and_then(|p| parse_decimal(&p.value))
}

fn parameter_text<'a>(tariff: &'a Tariff, name: &str) -> Option<&'a str> {
    tariff
        .parameters
        .iter()
        .find(|p| p.name == name)
        .map(|p| p.value.as_str())
}

/// Fees of one offer as a [`TariffSet`].
///
/// Delivery to the customer becomes a capped percentage when a `maxValue`
/// is reported; express delivery becomes a floor-and-cap percentage; with
/// neither bound it is a plain percentage. Sorting is only counted for the
/// configured transit warehouse type.
#[must_use]
pub fn tariff_set(tariffs: &[Tariff], sorting_warehouse_type: &str) -> TariffSet {
    let mut set = TariffSet::percent_only(0.0, 0.0);
    let mut delivery_percent = 0.0;
    let mut delivery_max = 0.0;
    let mut express_percent = 0.0;
    let mut express_min = 0.0;
    let mut express_max = 0.0;

    for tariff in tariffs {
        match tariff.kind.as_str() {
            "FEE" => {
                set.commission_percent = percent_to_fraction(parameter(tariff, "value").unwrap_or(0.0));
            }
            "PAYMENT_TRANSFER" => {
                set.payment_percent = percent_to_fraction(parameter(tariff, "value").unwrap_or(0.0));
            }
            "AGENCY_COMMISSION" => set.agency_fee = tariff.amount,
            "CROSSREGIONAL_DELIVERY" => set.cross_regional_fee = tariff.amount,
            "DELIVERY_TO_CUSTOMER" => {
                delivery_percent = percent_to_fraction(parameter(tariff, "value").unwrap_or(0.0));
                delivery_max = parameter(tariff, "maxValue").unwrap_or(0.0);
            }
            "EXPRESS_DELIVERY" => {
                express_percent = percent_to_fraction(parameter(tariff, "value").unwrap_or(0.0));
                express_min = parameter(tariff, "minValue").unwrap_or(0.0);
                express_max = parameter(tariff, "maxValue").unwrap_or(0.0);
            }
            "SORTING" => {
                let matches = parameter_text(tariff, "transitWarehouseType")
                    .is_some_and(|t| t.eq_ignore_ascii_case(sorting_warehouse_type));
                if matches {
                    set.sorting_fee = tariff.amount;
                }
            }
            other => tracing::debug!(tariff = other, amount = tariff.amount, "tariff ignored"),
        }
    }

    let percent = round_dp(delivery_percent + express_percent, 3);
    set.last_mile = if delivery_max > 0.0 {
        DeliveryFee::CappedPercentage {
            percent,
            cap: delivery_max,
        }
    } else if express_max > 0.0 {
        DeliveryFee::FloorCappedPercentage {
            percent,
            min: express_min,
            max: express_max,
        }
    } else if percent > 0.0 {
        DeliveryFee::Percentage { percent }
    } else {
        DeliveryFee::None
    };
    set
}

/// Pairs each requested offer with the calculator answer at the same index.
#[must_use]
pub fn listings(
    requested: &[PricedOffer],
    answers: &[Vec<Tariff>],
    sorting_warehouse_type: &str,
) -> BTreeMap<String, YandexListing> {
    if requested.len() != answers.len() {
        tracing::warn!(
            requested = requested.len(),
            answered = answers.len(),
            "tariff answer count differs from request; extra offers dropped"
        );
    }
    requested
        .iter()
        .zip(answers)
        .map(|(offer, tariffs)| {
            (
                offer.offer_id.clone(),
                YandexListing {
                    offer_id: offer.offer_id.clone(),
                    price: offer.price,
                    tariff: tariff_set(tariffs, sorting_warehouse_type),
                },
            )
        })
        .collect()
}

/// One order line per item; cancelled orders dropped. Subsidies paid by the
/// marketplace count toward the charged price.
#[must_use]
pub fn order_lines(orders: &[Order]) -> Vec<OrderLine> {
    orders
        .iter()
        .filter(|o| o.status != CANCELLED)
        .flat_map(|o| {
            o.items.iter().map(|item| OrderLine {
                order_number: o.id.to_string(),
                created_at: o.creation_date.clone(),
                code: item.offer_id.clone(),
                price: item.price + item.subsidy,
                quantity: item.count,
                fulfillment: FulfillmentModel::Fbs,
                warehouse: None,
                discount_percent: 0.0,
            })
        })
        .collect()
}

/// Dates as the orders endpoint expects them (`DD-MM-YYYY`).
#[must_use]
pub fn order_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
