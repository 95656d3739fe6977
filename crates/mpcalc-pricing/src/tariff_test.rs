use std::collections::HashMap;

use mpcalc_core::{FulfillmentModel, StepSchedule, WildberriesPolicy};

use super::*;

fn stepped(volume_liters: f64) -> DeliveryFee {
    DeliveryFee::BandedTable {
        schedule: VolumeSchedule::Stepped(StepSchedule::default()),
        volume_liters,
    }
}

fn sub_liter(volume_liters: f64) -> DeliveryFee {
    let warehouse = WarehouseLogistics {
        first_liter: 46.0,
        extra_liter: 14.0,
        coefficient: 1.6,
    };
    DeliveryFee::BandedTable {
        schedule: warehouse.schedule(&WildberriesPolicy::default().sub_liter_bands, 1.0),
        volume_liters,
    }
}

#[test]
fn stepped_schedule_band_edges_take_lower_band() {
    assert_eq!(stepped(0.1).amount(0.0), 43.0);
    assert_eq!(stepped(0.4).amount(0.0), 43.0);
    assert_eq!(stepped(0.41).amount(0.0), 76.0);
    assert_eq!(stepped(1.0).amount(0.0), 76.0);
    assert_eq!(stepped(190.0).amount(0.0), 76.0 + 12.0 * 189.0);
    assert_eq!(stepped(190.5).amount(0.0), 2344.0);
}

#[test]
fn stepped_schedule_charges_started_extra_liters() {
    assert_eq!(stepped(1.2).amount(0.0), 88.0);
    assert_eq!(stepped(3.0).amount(0.0), 100.0);
}

#[test]
fn sub_liter_bands_scale_by_coefficient() {
    assert_eq!(sub_liter(0.2).amount(0.0), 36.8);
    assert_eq!(sub_liter(0.35).amount(0.0), 41.6);
    assert_eq!(sub_liter(1.0).amount(0.0), 51.2);
}

#[test]
fn sub_liter_schedule_above_one_liter_uses_first_plus_extra() {
    assert_eq!(sub_liter(3.0).amount(0.0), 74.0);
    assert_eq!(sub_liter(1.5).amount(0.0), 53.0);
}

#[test]
fn sub_liter_schedule_unknown_volume_charges_first_liter() {
    assert_eq!(sub_liter(0.0).amount(0.0), 46.0);
}

#[test]
fn capped_percentage_clamps_at_cap() {
    let fee = DeliveryFee::CappedPercentage {
        percent: 0.055,
        cap: 500.0,
    };
    assert_eq!(fee.amount(1000.0), 55.0);
    assert_eq!(fee.amount(20_000.0), 500.0);
    assert!(fee.is_clamped());
}

#[test]
fn floor_capped_percentage_clamps_both_ways() {
    let fee = DeliveryFee::FloorCappedPercentage {
        percent: 0.05,
        min: 60.0,
        max: 350.0,
    };
    assert_eq!(fee.amount(500.0), 60.0);
    assert_eq!(fee.amount(2000.0), 100.0);
    assert_eq!(fee.amount(10_000.0), 350.0);
}

#[test]
fn exact_amount_skips_intermediate_rounding() {
    let fee = DeliveryFee::CappedPercentage {
        percent: 0.055,
        cap: 500.0,
    };
    assert_eq!(fee.amount(1001.0), 55.1);
    assert!((fee.exact_amount(1001.0) - 55.055).abs() < 1e-9);
}

#[test]
fn fixed_costs_and_rates_split_fee_shapes() {
    let tariff = TariffSet {
        commission_percent: 0.15,
        payment_percent: 0.019,
        agency_fee: 10.0,
        logistics: stepped(1.0),
        last_mile: DeliveryFee::CappedPercentage {
            percent: 0.055,
            cap: 500.0,
        },
        cross_regional_fee: 5.0,
        sorting_fee: 20.0,
    };
    assert_eq!(tariff.fixed_costs(), 111.0);
    assert!((tariff.price_rates() - 0.224).abs() < 1e-9);
    assert_eq!(tariff.clamped_fees().count(), 1);
}

fn table() -> CommissionTable {
    let mut rates = HashMap::new();
    rates.insert(
        "Шланги".to_string(),
        CommissionRates {
            fbs_percent: 17.5,
            fbo_percent: 15.0,
        },
    );
    CommissionTable::new(rates)
}

#[test]
fn commission_picks_rate_by_fulfillment_model() {
    let table = table();
    let fbs = table.commission_fraction("1", Some("Шланги"), FulfillmentModel::Fbs, 0.0, 30.0);
    let fbo = table.commission_fraction("1", Some("Шланги"), FulfillmentModel::Fbo, 0.0, 30.0);
    assert_eq!(fbs, 0.175);
    assert_eq!(fbo, 0.15);
}

#[test]
fn commission_uplift_applies_to_fbs_only() {
    let table = table();
    let fbs = table.commission_fraction("1", Some("Шланги"), FulfillmentModel::Fbs, 2.0, 30.0);
    let fbo = table.commission_fraction("1", Some("Шланги"), FulfillmentModel::Fbo, 2.0, 30.0);
    assert_eq!(fbs, 0.195);
    assert_eq!(fbo, 0.15);
}

#[test]
fn unknown_category_falls_back_to_default_not_zero() {
    let table = table();
    let missing = table.commission_fraction("1", Some("Лейки"), FulfillmentModel::Fbs, 0.0, 30.0);
    let absent = table.commission_fraction("1", None, FulfillmentModel::Fbo, 0.0, 30.0);
    assert_eq!(missing, 0.3);
    assert_eq!(absent, 0.3);
}

fn warehouses() -> WarehouseTable {
    let mut rows = HashMap::new();
    rows.insert(
        "Коледино".to_string(),
        WarehouseLogistics {
            first_liter: 46.0,
            extra_liter: 14.0,
            coefficient: 1.6,
        },
    );
    rows.insert(
        "Подольск".to_string(),
        WarehouseLogistics {
            first_liter: 50.0,
            extra_liter: 15.0,
            coefficient: 1.75,
        },
    );
    WarehouseTable::new(rows, "Коледино")
}

#[test]
fn warehouse_lookup_prefers_exact_name() {
    assert_eq!(warehouses().resolve("Подольск").first_liter, 50.0);
}

#[test]
fn warehouse_lookup_falls_back_to_default_warehouse() {
    assert_eq!(warehouses().resolve("Казань").first_liter, 46.0);
}

#[test]
fn warehouse_lookup_without_fallback_yields_zeros() {
    let table = WarehouseTable::new(HashMap::new(), "Коледино");
    assert_eq!(table.resolve("Казань"), WarehouseLogistics::default());
}
