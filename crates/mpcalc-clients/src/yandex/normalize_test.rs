use super::*;
use crate::yandex::types::{BasicPrice, Offer, OrderItem, TariffParameter, WeightDimensions};

fn tariff(kind: &str, amount: f64, params: &[(&str, &str)]) -> Tariff {
    Tariff {
        kind: kind.to_owned(),
        amount,
        parameters: params
            .iter()
            .map(|(name, value)| TariffParameter {
                name: (*name).to_owned(),
                value: (*value).to_owned(),
            })
            .collect(),
    }
}

fn offer(id: &str, category: u64, dims: bool) -> OfferMappingEntry {
    OfferMappingEntry {
        offer: Offer {
            offer_id: id.to_owned(),
            basic_price: Some(BasicPrice { value: 1000.0 }),
            weight_dimensions: dims.then_some(WeightDimensions {
                length: 30.0,
                width: 20.0,
                height: 10.0,
                weight: 1.2,
            }),
        },
        mapping: Some(Mapping {
            market_category_id: category,
            market_category_name: "Шланги".to_owned(),
        }),
    }
}

fn base_tariffs() -> Vec<Tariff> {
    vec![
        tariff("FEE", 180.0, &[("value", "18")]),
        tariff("PAYMENT_TRANSFER", 13.0, &[("value", "1.3")]),
        tariff("AGENCY_COMMISSION", 10.0, &[]),
        tariff("CROSSREGIONAL_DELIVERY", 15.0, &[]),
        tariff(
            "SORTING",
            25.0,
            &[("transitWarehouseType", "CENTRAL_SORTING_CENTER")],
        ),
        tariff("SORTING", 45.0, &[("transitWarehouseType", "MINI_SORTING_CENTER")]),
        tariff("MIDDLE_MILE", 99.0, &[]),
    ]
}

#[test]
fn category_tree_flattens_every_level() {
    let tree = Category {
        id: 1,
        name: "root".to_owned(),
        children: vec![
            Category {
                id: 2,
                name: String::new(),
                children: vec![Category {
                    id: 4,
                    name: String::new(),
                    children: vec![],
                }],
            },
            Category {
                id: 3,
                name: String::new(),
                children: vec![],
            },
        ],
    };
    let ids = flatten_category_ids(&tree);
    assert_eq!(ids, [1, 2, 3, 4].into_iter().collect());
}

#[test]
fn stale_categories_are_remapped_to_template() {
    let policy = YandexPolicy::default();
    let live: HashSet<u64> = [7].into_iter().collect();
    let mut offers = vec![offer("A", 7, true), offer("B", 99, true)];
    let remapped = remap_stale_categories(&mut offers, &live, &policy);
    assert_eq!(remapped, 1);
    assert_eq!(offers[0].mapping.as_ref().unwrap().market_category_id, 7);
    assert_eq!(
        offers[1].mapping.as_ref().unwrap().market_category_id,
        policy.template_category_id
    );
}

#[test]
fn offers_without_dimensions_are_not_priced() {
    let priced = priced_offers(&[offer("A", 7, true), offer("B", 7, false)]);
    assert_eq!(priced.len(), 1);
    assert_eq!(priced[0].offer_id, "A");
    assert_eq!(priced[0].request.category_id, 7);
    assert_eq!(priced[0].request.quantity, 1);
}

#[test]
fn tariff_set_collects_flat_and_percent_fees() {
    let set = tariff_set(&base_tariffs(), "central_sorting_center");
    assert!((set.commission_percent - 0.18).abs() < 1e-9);
    assert!((set.payment_percent - 0.013).abs() < 1e-9);
    assert!((set.agency_fee - 10.0).abs() < 1e-9);
    assert!((set.cross_regional_fee - 15.0).abs() < 1e-9);
    assert!((set.sorting_fee - 25.0).abs() < 1e-9);
    assert_eq!(set.last_mile, DeliveryFee::None);
    assert_eq!(set.logistics, DeliveryFee::None);
}

#[test]
fn delivery_with_max_value_is_capped() {
    let mut tariffs = base_tariffs();
    tariffs.push(tariff(
        "DELIVERY_TO_CUSTOMER",
        55.0,
        &[("value", "5.5"), ("maxValue", "500")],
    ));
    let set = tariff_set(&tariffs, "central_sorting_center");
    assert_eq!(
        set.last_mile,
        DeliveryFee::CappedPercentage {
            percent: 0.055,
            cap: 500.0
        }
    );
}

#[test]
fn express_delivery_is_floor_capped() {
    let mut tariffs = base_tariffs();
    tariffs.push(tariff(
        "EXPRESS_DELIVERY",
        80.0,
        &[("value", "8"), ("minValue", "150"), ("maxValue", "1000")],
    ));
    let set = tariff_set(&tariffs, "central_sorting_center");
    assert_eq!(
        set.last_mile,
        DeliveryFee::FloorCappedPercentage {
            percent: 0.08,
            min: 150.0,
            max: 1000.0
        }
    );
}

#[test]
fn listings_pair_answers_by_position() {
    let priced = priced_offers(&[offer("A", 7, true), offer("B", 7, true)]);
    let answers = vec![base_tariffs()];
    let listings = listings(&priced, &answers, "central_sorting_center");
    assert_eq!(listings.len(), 1);
    assert!((listings["A"].price - 1000.0).abs() < 1e-9);
}

#[test]
fn order_lines_add_subsidy_and_drop_cancelled() {
    let orders = vec![
        Order {
            id: 555,
            creation_date: "12-12-2024 10:00:00".to_owned(),
            status: "DELIVERED".to_owned(),
            items: vec![OrderItem {
                offer_id: "A".to_owned(),
                price: 900.0,
                subsidy: 50.0,
                count: 2.0,
            }],
        },
        Order {
            id: 556,
            creation_date: "12-12-2024 11:00:00".to_owned(),
            status: "CANCELLED".to_owned(),
            items: vec![OrderItem {
                offer_id: "A".to_owned(),
                price: 900.0,
                subsidy: 0.0,
                count: 1.0,
            }],
        },
    ];
    let lines = order_lines(&orders);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].order_number, "555");
    assert!((lines[0].price - 950.0).abs() < 1e-9);
    assert!((lines[0].quantity - 2.0).abs() < 1e-9);
}

#[test]
fn order_date_is_day_first() {
    let date = NaiveDate::from_ymd_opt(2024, 12, 3).unwrap();
    assert_eq!(order_date(date), "03-12-2024");
}
