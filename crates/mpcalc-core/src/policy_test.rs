use std::io::Write;

use super::*;

fn write_temp(name: &str, content: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("mpcalc-policy-{}-{name}", std::process::id()));
    let mut file = std::fs::File::create(&path).expect("create temp policy");
    file.write_all(content.as_bytes()).expect("write temp policy");
    path
}

#[test]
fn default_policy_is_valid() {
    assert!(TariffPolicy::default().validate().is_ok());
}

#[test]
fn default_policy_carries_documented_constants() {
    let policy = TariffPolicy::default();
    assert!((policy.default_commission_percent - 30.0).abs() < f64::EPSILON);
    assert_eq!(policy.wildberries.min_price, Some(60.0));
    assert!((policy.ozon.sorting_fee - 20.0).abs() < f64::EPSILON);
    assert!((policy.ozon.last_mile_cap - 500.0).abs() < f64::EPSILON);
    assert_eq!(policy.wildberries.sub_liter_bands.len(), 5);
    assert_eq!(policy.yandex.tariff_chunk_size, 200);
}

#[test]
fn partial_file_keeps_defaults_for_missing_fields() {
    let path = write_temp(
        "partial.yaml",
        "plan_margin_percent: 25.0\nozon:\n  sorting_fee: 30.0\n",
    );
    let policy = load_policy(&path).expect("policy should load");
    assert!((policy.plan_margin_percent - 25.0).abs() < f64::EPSILON);
    assert!((policy.ozon.sorting_fee - 30.0).abs() < f64::EPSILON);
    assert!((policy.ozon.acquiring_percent - 1.85).abs() < f64::EPSILON);
    assert_eq!(policy.wildberries, WildberriesPolicy::default());
    std::fs::remove_file(path).ok();
}

#[test]
fn solver_strategy_parses_snake_case() {
    let path = write_temp("solver.yaml", "ozon:\n  solver: search\n");
    let policy = load_policy(&path).expect("policy should load");
    assert_eq!(policy.ozon.solver, SolverStrategy::Search);
    std::fs::remove_file(path).ok();
}

#[test]
fn missing_file_is_io_error() {
    let result = load_policy(Path::new("/nonexistent/mpcalc/tariffs.yaml"));
    assert!(
        matches!(result, Err(ConfigError::PolicyFileIo { .. })),
        "expected PolicyFileIo, got: {result:?}"
    );
}

#[test]
fn malformed_yaml_is_parse_error() {
    let path = write_temp("broken.yaml", "ozon: [unclosed\n");
    let result = load_policy(&path);
    assert!(
        matches!(result, Err(ConfigError::PolicyFileParse(_))),
        "expected PolicyFileParse, got: {result:?}"
    );
    std::fs::remove_file(path).ok();
}

#[test]
fn validate_rejects_percent_out_of_range() {
    let mut policy = TariffPolicy::default();
    policy.ozon.last_mile_percent = 120.0;
    let err = policy.validate().unwrap_err();
    assert!(err.to_string().contains("ozon.last_mile_percent"));
}

#[test]
fn validate_rejects_descending_bands() {
    let mut policy = TariffPolicy::default();
    policy.wildberries.sub_liter_bands = vec![
        VolumeBand {
            up_to_liters: 0.4,
            fee: 26.0,
        },
        VolumeBand {
            up_to_liters: 0.2,
            fee: 23.0,
        },
    ];
    let err = policy.validate().unwrap_err();
    assert!(err.to_string().contains("strictly ascending"));
}

#[test]
fn validate_rejects_negative_fee() {
    let mut policy = TariffPolicy::default();
    policy.ozon.legacy_schedule.bulky_fee = -1.0;
    let err = policy.validate().unwrap_err();
    assert!(err.to_string().contains("bulky_fee"));
}

#[test]
fn validate_rejects_zero_chunk_size() {
    let mut policy = TariffPolicy::default();
    policy.yandex.tariff_chunk_size = 0;
    assert!(matches!(
        policy.validate(),
        Err(ConfigError::Validation(_))
    ));
}
