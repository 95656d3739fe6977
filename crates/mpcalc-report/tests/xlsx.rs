//! Integration tests for workbook rendering: write a report to disk and read
//! it back.

use std::path::PathBuf;

use mpcalc_report::{write_report, Cell, Report, Sheet};

fn scratch_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("mpcalc-report-{name}-{}", std::process::id()))
}

fn sample_report() -> Report {
    Report {
        file_name: "ozon_fbs_prices.xlsx".to_string(),
        sheets: vec![
            Sheet {
                title: "Номенклатура Ozon".to_string(),
                headers: vec!["Номенклатура", "Остаток", "Цена продажи", "Рентабельность"],
                rows: vec![
                    vec![
                        Cell::text("Кружка"),
                        Cell::Count(3.0),
                        Cell::Money(1250.5),
                        Cell::Percent(18.2),
                    ],
                    vec![
                        Cell::text("Тарелка"),
                        Cell::Count(1.0),
                        Cell::Money(990.0),
                        Cell::Empty,
                    ],
                ],
                totals: Some(vec![
                    Cell::text("Итого"),
                    Cell::Count(4.0),
                    Cell::Money(2240.5),
                    Cell::Percent(12.0),
                ]),
            },
            Sheet {
                title: "Сводный".to_string(),
                headers: vec!["Номенклатура", "Продажи"],
                rows: vec![vec![Cell::text("Кружка"), Cell::Count(2.0)]],
                totals: None,
            },
        ],
    }
}

#[test]
fn write_report_round_trips_through_xlsx() {
    let dir = scratch_dir("roundtrip");
    let path = write_report(&sample_report(), &dir).expect("write workbook");
    assert_eq!(path, dir.join("ozon_fbs_prices.xlsx"));
    assert!(path.exists(), "expected workbook at {}", path.display());

    let book = umya_spreadsheet::reader::xlsx::read(&path).expect("read workbook");
    let main = book
        .get_sheet_by_name("Номенклатура Ozon")
        .expect("main sheet present");
    assert_eq!(main.get_value((1, 1)), "Номенклатура");
    assert_eq!(main.get_value((4, 1)), "Рентабельность");
    assert_eq!(main.get_value((1, 2)), "Кружка");
    assert_eq!(main.get_value((3, 2)), "1250.5");
    assert_eq!(main.get_value((4, 3)), "");
    assert_eq!(main.get_value((1, 4)), "Итого");
    assert_eq!(main.get_value((2, 4)), "4");

    let summary = book.get_sheet_by_name("Сводный").expect("summary sheet");
    assert_eq!(summary.get_value((2, 2)), "2");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn write_report_creates_missing_directories() {
    let dir = scratch_dir("nested").join("reports").join("2025-03-01");
    let path = write_report(&sample_report(), &dir).expect("write workbook");
    assert!(path.starts_with(&dir), "expected path under {}", dir.display());

    std::fs::remove_dir_all(scratch_dir("nested")).ok();
}
