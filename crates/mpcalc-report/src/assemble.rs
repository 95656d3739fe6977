//! Result rows into report tables with a totals row.

use std::collections::BTreeMap;

use mpcalc_pricing::evaluate::profitability;
use mpcalc_pricing::rounding::round_dp;
use mpcalc_pricing::ProfitabilityResult;

use crate::layout::{wildberries_url, Field, ReportKind};
use crate::table::{Cell, Report, Sheet};

const TOTALS_LABEL: &str = "Итого";
const SUMMARY_TITLE: &str = "Сводный";
const FBO_STOCK_FILE: &str = "wb_fbo_stock.xlsx";
const FBO_STOCK_TITLE: &str = "Остаток FBO";

fn sum(rows: &[ProfitabilityResult], field: Field) -> f64 {
    rows.iter().filter_map(|r| field.value(r).number()).sum()
}

/// Sums of the summed columns; ratio columns recomputed from the summed
/// profit and price.
fn totals_row(columns: &[(&'static str, Field)], rows: &[ProfitabilityResult]) -> Vec<Cell> {
    columns
        .iter()
        .enumerate()
        .map(|(i, (_, field))| match field {
            f if f.is_summed() => match field.value(&rows[0]) {
                Cell::Count(_) => Cell::Count(round_dp(sum(rows, *f), 1)),
                _ => Cell::Money(round_dp(sum(rows, *f), 1)),
            },
            Field::Profitability => Cell::Percent(profitability(
                sum(rows, Field::Profit),
                sum(rows, Field::Price),
            )),
            Field::OrderProfitability => Cell::Percent(profitability(
                sum(rows, Field::OrderProfit),
                sum(rows, Field::OrderPrice),
            )),
            _ if i == 0 => Cell::text(TOTALS_LABEL),
            _ => Cell::Empty,
        })
        .collect()
}

/// Per-product roll-up of a Wildberries order report.
fn order_summary(rows: &[ProfitabilityResult]) -> Sheet {
    #[derive(Default)]
    struct Rollup {
        discount: f64,
        stock: f64,
        fbs: f64,
        fbo: f64,
        sold: f64,
    }

    let mut groups: BTreeMap<(String, String, String), Rollup> = BTreeMap::new();
    for row in rows {
        let split = row.stock_split.unwrap_or_default();
        let entry = groups
            .entry((row.name.clone(), row.code.clone(), row.article.clone()))
            .or_default();
        entry.discount = entry.discount.max(row.discount_percent.unwrap_or(0.0));
        entry.stock = entry.stock.max(row.stock);
        entry.fbs = entry.fbs.max(split.fbs);
        entry.fbo = entry.fbo.max(split.fbo);
        entry.sold += row.order.as_ref().map_or(0.0, |o| o.quantity);
    }

    Sheet {
        title: SUMMARY_TITLE.to_owned(),
        headers: vec![
            "Номенклатура",
            "NmId",
            "Артикул",
            "Дисконт, %",
            "Остаток",
            "FBS остаток в корзине",
            "FBO остаток в корзине",
            "Продажи",
        ],
        rows: groups
            .into_iter()
            .map(|((name, code, article), r)| {
                vec![
                    Cell::Text(name),
                    Cell::Text(code),
                    Cell::Text(article),
                    Cell::Percent(r.discount),
                    Cell::Count(r.stock),
                    Cell::Count(r.fbs),
                    Cell::Count(r.fbo),
                    Cell::Count(r.sold),
                ]
            })
            .collect(),
        totals: None,
    }
}

/// Table for `kind`, or `None` when there are no rows to report.
#[must_use]
pub fn assemble(kind: ReportKind, rows: &[ProfitabilityResult]) -> Option<Report> {
    if rows.is_empty() {
        tracing::info!(report = kind.file_name(), "no rows; report skipped");
        return None;
    }
    let columns = kind.columns();
    let main = Sheet {
        title: kind.sheet_title().to_owned(),
        headers: columns.iter().map(|(header, _)| *header).collect(),
        rows: rows
            .iter()
            .map(|row| columns.iter().map(|(_, f)| f.value(row)).collect())
            .collect(),
        totals: Some(totals_row(&columns, rows)),
    };

    let mut sheets = vec![main];
    if kind == ReportKind::WildberriesOrders {
        sheets.push(order_summary(rows));
    }
    tracing::info!(report = kind.file_name(), rows = rows.len(), "assembled report");
    Some(Report {
        file_name: kind.file_name().to_owned(),
        sheets,
    })
}

/// Seller goods held in Wildberries warehouses, valued at prime cost.
#[derive(Debug, Clone, PartialEq)]
pub struct FboStockRow {
    pub name: String,
    pub nm_id: String,
    pub prime_cost: f64,
    pub fbo_stock: f64,
}

impl FboStockRow {
    #[must_use]
    pub fn full_cost(&self) -> f64 {
        round_dp(self.prime_cost * self.fbo_stock, 1)
    }
}

/// FBO stock table; rows without FBO stock are left out. `None` when
/// nothing remains.
#[must_use]
pub fn fbo_stock_report(rows: &[FboStockRow]) -> Option<Report> {
    let held: Vec<&FboStockRow> = rows.iter().filter(|r| r.fbo_stock > 0.0).collect();
    if held.is_empty() {
        tracing::info!(report = FBO_STOCK_FILE, "no FBO stock; report skipped");
        return None;
    }

    let prime_total: f64 = held.iter().map(|r| r.prime_cost).sum();
    let stock_total: f64 = held.iter().map(|r| r.fbo_stock).sum();
    let cost_total: f64 = held.iter().map(|r| r.full_cost()).sum();

    let sheet = Sheet {
        title: FBO_STOCK_TITLE.to_owned(),
        headers: vec![
            "Наименование",
            "nm_id",
            "Ссылка",
            "Себестоимость",
            "FBO остаток",
            "Полная себестоимость",
        ],
        rows: held
            .iter()
            .map(|r| {
                vec![
                    Cell::text(&r.name),
                    Cell::text(&r.nm_id),
                    Cell::Text(wildberries_url(&r.nm_id)),
                    Cell::Money(r.prime_cost),
                    Cell::Count(r.fbo_stock),
                    Cell::Money(r.full_cost()),
                ]
            })
            .collect(),
        totals: Some(vec![
            Cell::text(TOTALS_LABEL),
            Cell::Empty,
            Cell::Empty,
            Cell::Money(round_dp(prime_total, 1)),
            Cell::Count(round_dp(stock_total, 1)),
            Cell::Money(round_dp(cost_total, 1)),
        ]),
    };
    tracing::info!(report = FBO_STOCK_FILE, rows = held.len(), "assembled report");
    Some(Report {
        file_name: FBO_STOCK_FILE.to_owned(),
        sheets: vec![sheet],
    })
}

#[cfg(test)]
#[path = "assemble_test.rs"]
mod tests;
