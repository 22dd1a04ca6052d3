use crate::domain::period_row::PeriodRow;
use crate::services::kpi_engine::pct;
use crate::services::narrative::{format_currency, format_number, format_signed};

/// Number of trailing periods shown in the trend table.
pub const TREND_PERIODS: usize = 6;

const MISSING: &str = "—";

fn ratio_cell(numerator: f64, denominator: f64) -> String {
    if denominator > 0.0 {
        format!("{}%", pct(numerator, denominator))
    } else {
        MISSING.to_string()
    }
}

/// Renders the trailing-periods trend table. Rows sharing the label of the
/// final period are flagged as current with a `*`.
pub fn format_trend_table(rows: &[PeriodRow]) -> String {
    let start = rows.len().saturating_sub(TREND_PERIODS);
    let recent = &rows[start..];
    let current = recent.last().and_then(|row| row.period.as_deref());

    let mut lines = Vec::with_capacity(recent.len() + 3);
    lines.push(format!("{TREND_PERIODS}-Month Trend"));
    lines.push("Month | New Pts | Net Growth | Production | Collections | Collect % | T. Accept".to_string());
    lines.push("------|---------|------------|------------|-------------|-----------|----------".to_string());

    for row in recent {
        let label = row.period.as_deref().unwrap_or(MISSING);
        let marker = if row.period.is_some() && row.period.as_deref() == current {
            " *"
        } else {
            ""
        };
        let production = row.production_general + row.production_ortho;
        let collections = row.collections_general + row.collections_ortho;

        lines.push(format!(
            "{label}{marker} | {new} | {net} | {production} | {collections} | {collect} | {accept}",
            new = format_number(row.new_patients),
            net = format_signed(row.new_patients - row.lost_patients),
            production = format_currency(production),
            collections = format_currency(collections),
            collect = ratio_cell(collections, production),
            accept = ratio_cell(row.treatment_accepted, row.treatment_proposed),
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{build_month_row, build_row};

    #[test]
    fn trend_table_shows_last_six_periods() {
        let months = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug"];
        let rows: Vec<PeriodRow> = months.iter().map(|m| build_row(m)).collect();

        let table = format_trend_table(&rows);
        assert!(!table.contains("Jan |"));
        assert!(!table.contains("Feb |"));
        assert!(table.contains("Mar |"));
        assert!(table.contains("Aug * |"));
        assert_eq!(table.lines().count(), 3 + 6);
    }

    #[test]
    fn trend_table_formats_row_values() {
        let mut row = build_month_row("Jan", 180.0, 100.0, (250000.0, 90000.0), (230000.0, 85000.0));
        row.treatment_proposed = 80000.0;
        row.treatment_accepted = 52000.0;

        let table = format_trend_table(&[row]);
        assert!(table.contains("Jan * | 180 | +80 | $340,000 | $315,000 | 93% | 65%"));
    }

    #[test]
    fn trend_table_uses_dash_for_missing_ratios() {
        let row = build_month_row("Feb", 50.0, 80.0, (0.0, 0.0), (1200.0, 0.0));
        let table = format_trend_table(&[row]);
        assert!(table.contains("Feb * | 50 | -30 | $0 | $1,200 | — | —"));
    }

    #[test]
    fn trend_table_for_no_rows_has_only_header() {
        assert_eq!(format_trend_table(&[]).lines().count(), 3);
    }
}
