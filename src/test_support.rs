use serde_json::Value;

use crate::domain::period_row::{PeriodRow, RawRow};

pub fn build_row(period: &str) -> PeriodRow {
    PeriodRow {
        period: Some(period.to_string()),
        ..PeriodRow::default()
    }
}

pub fn build_appointments_row(period: &str, scheduled: f64, cancelled: f64, no_show: f64) -> PeriodRow {
    let mut row = build_row(period);
    row.scheduled_appointments = scheduled;
    row.cancelled_appointments = cancelled;
    row.no_show_appointments = no_show;
    row
}

pub fn build_month_row(
    period: &str,
    new_patients: f64,
    lost_patients: f64,
    production: (f64, f64),
    collections: (f64, f64),
) -> PeriodRow {
    let mut row = build_row(period);
    row.new_patients = new_patients;
    row.lost_patients = lost_patients;
    row.production_general = production.0;
    row.production_ortho = production.1;
    row.collections_general = collections.0;
    row.collections_ortho = collections.1;
    row
}

pub fn raw_row(value: Value) -> RawRow {
    value.as_object().cloned().unwrap_or_default()
}
