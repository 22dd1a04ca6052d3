//! Derivation of KPI series and the latest-period summary from canonical rows.
//!
//! Every ratio goes through [`pct`], which returns `0` for a non-positive
//! denominator. Negative numerators are kept, so fill rate and net growth
//! can drop below zero when a source reports more missed than scheduled
//! appointments or more lost than new patients.

use crate::domain::kpi::{DerivedSeries, Kpis, LatestSummary, PeriodMetrics};
use crate::domain::period_row::PeriodRow;
use crate::services::narrative::{fallback_action_items, fallback_insights};
use crate::services::normalizer::finite_or_zero;

/// Monthly new-patient target used when a row carries no goal of its own.
pub const DEFAULT_NEW_PATIENT_GOAL: f64 = 200.0;

/// Percentage of `numerator` over `denominator`, rounded half up.
pub fn pct(numerator: f64, denominator: f64) -> i64 {
    let n = finite_or_zero(numerator);
    let d = finite_or_zero(denominator);
    if d <= 0.0 {
        return 0;
    }
    round_half_up(n / d * 100.0)
}

/// Rounds to the nearest integer with ties going toward positive infinity.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Percent change from the first to the last element of a series.
pub fn trend(series: &[f64]) -> f64 {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return 0.0;
    };
    if series.len() < 2 || *first == 0.0 || !first.is_finite() {
        return 0.0;
    }
    (last - first) / first * 100.0
}

pub fn period_labels(rows: &[PeriodRow]) -> Vec<String> {
    rows.iter()
        .map(|row| row.period.clone().unwrap_or_default())
        .collect()
}

pub fn new_patient_goal(row: &PeriodRow) -> f64 {
    if row.new_patient_goal > 0.0 {
        row.new_patient_goal
    } else {
        DEFAULT_NEW_PATIENT_GOAL
    }
}

/// Derives every metric for a single period.
pub fn period_metrics(row: &PeriodRow) -> PeriodMetrics {
    let production_total = row.production_general + row.production_ortho;
    let collections_total = row.collections_general + row.collections_ortho;
    let scheduled = row.scheduled_appointments;
    let cancelled = row.cancelled_appointments;
    let no_show = row.no_show_appointments;

    PeriodMetrics {
        active_patients: row.active_patients,
        new_patients: row.new_patients,
        new_patient_goal: new_patient_goal(row),
        lost_patients: row.lost_patients,
        net_patient_growth: row.new_patients - row.lost_patients,
        production_general: row.production_general,
        production_ortho: row.production_ortho,
        production_total,
        collections_general: row.collections_general,
        collections_ortho: row.collections_ortho,
        collections_total,
        collection_ratio_pct: pct(collections_total, production_total),
        cancellation_rate_pct: pct(cancelled, scheduled),
        no_show_rate_pct: pct(no_show, scheduled),
        fill_rate_pct: pct(scheduled - cancelled - no_show, scheduled),
        treatment_acceptance_pct: pct(row.treatment_accepted, row.treatment_proposed),
        lost_production: row.lost_production,
        lost_cancelled: row.lost_cancelled,
        lost_no_show: row.lost_noshow,
        scheduled_appointments: scheduled,
        cancelled_appointments: cancelled,
        no_show_appointments: no_show,
        missed_appointments: cancelled + no_show,
    }
}

impl DerivedSeries {
    fn with_capacity(len: usize) -> Self {
        Self {
            active_patients: Vec::with_capacity(len),
            new_patients: Vec::with_capacity(len),
            lost_patients: Vec::with_capacity(len),
            new_patient_goal: Vec::with_capacity(len),
            net_patient_growth: Vec::with_capacity(len),
            production_general: Vec::with_capacity(len),
            production_ortho: Vec::with_capacity(len),
            production_total: Vec::with_capacity(len),
            collections_general: Vec::with_capacity(len),
            collections_ortho: Vec::with_capacity(len),
            collections_total: Vec::with_capacity(len),
            collection_ratio_pct: Vec::with_capacity(len),
            cancellation_rate_pct: Vec::with_capacity(len),
            no_show_rate_pct: Vec::with_capacity(len),
            fill_rate_pct: Vec::with_capacity(len),
            treatment_acceptance_pct: Vec::with_capacity(len),
            lost_production: Vec::with_capacity(len),
            lost_cancelled: Vec::with_capacity(len),
            lost_no_show: Vec::with_capacity(len),
            cancelled_appointments: Vec::with_capacity(len),
            no_show_appointments: Vec::with_capacity(len),
            missed_appointments: Vec::with_capacity(len),
        }
    }

    fn push(&mut self, metrics: &PeriodMetrics) {
        self.active_patients.push(metrics.active_patients);
        self.new_patients.push(metrics.new_patients);
        self.lost_patients.push(metrics.lost_patients);
        self.new_patient_goal.push(metrics.new_patient_goal);
        self.net_patient_growth.push(metrics.net_patient_growth);
        self.production_general.push(metrics.production_general);
        self.production_ortho.push(metrics.production_ortho);
        self.production_total.push(metrics.production_total);
        self.collections_general.push(metrics.collections_general);
        self.collections_ortho.push(metrics.collections_ortho);
        self.collections_total.push(metrics.collections_total);
        self.collection_ratio_pct.push(metrics.collection_ratio_pct);
        self.cancellation_rate_pct.push(metrics.cancellation_rate_pct);
        self.no_show_rate_pct.push(metrics.no_show_rate_pct);
        self.fill_rate_pct.push(metrics.fill_rate_pct);
        self.treatment_acceptance_pct.push(metrics.treatment_acceptance_pct);
        self.lost_production.push(metrics.lost_production);
        self.lost_cancelled.push(metrics.lost_cancelled);
        self.lost_no_show.push(metrics.lost_no_show);
        self.cancelled_appointments.push(metrics.cancelled_appointments);
        self.no_show_appointments.push(metrics.no_show_appointments);
        self.missed_appointments.push(metrics.missed_appointments);
    }

    /// Lengths of every series, in declaration order.
    pub fn lengths(&self) -> [usize; 22] {
        [
            self.active_patients.len(),
            self.new_patients.len(),
            self.lost_patients.len(),
            self.new_patient_goal.len(),
            self.net_patient_growth.len(),
            self.production_general.len(),
            self.production_ortho.len(),
            self.production_total.len(),
            self.collections_general.len(),
            self.collections_ortho.len(),
            self.collections_total.len(),
            self.collection_ratio_pct.len(),
            self.cancellation_rate_pct.len(),
            self.no_show_rate_pct.len(),
            self.fill_rate_pct.len(),
            self.treatment_acceptance_pct.len(),
            self.lost_production.len(),
            self.lost_cancelled.len(),
            self.lost_no_show.len(),
            self.cancelled_appointments.len(),
            self.no_show_appointments.len(),
            self.missed_appointments.len(),
        ]
    }
}

fn non_empty(list: &Option<Vec<String>>) -> Option<Vec<String>> {
    list.as_ref().filter(|items| !items.is_empty()).cloned()
}

pub fn latest_summary(rows: &[PeriodRow]) -> LatestSummary {
    let fallback_row = PeriodRow::default();
    let row = rows.last().unwrap_or(&fallback_row);
    let metrics = period_metrics(row);

    let ai_insights = non_empty(&row.ai_insights).unwrap_or_else(|| fallback_insights(&metrics));
    let action_items = non_empty(&row.action_items).unwrap_or_else(fallback_action_items);

    LatestSummary {
        metrics,
        ai_insights,
        action_items,
    }
}

/// Computes the full KPI set for a batch of canonical rows, preserving input order.
pub fn compute_kpis(rows: &[PeriodRow]) -> Kpis {
    let mut series = DerivedSeries::with_capacity(rows.len());
    for row in rows {
        series.push(&period_metrics(row));
    }

    Kpis {
        series,
        latest: latest_summary(rows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{build_appointments_row, build_row};

    #[test]
    fn pct_guards_non_positive_denominators() {
        for numerator in [0.0, 1.0, -7.0, 1e9] {
            assert_eq!(pct(numerator, 0.0), 0);
            assert_eq!(pct(numerator, -1.0), 0);
            assert_eq!(pct(numerator, -250.0), 0);
        }
        assert_eq!(pct(5.0, f64::NAN), 0);
        assert_eq!(pct(5.0, f64::INFINITY), 0);
        assert_eq!(pct(f64::NAN, 10.0), 0);
    }

    #[test]
    fn pct_rounds_half_up() {
        assert_eq!(pct(95.0, 100.0), 95);
        assert_eq!(pct(1.0, 3.0), 33);
        assert_eq!(pct(2.0, 3.0), 67);
        assert_eq!(pct(1.0, 8.0), 13);
        assert_eq!(pct(3.0, 8.0), 38);
        assert_eq!(pct(-1.0, 8.0), -12);
        assert_eq!(pct(-3.0, 10.0), -30);
        assert_eq!(pct(315000.0, 340000.0), 93);
    }

    #[test]
    fn trend_is_two_point_delta() {
        assert_eq!(trend(&[]), 0.0);
        assert_eq!(trend(&[10.0]), 0.0);
        assert_eq!(trend(&[0.0, 5.0, 10.0]), 0.0);
        assert_eq!(trend(&[100.0, 10.0, 150.0]), 50.0);
        assert_eq!(trend(&[200.0, 150.0]), -25.0);
    }

    #[test]
    fn production_and_collection_totals() {
        let mut row = build_row("Jan");
        row.production_general = 250000.0;
        row.production_ortho = 90000.0;
        row.collections_general = 230000.0;
        row.collections_ortho = 85000.0;

        let kpis = compute_kpis(&[row]);
        assert_eq!(kpis.series.production_total, vec![340000.0]);
        assert_eq!(kpis.series.collections_total, vec![315000.0]);
        assert_eq!(kpis.series.collection_ratio_pct, vec![93]);
        assert_eq!(kpis.latest.metrics.collection_ratio_pct, 93);
    }

    #[test]
    fn goal_falls_back_when_zero() {
        let mut row = build_row("Feb");
        row.new_patients = 180.0;
        row.lost_patients = 100.0;
        row.new_patient_goal = 0.0;

        let kpis = compute_kpis(&[row]);
        assert_eq!(kpis.series.net_patient_growth, vec![80.0]);
        assert_eq!(kpis.series.new_patient_goal, vec![200.0]);
        assert_eq!(kpis.latest.metrics.new_patient_goal, 200.0);
    }

    #[test]
    fn supplied_goal_is_kept() {
        let mut row = build_row("Feb");
        row.new_patient_goal = 150.0;
        assert_eq!(compute_kpis(&[row]).series.new_patient_goal, vec![150.0]);
    }

    #[test]
    fn negative_net_growth_is_preserved() {
        let mut row = build_row("Mar");
        row.new_patients = 50.0;
        row.lost_patients = 80.0;

        let kpis = compute_kpis(&[row]);
        assert_eq!(kpis.series.net_patient_growth, vec![-30.0]);
        assert_eq!(kpis.latest.metrics.net_patient_growth, -30.0);
    }

    #[test]
    fn negative_fill_rate_is_preserved() {
        let kpis = compute_kpis(&[build_appointments_row("Apr", 10.0, 8.0, 5.0)]);
        assert_eq!(kpis.series.fill_rate_pct, vec![-30]);
        assert_eq!(kpis.series.cancellation_rate_pct, vec![80]);
        assert_eq!(kpis.series.no_show_rate_pct, vec![50]);
        assert_eq!(kpis.series.missed_appointments, vec![13.0]);
        assert_eq!(kpis.latest.metrics.fill_rate_pct, -30);
    }

    #[test]
    fn appointment_rates_without_schedule_are_zero() {
        let kpis = compute_kpis(&[build_appointments_row("May", 0.0, 4.0, 2.0)]);
        assert_eq!(kpis.series.cancellation_rate_pct, vec![0]);
        assert_eq!(kpis.series.no_show_rate_pct, vec![0]);
        assert_eq!(kpis.series.fill_rate_pct, vec![0]);
    }

    #[test]
    fn treatment_acceptance_ratio() {
        let mut row = build_row("Jun");
        row.treatment_proposed = 80000.0;
        row.treatment_accepted = 52000.0;
        assert_eq!(compute_kpis(&[row]).series.treatment_acceptance_pct, vec![65]);
    }

    #[test]
    fn every_series_matches_input_length() {
        for len in [0usize, 1, 2, 7, 12] {
            let rows: Vec<PeriodRow> = (0..len).map(|idx| build_row(&format!("P{idx}"))).collect();
            let kpis = compute_kpis(&rows);
            assert!(kpis.series.lengths().iter().all(|series_len| *series_len == len));
        }
    }

    #[test]
    fn series_keep_input_order() {
        let mut rows = vec![build_row("Mar"), build_row("Jan"), build_row("Feb")];
        rows[0].active_patients = 3.0;
        rows[1].active_patients = 1.0;
        rows[2].active_patients = 2.0;

        let kpis = compute_kpis(&rows);
        assert_eq!(kpis.series.active_patients, vec![3.0, 1.0, 2.0]);
        assert_eq!(period_labels(&rows), vec!["Mar", "Jan", "Feb"]);
        assert_eq!(kpis.latest.metrics.active_patients, 2.0);
    }

    #[test]
    fn pass_through_series_copy_rows() {
        let mut row = build_row("Jul");
        row.lost_production = 4500.0;
        row.lost_cancelled = 3000.0;
        row.lost_noshow = 1500.0;
        row.cancelled_appointments = 12.0;
        row.no_show_appointments = 6.0;

        let series = compute_kpis(&[row]).series;
        assert_eq!(series.lost_production, vec![4500.0]);
        assert_eq!(series.lost_cancelled, vec![3000.0]);
        assert_eq!(series.lost_no_show, vec![1500.0]);
        assert_eq!(series.cancelled_appointments, vec![12.0]);
        assert_eq!(series.no_show_appointments, vec![6.0]);
    }

    #[test]
    fn empty_input_yields_default_summary() {
        let kpis = compute_kpis(&[]);
        let latest = &kpis.latest;

        assert_eq!(latest.metrics.new_patient_goal, DEFAULT_NEW_PATIENT_GOAL);
        assert_eq!(latest.metrics.production_total, 0.0);
        assert_eq!(latest.metrics.net_patient_growth, 0.0);
        assert_eq!(latest.metrics.collection_ratio_pct, 0);
        assert_eq!(latest.metrics.fill_rate_pct, 0);
        assert!(!latest.ai_insights.is_empty());
        assert!(!latest.action_items.is_empty());
    }

    #[test]
    fn latest_uses_supplied_narrative() {
        let mut row = build_row("Aug");
        row.ai_insights = Some(vec!["Hygiene reappointment lagging.".to_string()]);
        row.action_items = Some(vec![]);

        let latest = compute_kpis(&[row]).latest;
        assert_eq!(latest.ai_insights, vec!["Hygiene reappointment lagging."]);
        assert_eq!(latest.action_items, fallback_action_items());
    }

    #[test]
    fn compute_is_deterministic() {
        let mut row = build_appointments_row("Sep", 420.0, 31.0, 17.0);
        row.production_general = 1234.5;
        let rows = vec![build_row("Aug"), row];
        assert_eq!(compute_kpis(&rows), compute_kpis(&rows));
    }
}
