//! Weekly physical-therapy dashboard metrics.
//!
//! Same normalize-then-derive shape as the dental engine, over the PT
//! payload: weekly trend arrays and a per-location visit tracker.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::services::normalizer::to_number;

pub const WEEKDAYS: [&str; 5] = ["Mon", "Tue", "Wed", "Thu", "Fri"];

/// Upper bound (exclusive) of a healthy location cancel percentage.
pub const CANCEL_GOOD_BELOW: f64 = 8.0;
/// Upper bound (inclusive) of a cancel percentage that only warrants a warning.
pub const CANCEL_WARN_UP_TO: f64 = 10.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DayVisits {
    pub scheduled: f64,
    pub completed: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationVisits {
    pub location: String,
    pub days: [DayVisits; 5],
    pub cancel_percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PtDashboard {
    pub active_patients: Vec<f64>,
    pub weekly_visits: Vec<f64>,
    pub weekly_referrals: Vec<f64>,
    pub week_ending: Option<NaiveDate>,
    pub locations: Vec<LocationVisits>,
}

fn number_array(value: Option<&Value>) -> Vec<f64> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().map(|item| to_number(Some(item))).collect())
        .unwrap_or_default()
}

fn parse_week_ending(value: Option<&Value>) -> Option<NaiveDate> {
    let text = value?.as_str()?;
    let date_part = text.split_once('T').map(|(date, _)| date).unwrap_or(text);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

fn parse_location(value: &Value) -> Option<LocationVisits> {
    let object = value.as_object()?;
    let mut days = [DayVisits::default(); 5];
    for (slot, day) in days.iter_mut().zip(WEEKDAYS) {
        if let Some(entry) = object.get(day) {
            slot.scheduled = to_number(entry.get("scheduled"));
            slot.completed = to_number(entry.get("completed"));
        }
    }
    Some(LocationVisits {
        location: object
            .get("location")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        days,
        cancel_percentage: to_number(object.get("cancel_percentage")),
    })
}

impl PtDashboard {
    /// Reads the PT payload, with or without a `data` wrapper. Missing parts
    /// leave empty series.
    pub fn from_json(payload: &Value) -> Self {
        let data = payload
            .get("data")
            .filter(|inner| inner.is_object())
            .unwrap_or(payload);
        let metrics = data.get("weekly_metrics");
        let trends = metrics.and_then(|m| m.get("trends"));

        Self {
            active_patients: number_array(trends.and_then(|t| t.get("active_patients"))),
            weekly_visits: number_array(trends.and_then(|t| t.get("weekly_visits"))),
            weekly_referrals: number_array(trends.and_then(|t| t.get("weekly_referrals"))),
            week_ending: parse_week_ending(
                metrics
                    .and_then(|m| m.get("current"))
                    .and_then(|c| c.get("week_ending")),
            ),
            locations: data
                .get("weekly_visits")
                .and_then(|v| v.get("locations"))
                .and_then(Value::as_array)
                .map(|items| items.iter().filter_map(parse_location).collect())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CancelBand {
    Good,
    Warn,
    Bad,
}

pub fn cancel_band(cancel_percentage: f64) -> CancelBand {
    if cancel_percentage < CANCEL_GOOD_BELOW {
        CancelBand::Good
    } else if cancel_percentage <= CANCEL_WARN_UP_TO {
        CancelBand::Warn
    } else {
        CancelBand::Bad
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PtMetricCard {
    pub title: String,
    pub latest: f64,
    pub average: i64,
    pub week_over_week_pct: f64,
    pub sparkline: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationVisitRow {
    pub location: String,
    pub scheduled: [f64; 5],
    pub completed: [f64; 5],
    pub total_scheduled: f64,
    pub total_completed: f64,
    pub cancel_percentage: f64,
    pub cancel_band: CancelBand,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VisitTracker {
    pub locations: Vec<LocationVisitRow>,
    pub scheduled_by_day: [f64; 5],
    pub completed_by_day: [f64; 5],
    pub total_scheduled: f64,
    pub total_completed: f64,
    pub cancel_rate_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PtSummary {
    pub week_ending: Option<NaiveDate>,
    pub cards: Vec<PtMetricCard>,
    pub visit_tracker: VisitTracker,
}

/// Mean rounded half up; `0` for an empty series.
pub fn rounded_average(values: &[f64]) -> i64 {
    if values.is_empty() {
        return 0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    crate::services::kpi_engine::round_half_up(mean)
}

/// Percent change between the last two values; `0` when there is no previous
/// week or it was zero.
pub fn week_over_week(values: &[f64]) -> f64 {
    match values {
        [.., previous, last] if *previous != 0.0 => (last - previous) / previous * 100.0,
        _ => 0.0,
    }
}

fn metric_card(title: &str, values: &[f64]) -> PtMetricCard {
    PtMetricCard {
        title: title.to_string(),
        latest: values.last().copied().unwrap_or(0.0),
        average: rounded_average(values),
        week_over_week_pct: week_over_week(values),
        sparkline: values.to_vec(),
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn visit_tracker(locations: &[LocationVisits]) -> VisitTracker {
    let mut tracker = VisitTracker::default();
    for location in locations {
        let scheduled = location.days.map(|day| day.scheduled);
        let completed = location.days.map(|day| day.completed);
        for idx in 0..WEEKDAYS.len() {
            tracker.scheduled_by_day[idx] += scheduled[idx];
            tracker.completed_by_day[idx] += completed[idx];
        }
        tracker.locations.push(LocationVisitRow {
            location: location.location.clone(),
            scheduled,
            completed,
            total_scheduled: scheduled.iter().sum(),
            total_completed: completed.iter().sum(),
            cancel_percentage: location.cancel_percentage,
            cancel_band: cancel_band(location.cancel_percentage),
        });
    }

    tracker.total_scheduled = tracker.scheduled_by_day.iter().sum();
    tracker.total_completed = tracker.completed_by_day.iter().sum();
    tracker.cancel_rate_pct = if tracker.total_scheduled > 0.0 {
        round_one_decimal((1.0 - tracker.total_completed / tracker.total_scheduled) * 100.0)
    } else {
        0.0
    };
    tracker
}

pub fn compute_pt_summary(dashboard: &PtDashboard) -> PtSummary {
    PtSummary {
        week_ending: dashboard.week_ending,
        cards: vec![
            metric_card("Active Patients", &dashboard.active_patients),
            metric_card("Weekly Visits", &dashboard.weekly_visits),
            metric_card("Weekly Referrals", &dashboard.weekly_referrals),
        ],
        visit_tracker: visit_tracker(&dashboard.locations),
    }
}
