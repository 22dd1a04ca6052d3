//! Placeholder narrative for the insights and action-item panels.
//!
//! These templates stand in when the data source supplies no generated
//! narrative. They interpolate a few summary values and carry no analysis.

use chrono::{Datelike, Duration, NaiveDate};

use crate::domain::kpi::PeriodMetrics;

pub fn fallback_insights(metrics: &PeriodMetrics) -> Vec<String> {
    vec![
        "New patients trending down vs prior month — monitor recovery closely.".to_string(),
        format!(
            "Net growth positive ({}) but softening — review retention drivers.",
            format_signed(metrics.net_patient_growth)
        ),
        format!(
            "Collection ratio at {}% — AR appears healthy.",
            metrics.collection_ratio_pct
        ),
        "ORTHO holding near 30% of total production — steady.".to_string(),
        format!(
            "{} lost to cancellations/no-shows — material impact.",
            format_currency(metrics.lost_production)
        ),
    ]
}

pub fn fallback_action_items() -> Vec<String> {
    vec![
        "Launch reactivation campaign — target recent inactives.".to_string(),
        "Review no-show patterns — consider overbooking or card-on-file.".to_string(),
        "Case presentation refresher — add financing options.".to_string(),
    ]
}

/// Splits a narrative line into its bold lead and the remainder.
pub fn split_lead(text: &str) -> (&str, &str) {
    if let Some(idx) = text.find(" — ") {
        return (&text[..idx], &text[idx + " — ".len()..]);
    }
    if let Some(idx) = text.find(": ") {
        return (&text[..idx], &text[idx + 2..]);
    }
    if let Some(idx) = text.find(". ") {
        return (&text[..idx + 1], &text[idx + 2..]);
    }
    (text, "")
}

/// "Week of Oct 19, 2026" for the Monday of the week containing `date`.
pub fn week_of_label(date: NaiveDate) -> String {
    let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    format!("Week of {}", monday.format("%b %d, %Y"))
}

/// Renders a number without a trailing `.0` for whole values.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        let text = format!("{value:.3}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

pub fn format_signed(value: f64) -> String {
    if value >= 0.0 {
        format!("+{}", format_number(value))
    } else {
        format_number(value)
    }
}

/// Thousands-grouped number, e.g. `12,500` or `-1,234.5`.
pub fn format_grouped(value: f64) -> String {
    let text = format_number(value.abs());
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole.to_string(), Some(fraction.to_string())),
        None => (text, None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, digit) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(&fraction);
    }
    if value < 0.0 {
        grouped.insert(0, '-');
    }
    grouped
}

pub fn format_currency(value: f64) -> String {
    if value < 0.0 {
        format!("-${}", format_grouped(-value))
    } else {
        format!("${}", format_grouped(value))
    }
}
