use serde_json::Value;

use crate::domain::period_row::{PeriodRow, RawRow};

const PERIOD_KEYS: [&str; 3] = ["month", "period", "week"];

/// Coerces a loosely typed value into a finite number. Anything that does
/// not read as a number becomes `0.0`.
pub fn to_number(value: Option<&Value>) -> f64 {
    let number = match value {
        Some(Value::Number(number)) => number.as_f64().unwrap_or(0.0),
        Some(Value::String(text)) => parse_numeric_text(text),
        Some(Value::Bool(flag)) => {
            if *flag {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    };
    finite_or_zero(number)
}

pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

fn parse_numeric_text(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    // Rust accepts "inf" and "nan" spellings; those are not numbers here.
    if trimmed.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(0.0)
}

fn period_label(raw: &RawRow) -> Option<String> {
    PERIOD_KEYS
        .iter()
        .find_map(|key| match raw.get(*key) {
            Some(Value::String(text)) => Some(text.clone()),
            Some(Value::Number(number)) => Some(number.to_string()),
            _ => None,
        })
}

fn string_list(raw: &RawRow, keys: &[&str]) -> Option<Vec<String>> {
    keys.iter().find_map(|key| {
        raw.get(*key).and_then(Value::as_array).map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
    })
}

/// Builds a canonical row from a raw record. Never fails: missing or
/// malformed numbers become zero.
pub fn normalize(raw: &RawRow) -> PeriodRow {
    let field = |key: &str| to_number(raw.get(key));

    let lost_cancelled = field("lost_cancelled");
    let lost_noshow = field("lost_noshow");
    let mut lost_production = field("lost_production");
    if lost_production == 0.0 {
        lost_production = lost_cancelled + lost_noshow;
    }

    PeriodRow {
        period: period_label(raw),
        active_patients: field("active_patients"),
        new_patients: field("new_patients"),
        new_patient_goal: field("new_patient_goal"),
        lost_patients: field("lost_patients"),
        production_general: field("production_general"),
        production_ortho: field("production_ortho"),
        collections_general: field("collections_general"),
        collections_ortho: field("collections_ortho"),
        scheduled_appointments: field("scheduled_appointments"),
        cancelled_appointments: field("cancelled_appointments"),
        no_show_appointments: field("no_show_appointments"),
        lost_production,
        lost_cancelled,
        lost_noshow,
        treatment_proposed: field("treatment_proposed"),
        treatment_accepted: field("treatment_accepted"),
        ai_insights: string_list(raw, &["ai_insights", "aiInsights"]),
        action_items: string_list(raw, &["action_items", "actionItems"]),
    }
}

pub fn normalize_all(raw_rows: &[RawRow]) -> Vec<PeriodRow> {
    raw_rows.iter().map(normalize).collect()
}
