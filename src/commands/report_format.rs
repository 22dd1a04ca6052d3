use chrono::NaiveDate;

use crate::domain::kpi::{KpiReport, LatestSummary};
use crate::services::narrative::{format_currency, format_number, split_lead, week_of_label};
use crate::services::pt_engine::{PtSummary, WEEKDAYS};

fn card(title: &str, value: String) -> String {
    format!("{title}: {value}")
}

fn card_with_note(title: &str, value: String, note: &str) -> String {
    format!("{title}: {value} ({note})")
}

/// Titled bullet list. Items with a lead render as `lead: detail`.
pub fn narrative_lines(title: &str, items: &[String]) -> Vec<String> {
    let mut lines = vec![title.to_string()];
    for item in items {
        let (lead, rest) = split_lead(item);
        if rest.is_empty() {
            lines.push(format!("- {lead}"));
        } else {
            lines.push(format!("- {lead}: {rest}"));
        }
    }
    lines
}

pub fn format_latest_cards(latest: &LatestSummary) -> Vec<String> {
    let m = &latest.metrics;
    vec![
        card("Active Patients", format_number(m.active_patients)),
        card("New Patients", format_number(m.new_patients)),
        card_with_note("New Patient Goal", format_number(m.new_patient_goal), "Monthly target"),
        card("Lost Patients", format_number(m.lost_patients)),
        card("Net Patient Growth", format_number(m.net_patient_growth)),
        card("Production — General", format_currency(m.production_general)),
        card("Production — ORTHO", format_currency(m.production_ortho)),
        card("Collections — General", format_currency(m.collections_general)),
        card("Collections — ORTHO", format_currency(m.collections_ortho)),
        card_with_note(
            "Collection Ratio",
            format!("{}%", m.collection_ratio_pct),
            "Collections ÷ Production",
        ),
        card_with_note("Lost Production", format_currency(m.lost_production), "Cancelled + No-show"),
        card_with_note("Cancelled", format_currency(m.lost_cancelled), "From cancellations"),
        card_with_note("No-Show", format_currency(m.lost_no_show), "From no-shows"),
        card_with_note(
            "Cancellation Rate",
            format!("{}%", m.cancellation_rate_pct),
            &format!(
                "{} of {} appts",
                format_number(m.cancelled_appointments),
                format_number(m.scheduled_appointments)
            ),
        ),
        card_with_note(
            "No-Show Rate",
            format!("{}%", m.no_show_rate_pct),
            &format!(
                "{} of {} appts",
                format_number(m.no_show_appointments),
                format_number(m.scheduled_appointments)
            ),
        ),
        card_with_note("Fill Rate", format!("{}%", m.fill_rate_pct), "Chairs utilized"),
        card("Treatment Acceptance", format!("{}%", m.treatment_acceptance_pct)),
    ]
}

/// Text rendering of the dental dashboard: summary cards and narrative panels.
pub fn format_kpi_summary(report: &KpiReport, today: NaiveDate) -> String {
    let latest_period = report
        .periods
        .last()
        .filter(|label| !label.is_empty())
        .map(String::as_str)
        .unwrap_or("n/a");

    let mut lines = Vec::new();
    lines.push("KPI Summary".to_string());
    lines.push(format!("Data source: {}", report.source));
    lines.push(format!("Periods: {}", report.periods.len()));
    lines.push(format!("Latest period: {latest_period}"));
    lines.push(String::new());
    lines.extend(format_latest_cards(&report.kpis.latest));
    lines.push(String::new());
    lines.extend(narrative_lines(
        &format!("AI Insights ({})", week_of_label(today)),
        &report.kpis.latest.ai_insights,
    ));
    lines.push(String::new());
    lines.extend(narrative_lines(
        "Action Items (This Week)",
        &report.kpis.latest.action_items,
    ));

    lines.join("\n")
}

fn format_signed_pct(value: f64) -> String {
    if value > 0.0 {
        format!("+{value:.1}%")
    } else {
        format!("{value:.1}%")
    }
}

/// Text rendering of the weekly PT dashboard.
pub fn format_pt_summary(summary: &PtSummary, today: NaiveDate) -> String {
    let week = week_of_label(summary.week_ending.unwrap_or(today));

    let mut lines = Vec::new();
    lines.push("PT Dashboard".to_string());
    lines.push(week);
    lines.push(String::new());
    for card in &summary.cards {
        lines.push(format!(
            "{}: {} (Avg: {}, {} vs last week)",
            card.title,
            format_number(card.latest),
            card.average,
            format_signed_pct(card.week_over_week_pct)
        ));
    }

    let tracker = &summary.visit_tracker;
    lines.push(String::new());
    lines.push("Weekly Visit Tracker".to_string());
    lines.push(format!(
        "Location | {} | Total | Cancel %",
        WEEKDAYS.join(" | ")
    ));
    for row in &tracker.locations {
        let days: Vec<String> = row
            .scheduled
            .iter()
            .zip(row.completed.iter())
            .map(|(scheduled, completed)| format!("{}/{}", format_number(*scheduled), format_number(*completed)))
            .collect();
        lines.push(format!(
            "{} | {} | {}/{} | {}% ({:?})",
            row.location,
            days.join(" | "),
            format_number(row.total_scheduled),
            format_number(row.total_completed),
            format_number(row.cancel_percentage),
            row.cancel_band
        ));
    }
    let day_totals: Vec<String> = tracker
        .scheduled_by_day
        .iter()
        .zip(tracker.completed_by_day.iter())
        .map(|(scheduled, completed)| format!("{}/{}", format_number(*scheduled), format_number(*completed)))
        .collect();
    lines.push(format!(
        "Total | {} | {}/{} | {:.1}%",
        day_totals.join(" | "),
        format_number(tracker.total_scheduled),
        format_number(tracker.total_completed),
        tracker.cancel_rate_pct
    ));

    lines.join("\n")
}
