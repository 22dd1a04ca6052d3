use serde::{Deserialize, Serialize};

/// Per-period metric series, each aligned with the input rows by index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedSeries {
    pub active_patients: Vec<f64>,
    pub new_patients: Vec<f64>,
    pub lost_patients: Vec<f64>,
    pub new_patient_goal: Vec<f64>,
    pub net_patient_growth: Vec<f64>,
    pub production_general: Vec<f64>,
    pub production_ortho: Vec<f64>,
    pub production_total: Vec<f64>,
    pub collections_general: Vec<f64>,
    pub collections_ortho: Vec<f64>,
    pub collections_total: Vec<f64>,
    pub collection_ratio_pct: Vec<i64>,
    pub cancellation_rate_pct: Vec<i64>,
    pub no_show_rate_pct: Vec<i64>,
    pub fill_rate_pct: Vec<i64>,
    pub treatment_acceptance_pct: Vec<i64>,
    pub lost_production: Vec<f64>,
    pub lost_cancelled: Vec<f64>,
    pub lost_no_show: Vec<f64>,
    pub cancelled_appointments: Vec<f64>,
    pub no_show_appointments: Vec<f64>,
    pub missed_appointments: Vec<f64>,
}

/// Metrics of a single period, as derived for the last row of a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodMetrics {
    pub active_patients: f64,
    pub new_patients: f64,
    pub new_patient_goal: f64,
    pub lost_patients: f64,
    pub net_patient_growth: f64,
    pub production_general: f64,
    pub production_ortho: f64,
    pub production_total: f64,
    pub collections_general: f64,
    pub collections_ortho: f64,
    pub collections_total: f64,
    pub collection_ratio_pct: i64,
    pub cancellation_rate_pct: i64,
    pub no_show_rate_pct: i64,
    pub fill_rate_pct: i64,
    pub treatment_acceptance_pct: i64,
    pub lost_production: f64,
    pub lost_cancelled: f64,
    pub lost_no_show: f64,
    pub scheduled_appointments: f64,
    pub cancelled_appointments: f64,
    pub no_show_appointments: f64,
    pub missed_appointments: f64,
}

/// Latest-period snapshot with its narrative panels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestSummary {
    #[serde(flatten)]
    pub metrics: PeriodMetrics,
    pub ai_insights: Vec<String>,
    pub action_items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub series: DerivedSeries,
    pub latest: LatestSummary,
}

/// Document written by the CLI for one computed batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiReport {
    pub source: String,
    pub periods: Vec<String>,
    pub kpis: Kpis,
}
