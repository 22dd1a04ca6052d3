use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A record as delivered by a row source, before normalization.
pub type RawRow = Map<String, Value>;

/// One reporting period after normalization. Every numeric field is finite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodRow {
    pub period: Option<String>,
    pub active_patients: f64,
    pub new_patients: f64,
    pub new_patient_goal: f64,
    pub lost_patients: f64,
    pub production_general: f64,
    pub production_ortho: f64,
    pub collections_general: f64,
    pub collections_ortho: f64,
    pub scheduled_appointments: f64,
    pub cancelled_appointments: f64,
    pub no_show_appointments: f64,
    pub lost_production: f64,
    pub lost_cancelled: f64,
    pub lost_noshow: f64,
    pub treatment_proposed: f64,
    pub treatment_accepted: f64,
    pub ai_insights: Option<Vec<String>>,
    pub action_items: Option<Vec<String>>,
}

impl PeriodRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders the row back into the raw shape a row source would deliver.
    pub fn to_raw(&self) -> RawRow {
        let mut raw = Map::new();
        if let Some(period) = &self.period {
            raw.insert("month".to_string(), Value::String(period.clone()));
        }
        for (key, value) in self.numeric_fields() {
            raw.insert(key.to_string(), Value::from(value));
        }
        if let Some(insights) = &self.ai_insights {
            raw.insert("ai_insights".to_string(), Value::from(insights.clone()));
        }
        if let Some(items) = &self.action_items {
            raw.insert("action_items".to_string(), Value::from(items.clone()));
        }
        raw
    }

    /// Canonical numeric fields keyed by their wire names.
    pub fn numeric_fields(&self) -> [(&'static str, f64); 16] {
        [
            ("active_patients", self.active_patients),
            ("new_patients", self.new_patients),
            ("new_patient_goal", self.new_patient_goal),
            ("lost_patients", self.lost_patients),
            ("production_general", self.production_general),
            ("production_ortho", self.production_ortho),
            ("collections_general", self.collections_general),
            ("collections_ortho", self.collections_ortho),
            ("scheduled_appointments", self.scheduled_appointments),
            ("cancelled_appointments", self.cancelled_appointments),
            ("no_show_appointments", self.no_show_appointments),
            ("lost_production", self.lost_production),
            ("lost_cancelled", self.lost_cancelled),
            ("lost_noshow", self.lost_noshow),
            ("treatment_proposed", self.treatment_proposed),
            ("treatment_accepted", self.treatment_accepted),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_row_has_zero_fields() {
        let row = PeriodRow::new();
        assert_eq!(row.period, None);
        assert!(row.numeric_fields().iter().all(|(_, value)| *value == 0.0));
        assert_eq!(row.ai_insights, None);
    }

    #[test]
    fn to_raw_uses_wire_names() {
        let row = PeriodRow {
            period: Some("Jan".to_string()),
            lost_noshow: 1200.0,
            ..PeriodRow::default()
        };

        let raw = row.to_raw();
        assert_eq!(raw.get("month"), Some(&Value::String("Jan".to_string())));
        assert_eq!(raw.get("lost_noshow").and_then(Value::as_f64), Some(1200.0));
        assert!(raw.contains_key("treatment_accepted"));
        assert!(!raw.contains_key("ai_insights"));
    }
}
