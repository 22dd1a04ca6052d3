use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardTemplate {
    Dental,
    Pt,
}

impl DashboardTemplate {
    pub fn as_str(&self) -> &'static str {
        match self {
            DashboardTemplate::Dental => "DENTAL",
            DashboardTemplate::Pt => "PT",
        }
    }
}

impl fmt::Display for DashboardTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DashboardTemplate {
    type Err = OnboardingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "DENTAL" => Ok(DashboardTemplate::Dental),
            "PT" => Ok(DashboardTemplate::Pt),
            _ => Err(OnboardingError::UnknownTemplate(value.to_string())),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum OnboardingError {
    #[error("Enter location ID")]
    MissingLocation,
    #[error("Select dashboard type")]
    MissingDashboard,
    #[error("Select data source")]
    MissingSource,
    #[error("Enter Sheet ID")]
    MissingSheetId,
    #[error("unknown dashboard template: {0}")]
    UnknownTemplate(String),
    #[error("{0}")]
    Rejected(String),
}

/// Registration of a clinic location with a dashboard template and a data source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnboardingRequest {
    pub location_id: String,
    pub dashboard: Option<DashboardTemplate>,
    pub source: String,
    pub sheet_id: Option<String>,
}

impl OnboardingRequest {
    pub fn validate(&self) -> Result<(), OnboardingError> {
        if self.location_id.trim().is_empty() {
            return Err(OnboardingError::MissingLocation);
        }
        let dashboard = self.dashboard.ok_or(OnboardingError::MissingDashboard)?;
        if self.source.trim().is_empty() {
            return Err(OnboardingError::MissingSource);
        }
        let sheet_missing = self
            .sheet_id
            .as_deref()
            .map(|id| id.trim().is_empty())
            .unwrap_or(true);
        if dashboard == DashboardTemplate::Pt && self.uses_sheet() && sheet_missing {
            return Err(OnboardingError::MissingSheetId);
        }
        Ok(())
    }

    pub fn uses_sheet(&self) -> bool {
        matches!(
            self.source.trim().to_ascii_uppercase().as_str(),
            "SHEET" | "SHEET ID" | "GOOGLE_SHEET"
        )
    }

    /// Server-side data source name. PT sheet sources are registered as `GOOGLE_SHEET`.
    pub fn data_source(&self) -> String {
        let upper = self.source.trim().to_ascii_uppercase();
        if self.dashboard == Some(DashboardTemplate::Pt) && (upper == "SHEET" || upper == "SHEET ID") {
            return "GOOGLE_SHEET".to_string();
        }
        upper
    }

    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let template = self
            .dashboard
            .map(|template| template.to_string())
            .unwrap_or_default();
        let mut fields = vec![
            ("location_id", self.location_id.trim().to_string()),
            ("dashboard", template.clone()),
            ("source", self.source.clone()),
            ("template", template),
            ("data_source", self.data_source()),
        ];
        if let Some(sheet_id) = self.sheet_id.as_deref().map(str::trim) {
            if !sheet_id.is_empty() {
                fields.push(("sheet_id", sheet_id.to_string()));
            }
        }
        fields
    }
}

/// Generic `{status, message}` envelope returned by the reporting API.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApiStatus {
    pub status: String,
    pub message: Option<String>,
    pub template: Option<String>,
}

impl ApiStatus {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LocationDetails {
    pub status: String,
    pub is_onboarded: bool,
    pub template: Option<String>,
    pub data_source: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardRoute {
    NeedsOnboarding,
    Dental,
    Pt { data_source: Option<String> },
    Unavailable(String),
}

impl fmt::Display for DashboardRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardRoute::NeedsOnboarding => f.write_str("not onboarded"),
            DashboardRoute::Dental => f.write_str("DENTAL dashboard"),
            DashboardRoute::Pt { data_source: Some(source) } => {
                write!(f, "PT dashboard (source: {source})")
            }
            DashboardRoute::Pt { data_source: None } => f.write_str("PT dashboard"),
            DashboardRoute::Unavailable(message) => write!(f, "unavailable: {message}"),
        }
    }
}

/// Decides which dashboard applies to a location from its details response.
pub fn resolve_dashboard(details: &LocationDetails) -> DashboardRoute {
    match details.status.as_str() {
        "success" if details.is_onboarded => {
            let template = details.template.as_deref().unwrap_or("DENTAL");
            match template.parse::<DashboardTemplate>() {
                Ok(DashboardTemplate::Pt) => DashboardRoute::Pt {
                    data_source: details.data_source.clone().filter(|s| !s.is_empty()),
                },
                _ => DashboardRoute::Dental,
            }
        }
        "success" => DashboardRoute::NeedsOnboarding,
        "error" => DashboardRoute::Unavailable(
            details
                .message
                .clone()
                .unwrap_or_else(|| "Error loading dashboard".to_string()),
        ),
        _ => DashboardRoute::Unavailable("Unexpected response from server".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt_sheet_request() -> OnboardingRequest {
        OnboardingRequest {
            location_id: " LOC-1 ".to_string(),
            dashboard: Some(DashboardTemplate::Pt),
            source: "Sheet".to_string(),
            sheet_id: Some("abc123".to_string()),
        }
    }

    #[test]
    fn template_parses_case_insensitively() {
        assert_eq!("pt".parse::<DashboardTemplate>(), Ok(DashboardTemplate::Pt));
        assert_eq!("Dental".parse::<DashboardTemplate>(), Ok(DashboardTemplate::Dental));
        assert!("ortho".parse::<DashboardTemplate>().is_err());
    }

    #[test]
    fn validate_reports_first_missing_field() {
        let mut request = OnboardingRequest::default();
        assert_eq!(request.validate(), Err(OnboardingError::MissingLocation));

        request.location_id = "LOC-1".to_string();
        assert_eq!(request.validate(), Err(OnboardingError::MissingDashboard));

        request.dashboard = Some(DashboardTemplate::Dental);
        assert_eq!(request.validate(), Err(OnboardingError::MissingSource));

        request.source = "CSV".to_string();
        assert_eq!(request.validate(), Ok(()));
    }

    #[test]
    fn pt_sheet_source_requires_sheet_id() {
        let mut request = pt_sheet_request();
        request.sheet_id = Some("  ".to_string());
        assert_eq!(request.validate(), Err(OnboardingError::MissingSheetId));

        request.dashboard = Some(DashboardTemplate::Dental);
        assert_eq!(request.validate(), Ok(()));
    }

    #[test]
    fn pt_sheet_source_maps_to_google_sheet() {
        let fields = pt_sheet_request().form_fields();
        let get = |key: &str| {
            fields
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.clone())
        };

        assert_eq!(get("location_id").as_deref(), Some("LOC-1"));
        assert_eq!(get("dashboard").as_deref(), Some("PT"));
        assert_eq!(get("template").as_deref(), Some("PT"));
        assert_eq!(get("source").as_deref(), Some("Sheet"));
        assert_eq!(get("data_source").as_deref(), Some("GOOGLE_SHEET"));
        assert_eq!(get("sheet_id").as_deref(), Some("abc123"));
    }

    #[test]
    fn dental_source_is_only_uppercased() {
        let request = OnboardingRequest {
            location_id: "LOC-2".to_string(),
            dashboard: Some(DashboardTemplate::Dental),
            source: "sheet".to_string(),
            sheet_id: None,
        };
        assert_eq!(request.data_source(), "SHEET");
        assert!(request.form_fields().iter().all(|(name, _)| *name != "sheet_id"));
    }

    #[test]
    fn resolve_dashboard_routes_by_details() {
        let onboarded_pt = LocationDetails {
            status: "success".to_string(),
            is_onboarded: true,
            template: Some("PT".to_string()),
            data_source: Some("GOOGLE_SHEET".to_string()),
            message: None,
        };
        assert_eq!(
            resolve_dashboard(&onboarded_pt),
            DashboardRoute::Pt {
                data_source: Some("GOOGLE_SHEET".to_string())
            }
        );

        let onboarded_default = LocationDetails {
            status: "success".to_string(),
            is_onboarded: true,
            ..LocationDetails::default()
        };
        assert_eq!(resolve_dashboard(&onboarded_default), DashboardRoute::Dental);

        let fresh = LocationDetails {
            status: "success".to_string(),
            ..LocationDetails::default()
        };
        assert_eq!(resolve_dashboard(&fresh), DashboardRoute::NeedsOnboarding);

        let failed = LocationDetails {
            status: "error".to_string(),
            message: Some("location_id is required".to_string()),
            ..LocationDetails::default()
        };
        assert_eq!(
            resolve_dashboard(&failed),
            DashboardRoute::Unavailable("location_id is required".to_string())
        );

        assert_eq!(
            resolve_dashboard(&LocationDetails::default()),
            DashboardRoute::Unavailable("Unexpected response from server".to_string())
        );
    }
}
