use std::env;
use std::fs;
use std::path::Path;

use log::{debug, info};
use reqwest::StatusCode;
use reqwest::blocking::multipart::Form;
use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::domain::location::{ApiStatus, LocationDetails, OnboardingRequest};
use crate::domain::period_row::RawRow;
use crate::services::data_source::{DataSourceError, RowSupplier};
use crate::services::row_source::raw_rows_from_json;

pub const API_BASE_ENV: &str = "CLINIC_KPIS_API_BASE";

#[derive(Error, Debug)]
pub enum ApiConfigError {
    #[error("failed to read api config: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse api config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("api config is missing base_url")]
    MissingBaseUrl,
}

/// How a location id is attached to the monthly KPI endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStyle {
    #[default]
    Query,
    Path,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReportApiConfig {
    pub base_url: String,
    pub monthly_path: String,
    pub id_style: IdStyle,
}

impl Default for ReportApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            monthly_path: "/reports/monthly-kpi/".to_string(),
            id_style: IdStyle::Query,
        }
    }
}

impl ReportApiConfig {
    pub fn from_yaml_str(contents: &str) -> Result<Self, ApiConfigError> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Loads the config file and applies the `CLINIC_KPIS_API_BASE` override.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ApiConfigError> {
        let contents = fs::read_to_string(path)?;
        let mut config = Self::from_yaml_str(&contents)?;
        if let Ok(base_url) = env::var(API_BASE_ENV) {
            if !base_url.trim().is_empty() {
                debug!("Using api base url from {API_BASE_ENV}");
                config.base_url = base_url;
            }
        }
        Ok(config)
    }
}

fn encode_uri_component(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => encoded.push(byte as char),
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

/// Builds the monthly KPI url for a location.
pub fn build_api_url(base: &str, path: &str, style: IdStyle, id: Option<&str>) -> String {
    match id.filter(|id| !id.is_empty()) {
        None => format!("{base}{path}"),
        Some(id) => match style {
            IdStyle::Path => format!("{base}{path}/id:{}", encode_uri_component(id)),
            IdStyle::Query => format!("{base}{path}?id={}", encode_uri_component(id)),
        },
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AiResponse {
    pub insights: Vec<String>,
    pub action_items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AiInsightsResponse {
    pub status: String,
    pub message: Option<String>,
    pub ai_response: Option<AiResponse>,
}

pub struct ReportApiClient {
    config: ReportApiConfig,
    client: Client,
}

impl ReportApiClient {
    pub fn new(config: ReportApiConfig) -> Result<Self, ApiConfigError> {
        if config.base_url.trim().is_empty() {
            return Err(ApiConfigError::MissingBaseUrl);
        }

        Ok(Self {
            config: ReportApiConfig {
                base_url: config.base_url.trim_end_matches('/').to_string(),
                ..config
            },
            client: Client::new(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    fn send(&self, request: RequestBuilder) -> Result<reqwest::blocking::Response, DataSourceError> {
        let response = request.send().map_err(|_| DataSourceError::Connection)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(DataSourceError::Unauthorized);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(DataSourceError::NotFound);
        }
        if !status.is_success() {
            return Err(DataSourceError::Status(status.as_u16()));
        }
        Ok(response)
    }

    fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, DataSourceError> {
        self.send(request)?
            .json::<T>()
            .map_err(|_| DataSourceError::Parse)
    }

    /// Like `send_json`, but an undecodable body yields the default value.
    fn send_status(&self, request: RequestBuilder) -> Result<ApiStatus, DataSourceError> {
        let text = self
            .send(request)?
            .text()
            .map_err(|_| DataSourceError::Connection)?;
        Ok(serde_json::from_str(&text).unwrap_or_default())
    }

    fn location_form(location_id: &str) -> Form {
        Form::new().text("location_id", location_id.to_string())
    }

    pub fn fetch_monthly_payload(&self, location_id: &str) -> Result<Value, DataSourceError> {
        let url = build_api_url(
            &self.config.base_url,
            &self.config.monthly_path,
            self.config.id_style,
            Some(location_id),
        );
        debug!("GET {url}");
        self.send_json(self.client.get(&url))
    }

    pub fn fetch_monthly_rows(&self, location_id: &str) -> Result<Vec<RawRow>, DataSourceError> {
        let payload = self.fetch_monthly_payload(location_id)?;
        Ok(raw_rows_from_json(&payload))
    }

    pub fn fetch_location_details(&self, location_id: &str) -> Result<LocationDetails, DataSourceError> {
        let request = self
            .client
            .get(self.url("/reports/location-details/"))
            .query(&[("location_id", location_id)]);
        self.send_json(request)
    }

    pub fn post_location_onboard(&self, onboarding: &OnboardingRequest) -> Result<ApiStatus, DataSourceError> {
        let form = onboarding
            .form_fields()
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value));
        info!("POST onboarding for location {}", onboarding.location_id.trim());
        self.send_status(
            self.client
                .post(self.url("/reports/location-onboard/"))
                .multipart(form),
        )
    }

    pub fn upload_dental_csv(&self, location_id: &str, csv_path: &Path) -> Result<ApiStatus, DataSourceError> {
        let form = Self::location_form(location_id)
            .file("file", csv_path)
            .map_err(|err| DataSourceError::Other(format!("failed to read csv upload: {err}")))?;
        self.send_status(
            self.client
                .post(self.url("/reports/upload/dental/"))
                .multipart(form),
        )
    }

    pub fn fetch_pt_data(&self, location_id: &str) -> Result<ApiStatus, DataSourceError> {
        self.send_status(
            self.client
                .post(self.url("/reports/pt/fetch/"))
                .multipart(Self::location_form(location_id)),
        )
    }

    pub fn fetch_pt_dashboard(&self, location_id: &str) -> Result<Value, DataSourceError> {
        let request = self
            .client
            .get(self.url("/reports/pt/data/by-loc/"))
            .query(&[("location_id", location_id)]);
        self.send_json(request)
    }

    pub fn generate_ai_insights(&self, location_id: &str) -> Result<AiInsightsResponse, DataSourceError> {
        let text = self
            .send(
                self.client
                    .post(self.url("/ai/generate-insights/"))
                    .multipart(Self::location_form(location_id)),
            )?
            .text()
            .map_err(|_| DataSourceError::Connection)?;
        Ok(serde_json::from_str(&text).unwrap_or_default())
    }
}

/// Monthly rows of one location, fetched from the reporting API.
pub struct ApiRowSource {
    client: ReportApiClient,
    location_id: String,
}

impl ApiRowSource {
    pub fn new(client: ReportApiClient, location_id: impl Into<String>) -> Self {
        Self {
            client,
            location_id: location_id.into(),
        }
    }
}

impl RowSupplier for ApiRowSource {
    fn source_name(&self) -> String {
        format!("location {}", self.location_id)
    }

    fn fetch_raw_rows(&self) -> Result<Vec<RawRow>, DataSourceError> {
        self.client.fetch_monthly_rows(&self.location_id)
    }
}
