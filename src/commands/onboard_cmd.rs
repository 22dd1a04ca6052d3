use std::path::Path;

use log::{info, warn};

use crate::commands::base_commands::Commands;
use crate::commands::command_error::CommandError;
use crate::domain::location::{ApiStatus, DashboardTemplate, OnboardingError, OnboardingRequest};
use crate::services::report_api::{ReportApiClient, ReportApiConfig};

fn ensure_success(status: ApiStatus, fallback: &str) -> Result<(), OnboardingError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(OnboardingError::Rejected(
            status.message.unwrap_or_else(|| fallback.to_string()),
        ))
    }
}

pub fn onboard_command(cmd: Commands) -> Result<(), CommandError> {
    if let Commands::Onboard {
        config,
        location,
        dashboard,
        source,
        sheet_id,
        csv,
    } = cmd
    {
        let request = OnboardingRequest {
            location_id: location,
            dashboard,
            source,
            sheet_id,
        };
        request.validate()?;

        let client = ReportApiClient::new(ReportApiConfig::from_yaml_file(&config)?)?;
        let location_id = request.location_id.trim();
        ensure_success(
            client.post_location_onboard(&request)?,
            "Failed to onboard location",
        )?;
        println!(
            "Location {location_id} onboarded with {} dashboard ({})",
            request.dashboard.map(|d| d.to_string()).unwrap_or_default(),
            request.data_source()
        );

        match request.dashboard {
            Some(DashboardTemplate::Pt) if request.uses_sheet() => {
                info!("Fetching PT data for location {location_id}");
                ensure_success(client.fetch_pt_data(location_id)?, "Failed to fetch PT data")?;
                println!("PT data fetched for location {location_id}");
            }
            Some(DashboardTemplate::Dental) => match csv.as_deref() {
                Some(csv_path) => {
                    info!("Uploading {csv_path} for location {location_id}");
                    ensure_success(
                        client.upload_dental_csv(location_id, Path::new(csv_path))?,
                        "Failed to upload dental CSV",
                    )?;
                    println!("Dental CSV uploaded for location {location_id}");
                }
                None => warn!("No CSV given; location {location_id} has no data yet"),
            },
            _ => {}
        }
    }
    Ok(())
}
