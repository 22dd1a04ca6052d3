use log::debug;

use crate::commands::base_commands::Commands;
use crate::commands::command_error::CommandError;
use crate::domain::location::resolve_dashboard;
use crate::services::report_api::{ReportApiClient, ReportApiConfig};

pub fn location_command(cmd: Commands) -> Result<(), CommandError> {
    if let Commands::Location { config, location } = cmd {
        let client = ReportApiClient::new(ReportApiConfig::from_yaml_file(&config)?)?;
        let details = client.fetch_location_details(&location)?;
        debug!("Location details: {details:?}");
        println!("Location {location}: {}", resolve_dashboard(&details));
    }
    Ok(())
}
