use chrono::Local;
use log::warn;

use crate::commands::base_commands::Commands;
use crate::commands::command_error::CommandError;
use crate::commands::report_format::{format_pt_summary, narrative_lines};
use crate::services::pt_engine::{PtDashboard, compute_pt_summary};
use crate::services::report_api::{ReportApiClient, ReportApiConfig};
use crate::services::report_writer::{ReportFormat, write_report_file};

pub fn pt_command(cmd: Commands) -> Result<(), CommandError> {
    if let Commands::Pt {
        config,
        location,
        output,
    } = cmd
    {
        let client = ReportApiClient::new(ReportApiConfig::from_yaml_file(&config)?)?;
        let payload = client.fetch_pt_dashboard(&location)?;
        let summary = compute_pt_summary(&PtDashboard::from_json(&payload));

        write_report_file(&output, &summary, ReportFormat::Yaml)
            .map_err(|e| CommandError::write(&output, e))?;
        println!("{}", format_pt_summary(&summary, Local::now().date_naive()));

        match client.generate_ai_insights(&location) {
            Ok(response) => match response.ai_response {
                Some(ai) if response.status == "success" => {
                    println!();
                    println!("{}", narrative_lines("AI Insights", &ai.insights).join("\n"));
                    println!();
                    println!("{}", narrative_lines("Action Items", &ai.action_items).join("\n"));
                }
                _ => warn!(
                    "No AI insights for location {location}: {}",
                    response.message.unwrap_or_else(|| "empty response".to_string())
                ),
            },
            Err(e) => warn!("Failed to generate AI insights: {e}"),
        }

        println!();
        println!("PT summary written to {output}");
    }
    Ok(())
}
