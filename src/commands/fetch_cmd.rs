use crate::commands::base_commands::Commands;
use crate::commands::command_error::CommandError;
use crate::commands::compute_cmd::write_and_print_report;
use crate::services::data_converter::DataConverter;
use crate::services::report_api::{ApiRowSource, ReportApiClient, ReportApiConfig};

pub fn fetch_command(cmd: Commands) -> Result<(), CommandError> {
    if let Commands::Fetch {
        config,
        location,
        output,
        format,
    } = cmd
    {
        let api_config = ReportApiConfig::from_yaml_file(&config)?;
        let client = ReportApiClient::new(api_config)?;
        let data_converter = DataConverter::new(Box::new(ApiRowSource::new(client, location)));
        let (rows, report) = data_converter.get_rows_and_report()?;
        write_and_print_report(&rows, &report, &output, format)?;
    }
    Ok(())
}
