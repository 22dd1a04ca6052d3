use chrono::Local;

use crate::commands::base_commands::Commands;
use crate::commands::command_error::CommandError;
use crate::commands::report_format::format_kpi_summary;
use crate::domain::kpi::KpiReport;
use crate::domain::period_row::PeriodRow;
use crate::services::data_converter::DataConverter;
use crate::services::data_source::FileRowSource;
use crate::services::report_writer::{ReportFormat, write_report_file};
use crate::services::trend_table::format_trend_table;

pub fn compute_command(cmd: Commands) -> Result<(), CommandError> {
    if let Commands::Compute { input, output, format } = cmd {
        let data_converter = DataConverter::new(Box::new(FileRowSource::new(&input)));
        let (rows, report) = data_converter.get_rows_and_report()?;
        write_and_print_report(&rows, &report, &output, format)?;
    }
    Ok(())
}

/// Writes the report file, then prints the cards, trend table and narrative.
pub fn write_and_print_report(
    rows: &[PeriodRow],
    report: &KpiReport,
    output: &str,
    format: ReportFormat,
) -> Result<(), CommandError> {
    write_report_file(output, report, format).map_err(|e| CommandError::write(output, e))?;

    println!("{}", format_kpi_summary(report, Local::now().date_naive()));
    println!();
    println!("{}", format_trend_table(rows));
    println!();
    println!("KPI report written to {output}");
    Ok(())
}
