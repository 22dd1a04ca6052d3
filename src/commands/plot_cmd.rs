use crate::commands::base_commands::Commands;
use crate::commands::command_error::CommandError;
use crate::services::kpi_plot::plot_kpi_chart_from_file;

pub fn plot_command(cmd: Commands) -> Result<(), CommandError> {
    if let Commands::Plot { input, kind, output } = cmd {
        plot_kpi_chart_from_file(&input, &output, kind)?;
        println!("KPI chart written to {output}");
    }
    Ok(())
}
