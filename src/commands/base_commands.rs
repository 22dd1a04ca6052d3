use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::domain::location::DashboardTemplate;
use crate::services::kpi_plot::ChartKind;
use crate::services::report_writer::ReportFormat;

#[derive(Parser)]
#[command(name = "clinic-kpis", author, version, about)]
pub struct CliArgs {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute KPIs from a CSV or JSON rows file
    Compute {
        /// Rows file (.csv or .json)
        #[arg(short, long)]
        input: String,
        /// Output report file
        #[arg(short, long)]
        output: String,
        /// Report format
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Yaml)]
        format: ReportFormat,
    },
    /// Fetch monthly rows of a location from the reporting API and compute KPIs
    Fetch {
        /// Path to API config YAML
        #[arg(short, long)]
        config: String,
        /// Location ID
        #[arg(short, long)]
        location: String,
        /// Output report file
        #[arg(short, long)]
        output: String,
        /// Report format
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Yaml)]
        format: ReportFormat,
    },
    /// Plot one KPI chart from a rows file into a PNG
    Plot {
        /// Rows file (.csv or .json)
        #[arg(short, long)]
        input: String,
        /// Chart to draw
        #[arg(short, long, value_enum)]
        kind: ChartKind,
        /// Output PNG file
        #[arg(short, long)]
        output: String,
    },
    /// Show which dashboard a location resolves to
    Location {
        /// Path to API config YAML
        #[arg(short, long)]
        config: String,
        /// Location ID
        #[arg(short, long)]
        location: String,
    },
    /// Register a location with a dashboard template and data source
    Onboard {
        /// Path to API config YAML
        #[arg(short, long)]
        config: String,
        /// Location ID
        #[arg(short, long, default_value = "")]
        location: String,
        /// Dashboard template (dental or pt)
        #[arg(short, long)]
        dashboard: Option<DashboardTemplate>,
        /// Data source, e.g. CSV or SHEET
        #[arg(short, long, default_value = "")]
        source: String,
        /// Google Sheet ID for PT sheet sources
        #[arg(long)]
        sheet_id: Option<String>,
        /// Dental CSV file to upload after onboarding
        #[arg(long)]
        csv: Option<String>,
    },
    /// Build the weekly PT dashboard of a location
    Pt {
        /// Path to API config YAML
        #[arg(short, long)]
        config: String,
        /// Location ID
        #[arg(short, long)]
        location: String,
        /// Output YAML file
        #[arg(short, long)]
        output: String,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
