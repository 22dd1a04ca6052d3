use clap::Parser;
use log::{LevelFilter, error};

use clinic_kpis::commands::base_commands::{CliArgs, Commands};
use clinic_kpis::commands::command_error::CommandError;
use clinic_kpis::commands::completions_cmd::completions_command;
use clinic_kpis::commands::compute_cmd::compute_command;
use clinic_kpis::commands::fetch_cmd::fetch_command;
use clinic_kpis::commands::location_cmd::location_command;
use clinic_kpis::commands::onboard_cmd::onboard_command;
use clinic_kpis::commands::plot_cmd::plot_command;
use clinic_kpis::commands::pt_cmd::pt_command;

fn init_logging(verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn run(command: Commands) -> Result<(), CommandError> {
    match command {
        cmd @ Commands::Compute { .. } => compute_command(cmd),
        cmd @ Commands::Fetch { .. } => fetch_command(cmd),
        cmd @ Commands::Plot { .. } => plot_command(cmd),
        cmd @ Commands::Location { .. } => location_command(cmd),
        cmd @ Commands::Onboard { .. } => onboard_command(cmd),
        cmd @ Commands::Pt { .. } => pt_command(cmd),
        cmd @ Commands::Completions { .. } => completions_command(cmd),
    }
}

fn main() {
    let args = CliArgs::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args.command) {
        error!("{e}");
        std::process::exit(1);
    }
}
