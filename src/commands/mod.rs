pub mod base_commands;
pub mod command_error;
pub mod completions_cmd;
pub mod compute_cmd;
pub mod fetch_cmd;
pub mod location_cmd;
pub mod onboard_cmd;
pub mod plot_cmd;
pub mod pt_cmd;
pub mod report_format;
