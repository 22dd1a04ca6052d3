use std::io;

use clap::CommandFactory;
use clap_complete::generate;

use crate::commands::base_commands::{CliArgs, Commands};
use crate::commands::command_error::CommandError;

pub fn completions_command(cmd: Commands) -> Result<(), CommandError> {
    if let Commands::Completions { shell } = cmd {
        let mut command = CliArgs::command();
        let name = command.get_name().to_string();
        generate(shell, &mut command, name, &mut io::stdout());
    }
    Ok(())
}
