use crate::cli::EnvCommands;
use crate::environment::{collect_environment, collect_gpu_report, collect_host_report};
use crate::output::output_data;

pub fn handle_env_command(cmd: &EnvCommands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        EnvCommands::Gpu { format } => {
            let report = collect_gpu_report();
            output_data(&report, format)?;
        }
        EnvCommands::Host { format } => {
            let report = collect_host_report();
            output_data(&report, format)?;
        }
        EnvCommands::All { format } => {
            let report = collect_environment();
            output_data(&report, format)?;
        }
    }
    Ok(())
}
