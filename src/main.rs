mod cli;
mod commands;
mod config;
mod environment;
mod output;
mod probes;

use clap::Parser;
use cli::{Cli, Commands};
use commands::{
    handle_env_command,
    handle_probe_command,
    handle_suite_command,
    handle_sweep_command,
};
use config::ProbeConfig;
use output::print_error;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ProbeConfig::load(cli.config.as_deref())?;
    config.apply_cli(
        cli.url.clone(),
        cli.model.clone(),
        cli.api_key.clone(),
        cli.timeout,
    );

    match &cli.command {
        Commands::Env(cmd) => handle_env_command(cmd),
        Commands::Probe(cmd) => handle_probe_command(cmd, &config),
        Commands::Sweep {
            targets,
            max_tokens,
            temperature,
            pause,
            format,
        } => handle_sweep_command(&config, targets, *max_tokens, *temperature, *pause, format),
        Commands::Suite { format } => handle_suite_command(&config, format),
    }
}
