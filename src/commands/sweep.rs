use std::time::Duration;

use crate::config::ProbeConfig;
use crate::output::{output_data, print_error, print_info};
use crate::probes::resolve_model;
use crate::probes::sweep::{print_sweep_report, run_sweep, SweepOptions};

pub fn handle_sweep_command(
    config: &ProbeConfig,
    targets: &[u64],
    max_tokens: u32,
    temperature: f32,
    pause_secs: u64,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if targets.is_empty() {
        return Err("no sweep targets given".into());
    }
    if !targets.windows(2).all(|pair| pair[0] < pair[1]) {
        return Err("sweep targets must be ascending".into());
    }

    let model = resolve_model(config)?;
    let options = SweepOptions {
        targets: targets.to_vec(),
        max_tokens,
        temperature,
        pause: Duration::from_secs(pause_secs),
    };

    print_info(&format!(
        "sweeping {} with targets {:?} ({}s timeout per probe)",
        model, options.targets, config.sweep_timeout_secs
    ));

    let report = run_sweep(config, &model, &options);
    if report.max_successful_tokens.is_none() {
        print_error("every probe failed, including the smallest target");
    }

    print_sweep_report(&report);
    if format != "pretty" {
        output_data(&report, format)?;
    }
    Ok(())
}
