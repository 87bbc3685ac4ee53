use crate::cli::ProbeCommands;
use crate::config::ProbeConfig;
use crate::output::{output_data, print_info, print_success, print_warning};
use crate::probes::{
    list_native_models, list_openai_models, resolve_model, run_chat_probe,
    run_conversation_probe, run_generate_probe, run_health_probe, run_stream_probe, show_model,
};

const DEFAULT_PROMPT: &str =
    "Write a short function that computes the factorial of a number. Keep it concise.";

pub fn handle_probe_command(
    cmd: &ProbeCommands,
    config: &ProbeConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        ProbeCommands::Health { format } => {
            let report = run_health_probe(config);
            if report.reachable {
                print_success("service is reachable");
            } else {
                print_warning("service is not reachable");
                if let Some(hint) = &report.hint {
                    print_info(hint);
                }
            }
            output_data(&report, format)?;
        }
        ProbeCommands::Models { api, format } => {
            let inventory = match api.as_str() {
                "openai" => list_openai_models(config),
                "native" => list_native_models(config),
                other => {
                    return Err(format!("unknown API style '{}' (use native or openai)", other).into())
                }
            };
            print_info(&format!("{} model(s) available", inventory.count));
            output_data(&inventory, format)?;
        }
        ProbeCommands::ModelInfo { name, format } => {
            let model = match name {
                Some(name) => name.clone(),
                None => resolve_model(config)?,
            };
            let details = show_model(config, &model);
            output_data(&details, format)?;
        }
        ProbeCommands::Generate {
            prompt,
            max_tokens,
            temperature,
            format,
        } => {
            let model = resolve_model(config)?;
            let prompt = prompt.as_deref().unwrap_or(DEFAULT_PROMPT);
            print_info(&format!("generating with model {}...", model));
            let report = run_generate_probe(config, &model, prompt, *max_tokens, *temperature);
            if !report.success {
                if let Some(failure) = report.failure {
                    print_warning(&format!("generate probe failed: {}", failure.describe()));
                }
            }
            output_data(&report, format)?;
        }
        ProbeCommands::Chat {
            prompt,
            system,
            max_tokens,
            temperature,
            format,
        } => {
            let model = resolve_model(config)?;
            let prompt = prompt.as_deref().unwrap_or(DEFAULT_PROMPT);
            print_info(&format!("chatting with model {}...", model));
            let report = run_chat_probe(
                config,
                &model,
                system.as_deref(),
                prompt,
                *max_tokens,
                *temperature,
            );
            if !report.success {
                if let Some(failure) = report.failure {
                    print_warning(&format!("chat probe failed: {}", failure.describe()));
                }
            }
            output_data(&report, format)?;
        }
        ProbeCommands::Stream {
            prompt,
            max_tokens,
            temperature,
            format,
        } => {
            let model = resolve_model(config)?;
            let prompt = prompt
                .as_deref()
                .unwrap_or("Count from 1 to 5 and explain each number briefly.");
            print_info(&format!("streaming from model {}...", model));
            let report = run_stream_probe(config, &model, prompt, *max_tokens, *temperature);
            output_data(&report, format)?;
        }
        ProbeCommands::Conversation {
            turns,
            max_tokens,
            format,
        } => {
            let model = resolve_model(config)?;
            print_info(&format!(
                "running a {}-turn conversation with model {}...",
                turns, model
            ));
            let report = run_conversation_probe(config, &model, *turns, *max_tokens);
            output_data(&report, format)?;
        }
    }
    Ok(())
}
