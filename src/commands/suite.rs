use std::thread;
use std::time::Duration;

use crate::config::ProbeConfig;
use crate::output::{output_data, print_info, print_success, print_warning};
use crate::probes::{
    list_native_models, list_openai_models, run_chat_probe, run_generate_probe,
    run_health_probe, run_stream_probe, show_model,
};
use crate::probes::types::{SuiteReport, SuiteStep};

const STEP_PAUSE: Duration = Duration::from_secs(1);

/// Run the whole smoke-test sequence: health, model inventories, model info,
/// generate, chat, stream. A failed health check short-circuits everything
/// else; an empty model inventory short-circuits the inference probes.
pub fn handle_suite_command(
    config: &ProbeConfig,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    print_info(&format!("native API: {}", config.native_url("")));
    print_info(&format!("OpenAI-compatible API: {}", config.openai_url("")));
    if let Some(model) = &config.model {
        print_info(&format!("model: {}", model));
    }
    println!();

    print_info("health check...");
    let health = run_health_probe(config);
    if !health.reachable {
        print_warning("service is not reachable, skipping all remaining probes");
        if let Some(error) = &health.error {
            print_info(error);
        }
        if let Some(hint) = &health.hint {
            print_info(hint);
        }
        return Ok(());
    }
    print_success("service is reachable");

    let mut steps = vec![SuiteStep {
        name: "health check".to_string(),
        passed: true,
    }];

    print_info("native model list...");
    let native = list_native_models(config);
    print_info(&format!("{} model(s) via /api/tags", native.count));
    steps.push(SuiteStep {
        name: "native model list".to_string(),
        passed: native.error.is_none(),
    });
    thread::sleep(STEP_PAUSE);

    print_info("OpenAI-compatible model list...");
    let openai = list_openai_models(config);
    print_info(&format!("{} model(s) via /v1/models", openai.count));
    steps.push(SuiteStep {
        name: "openai model list".to_string(),
        passed: openai.error.is_none(),
    });
    thread::sleep(STEP_PAUSE);

    // Inference steps need a model to aim at
    let model = config
        .model
        .clone()
        .or_else(|| native.models.first().map(|m| m.name.clone()));

    match model {
        Some(model) => {
            print_info(&format!("model info for {}...", model));
            let details = show_model(config, &model);
            steps.push(SuiteStep {
                name: "model info".to_string(),
                passed: details.error.is_none(),
            });
            thread::sleep(STEP_PAUSE);

            print_info("native generate...");
            let generate = run_generate_probe(
                config,
                &model,
                "Say hello in one short sentence.",
                100,
                0.7,
            );
            steps.push(SuiteStep {
                name: "native generate".to_string(),
                passed: generate.success,
            });
            thread::sleep(STEP_PAUSE);

            print_info("chat completion...");
            let chat = run_chat_probe(
                config,
                &model,
                Some("You are a helpful assistant."),
                "Say hello in one short sentence.",
                100,
                0.7,
            );
            steps.push(SuiteStep {
                name: "chat completion".to_string(),
                passed: chat.success,
            });
            thread::sleep(STEP_PAUSE);

            print_info("streaming chat...");
            let stream = run_stream_probe(
                config,
                &model,
                "Count from 1 to 5 and explain each number briefly.",
                200,
                0.5,
            );
            steps.push(SuiteStep {
                name: "streaming chat".to_string(),
                passed: stream.success,
            });
        }
        None => {
            print_warning("no models available, skipping inference probes");
            for name in ["model info", "native generate", "chat completion", "streaming chat"] {
                steps.push(SuiteStep {
                    name: name.to_string(),
                    passed: false,
                });
            }
        }
    }

    let passed = steps.iter().filter(|s| s.passed).count();
    let total = steps.len();
    let report = SuiteReport {
        url: config.base_url.clone(),
        model: config.model.clone(),
        steps,
        passed,
        total,
    };

    println!();
    println!("{}", "=".repeat(50));
    println!("Test Summary:");
    for step in &report.steps {
        let status = if step.passed { "✅ PASS" } else { "❌ FAIL" };
        println!("  {}: {}", status, step.name);
    }
    println!();
    println!("Results: {}/{} probes passed", report.passed, report.total);
    if report.passed == report.total {
        print_success("all probes passed, the service is working correctly");
    } else {
        print_warning("some probes failed, check the output above");
    }

    if format != "pretty" {
        output_data(&report, format)?;
    }
    Ok(())
}
