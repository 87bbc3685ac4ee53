use std::thread;
use std::time::Duration;

use crate::config::ProbeConfig;
use crate::output::{print_info, print_success, print_warning};
use crate::probes::chat::{send_chat, ChatOutcome};
use crate::probes::classify::classify_failure;
use crate::probes::prompt::{estimated_tokens, summary_request, synthesize_document};
use crate::probes::types::{ChatMessage, ProbeResult, SweepReport, SweepStats};
use crate::probes::{preview, tokens_per_second};

pub struct SweepOptions {
    /// Target context sizes in tokens, ascending.
    pub targets: Vec<u64>,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Pause between successful probes.
    pub pause: Duration,
}

impl Default for SweepOptions {
    fn default() -> Self {
        SweepOptions {
            targets: vec![1_000, 100_000, 200_000],
            max_tokens: 150,
            temperature: 0.3,
            pause: Duration::from_secs(2),
        }
    }
}

/// Drive the chat endpoint with synthetic prompts of increasing size and
/// find the largest input the service accepts before failing.
pub fn run_sweep(config: &ProbeConfig, model: &str, options: &SweepOptions) -> SweepReport {
    let results = sweep(
        &options.targets,
        |target| {
            print_info(&format!("probing ~{} token context...", target));
            let result = probe_target(config, model, target, options);
            if result.success {
                match result.tokens_per_second {
                    Some(tps) => print_success(&format!(
                        "{} tokens in {:.2}s ({:.1} tokens/s)",
                        target, result.elapsed_seconds, tps
                    )),
                    None => print_success(&format!(
                        "{} tokens in {:.2}s",
                        target, result.elapsed_seconds
                    )),
                }
            } else {
                let describe = result
                    .failure
                    .map(|f| f.describe())
                    .unwrap_or("unknown failure");
                print_warning(&format!("failed at {} tokens: {}", target, describe));
            }
            result
        },
        options.pause,
    );

    let stats = aggregate(&results);
    let max_successful_tokens = results
        .iter()
        .filter(|r| r.success)
        .map(|r| r.target_tokens)
        .max();

    SweepReport {
        model: model.to_string(),
        endpoint: config.openai_url("chat/completions"),
        targets: options.targets.clone(),
        results,
        stats,
        max_successful_tokens,
    }
}

/// Run `probe` over ascending targets, stopping at the first failure.
/// Failure is assumed monotonic in prompt size, so larger targets are
/// skipped rather than retried; the assumption is deliberate and unverified.
fn sweep<F>(targets: &[u64], mut probe: F, pause: Duration) -> Vec<ProbeResult>
where
    F: FnMut(u64) -> ProbeResult,
{
    let mut results = Vec::new();
    for (i, &target) in targets.iter().enumerate() {
        let result = probe(target);
        let failed = !result.success;
        results.push(result);
        if failed {
            break;
        }
        if i + 1 < targets.len() && !pause.is_zero() {
            thread::sleep(pause);
        }
    }
    results
}

fn probe_target(
    config: &ProbeConfig,
    model: &str,
    target_tokens: u64,
    options: &SweepOptions,
) -> ProbeResult {
    let document = synthesize_document(target_tokens);
    print_info(&format!(
        "synthesized ~{:.0} tokens ({:.1} KB)",
        estimated_tokens(&document),
        document.len() as f64 / 1024.0
    ));

    let messages = [
        ChatMessage::system("You are a helpful assistant that can analyze and summarize documents."),
        ChatMessage::user(summary_request(&document)),
    ];

    let outcome = send_chat(
        config,
        model,
        &messages,
        options.max_tokens,
        options.temperature,
        config.sweep_timeout(),
    );

    let mut result = ProbeResult {
        target_tokens,
        success: false,
        elapsed_seconds: 0.0,
        prompt_tokens: 0,
        completion_tokens: 0,
        tokens_per_second: None,
        status_code: None,
        failure: None,
        error: None,
    };

    match outcome {
        ChatOutcome::Success {
            elapsed_seconds,
            prompt_tokens,
            completion_tokens,
            ..
        } => {
            result.success = true;
            result.status_code = Some(200);
            result.elapsed_seconds = elapsed_seconds;
            result.prompt_tokens = prompt_tokens.unwrap_or(0);
            result.completion_tokens = completion_tokens.unwrap_or(0);
            result.tokens_per_second =
                tokens_per_second(result.completion_tokens, elapsed_seconds);
        }
        ChatOutcome::Http {
            elapsed_seconds,
            status,
            body,
        } => {
            result.elapsed_seconds = elapsed_seconds;
            result.status_code = Some(status);
            result.failure = Some(classify_failure(status, &body));
            result.error = Some(preview(&body, 500));
        }
        ChatOutcome::Transport {
            elapsed_seconds,
            failure,
            message,
        } => {
            result.elapsed_seconds = elapsed_seconds;
            result.failure = Some(failure);
            result.error = Some(message);
        }
    }

    result
}

/// Mean/min/max latency and throughput over successful probes. None when no
/// probe succeeded, so the summary can report "no data" instead of dividing
/// by zero.
pub fn aggregate(results: &[ProbeResult]) -> Option<SweepStats> {
    let latencies: Vec<f64> = results
        .iter()
        .filter(|r| r.success)
        .map(|r| r.elapsed_seconds)
        .collect();
    if latencies.is_empty() {
        return None;
    }

    let throughputs: Vec<f64> = results
        .iter()
        .filter(|r| r.success)
        .filter_map(|r| r.tokens_per_second)
        .collect();

    Some(SweepStats {
        successes: latencies.len(),
        mean_latency_seconds: mean(&latencies),
        min_latency_seconds: fold_min(&latencies),
        max_latency_seconds: fold_max(&latencies),
        mean_tokens_per_second: if throughputs.is_empty() {
            None
        } else {
            Some(mean(&throughputs))
        },
        min_tokens_per_second: if throughputs.is_empty() {
            None
        } else {
            Some(fold_min(&throughputs))
        },
        max_tokens_per_second: if throughputs.is_empty() {
            None
        } else {
            Some(fold_max(&throughputs))
        },
    })
}

/// Print the human-readable results table and summary.
pub fn print_sweep_report(report: &SweepReport) {
    println!();
    println!("Target Tokens | Success | Time(s)  | Prompt Tokens | Completion Tokens");
    println!("{}", "-".repeat(72));
    for result in &report.results {
        let status = if result.success { "✅" } else { "❌" };
        println!(
            "{:>13} | {:^7} | {:>8.2} | {:>13} | {:>17}",
            result.target_tokens,
            status,
            result.elapsed_seconds,
            result.prompt_tokens,
            result.completion_tokens
        );
    }

    println!();
    match &report.stats {
        Some(stats) => {
            println!(
                "Latency: mean {:.2}s, min {:.2}s, max {:.2}s over {} successful probe(s)",
                stats.mean_latency_seconds,
                stats.min_latency_seconds,
                stats.max_latency_seconds,
                stats.successes
            );
            if let (Some(mean), Some(min), Some(max)) = (
                stats.mean_tokens_per_second,
                stats.min_tokens_per_second,
                stats.max_tokens_per_second,
            ) {
                println!(
                    "Throughput: mean {:.1} tokens/s, min {:.1}, max {:.1}",
                    mean, min, max
                );
            }
        }
        None => println!("No successful probes, no data."),
    }

    match report.max_successful_tokens {
        Some(max) => println!("Maximum successful context size: {} tokens", max),
        None => println!("Maximum successful context size: none"),
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn fold_min(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

fn fold_max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probes::classify::FailureKind;

    fn success(target: u64, elapsed: f64, completion: u64) -> ProbeResult {
        ProbeResult {
            target_tokens: target,
            success: true,
            elapsed_seconds: elapsed,
            prompt_tokens: target,
            completion_tokens: completion,
            tokens_per_second: tokens_per_second(completion, elapsed),
            status_code: Some(200),
            failure: None,
            error: None,
        }
    }

    fn failure(target: u64, status: u16, body: &str) -> ProbeResult {
        ProbeResult {
            target_tokens: target,
            success: false,
            elapsed_seconds: 1.0,
            prompt_tokens: 0,
            completion_tokens: 0,
            tokens_per_second: None,
            status_code: Some(status),
            failure: Some(classify_failure(status, body)),
            error: Some(body.to_string()),
        }
    }

    #[test]
    fn test_sweep_short_circuits_on_first_failure() {
        let mut probed = Vec::new();
        let results = sweep(
            &[1_000, 100_000, 200_000, 400_000],
            |target| {
                probed.push(target);
                if target >= 200_000 {
                    failure(target, 500, "internal error")
                } else {
                    success(target, 2.0, 150)
                }
            },
            Duration::ZERO,
        );

        // The 400k probe is never issued
        assert_eq!(probed, vec![1_000, 100_000, 200_000]);
        assert_eq!(results.len(), 3);
        assert!(!results[2].success);
    }

    #[test]
    fn test_sweep_runs_all_targets_when_all_succeed() {
        let results = sweep(
            &[1_000, 2_000],
            |target| success(target, 1.0, 100),
            Duration::ZERO,
        );
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.success));
    }

    #[test]
    fn test_server_error_scenario() {
        // Sweep over [1000, 100000, 200000] where the 200000 probe returns
        // HTTP 500: first two succeed with metrics, third classifies as
        // server error, and the maximum successful size is 100000.
        let results = sweep(
            &[1_000, 100_000, 200_000],
            |target| {
                if target == 200_000 {
                    failure(target, 500, "internal error")
                } else {
                    success(target, 4.0, 200)
                }
            },
            Duration::ZERO,
        );

        assert!(results[0].success && results[1].success);
        assert_eq!(results[0].tokens_per_second, Some(50.0));
        assert_eq!(results[2].failure, Some(FailureKind::ServerError));

        let stats = aggregate(&results).unwrap();
        assert_eq!(stats.successes, 2);

        let max = results
            .iter()
            .filter(|r| r.success)
            .map(|r| r.target_tokens)
            .max();
        assert_eq!(max, Some(100_000));
    }

    #[test]
    fn test_aggregate_empty_is_none() {
        assert!(aggregate(&[]).is_none());
        assert!(aggregate(&[failure(1_000, 500, "boom")]).is_none());
    }

    #[test]
    fn test_aggregate_stats() {
        let results = vec![success(1_000, 2.0, 100), success(100_000, 6.0, 300)];
        let stats = aggregate(&results).unwrap();
        assert_eq!(stats.successes, 2);
        assert_eq!(stats.mean_latency_seconds, 4.0);
        assert_eq!(stats.min_latency_seconds, 2.0);
        assert_eq!(stats.max_latency_seconds, 6.0);
        assert_eq!(stats.mean_tokens_per_second, Some(50.0));
        assert_eq!(stats.min_tokens_per_second, Some(50.0));
        assert_eq!(stats.max_tokens_per_second, Some(50.0));
    }

    #[test]
    fn test_aggregate_without_throughput_data() {
        // A success with zero completion tokens has no throughput figure
        let results = vec![success(1_000, 2.0, 0)];
        let stats = aggregate(&results).unwrap();
        assert_eq!(stats.successes, 1);
        assert_eq!(stats.mean_tokens_per_second, None);
    }
}
