use std::time::Instant;

use crate::config::ProbeConfig;
use crate::probes::classify::{classify_failure, classify_transport};
use crate::probes::types::{GenerateResponse, GenerationReport};
use crate::probes::{http_client, preview, tokens_per_second};

const NANOS_PER_SECOND: f64 = 1e9;

/// Single-turn completion via the native `/api/generate` endpoint,
/// non-streaming.
pub fn run_generate_probe(
    config: &ProbeConfig,
    model: &str,
    prompt: &str,
    max_tokens: u32,
    temperature: f32,
) -> GenerationReport {
    let mut report = empty_report("native", model);

    let client = match http_client(config.request_timeout()) {
        Ok(client) => client,
        Err(e) => {
            report.error = Some(e.to_string());
            return report;
        }
    };

    let payload = serde_json::json!({
        "model": model,
        "prompt": prompt,
        "stream": false,
        "options": {
            "temperature": temperature,
            "num_predict": max_tokens,
        }
    });

    let start = Instant::now();
    let response = client
        .post(config.native_url("generate"))
        .headers(config.headers())
        .json(&payload)
        .send();
    report.elapsed_seconds = start.elapsed().as_secs_f64();

    match response {
        Ok(response) => {
            let status = response.status();
            report.status_code = Some(status.as_u16());
            if status.is_success() {
                match response.json::<GenerateResponse>() {
                    Ok(body) => {
                        report.success = true;
                        report.done = Some(body.done);
                        report.prompt_tokens = body.prompt_eval_count;
                        report.completion_tokens = body.eval_count;
                        report.total_duration_seconds =
                            body.total_duration.map(nanos_to_seconds);
                        report.load_duration_seconds =
                            body.load_duration.map(nanos_to_seconds);
                        report.preview =
                            body.response.as_deref().map(|text| preview(text, 200));
                        if let Some(completion) = body.eval_count {
                            report.tokens_per_second =
                                tokens_per_second(completion, report.elapsed_seconds);
                        }
                    }
                    Err(e) => {
                        report.error = Some(format!("malformed response body: {}", e));
                    }
                }
            } else {
                let body = response.text().unwrap_or_default();
                report.failure = Some(classify_failure(status.as_u16(), &body));
                report.error = Some(preview(&body, 500));
            }
        }
        Err(e) => {
            report.failure = Some(classify_transport(&e));
            report.error = Some(e.to_string());
        }
    }

    report
}

fn nanos_to_seconds(nanos: u64) -> f64 {
    nanos as f64 / NANOS_PER_SECOND
}

fn empty_report(api: &str, model: &str) -> GenerationReport {
    GenerationReport {
        api: api.to_string(),
        model: model.to_string(),
        success: false,
        done: None,
        status_code: None,
        elapsed_seconds: 0.0,
        prompt_tokens: None,
        completion_tokens: None,
        total_tokens: None,
        tokens_per_second: None,
        total_duration_seconds: None,
        load_duration_seconds: None,
        preview: None,
        failure: None,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nanos_to_seconds() {
        assert_eq!(nanos_to_seconds(2_500_000_000), 2.5);
        assert_eq!(nanos_to_seconds(0), 0.0);
    }
}
