use crate::config::ProbeConfig;
use crate::probes::types::HealthReport;
use crate::probes::{http_client, preview};

const UNREACHABLE_HINT: &str =
    "make sure the inference service is running, e.g. `ollama serve` or `docker compose up -d ollama`";

/// Reachability check against `/api/tags`. Ollama has no dedicated health
/// endpoint, so the model list stands in for one.
pub fn run_health_probe(config: &ProbeConfig) -> HealthReport {
    let url = config.native_url("tags");
    let mut report = HealthReport {
        url: url.clone(),
        reachable: false,
        status_code: None,
        error: None,
        hint: None,
    };

    let client = match http_client(config.health_timeout()) {
        Ok(client) => client,
        Err(e) => {
            report.error = Some(e.to_string());
            report.hint = Some(UNREACHABLE_HINT.to_string());
            return report;
        }
    };

    match client.get(&url).headers(config.headers()).send() {
        Ok(response) => {
            let status = response.status();
            report.status_code = Some(status.as_u16());
            report.reachable = status.is_success();
            if !status.is_success() {
                let body = response.text().unwrap_or_default();
                report.error = Some(preview(&body, 200));
            }
        }
        Err(e) => {
            report.error = Some(e.to_string());
        }
    }

    if !report.reachable {
        report.hint = Some(UNREACHABLE_HINT.to_string());
    }
    report
}
