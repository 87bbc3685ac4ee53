use serde::{Deserialize, Serialize};

use crate::probes::classify::FailureKind;

// ---------------------------------------------------------------------------
// Report types (what the CLI prints)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub url: String,
    pub reachable: bool,
    pub status_code: Option<u16>,
    pub error: Option<String>,
    pub hint: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ModelSummary {
    pub name: String,
    pub size_bytes: Option<u64>,
    pub modified_at: Option<String>,
    pub created: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ModelInventory {
    pub api: String,
    pub endpoint: String,
    pub count: usize,
    pub models: Vec<ModelSummary>,
    pub status_code: Option<u16>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ModelDetails {
    pub model: String,
    pub parameters: Option<String>,
    pub template_chars: Option<usize>,
    pub modelfile_chars: Option<usize>,
    pub status_code: Option<u16>,
    pub error: Option<String>,
}

/// Outcome of one non-streaming inference probe, native or OpenAI-style.
#[derive(Debug, Serialize)]
pub struct GenerationReport {
    pub api: String,
    pub model: String,
    pub success: bool,
    /// Native API completion flag; absent for OpenAI-style responses.
    pub done: Option<bool>,
    pub status_code: Option<u16>,
    pub elapsed_seconds: f64,
    pub prompt_tokens: Option<u64>,
    pub completion_tokens: Option<u64>,
    pub total_tokens: Option<u64>,
    pub tokens_per_second: Option<f64>,
    pub total_duration_seconds: Option<f64>,
    pub load_duration_seconds: Option<f64>,
    pub preview: Option<String>,
    pub failure: Option<FailureKind>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StreamReport {
    pub model: String,
    pub success: bool,
    pub status_code: Option<u16>,
    pub chunks: usize,
    pub characters: usize,
    pub elapsed_seconds: f64,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConversationReport {
    pub model: String,
    pub turns_requested: u32,
    pub turns_completed: u32,
    pub total_tokens: u64,
    pub elapsed_seconds: f64,
    pub context_bytes: usize,
    pub success: bool,
    pub error: Option<String>,
}

/// One sweep probe at a single target context size. Append-only: created
/// once, read for the final summary.
#[derive(Debug, Serialize)]
pub struct ProbeResult {
    pub target_tokens: u64,
    pub success: bool,
    pub elapsed_seconds: f64,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub tokens_per_second: Option<f64>,
    pub status_code: Option<u16>,
    pub failure: Option<FailureKind>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SweepStats {
    pub successes: usize,
    pub mean_latency_seconds: f64,
    pub min_latency_seconds: f64,
    pub max_latency_seconds: f64,
    pub mean_tokens_per_second: Option<f64>,
    pub min_tokens_per_second: Option<f64>,
    pub max_tokens_per_second: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct SweepReport {
    pub model: String,
    pub endpoint: String,
    pub targets: Vec<u64>,
    pub results: Vec<ProbeResult>,
    pub stats: Option<SweepStats>,
    pub max_successful_tokens: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct SuiteStep {
    pub name: String,
    pub passed: bool,
}

#[derive(Debug, Serialize)]
pub struct SuiteReport {
    pub url: String,
    pub model: Option<String>,
    pub steps: Vec<SuiteStep>,
    pub passed: usize,
    pub total: usize,
}

// ---------------------------------------------------------------------------
// Wire types (what the services return)
//
// Every field is optional or defaulted: the two API styles disagree on
// response shape, and a missing key degrades to a placeholder instead of
// failing the probe.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<TagEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TagEntry {
    #[serde(default)]
    pub name: String,
    pub size: Option<u64>,
    pub modified_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OpenAiModelsResponse {
    #[serde(default)]
    pub data: Vec<OpenAiModelEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OpenAiModelEntry {
    #[serde(default)]
    pub id: String,
    pub created: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ShowResponse {
    pub parameters: Option<String>,
    pub template: Option<String>,
    pub modelfile: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateResponse {
    pub response: Option<String>,
    #[serde(default)]
    pub done: bool,
    pub prompt_eval_count: Option<u64>,
    pub eval_count: Option<u64>,
    /// Nanoseconds, per the native API.
    pub total_duration: Option<u64>,
    /// Nanoseconds, per the native API.
    pub load_duration: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatChoice {
    pub message: Option<WireMessage>,
    pub delta: Option<WireMessage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireMessage {
    pub content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Usage {
    pub prompt_tokens: Option<u64>,
    pub completion_tokens: Option<u64>,
    pub total_tokens: Option<u64>,
}
