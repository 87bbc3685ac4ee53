use std::time::{Duration, Instant};

use crate::config::ProbeConfig;
use crate::probes::classify::{classify_failure, classify_transport, FailureKind};
use crate::probes::types::{
    ChatCompletionResponse, ChatMessage, ConversationReport, GenerationReport,
};
use crate::probes::{http_client, preview, tokens_per_second};

/// What one blocking chat request produced. Transport failures and non-200
/// statuses are outcomes, not errors: the sweep and the suite both need to
/// keep going after a failed exchange.
pub enum ChatOutcome {
    Success {
        elapsed_seconds: f64,
        content: String,
        prompt_tokens: Option<u64>,
        completion_tokens: Option<u64>,
        total_tokens: Option<u64>,
    },
    Http {
        elapsed_seconds: f64,
        status: u16,
        body: String,
    },
    Transport {
        elapsed_seconds: f64,
        failure: FailureKind,
        message: String,
    },
}

/// Issue one non-streaming `POST /v1/chat/completions` and time it.
pub fn send_chat(
    config: &ProbeConfig,
    model: &str,
    messages: &[ChatMessage],
    max_tokens: u32,
    temperature: f32,
    timeout: Duration,
) -> ChatOutcome {
    let client = match http_client(timeout) {
        Ok(client) => client,
        Err(e) => {
            return ChatOutcome::Transport {
                elapsed_seconds: 0.0,
                failure: FailureKind::Unknown,
                message: e.to_string(),
            }
        }
    };

    let payload = serde_json::json!({
        "model": model,
        "messages": messages,
        "max_tokens": max_tokens,
        "temperature": temperature,
        "stream": false,
    });

    let start = Instant::now();
    let response = client
        .post(config.openai_url("chat/completions"))
        .headers(config.headers())
        .json(&payload)
        .send();
    let elapsed_seconds = start.elapsed().as_secs_f64();

    match response {
        Ok(response) => {
            let status = response.status();
            if status.is_success() {
                let body: ChatCompletionResponse = match response.json() {
                    Ok(body) => body,
                    Err(e) => {
                        return ChatOutcome::Transport {
                            elapsed_seconds,
                            failure: FailureKind::Unknown,
                            message: format!("malformed response body: {}", e),
                        }
                    }
                };
                let content = body
                    .choices
                    .first()
                    .and_then(|choice| choice.message.as_ref())
                    .and_then(|message| message.content.clone())
                    .unwrap_or_default();
                let usage = body.usage.unwrap_or_default();
                ChatOutcome::Success {
                    elapsed_seconds,
                    content,
                    prompt_tokens: usage.prompt_tokens,
                    completion_tokens: usage.completion_tokens,
                    total_tokens: usage.total_tokens,
                }
            } else {
                ChatOutcome::Http {
                    elapsed_seconds,
                    status: status.as_u16(),
                    body: response.text().unwrap_or_default(),
                }
            }
        }
        Err(e) => ChatOutcome::Transport {
            elapsed_seconds,
            failure: classify_transport(&e),
            message: e.to_string(),
        },
    }
}

/// Single chat completion probe with an optional system prompt.
pub fn run_chat_probe(
    config: &ProbeConfig,
    model: &str,
    system: Option<&str>,
    prompt: &str,
    max_tokens: u32,
    temperature: f32,
) -> GenerationReport {
    let mut messages = Vec::new();
    if let Some(system) = system {
        messages.push(ChatMessage::system(system));
    }
    messages.push(ChatMessage::user(prompt));

    let outcome = send_chat(
        config,
        model,
        &messages,
        max_tokens,
        temperature,
        config.request_timeout(),
    );
    report_from_outcome(model, outcome)
}

pub(crate) fn report_from_outcome(model: &str, outcome: ChatOutcome) -> GenerationReport {
    let mut report = GenerationReport {
        api: "openai".to_string(),
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
    };

    match outcome {
        ChatOutcome::Success {
            elapsed_seconds,
            content,
            prompt_tokens,
            completion_tokens,
            total_tokens,
        } => {
            report.success = true;
            report.status_code = Some(200);
            report.elapsed_seconds = elapsed_seconds;
            report.prompt_tokens = prompt_tokens;
            report.completion_tokens = completion_tokens;
            report.total_tokens = total_tokens;
            report.preview = Some(preview(&content, 200));
            if let Some(completion) = completion_tokens {
                report.tokens_per_second = tokens_per_second(completion, elapsed_seconds);
            }
        }
        ChatOutcome::Http {
            elapsed_seconds,
            status,
            body,
        } => {
            report.status_code = Some(status);
            report.elapsed_seconds = elapsed_seconds;
            report.failure = Some(classify_failure(status, &body));
            report.error = Some(preview(&body, 500));
        }
        ChatOutcome::Transport {
            elapsed_seconds,
            failure,
            message,
        } => {
            report.elapsed_seconds = elapsed_seconds;
            report.failure = Some(failure);
            report.error = Some(message);
        }
    }

    report
}

const CONVERSATION_TOPICS: &[&str] = &[
    "What are the main trade-offs between model size and inference latency?",
    "How does context length affect prompt processing time?",
    "Explain what quantization does to a model's memory footprint.",
    "What is the difference between time to first token and tokens per second?",
    "How does batching improve serving throughput?",
    "What happens when a request exceeds the model's context window?",
    "Describe how a KV cache speeds up token generation.",
    "Why can long outputs slow down over the course of generation?",
    "What sampling parameters most influence output determinism?",
    "How would you detect that an inference server is memory-constrained?",
];

/// Multi-turn probe that feeds each assistant reply back into the message
/// history, growing the context with every turn.
pub fn run_conversation_probe(
    config: &ProbeConfig,
    model: &str,
    turns: u32,
    max_tokens: u32,
) -> ConversationReport {
    let mut report = ConversationReport {
        model: model.to_string(),
        turns_requested: turns,
        turns_completed: 0,
        total_tokens: 0,
        elapsed_seconds: 0.0,
        context_bytes: 0,
        success: false,
        error: None,
    };

    let mut history = vec![ChatMessage::system(
        "You are a concise assistant answering questions about LLM serving.",
    )];

    let turns = (turns as usize).min(CONVERSATION_TOPICS.len());
    for topic in CONVERSATION_TOPICS.iter().take(turns) {
        history.push(ChatMessage::user(*topic));

        let outcome = send_chat(
            config,
            model,
            &history,
            max_tokens,
            0.7,
            config.request_timeout(),
        );
        match outcome {
            ChatOutcome::Success {
                elapsed_seconds,
                content,
                prompt_tokens,
                completion_tokens,
                ..
            } => {
                report.turns_completed += 1;
                report.elapsed_seconds += elapsed_seconds;
                report.total_tokens +=
                    prompt_tokens.unwrap_or(0) + completion_tokens.unwrap_or(0);
                history.push(ChatMessage::assistant(content));
            }
            ChatOutcome::Http { status, body, .. } => {
                report.error = Some(format!(
                    "turn {} failed: HTTP {}: {}",
                    report.turns_completed + 1,
                    status,
                    preview(&body, 200)
                ));
                break;
            }
            ChatOutcome::Transport { message, .. } => {
                report.error = Some(format!(
                    "turn {} failed: {}",
                    report.turns_completed + 1,
                    message
                ));
                break;
            }
        }
    }

    report.context_bytes = serde_json::to_string(&history).map(|s| s.len()).unwrap_or(0);
    report.success = report.turns_completed as usize == turns;
    report
}
