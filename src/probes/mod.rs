// Service probe modules
pub mod chat;
pub mod classify;
pub mod generate;
pub mod health;
pub mod models;
pub mod prompt;
pub mod stream;
pub mod sweep;
pub mod types;

// Re-export main probe functions
pub use chat::{run_chat_probe, run_conversation_probe};
pub use generate::run_generate_probe;
pub use health::run_health_probe;
pub use models::{list_native_models, list_openai_models, resolve_model, show_model};
pub use stream::run_stream_probe;
pub use sweep::run_sweep;

use std::time::Duration;

pub(crate) fn http_client(
    timeout: Duration,
) -> Result<reqwest::blocking::Client, reqwest::Error> {
    reqwest::blocking::Client::builder().timeout(timeout).build()
}

/// Completion tokens divided by wall-clock seconds. Omitted (None) when the
/// probe produced no tokens or no measurable elapsed time.
pub fn tokens_per_second(completion_tokens: u64, elapsed_seconds: f64) -> Option<f64> {
    if elapsed_seconds > 0.0 && completion_tokens > 0 {
        Some(completion_tokens as f64 / elapsed_seconds)
    } else {
        None
    }
}

/// First `limit` characters of `text`, for response previews and truncated
/// error bodies.
pub fn preview(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_per_second() {
        assert_eq!(tokens_per_second(150, 3.0), Some(50.0));
    }

    #[test]
    fn test_tokens_per_second_guards() {
        assert_eq!(tokens_per_second(0, 3.0), None);
        assert_eq!(tokens_per_second(150, 0.0), None);
        assert_eq!(tokens_per_second(150, -1.0), None);
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        assert_eq!(preview("héllo wörld", 5), "héllo");
        assert_eq!(preview("short", 200), "short");
    }
}
