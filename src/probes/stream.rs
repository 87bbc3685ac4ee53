use std::io::{BufRead, BufReader, Write};
use std::time::Instant;

use crate::config::ProbeConfig;
use crate::probes::types::{ChatCompletionResponse, ChatMessage, StreamReport};
use crate::probes::{http_client, preview};

/// What one server-sent-event line contributes to the stream.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum StreamEvent {
    /// A non-empty content fragment from `choices[0].delta.content`.
    Content(String),
    /// The literal `data: [DONE]` terminator.
    Done,
    /// Anything else: lines without the `data: ` prefix, malformed JSON
    /// payloads, and events carrying no content. All are skipped without
    /// aborting the stream.
    Ignored,
}

pub(crate) fn parse_stream_line(line: &str) -> StreamEvent {
    let data = match line.strip_prefix("data: ") {
        Some(data) => data,
        None => return StreamEvent::Ignored,
    };
    if data.trim() == "[DONE]" {
        return StreamEvent::Done;
    }

    match serde_json::from_str::<ChatCompletionResponse>(data) {
        Ok(event) => event
            .choices
            .first()
            .and_then(|choice| choice.delta.as_ref())
            .and_then(|delta| delta.content.clone())
            .filter(|content| !content.is_empty())
            .map(StreamEvent::Content)
            .unwrap_or(StreamEvent::Ignored),
        Err(_) => StreamEvent::Ignored,
    }
}

/// Streaming chat completion probe. Prints fragments as they arrive and
/// reports chunk/character counts at the end.
pub fn run_stream_probe(
    config: &ProbeConfig,
    model: &str,
    prompt: &str,
    max_tokens: u32,
    temperature: f32,
) -> StreamReport {
    let mut report = StreamReport {
        model: model.to_string(),
        success: false,
        status_code: None,
        chunks: 0,
        characters: 0,
        elapsed_seconds: 0.0,
        error: None,
    };

    let client = match http_client(config.request_timeout()) {
        Ok(client) => client,
        Err(e) => {
            report.error = Some(e.to_string());
            return report;
        }
    };

    let payload = serde_json::json!({
        "model": model,
        "messages": [ChatMessage::user(prompt)],
        "max_tokens": max_tokens,
        "temperature": temperature,
        "stream": true,
    });

    let mut headers = config.headers();
    headers.insert(
        reqwest::header::ACCEPT,
        reqwest::header::HeaderValue::from_static("text/event-stream"),
    );

    let start = Instant::now();
    let response = match client
        .post(config.openai_url("chat/completions"))
        .headers(headers)
        .json(&payload)
        .send()
    {
        Ok(response) => response,
        Err(e) => {
            report.elapsed_seconds = start.elapsed().as_secs_f64();
            report.error = Some(e.to_string());
            return report;
        }
    };

    let status = response.status();
    report.status_code = Some(status.as_u16());
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        report.elapsed_seconds = start.elapsed().as_secs_f64();
        report.error = Some(preview(&body, 500));
        return report;
    }

    let reader = BufReader::new(response);
    let mut terminated = false;
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                report.error = Some(format!("stream read failed: {}", e));
                break;
            }
        };
        match parse_stream_line(&line) {
            StreamEvent::Content(content) => {
                print!("{}", content);
                let _ = std::io::stdout().flush();
                report.chunks += 1;
                report.characters += content.chars().count();
            }
            StreamEvent::Done => {
                terminated = true;
                break;
            }
            StreamEvent::Ignored => {}
        }
    }
    println!();

    report.elapsed_seconds = start.elapsed().as_secs_f64();
    report.success = report.error.is_none() && terminated;
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_line() {
        let line = r#"data: {"choices":[{"delta":{"content":"Hello"}}]}"#;
        assert_eq!(
            parse_stream_line(line),
            StreamEvent::Content("Hello".to_string())
        );
    }

    #[test]
    fn test_done_terminator() {
        assert_eq!(parse_stream_line("data: [DONE]"), StreamEvent::Done);
        // surrounding whitespace inside the payload still terminates
        assert_eq!(parse_stream_line("data:  [DONE] "), StreamEvent::Done);
    }

    #[test]
    fn test_non_data_lines_ignored() {
        assert_eq!(parse_stream_line(""), StreamEvent::Ignored);
        assert_eq!(parse_stream_line(": keep-alive"), StreamEvent::Ignored);
        assert_eq!(parse_stream_line("event: message"), StreamEvent::Ignored);
    }

    #[test]
    fn test_malformed_json_skipped() {
        assert_eq!(parse_stream_line("data: {not json"), StreamEvent::Ignored);
    }

    #[test]
    fn test_empty_delta_ignored() {
        let line = r#"data: {"choices":[{"delta":{}}]}"#;
        assert_eq!(parse_stream_line(line), StreamEvent::Ignored);
        let line = r#"data: {"choices":[{"delta":{"content":""}}]}"#;
        assert_eq!(parse_stream_line(line), StreamEvent::Ignored);
    }
}
