use serde::Serialize;

/// Best-effort category for a failed probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    OutOfMemory,
    ContextLimit,
    Timeout,
    PayloadTooLarge,
    ServerError,
    ValidationError,
    ConnectionFailed,
    Unknown,
}

impl FailureKind {
    pub fn describe(&self) -> &'static str {
        match self {
            FailureKind::OutOfMemory => "memory limit reached",
            FailureKind::ContextLimit => "context window limit exceeded",
            FailureKind::Timeout => "request timed out",
            FailureKind::PayloadTooLarge => "request too large",
            FailureKind::ServerError => "server error, possibly resource exhaustion",
            FailureKind::ValidationError => "input validation failed",
            FailureKind::ConnectionFailed => "service unreachable",
            FailureKind::Unknown => "unknown failure",
        }
    }
}

type Rule = (fn(u16, &str) -> bool, FailureKind);

/// Ordered classification rules over (status code, lower-cased body).
/// Substring matching against an unstructured error body is inherently
/// fragile; treat the result as a hint, not an authoritative diagnosis.
const RULES: &[Rule] = &[
    (
        |_, body| body.contains("out of memory") || body.contains("oom"),
        FailureKind::OutOfMemory,
    ),
    (
        |_, body| body.contains("context") && (body.contains("limit") || body.contains("exceeded")),
        FailureKind::ContextLimit,
    ),
    (|_, body| body.contains("timeout"), FailureKind::Timeout),
    (|status, _| status == 413, FailureKind::PayloadTooLarge),
    (|status, _| status >= 500, FailureKind::ServerError),
    (|status, _| status == 422, FailureKind::ValidationError),
];

pub fn classify_failure(status: u16, body: &str) -> FailureKind {
    let text = body.to_lowercase();
    for (matches, kind) in RULES {
        if matches(status, &text) {
            return *kind;
        }
    }
    FailureKind::Unknown
}

/// Classify a transport-level error from the HTTP client, before any
/// response body exists.
pub fn classify_transport(error: &reqwest::Error) -> FailureKind {
    if error.is_timeout() {
        FailureKind::Timeout
    } else if error.is_connect() {
        FailureKind::ConnectionFailed
    } else {
        FailureKind::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_memory() {
        assert_eq!(
            classify_failure(500, "CUDA error: Out of Memory"),
            FailureKind::OutOfMemory
        );
        assert_eq!(classify_failure(400, "OOM killed"), FailureKind::OutOfMemory);
    }

    #[test]
    fn test_context_limit() {
        assert_eq!(
            classify_failure(400, "context length limit reached"),
            FailureKind::ContextLimit
        );
        assert_eq!(
            classify_failure(400, "maximum context size exceeded"),
            FailureKind::ContextLimit
        );
        // "context" alone is not enough
        assert_eq!(
            classify_failure(400, "invalid context parameter"),
            FailureKind::Unknown
        );
    }

    #[test]
    fn test_timeout_substring() {
        assert_eq!(
            classify_failure(504, "upstream timeout"),
            FailureKind::Timeout
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(classify_failure(413, ""), FailureKind::PayloadTooLarge);
        assert_eq!(classify_failure(500, ""), FailureKind::ServerError);
        assert_eq!(classify_failure(503, ""), FailureKind::ServerError);
        assert_eq!(classify_failure(422, ""), FailureKind::ValidationError);
        assert_eq!(classify_failure(404, "not found"), FailureKind::Unknown);
    }

    #[test]
    fn test_body_rules_beat_status_rules() {
        // A 500 with an OOM body classifies as out-of-memory, not server error
        assert_eq!(
            classify_failure(500, "worker ran out of memory"),
            FailureKind::OutOfMemory
        );
        assert_eq!(
            classify_failure(413, "context limit exceeded"),
            FailureKind::ContextLimit
        );
    }
}
