//! `echo` and `streaming_echo` diagnostic tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::validate::{Issue, Validate};

const NO_MESSAGE: &str = "No message provided";
const DEFAULT_COUNT: u32 = 3;
pub const MAX_STREAM_COUNT: u32 = 50;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct EchoParams {
    #[schemars(description = "Message to echo back")]
    pub message: Option<String>,
}

impl Validate for EchoParams {
    fn validate(&self) -> Vec<Issue> {
        Vec::new()
    }
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct StreamingEchoParams {
    #[schemars(description = "Message to echo back")]
    pub message: Option<String>,

    #[schemars(description = "Number of messages to send (default 3)")]
    pub count: Option<u32>,
}

impl Validate for StreamingEchoParams {
    fn validate(&self) -> Vec<Issue> {
        match self.count {
            Some(n) if n > MAX_STREAM_COUNT => vec![Issue::new(
                "count",
                format!("must be at most {MAX_STREAM_COUNT}"),
            )],
            _ => Vec::new(),
        }
    }
}

impl StreamingEchoParams {
    /// Zero and absent both mean the default.
    pub fn count(&self) -> u32 {
        match self.count {
            Some(0) | None => DEFAULT_COUNT,
            Some(n) => n,
        }
    }
}

fn message_or_default(message: Option<&str>) -> &str {
    match message {
        Some(m) if !m.is_empty() => m,
        _ => NO_MESSAGE,
    }
}

pub fn echo_text(params: &EchoParams) -> String {
    format!("Echo: {}", message_or_default(params.message.as_deref()))
}

/// Text of the `i`-th (1-based) streamed message.
pub fn streaming_echo_text(params: &StreamingEchoParams, i: u32) -> String {
    format!(
        "Streaming Echo {}/{}: {}",
        i,
        params.count(),
        message_or_default(params.message.as_deref())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_defaults_when_missing_or_empty() {
        assert_eq!(echo_text(&EchoParams { message: None }), "Echo: No message provided");
        assert_eq!(
            echo_text(&EchoParams { message: Some(String::new()) }),
            "Echo: No message provided"
        );
        assert_eq!(echo_text(&EchoParams { message: Some("hi".into()) }), "Echo: hi");
    }

    #[test]
    fn streaming_count_defaults_to_three() {
        let p = StreamingEchoParams { message: Some("x".into()), count: Some(0) };
        assert_eq!(p.count(), 3);
        assert_eq!(streaming_echo_text(&p, 2), "Streaming Echo 2/3: x");
    }

    #[test]
    fn streaming_count_is_capped() {
        let p = StreamingEchoParams { message: None, count: Some(MAX_STREAM_COUNT + 1) };
        assert_eq!(p.validate().len(), 1);
    }
}
