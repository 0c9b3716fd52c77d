//! Async HTTP client for the external chat-completions proxy.
//!
//! The relay hands this client one assembled prompt string plus a model
//! identifier and gets back the reply text. Retries, upstream routing, and
//! the proxy's own provider fan-out are the proxy's business — this client
//! knows one endpoint and one request shape.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default chat-completions endpoint of the upstream proxy.
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.a3z.ai/v1/chat/completions";

/// Sampling temperature used for every relayed request.
const TEMPERATURE: f32 = 0.7;

/// Response token cap for every relayed request.
const MAX_TOKENS: u32 = 4096;

// ── Wire types ─────────────────────────────────────────────────────

#[derive(Serialize, Debug)]
struct WireRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize, Debug)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize, Debug)]
struct RawResponse {
    choices: Option<Vec<RawChoice>>,
    error: Option<RawError>,
}

#[derive(Deserialize, Debug)]
struct RawChoice {
    message: RawMessage,
}

#[derive(Deserialize, Debug)]
struct RawMessage {
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct RawError {
    message: String,
}

/// A reply from the upstream proxy.
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub text: String,
    /// The model that actually served the request.
    pub model: String,
}

// ── Client ─────────────────────────────────────────────────────────

/// Async client for the upstream chat-completions proxy.
pub struct UpstreamClient {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl UpstreamClient {
    /// Create a client for the default upstream endpoint.
    pub fn new(api_key: Option<String>) -> Result<Self, String> {
        Self::with_url(DEFAULT_UPSTREAM_URL, api_key)
    }

    /// Create a client for a specific endpoint URL.
    pub fn with_url(url: impl Into<String>, api_key: Option<String>) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .user_agent("parley-relay/0.1")
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| format!("failed to build HTTP client: {e}"))?;
        Ok(Self {
            client,
            url: url.into(),
            api_key,
        })
    }

    /// Send one assembled prompt and return the reply text.
    pub async fn chat(&self, prompt: &str, model: &str) -> Result<ChatReply, String> {
        let body = WireRequest {
            model,
            messages: vec![WireMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };
        debug!(
            "Upstream request: model={}, prompt={} chars",
            model,
            prompt.chars().count()
        );

        let start = Instant::now();
        let mut request = self.client.post(&self.url).json(&body);
        if let Some(ref key) = self.api_key {
            request = request.header("Authorization", format!("Bearer {key}"));
        }

        let resp = request
            .send()
            .await
            .map_err(|e| format!("upstream request failed: {e}"))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| format!("failed to read upstream response: {e}"))?;
        debug!(
            "Upstream response: HTTP {} in {:.1}s ({} bytes)",
            status,
            start.elapsed().as_secs_f64(),
            text.len()
        );

        if !status.is_success() {
            return Err(format!("upstream API HTTP {status}: {text}"));
        }

        let parsed: RawResponse = serde_json::from_str(&text)
            .map_err(|e| format!("failed to parse upstream response: {e}"))?;

        if let Some(err) = parsed.error {
            return Err(format!("upstream API error: {}", err.message));
        }

        let reply = parsed
            .choices
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.message.content)
            .unwrap_or_else(|| "No response generated".to_string());

        Ok(ChatReply {
            text: reply,
            model: model.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_request_shape() {
        let body = WireRequest {
            model: "gpt-4o-mini",
            messages: vec![WireMessage {
                role: "user",
                content: "hello",
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hello");
        assert_eq!(json["max_tokens"], 4096);
    }

    #[test]
    fn raw_response_with_choices_parses() {
        let json = r#"{"choices":[{"message":{"content":"hi there"}}]}"#;
        let parsed: RawResponse = serde_json::from_str(json).unwrap();
        let content = parsed.choices.unwrap()[0].message.content.clone();
        assert_eq!(content.as_deref(), Some("hi there"));
    }

    #[test]
    fn raw_response_with_embedded_error_parses() {
        let json = r#"{"error":{"message":"model overloaded"}}"#;
        let parsed: RawResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.error.unwrap().message, "model overloaded");
        assert!(parsed.choices.is_none());
    }

    #[tokio::test]
    async fn unreachable_upstream_is_an_err_not_a_panic() {
        // Port 9 (discard) refuses connections on any sane host.
        let client = UpstreamClient::with_url("http://127.0.0.1:9/v1/chat", None).unwrap();
        let result = client.chat("hello", "gpt-4o-mini").await;
        assert!(result.is_err());
    }
}
