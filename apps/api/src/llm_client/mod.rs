//! Outbound client for the Anthropic Messages API.
//!
//! Only the chatbot's intent classifier uses it, and only through
//! [`LlmClient::call_json`]. Retry and token logging live here.
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
pub const MODEL: &str = "claude-sonnet-4-5";
/// Intent payloads are a few dozen tokens.
const MAX_TOKENS: u32 = 512;
const MAX_ATTEMPTS: u32 = 3;
const BASE_BACKOFF: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Gave up after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: Box<LlmError>,
    },

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'static str,
    max_tokens: u32,
    system: &'a str,
    messages: [UserTurn<'a>; 1],
}

#[derive(Serialize)]
struct UserTurn<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<Block>,
    usage: TokenUsage,
}

#[derive(Deserialize)]
struct Block {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[derive(Deserialize)]
struct TokenUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl MessagesResponse {
    fn into_text(self) -> Option<String> {
        self.content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
    }
}

/// Result of one HTTP attempt.
enum Attempt {
    Done(MessagesResponse),
    Retry(LlmError),
    Fail(LlmError),
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Delay before retry number `retry` (1-based): 500ms, 1s, 2s, ...
fn backoff(retry: u32) -> Duration {
    BASE_BACKOFF * 2u32.pow(retry.saturating_sub(1))
}

#[derive(Clone)]
pub struct LlmClient {
    http: Client,
    api_key: String,
}

impl LlmClient {
    /// `request_timeout` bounds each HTTP attempt. Callers bound the whole
    /// call themselves.
    pub fn new(api_key: String, request_timeout: Duration) -> Result<Self, LlmError> {
        let http = Client::builder().timeout(request_timeout).build()?;
        Ok(Self { http, api_key })
    }

    /// Sends one user turn and parses the reply text as JSON.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<T, LlmError> {
        let text = self.complete(prompt, system).await?;
        Ok(serde_json::from_str(strip_json_fences(&text))?)
    }

    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let body = MessagesRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages: [UserTurn {
                role: "user",
                content: prompt,
            }],
        };

        let mut attempt = 1;
        loop {
            match self.send_once(&body).await {
                Attempt::Done(response) => {
                    debug!(
                        input_tokens = response.usage.input_tokens,
                        output_tokens = response.usage.output_tokens,
                        "LLM call succeeded"
                    );
                    return response.into_text().ok_or(LlmError::EmptyContent);
                }
                Attempt::Fail(err) => return Err(err),
                Attempt::Retry(err) if attempt >= MAX_ATTEMPTS => {
                    return Err(LlmError::Exhausted {
                        attempts: attempt,
                        last: Box::new(err),
                    });
                }
                Attempt::Retry(err) => {
                    let delay = backoff(attempt);
                    warn!(
                        "LLM attempt {attempt} failed ({err}), retrying in {}ms",
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn send_once(&self, body: &MessagesRequest<'_>) -> Attempt {
        let response = match self
            .http
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => return Attempt::Retry(err.into()),
        };

        let status = response.status();
        if status.is_success() {
            return match response.json::<MessagesResponse>().await {
                Ok(parsed) => Attempt::Done(parsed),
                Err(err) => Attempt::Fail(err.into()),
            };
        }

        let raw = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&raw)
            .map(|envelope| envelope.error.message)
            .unwrap_or(raw);
        let err = LlmError::Api {
            status: status.as_u16(),
            message,
        };

        if is_retryable(status) {
            warn!("LLM API returned {status}");
            Attempt::Retry(err)
        } else {
            Attempt::Fail(err)
        }
    }
}

/// Models sometimes wrap JSON in markdown fences despite the system prompt.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(body) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    let body = body.trim_start();
    body.strip_suffix("```").map(str::trim).unwrap_or(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fences_are_stripped() {
        assert_eq!(
            strip_json_fences("```json\n{\"intent\": \"general_stats\"}\n```"),
            "{\"intent\": \"general_stats\"}"
        );
        assert_eq!(
            strip_json_fences("```\n{\"intent\": \"general_stats\"}\n```"),
            "{\"intent\": \"general_stats\"}"
        );
        assert_eq!(
            strip_json_fences("```json\n{\"intent\": \"salary_stats\"}"),
            "{\"intent\": \"salary_stats\"}"
        );
    }

    #[test]
    fn test_bare_json_is_trimmed() {
        assert_eq!(
            strip_json_fences("  {\"intent\": \"unknown\"} "),
            "{\"intent\": \"unknown\"}"
        );
    }

    #[test]
    fn test_backoff_doubles() {
        assert_eq!(backoff(1), Duration::from_millis(500));
        assert_eq!(backoff(2), Duration::from_secs(1));
        assert_eq!(backoff(3), Duration::from_secs(2));
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable(StatusCode::BAD_GATEWAY));
        assert!(!is_retryable(StatusCode::UNAUTHORIZED));
        assert!(!is_retryable(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn test_first_text_block_wins() {
        let response: MessagesResponse = serde_json::from_str(
            r#"{"content": [{"type": "tool_use"}, {"type": "text", "text": "{}"}],
                "usage": {"input_tokens": 10, "output_tokens": 2}}"#,
        )
        .unwrap();
        assert_eq!(response.into_text().as_deref(), Some("{}"));
    }

    #[test]
    fn test_exhausted_keeps_last_failure() {
        use std::error::Error as _;

        let err = LlmError::Exhausted {
            attempts: MAX_ATTEMPTS,
            last: Box::new(LlmError::Api {
                status: 503,
                message: "overloaded".to_string(),
            }),
        };
        assert_eq!(
            err.to_string(),
            "Gave up after 3 attempts: API error (status 503): overloaded"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_client_builds_without_network() {
        assert!(LlmClient::new("key".to_string(), Duration::from_secs(2)).is_ok());
    }
}
