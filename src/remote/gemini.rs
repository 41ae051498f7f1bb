//! Gemini `generateContent` adapter.
//!
//! The only place where HTTP statuses and error text are interpreted: every
//! failure leaves here as a categorized [`RemoteError`].

use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};

use crate::config::{ModelConfig, SecureString};
use crate::generation::{GenerationRequest, RemoteError, RemoteErrorCategory, TextGenerator};

use super::dto::{
    Content, ErrorEnvelope, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    Part,
};

/// Used when the service says "Please retry in ..." but the number can't be read.
const UNPARSEABLE_RETRY_HINT: Duration = Duration::from_secs(30);

const RETRY_HINT_MARKER: &str = "Please retry in";

pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: SecureString,
}

impl GeminiClient {
    pub fn new(config: &ModelConfig, api_key: SecureString) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_seconds)))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url,
            model.trim_start_matches("models/")
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate_text(&self, request: &GenerationRequest) -> Result<String, RemoteError> {
        let url = self.endpoint(&request.model);
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_output_tokens,
            },
        };

        tracing::debug!(
            url = %url,
            model = %request.model,
            prompt_len = request.prompt.len(),
            max_output_tokens = request.max_output_tokens,
            "Sending generateContent request"
        );

        let start = Instant::now();
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose())
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await.map_err(transport_error)?;
        let latency_ms = start.elapsed().as_millis() as u64;

        if !status.is_success() {
            let err = classify_error(status, &headers, &text);
            tracing::warn!(
                status = %status,
                category = %err.category,
                retry_after_ms = err.retry_after.map(|d| d.as_millis() as u64),
                latency_ms,
                "Gemini API error"
            );
            return Err(err);
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text).map_err(|e| {
            RemoteError::new(
                RemoteErrorCategory::MalformedResponse,
                format!("Failed to parse response JSON: {}", e),
            )
        })?;

        let output = parsed.text();
        tracing::debug!(latency_ms, output_len = output.len(), "Gemini response received");
        Ok(output)
    }
}

fn transport_error(err: reqwest::Error) -> RemoteError {
    let category = if err.is_timeout() {
        RemoteErrorCategory::Timeout
    } else if err.is_decode() {
        RemoteErrorCategory::MalformedResponse
    } else {
        RemoteErrorCategory::Connection
    };
    RemoteError::new(category, err.to_string())
}

/// Build a [`RemoteError`] from a non-2xx response.
fn classify_error(status: StatusCode, headers: &HeaderMap, body: &str) -> RemoteError {
    let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();
    let api_status = envelope.as_ref().map(|e| e.error.status.as_str());

    let category = if status == StatusCode::TOO_MANY_REQUESTS
        || api_status == Some("RESOURCE_EXHAUSTED")
    {
        RemoteErrorCategory::RateLimited
    } else {
        match status {
            StatusCode::BAD_REQUEST => RemoteErrorCategory::InvalidRequest,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RemoteErrorCategory::Unauthorized,
            StatusCode::NOT_FOUND => RemoteErrorCategory::NotFound,
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                RemoteErrorCategory::Timeout
            }
            s if s.is_server_error() => RemoteErrorCategory::ServerError,
            _ => RemoteErrorCategory::InvalidRequest,
        }
    };

    let message = match &envelope {
        Some(e) if !e.error.message.is_empty() => e.error.message.clone(),
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => format!("HTTP {}", status),
    };

    let mut err = RemoteError::new(category, message);
    if category == RemoteErrorCategory::RateLimited {
        let retry_after = envelope
            .as_ref()
            .and_then(|e| e.error.retry_delay())
            .and_then(parse_delay)
            .or_else(|| parse_retry_hint(&err.message))
            .or_else(|| retry_after_header(headers));
        if let Some(delay) = retry_after {
            err = err.with_retry_after(delay);
        }
    }
    err
}

/// Parse a protobuf duration string such as "17s" or "0.5s".
fn parse_delay(value: &str) -> Option<Duration> {
    let seconds = value.trim().strip_suffix('s')?;
    Duration::try_from_secs_f64(seconds.trim().parse().ok()?).ok()
}

/// Extract the wait from "... Please retry in 5.3s." or "Please retry in 5 seconds".
fn parse_retry_hint(message: &str) -> Option<Duration> {
    let (_, rest) = message.split_once(RETRY_HINT_MARKER)?;
    let number: String = rest
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let parsed = number
        .parse::<f64>()
        .ok()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok());
    Some(parsed.unwrap_or(UNPARSEABLE_RETRY_HINT))
}

fn retry_after_header(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(RETRY_AFTER)?.to_str().ok()?;
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}
