//! Core [`GenerationClient`] trait and [`OpenAiClient`] implementation.
//!
//! `OpenAiClient` talks to the three OpenAI generation endpoints:
//! `/v1/chat/completions`, `/v1/images/generations` and `/v1/audio/speech`,
//! plus a plain GET for downloading a generated image. All connection
//! details come from [`AppConfig`]; nothing is hardcoded except the
//! endpoint paths themselves.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{ApiKey, AppConfig};
use crate::openai::parse::{self, ParseError};
use crate::openai::wire::{
    ChatMessage, ChatRequest, ChatResponse, ImageRequest, ImageResponse, SpeechRequest,
};

// ---------------------------------------------------------------------------
// ClientError
// ---------------------------------------------------------------------------

/// Errors that can occur while talking to a generation endpoint.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network-level failure: DNS, connection refused, TLS, body read.
    #[error("transport error: {0}")]
    Transport(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The endpoint answered with a non-success status.
    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    /// The response arrived but its shape was unexpected.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Transport(e.to_string())
        }
    }
}

impl From<ParseError> for ClientError {
    fn from(e: ParseError) -> Self {
        ClientError::MalformedResponse(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// GenerationClient trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface to the generation endpoints.
///
/// Implementations must be `Send + Sync` so they can be held behind an
/// `Arc<dyn GenerationClient>` and called from any task. Each operation is
/// single-attempt: a failure is reported once and never retried internally.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Complete `prompt` into text.
    async fn complete_text(&self, prompt: &str) -> Result<String, ClientError>;

    /// Generate one image for `prompt`; returns the image URL.
    async fn generate_image(&self, prompt: &str) -> Result<String, ClientError>;

    /// Synthesize `text` into audio; returns the raw response bytes.
    async fn synthesize_speech(&self, text: &str) -> Result<Vec<u8>, ClientError>;

    /// Download the bytes behind a generated-image URL.
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, ClientError>;
}

// Compile-time assertion: Box<dyn GenerationClient> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn GenerationClient>) {}
};

// ---------------------------------------------------------------------------
// OpenAiClient
// ---------------------------------------------------------------------------

/// Production client backed by `reqwest`.
///
/// The HTTP client is pre-configured with the per-request timeout from
/// `config.generation.timeout_secs`. A default (no-timeout) client is used
/// as a last-resort fallback if the builder fails (should never happen in
/// practice).
pub struct OpenAiClient {
    client: reqwest::Client,
    config: AppConfig,
    api_key: ApiKey,
}

impl OpenAiClient {
    /// Build an `OpenAiClient` from application config and a loaded key.
    pub fn from_config(config: &AppConfig, api_key: ApiKey) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.generation.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
            api_key,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.config.generation.base_url)
    }

    /// POST `body` as JSON with the bearer header; map non-2xx to
    /// [`ClientError::Api`] carrying the response text.
    async fn post_json<B: serde::Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<reqwest::Response, ClientError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(self.api_key.expose())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("openai: {url} answered {status}: {body}");
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl GenerationClient for OpenAiClient {
    async fn complete_text(&self, prompt: &str) -> Result<String, ClientError> {
        let body = ChatRequest {
            model: self.config.generation.model.wire_name().into(),
            messages: vec![ChatMessage::user(prompt)],
            max_tokens: self.config.generation.max_tokens,
            temperature: self.config.generation.temperature,
        };

        log::debug!("openai: chat completion, prompt len {}", prompt.len());

        let response = self
            .post_json(&self.endpoint("/v1/chat/completions"), &body)
            .await?;
        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;

        Ok(parse::completion_text(&parsed)?)
    }

    async fn generate_image(&self, prompt: &str) -> Result<String, ClientError> {
        let body = ImageRequest {
            prompt: prompt.into(),
            n: 1,
            size: self.config.image.size.clone(),
        };

        log::debug!("openai: image generation, prompt len {}", prompt.len());

        let response = self
            .post_json(&self.endpoint("/v1/images/generations"), &body)
            .await?;
        let parsed: ImageResponse = response
            .json()
            .await
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;

        Ok(parse::image_url(&parsed)?)
    }

    async fn synthesize_speech(&self, text: &str) -> Result<Vec<u8>, ClientError> {
        let body = SpeechRequest {
            input: text.into(),
            model: self.config.speech.model.clone(),
            voice: self.config.speech.voice.clone(),
            response_format: self.config.speech.response_format.clone(),
        };

        log::debug!("openai: speech synthesis, input len {}", text.len());

        let response = self
            .post_json(&self.endpoint("/v1/audio/speech"), &body)
            .await?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, ClientError> {
        log::debug!("openai: fetching image bytes from {url}");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_client() -> OpenAiClient {
        OpenAiClient::from_config(&AppConfig::default(), ApiKey::from_raw("sk-test"))
    }

    #[test]
    fn from_config_builds_without_panic() {
        let _client = make_client();
    }

    #[test]
    fn endpoint_joins_base_url_and_path() {
        let client = make_client();
        assert_eq!(
            client.endpoint("/v1/chat/completions"),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    /// Verify that `OpenAiClient` is object-safe (usable as `dyn GenerationClient`).
    #[test]
    fn client_is_object_safe() {
        let client: Box<dyn GenerationClient> = Box::new(make_client());
        drop(client);
    }

    #[test]
    fn parse_error_maps_to_malformed_response() {
        let err: ClientError = ParseError::MalformedResponse("no choices").into();
        assert!(matches!(err, ClientError::MalformedResponse(_)));
    }
}
