//! Completion client for the Anthropic Messages API.
//!
//! Every invocation performs exactly one request. Requests are built from a
//! [`Mode`] through the single [`CompletionRequest::new`] builder.

pub mod types;

use crate::config::{Config, ModelSettings};
use crate::error::{Error, Result};
use crate::mode::Mode;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};
use types::{ApiErrorBody, CompletionRequest, CompletionResponse};

/// Longest raw error body echoed back when the API error cannot be decoded.
const MAX_ERROR_BODY: usize = 200;

/// Client for one completion exchange.
pub struct CompletionClient {
    url: String,
    models: ModelSettings,
    client: Client,
}

impl CompletionClient {
    /// Create a client from configuration.
    ///
    /// Fails if the API key is missing or cannot be sent as a header.
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config.api.require_api_key()?;

        let mut headers = HeaderMap::new();
        let mut key_value = HeaderValue::from_str(api_key).map_err(|_| Error::InvalidApiKey)?;
        key_value.set_sensitive(true);
        headers.insert("x-api-key", key_value);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_str(&config.api.version)
                .map_err(|e| Error::Config(anyhow::anyhow!("invalid API version header: {}", e)))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.api.timeout())
            .default_headers(headers)
            .build()
            .map_err(Error::Client)?;

        Ok(Self {
            url: config.api.url.clone(),
            models: config.models.clone(),
            client,
        })
    }

    /// Return a corrected version of `text`.
    pub async fn proofread(&self, text: &str) -> Result<String> {
        self.run(Mode::Proofread, text).await
    }

    /// Answer a programming question.
    pub async fn ask_programming_question(&self, text: &str) -> Result<String> {
        self.run(Mode::Question, text).await
    }

    /// Run `mode` on `input` and return the model's text.
    pub async fn run(&self, mode: Mode, input: &str) -> Result<String> {
        let request = mode.request(input, &self.models);
        self.complete(&request).await
    }

    /// Send `request` and extract the first text block of the reply.
    pub async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let response = self.send(request).await?;
        response
            .first_text()
            .map(str::to_string)
            .ok_or(Error::EmptyResponse)
    }

    async fn send(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let body = serde_json::to_vec(request).map_err(Error::Encode)?;

        let http_request = self
            .client
            .post(&self.url)
            .body(body)
            .build()
            .map_err(Error::Request)?;

        debug!(
            model = %request.model,
            max_tokens = request.max_tokens,
            content_len = request.content().len(),
            "Sending completion request"
        );

        let response = self
            .client
            .execute(http_request)
            .await
            .map_err(|source| self.transport_error(source))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|source| self.transport_error(source))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Completion request rejected");
            return Err(api_error(status, &bytes));
        }

        let completion: CompletionResponse =
            serde_json::from_slice(&bytes).map_err(Error::Decode)?;

        debug!(
            id = %completion.id,
            model = %completion.model,
            stop_reason = completion.stop_reason.as_deref().unwrap_or("none"),
            input_tokens = completion.usage.input_tokens,
            output_tokens = completion.usage.output_tokens,
            "Received completion"
        );

        Ok(completion)
    }

    fn transport_error(&self, source: reqwest::Error) -> Error {
        Error::Transport {
            url: self.url.clone(),
            source,
        }
    }
}

/// Build an [`Error::Api`] from a non-2xx response body.
fn api_error(status: StatusCode, body: &[u8]) -> Error {
    let message = match serde_json::from_slice::<ApiErrorBody>(body) {
        Ok(parsed) if parsed.error.error_type.is_empty() => parsed.error.message,
        Ok(parsed) => format!("{} ({})", parsed.error.message, parsed.error.error_type),
        Err(_) => {
            let raw = String::from_utf8_lossy(body);
            let raw = raw.trim();
            if raw.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                raw.chars().take(MAX_ERROR_BODY).collect()
            }
        }
    };
    Error::Api {
        status: status.as_u16(),
        message,
    }
}
