use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;

use crate::{Error, Result};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(8);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub max_output_tokens: u32,
    pub top_k: u32,
    pub top_p: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.4,
            max_output_tokens: 1000,
            top_k: 40,
            top_p: 0.95,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub request_timeout: Duration,
    pub max_attempts: u32,
    pub retry_backoff: Duration,
    pub generation: GenerationConfig,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            generation: GenerationConfig::default(),
        }
    }
}

/// Status and raw body of one HTTP exchange
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

/// Sends one JSON POST to the provider
#[async_trait]
pub trait GenerateTransport: Send + Sync {
    async fn post(&self, url: &str, api_key: &str, body: &Value) -> eyre::Result<HttpReply>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GenerateTransport for ReqwestTransport {
    async fn post(&self, url: &str, api_key: &str, body: &Value) -> eyre::Result<HttpReply> {
        let resp = self
            .client
            .post(url)
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(HttpReply { status, body })
    }
}

pub struct GeminiClient {
    config: GeminiConfig,
    transport: Box<dyn GenerateTransport>,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig, transport: Box<dyn GenerateTransport>) -> Self {
        Self { config, transport }
    }

    pub fn with_reqwest(config: GeminiConfig, client: reqwest::Client) -> Self {
        Self::new(config, Box::new(ReqwestTransport::new(client)))
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }

    fn request_body(&self, prompt: &str) -> Value {
        serde_json::json!({
            "contents": [
                {
                    "parts": [
                        { "text": prompt }
                    ]
                }
            ],
            "generationConfig": self.config.generation
        })
    }

    /// Generate the analysis text for `prompt`
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(Error::Unconfigured)?;

        debug!(
            "Using Google API with key: {}...",
            api_key.chars().take(5).collect::<String>()
        );
        info!("Calling Gemini model {}", self.config.model);

        let url = self.endpoint();
        let body = self.request_body(prompt);
        let reply = self.post_with_retry(&url, api_key, &body).await?;
        debug!("Gemini API response status: {}", reply.status);

        if !(200..300).contains(&reply.status) {
            return Err(provider_error(&reply.body));
        }

        let json: Value = serde_json::from_str(&reply.body)
            .map_err(|e| Error::MalformedResponse(format!("response is not JSON: {e}")))?;
        let text = extract_text(&json)?;
        info!("Analysis generated successfully, length: {}", text.len());
        Ok(text)
    }

    /// Each attempt races the transport against `request_timeout`. Timeouts
    /// and transport failures are retried; any HTTP reply is final.
    async fn post_with_retry(&self, url: &str, api_key: &str, body: &Value) -> Result<HttpReply> {
        let timeout = self.config.request_timeout;
        let max_attempts = self.config.max_attempts.max(1);

        let mut attempt = 1;
        loop {
            let err = match tokio::time::timeout(timeout, self.transport.post(url, api_key, body)).await {
                Ok(Ok(reply)) => return Ok(reply),
                Ok(Err(e)) => Error::Provider(format!("Failed to call Gemini API: {e:#}")),
                Err(_) => {
                    warn!("Request timed out after {timeout:?}");
                    Error::Timeout {
                        stage: "requesting analysis",
                        after: timeout,
                    }
                }
            };

            if attempt >= max_attempts {
                return Err(err);
            }
            let delay = self.config.retry_backoff;
            debug!("Attempt {attempt} failed: {err}, retrying in {delay:?}");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

fn provider_error(body: &str) -> Error {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| json.get("error")?.get("message")?.as_str().map(str::to_string));

    match message {
        Some(message) => {
            warn!("Gemini API error response: {message}");
            Error::Provider(message)
        }
        None => {
            warn!("Gemini API error response without message: {body}");
            Error::Provider("Failed to analyze transcript".to_string())
        }
    }
}

/// Walk `candidates[0].content.parts[0].text`
fn extract_text(json: &Value) -> Result<String> {
    let missing = |what: &str| Error::MalformedResponse(format!("missing {what}"));

    let candidate = json
        .get("candidates")
        .and_then(|c| c.get(0))
        .ok_or_else(|| missing("candidates"))?;
    let parts = candidate
        .get("content")
        .ok_or_else(|| missing("candidate content"))?
        .get("parts")
        .ok_or_else(|| missing("content parts"))?;
    parts
        .get(0)
        .and_then(|p| p.get("text"))
        .and_then(|t| t.as_str())
        .map(|t| t.to_string())
        .ok_or_else(|| missing("part text"))
}
