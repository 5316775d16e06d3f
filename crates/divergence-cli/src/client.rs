//! Outbound HTTP: the Azure OpenAI chat-completions backend and the panic
//! alert webhook.

use std::time::Duration;

use anyhow::{Context as _, anyhow};
use divergence_core::{
  alert::PanicAlert,
  study::{ChatRequest, ChatResponse, CompletionBackend},
};
use reqwest::{Client, StatusCode};

use crate::config::CompletionSettings;

fn http_client() -> anyhow::Result<Client> {
  Client::builder()
    .timeout(Duration::from_secs(30))
    .build()
    .context("failed to build HTTP client")
}

// ─── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("completion service returned {status}: {message}")]
  Status { status: StatusCode, message: String },

  #[error(transparent)]
  Response(#[from] divergence_core::Error),
}

/// The provider's `error.message`, or the raw body when there is none.
fn extract_error_message(body: &str) -> String {
  serde_json::from_str::<serde_json::Value>(body)
    .ok()
    .and_then(|v| {
      v.get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
        .map(String::from)
    })
    .unwrap_or_else(|| body.to_string())
}

// ─── Completions ──────────────────────────────────────────────────────────────

/// Chat-completions client for a single Azure OpenAI deployment.
///
/// Clones share the inner [`reqwest::Client`] connection pool.
#[derive(Clone)]
pub struct CompletionClient {
  client:  Client,
  url:     String,
  api_key: String,
}

impl CompletionClient {
  pub fn new(settings: &CompletionSettings) -> anyhow::Result<Self> {
    let missing = |key: &str| anyhow!("completion.{key} is not configured");
    let endpoint = settings.endpoint.as_deref().ok_or_else(|| missing("endpoint"))?;
    let deployment = settings.deployment.as_deref().ok_or_else(|| missing("deployment"))?;
    let api_key = settings.api_key.clone().ok_or_else(|| missing("api_key"))?;

    Ok(Self {
      client: http_client()?,
      url: chat_url(endpoint, deployment, &settings.api_version),
      api_key,
    })
  }
}

fn chat_url(endpoint: &str, deployment: &str, api_version: &str) -> String {
  format!(
    "{}/openai/deployments/{deployment}/chat/completions?api-version={api_version}",
    endpoint.trim_end_matches('/'),
  )
}

impl CompletionBackend for CompletionClient {
  type Error = ClientError;

  async fn complete(&self, request: ChatRequest) -> Result<String, ClientError> {
    tracing::debug!(messages = request.messages.len(), "requesting completion");
    let resp = self
      .client
      .post(&self.url)
      .header("api-key", &self.api_key)
      .json(&request)
      .send()
      .await?;

    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
      return Err(ClientError::Status {
        status,
        message: extract_error_message(&body),
      });
    }
    Ok(ChatResponse::from_json(&body)?.into_text()?)
  }
}

// ─── Alert webhook ────────────────────────────────────────────────────────────

/// POSTs [`PanicAlert`]s as JSON to a configured URL.
#[derive(Clone)]
pub struct AlertClient {
  client: Client,
  url:    String,
}

impl AlertClient {
  pub fn new(url: impl Into<String>) -> anyhow::Result<Self> {
    Ok(Self {
      client: http_client()?,
      url:    url.into(),
    })
  }

  pub async fn send(&self, alert: &PanicAlert) -> anyhow::Result<()> {
    let resp = self
      .client
      .post(&self.url)
      .json(alert)
      .send()
      .await
      .context("POST alert webhook failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("POST alert webhook → {}", resp.status()));
    }
    Ok(())
  }
}
