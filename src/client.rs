use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::config::ApiConfig;

/// Structured failure from the remote template API.
///
/// Carries the status code when one was received, a human-readable message,
/// and the raw response body where available, so per-item failures can be
/// recorded in the run report without string-parsing.
#[derive(Debug, thiserror::Error)]
pub enum ApiFailure {
    /// The remote answered with a non-success status.
    #[error("remote returned status {status}: {message}")]
    Status {
        status: u16,
        message: String,
        detail: Option<String>,
    },

    /// The request never produced a response.
    #[error("request failed: {message}")]
    Transport { message: String },

    /// The response body was not valid JSON.
    #[error("failed to parse response body: {message}")]
    Parse {
        status: Option<u16>,
        message: String,
    },

    /// Both the primary and the fallback fetch endpoint failed.
    #[error("failed to fetch template: {primary}; fallback endpoint: {fallback}")]
    BothEndpoints {
        primary: Box<ApiFailure>,
        fallback: Box<ApiFailure>,
    },
}

impl ApiFailure {
    /// Status code of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiFailure::Status { status, .. } => Some(*status),
            ApiFailure::Parse { status, .. } => *status,
            ApiFailure::Transport { .. } => None,
            ApiFailure::BothEndpoints { primary, .. } => primary.status(),
        }
    }

    /// Raw response body of the failed request, if one was captured.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiFailure::Status { detail, .. } => detail.as_deref(),
            ApiFailure::BothEndpoints { primary, .. } => primary.detail(),
            _ => None,
        }
    }
}

/// One trigger in a webhook subscription.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookTrigger {
    pub event_name: String,
    pub enabled: bool,
}

/// Request body for creating a webhook subscription.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSubscription {
    pub url: String,
    pub triggers: Vec<WebhookTrigger>,
    pub enabled: bool,
}

/// Capability surface the sync orchestrator consumes, independent of
/// transport. Production uses [`HttpTemplateClient`]; tests substitute an
/// in-memory fake.
#[async_trait]
pub trait RemoteTemplateClient: Send + Sync {
    /// Retrieve a template's current payload.
    ///
    /// Tries the primary retrieval endpoint and, on failure, exactly one
    /// fallback endpoint before surfacing a combined error. The payload shape
    /// varies by template type/state; the pull flow interprets it.
    async fn fetch(&self, template_id: u64) -> Result<Value, ApiFailure>;

    /// Push new content for an existing template.
    ///
    /// Never creates: updating an identifier the remote does not know is a
    /// remote-side error, not an implicit create.
    async fn update(&self, template_id: u64, html: &str) -> Result<Value, ApiFailure>;

    /// Create a webhook subscription.
    async fn create_webhook(&self, subscription: &WebhookSubscription) -> Result<Value, ApiFailure>;
}

/// HTTP/JSON implementation of [`RemoteTemplateClient`].
pub struct HttpTemplateClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl HttpTemplateClient {
    pub fn new(config: ApiConfig) -> Self {
        HttpTemplateClient {
            http: reqwest::Client::new(),
            config,
        }
    }

    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiFailure> {
        let url = format!("{}{}", self.config.base_url, endpoint);
        log::debug!("{method} {url}");

        let mut request = self
            .http
            .request(method, url.as_str())
            .header("Api-Key", &self.config.api_key);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| ApiFailure::Transport {
            message: e.to_string(),
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| ApiFailure::Transport {
            message: e.to_string(),
        })?;

        let parsed: Value = if text.is_empty() {
            Value::Object(Default::default())
        } else {
            serde_json::from_str(&text).map_err(|e| ApiFailure::Parse {
                status: Some(status.as_u16()),
                message: e.to_string(),
            })?
        };

        if status.is_success() {
            return Ok(parsed);
        }

        let message = parsed
            .get("msg")
            .and_then(Value::as_str)
            .or_else(|| parsed.get("message").and_then(Value::as_str))
            .unwrap_or("Unknown error")
            .to_string();

        Err(ApiFailure::Status {
            status: status.as_u16(),
            message,
            detail: Some(text),
        })
    }
}

#[async_trait]
impl RemoteTemplateClient for HttpTemplateClient {
    async fn fetch(&self, template_id: u64) -> Result<Value, ApiFailure> {
        // The API exposes a template under two endpoints depending on its
        // type/state; try the preview endpoint first, then the plain get.
        let primary = format!("/templates/email/preview?templateId={template_id}");
        let primary_err = match self.request(Method::GET, &primary, None).await {
            Ok(payload) => return Ok(payload),
            Err(e) => e,
        };

        log::debug!("Primary fetch endpoint failed for {template_id}: {primary_err}");

        let fallback = format!("/templates/email/get?templateId={template_id}");
        self.request(Method::GET, &fallback, None)
            .await
            .map_err(|fallback_err| ApiFailure::BothEndpoints {
                primary: Box::new(primary_err),
                fallback: Box::new(fallback_err),
            })
    }

    async fn update(&self, template_id: u64, html: &str) -> Result<Value, ApiFailure> {
        let body = serde_json::json!({
            "templateId": template_id,
            "html": html,
        });
        self.request(Method::PUT, "/templates/email/update", Some(&body))
            .await
    }

    async fn create_webhook(&self, subscription: &WebhookSubscription) -> Result<Value, ApiFailure> {
        let body = serde_json::to_value(subscription).map_err(|e| ApiFailure::Parse {
            status: None,
            message: e.to_string(),
        })?;
        self.request(Method::POST, "/webhooks", Some(&body)).await
    }
}
