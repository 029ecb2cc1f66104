use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::debug;

use super::error::OracleError;
use super::{ChatRequest, ContentPart, OracleClient};

/// Reqwest-backed client for an Azure-OpenAI-style chat-completions endpoint.
///
/// Requests go to
/// `{endpoint}/openai/deployments/{deployment}/chat/completions?api-version={v}`
/// with `api-key` header auth and a per-call timeout.
pub struct AzureOracleClient {
    http: reqwest::Client,
    endpoint: String,
    deployment: String,
    api_version: String,
    api_key: Option<String>,
}

impl AzureOracleClient {
    pub fn new(
        endpoint: impl Into<String>,
        deployment: impl Into<String>,
        api_version: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, OracleError> {
        // Failing here beats running with a client that has no per-call
        // timeout; a hung oracle call would otherwise stall its job forever.
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            deployment: deployment.into(),
            api_version: api_version.into(),
            api_key,
        })
    }

    /// Builds the client from application [`Config`](crate::config::Config).
    pub fn from_config(config: &crate::config::Config) -> Result<Self, OracleError> {
        Self::new(
            config.oracle_endpoint.clone(),
            config.oracle_deployment.clone(),
            config.oracle_api_version.clone(),
            config.oracle_api_key.clone(),
            config.oracle_timeout,
        )
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.deployment, self.api_version
        )
    }

    fn request_body(&self, request: &ChatRequest) -> Value {
        let user_content: Vec<Value> = request
            .user_parts
            .iter()
            .map(|part| match part {
                ContentPart::Text(text) => json!({ "type": "text", "text": text }),
                ContentPart::ImageBase64 { base64, media_type } => json!({
                    "type": "image_url",
                    "image_url": {
                        "url": format!("data:{};base64,{}", media_type, base64),
                        "detail": "high"
                    }
                }),
            })
            .collect();

        json!({
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": user_content }
            ],
            "temperature": request.temperature,
            "max_tokens": request.max_tokens
        })
    }
}

#[async_trait]
impl OracleClient for AzureOracleClient {
    async fn complete(&self, request: ChatRequest) -> Result<String, OracleError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(OracleError::MissingCredentials)?;

        if self.endpoint.is_empty() {
            return Err(OracleError::MissingCredentials);
        }

        debug!(
            deployment = %self.deployment,
            images = request.image_count(),
            temperature = request.temperature,
            "Dispatching oracle call"
        );

        let response = self
            .http
            .post(self.completions_url())
            .header("api-key", api_key)
            .json(&self.request_body(&request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OracleError::Timeout
                } else {
                    OracleError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OracleError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response.json().await?;
        let content = body
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(str::to_string)
            .filter(|s| !s.is_empty())
            .ok_or(OracleError::EmptyResponse)?;

        Ok(content)
    }
}
