//! OpenAI Responses API client

use reprotrace_core::{ConfigurationFault, InvocationRequest};
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::{OpenAiConfig, Provider, ProviderError, ProviderResponse};

const REQUEST_ID_HEADER: &str = "x-request-id";
const RESPONSES_PATH: &str = "v1/responses";

/// Shared, read-only handle to the provider. Build it once at start-up and
/// hand out references.
#[derive(Clone, Debug)]
pub struct OpenAiClient {
    config: OpenAiConfig,
    responses_url: Url,
    http: Client,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Result<Self, ConfigurationFault> {
        config.validate()?;
        let responses_url = config.endpoint(RESPONSES_PATH)?;
        // No client-level timeout: deadlines belong to the invoker.
        let http = Client::builder()
            .build()
            .map_err(|err| ConfigurationFault::Invalid(format!("http client: {err}")))?;
        Ok(Self {
            config,
            responses_url,
            http,
        })
    }

    pub fn from_env() -> Result<Self, ConfigurationFault> {
        Self::new(OpenAiConfig::from_env()?)
    }

    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    pub fn responses_url(&self) -> &Url {
        &self.responses_url
    }
}

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a str,
    temperature: f64,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
    #[serde(default)]
    usage: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

impl ResponsesResponse {
    /// Prefers the aggregated `output_text`; otherwise joins every
    /// `output_text` content part in order.
    fn output_text(&self) -> String {
        if let Some(text) = &self.output_text {
            return text.clone();
        }
        self.output
            .iter()
            .flat_map(|item| item.content.iter())
            .filter(|part| part.kind.as_deref() == Some("output_text"))
            .filter_map(|part| part.text.as_deref())
            .collect()
    }
}

fn raw_body(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())))
}

fn status_error(status: StatusCode, text: &str) -> ProviderError {
    let body = raw_body(text);
    let message = body
        .as_ref()
        .and_then(|body| body.pointer("/error/message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string()
        });
    ProviderError::Status {
        status: status.as_u16(),
        message,
        body,
    }
}

#[async_trait::async_trait]
impl Provider for OpenAiClient {
    async fn complete(
        &self,
        request: &InvocationRequest,
    ) -> Result<ProviderResponse, ProviderError> {
        let body = ResponsesRequest {
            model: &request.model,
            input: &request.prompt,
            temperature: request.temperature,
            max_output_tokens: request.max_tokens,
        };

        let response = self
            .http
            .post(self.responses_url.clone())
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|err| ProviderError::Transport(err.to_string()))?;

        let status = response.status();
        let request_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let text = response
            .text()
            .await
            .map_err(|err| ProviderError::Transport(err.to_string()))?;

        tracing::debug!(
            status = status.as_u16(),
            request_id = request_id.as_deref().unwrap_or(""),
            "openai responses call returned"
        );

        if !status.is_success() {
            return Err(status_error(status, &text));
        }

        let parsed: ResponsesResponse =
            serde_json::from_str(&text).map_err(|err| ProviderError::Decode {
                message: err.to_string(),
                body: raw_body(&text),
            })?;

        Ok(ProviderResponse {
            output_text: parsed.output_text(),
            response_id: parsed.id,
            request_id,
            usage: parsed.usage,
        })
    }
}
