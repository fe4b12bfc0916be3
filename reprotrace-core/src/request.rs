use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::InvalidRequest;

pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// One prompt-completion call. `timeout_ms == 0` disables the per-attempt
/// deadline.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvocationRequest {
    pub prompt: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl InvocationRequest {
    pub fn new(
        prompt: impl Into<String>,
        model: impl Into<String>,
        temperature: f64,
        max_tokens: u32,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            temperature,
            max_tokens,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn deadline(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }

    pub fn validate(&self) -> Result<(), InvalidRequest> {
        validate_fields(&self.prompt, &self.model, self.temperature, self.max_tokens)
    }
}

pub(crate) fn validate_fields(
    prompt: &str,
    model: &str,
    temperature: f64,
    max_tokens: u32,
) -> Result<(), InvalidRequest> {
    if prompt.trim().is_empty() {
        return Err(InvalidRequest::EmptyPrompt);
    }
    if model.trim().is_empty() {
        return Err(InvalidRequest::EmptyModel);
    }
    if !temperature.is_finite() {
        return Err(InvalidRequest::NonFiniteTemperature);
    }
    if max_tokens == 0 {
        return Err(InvalidRequest::ZeroMaxTokens);
    }
    Ok(())
}
