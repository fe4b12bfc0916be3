use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::request::validate_fields;
use crate::{InvalidRequest, InvocationOutcome, InvocationRequest, MalformedRecord};

/// Opaque record identifier, minted by the caller before the provider call.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TraceId(Uuid);

impl TraceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim()).map(Self)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentFingerprint {
    pub runtime_version: String,
    pub platform: String,
    pub host_name: String,
    pub service_version: String,
}

/// The request as it is kept for reproduction.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordedRequest {
    pub prompt: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub request_id: String,
    pub timeout_ms: u64,
}

impl RecordedRequest {
    pub fn from_request(request: &InvocationRequest, request_id: impl Into<String>) -> Self {
        Self {
            prompt: request.prompt.clone(),
            model: request.model.clone(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            request_id: request_id.into(),
            timeout_ms: request.timeout_ms,
        }
    }

    pub fn validate(&self) -> Result<(), InvalidRequest> {
        validate_fields(&self.prompt, &self.model, self.temperature, self.max_tokens)
    }
}

/// One immutable entry in the trace store.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TraceRecord {
    pub id: TraceId,
    pub created_at_ms: i64,
    pub env: EnvironmentFingerprint,
    pub request: RecordedRequest,
    pub outcome: InvocationOutcome,
}

impl TraceRecord {
    pub fn new(
        id: TraceId,
        env: EnvironmentFingerprint,
        request: RecordedRequest,
        outcome: InvocationOutcome,
    ) -> Self {
        Self {
            id,
            created_at_ms: chrono::Utc::now().timestamp_millis(),
            env,
            request,
            outcome,
        }
    }

    /// Checks the invariants a record must hold once it has been written.
    pub fn validate(&self) -> Result<(), MalformedRecord> {
        self.request.validate()?;
        if let InvocationOutcome::Success(success) = &self.outcome {
            if success.output_text.trim().is_empty() {
                return Err(MalformedRecord::EmptyOutput);
            }
            if success.provider_meta.attempts == 0 {
                return Err(MalformedRecord::ZeroAttempts);
            }
        }
        Ok(())
    }
}
