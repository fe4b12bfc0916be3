use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::nullable::present;

/// Fixed taxonomy of per-call failures.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    RateLimit,
    Timeout,
    ProviderError,
    EmptyOutput,
    Unknown,
}

impl FailureKind {
    /// Transport-level faults are worth another attempt; a bad payload or an
    /// unrecognised error is not.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            FailureKind::RateLimit | FailureKind::Timeout | FailureKind::ProviderError
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::RateLimit => "rate_limit",
            FailureKind::Timeout => "timeout",
            FailureKind::ProviderError => "provider_error",
            FailureKind::EmptyOutput => "empty_output",
            FailureKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub model: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub usage: Option<Value>,
    pub attempts: u32,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Success {
    pub output_text: String,
    pub latency_ms: u64,
    pub provider_meta: ProviderMeta,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_status_code: Option<u16>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub provider_error_body: Option<Value>,
    pub latency_ms: u64,
}

/// Result of one invocation, retries included. Provider-side problems always
/// land in [`InvocationOutcome::Failure`]; they are never raised as errors.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InvocationOutcome {
    Success(Success),
    Failure(Failure),
}

impl InvocationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, InvocationOutcome::Success(_))
    }

    pub fn latency_ms(&self) -> u64 {
        match self {
            InvocationOutcome::Success(success) => success.latency_ms,
            InvocationOutcome::Failure(failure) => failure.latency_ms,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            InvocationOutcome::Success(_) => None,
            InvocationOutcome::Failure(failure) => Some(failure.kind),
        }
    }

    pub fn as_success(&self) -> Option<&Success> {
        match self {
            InvocationOutcome::Success(success) => Some(success),
            InvocationOutcome::Failure(_) => None,
        }
    }

    pub fn as_failure(&self) -> Option<&Failure> {
        match self {
            InvocationOutcome::Success(_) => None,
            InvocationOutcome::Failure(failure) => Some(failure),
        }
    }
}
