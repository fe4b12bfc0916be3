use std::error::Error as StdError;

use thiserror::Error;

use crate::TraceId;

/// Persistence-layer failure. The call outcome is still known when this is
/// raised; only the durable trace is missing.
#[derive(Debug, Error)]
pub enum StorageFault {
    #[error("trace record '{0}' already exists")]
    DuplicateId(TraceId),
    #[error("trace store unavailable: {0}")]
    Backend(#[source] Box<dyn StdError + Send + Sync>),
    #[error("trace record '{id}' is corrupt: {reason}")]
    Corrupt { id: String, reason: String },
    #[error("trace record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageFault {
    pub fn backend(error: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        StorageFault::Backend(error.into())
    }
}

/// Setup fault. Fatal at start-up; never produced per call.
#[derive(Debug, Error)]
pub enum ConfigurationFault {
    #[error("missing credentials: {0} is not set")]
    MissingCredentials(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidRequest {
    #[error("prompt must not be empty")]
    EmptyPrompt,
    #[error("model must not be empty")]
    EmptyModel,
    #[error("temperature must be a finite number")]
    NonFiniteTemperature,
    #[error("max tokens must be greater than zero")]
    ZeroMaxTokens,
}

/// A record that parses but breaks the data-model invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MalformedRecord {
    #[error("invalid request: {0}")]
    Request(#[from] InvalidRequest),
    #[error("success outcome has empty output text")]
    EmptyOutput,
    #[error("success outcome reports zero attempts")]
    ZeroAttempts,
}
