use std::sync::Arc;
use std::time::Duration;

use reprotrace_core::{Failure, FailureKind, InvocationRequest};
use serde_json::Value;
use thiserror::Error;

/// What a single successful provider round-trip yielded. The output text may
/// still be empty; the invoker decides what that means.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProviderResponse {
    pub output_text: String,
    pub response_id: Option<String>,
    pub request_id: Option<String>,
    pub usage: Option<Value>,
}

/// Every way a provider call can go wrong, narrowed to the shapes the
/// failure taxonomy understands.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider returned HTTP {status}: {message}")]
    Status {
        status: u16,
        message: String,
        body: Option<Value>,
    },
    #[error("timeout after {}ms", .0.as_millis())]
    Timeout(Duration),
    #[error("provider request failed: {0}")]
    Transport(String),
    #[error("provider response could not be decoded: {message}")]
    Decode { message: String, body: Option<Value> },
}

impl ProviderError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ProviderError::Status { status: 429, .. } => FailureKind::RateLimit,
            ProviderError::Status { status, .. } if *status >= 500 => FailureKind::ProviderError,
            ProviderError::Timeout(_) => FailureKind::Timeout,
            ProviderError::Status { .. }
            | ProviderError::Transport(_)
            | ProviderError::Decode { .. } => FailureKind::Unknown,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn into_failure(self, latency_ms: u64) -> Failure {
        let kind = self.kind();
        let message = self.to_string();
        let provider_status_code = self.status();
        let provider_error_body = match self {
            ProviderError::Status { body, .. } | ProviderError::Decode { body, .. } => body,
            ProviderError::Timeout(_) | ProviderError::Transport(_) => None,
        };
        Failure {
            kind,
            message,
            provider_status_code,
            provider_error_body,
            latency_ms,
        }
    }
}

/// One completion round-trip. Implementations must not retry or apply
/// deadlines themselves.
#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    async fn complete(&self, request: &InvocationRequest)
        -> Result<ProviderResponse, ProviderError>;
}

#[async_trait::async_trait]
impl<P> Provider for &P
where
    P: Provider + ?Sized,
{
    async fn complete(
        &self,
        request: &InvocationRequest,
    ) -> Result<ProviderResponse, ProviderError> {
        (**self).complete(request).await
    }
}

#[async_trait::async_trait]
impl<P> Provider for Arc<P>
where
    P: Provider + ?Sized,
{
    async fn complete(
        &self,
        request: &InvocationRequest,
    ) -> Result<ProviderResponse, ProviderError> {
        (**self).complete(request).await
    }
}
