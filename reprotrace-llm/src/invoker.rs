use reprotrace_core::{
    Failure, FailureKind, InvocationOutcome, InvocationRequest, ProviderMeta, RetryPolicy, Success,
};
use serde_json::json;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info, warn};

use crate::{Provider, ProviderError, ProviderResponse};

/// Runs one invocation: a deadline per attempt, classified failures and
/// exponential backoff between retryable ones.
///
/// At least one attempt is always made, even with `max_attempts == 0`.
#[derive(Clone, Debug)]
pub struct Invoker<P> {
    provider: P,
    policy: RetryPolicy,
}

impl<P: Provider> Invoker<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn invoke(&self, request: &InvocationRequest) -> InvocationOutcome {
        let started = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            debug!(attempt, model = %request.model, "starting provider attempt");

            let error = match self.attempt(request).await {
                Ok(response) if response.output_text.trim().is_empty() => {
                    let failure = empty_output(&response, elapsed_ms(started));
                    warn!(attempt, kind = %failure.kind, "provider returned no usable output");
                    return InvocationOutcome::Failure(failure);
                }
                Ok(response) => {
                    let latency_ms = elapsed_ms(started);
                    info!(attempt, latency_ms, "provider call succeeded");
                    return InvocationOutcome::Success(success(request, response, attempt, latency_ms));
                }
                Err(error) => error,
            };

            let kind = error.kind();
            if kind.is_retryable() && self.policy.has_attempts_left(attempt) {
                let delay = self.policy.delay(attempt);
                warn!(
                    attempt,
                    %kind,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "retrying provider call"
                );
                sleep(delay).await;
                continue;
            }

            let failure = error.into_failure(elapsed_ms(started));
            warn!(
                attempt,
                kind = %failure.kind,
                latency_ms = failure.latency_ms,
                "provider call failed"
            );
            return InvocationOutcome::Failure(failure);
        }
    }

    async fn attempt(&self, request: &InvocationRequest) -> Result<ProviderResponse, ProviderError> {
        let call = self.provider.complete(request);
        match request.deadline() {
            Some(deadline) => timeout(deadline, call)
                .await
                .unwrap_or(Err(ProviderError::Timeout(deadline))),
            None => call.await,
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn success(
    request: &InvocationRequest,
    response: ProviderResponse,
    attempt: u32,
    latency_ms: u64,
) -> Success {
    Success {
        output_text: response.output_text,
        latency_ms,
        provider_meta: ProviderMeta {
            response_id: response.response_id,
            request_id: response.request_id,
            model: request.model.clone(),
            usage: response.usage,
            attempts: attempt,
        },
    }
}

fn empty_output(response: &ProviderResponse, latency_ms: u64) -> Failure {
    Failure {
        kind: FailureKind::EmptyOutput,
        message: "provider returned an empty output text".to_string(),
        provider_status_code: None,
        provider_error_body: response
            .response_id
            .as_ref()
            .map(|id| json!({ "responseId": id })),
        latency_ms,
    }
}
