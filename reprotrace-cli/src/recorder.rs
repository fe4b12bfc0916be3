use reprotrace_core::{
    EnvironmentFingerprint, FailureKind, InvalidRequest, InvocationOutcome, InvocationRequest,
    RecordedRequest, StorageFault, TraceId, TraceRecord, TraceStore,
};
use reprotrace_llm::{Invoker, Provider};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

/// Composes an invoker and a trace store: one call in, one record out.
pub struct Recorder<P, S> {
    invoker: Invoker<P>,
    store: S,
    env: EnvironmentFingerprint,
}

/// The call outcome is always known; the id is only present when the trace
/// write succeeded.
#[derive(Debug)]
pub struct Recorded {
    pub trace_id: Option<TraceId>,
    pub outcome: InvocationOutcome,
    pub storage_error: Option<StorageFault>,
}

impl<P: Provider, S: TraceStore> Recorder<P, S> {
    pub fn new(invoker: Invoker<P>, store: S, env: EnvironmentFingerprint) -> Self {
        Self {
            invoker,
            store,
            env,
        }
    }

    pub async fn record(
        &self,
        request: &InvocationRequest,
        request_id: Option<String>,
    ) -> Result<Recorded, InvalidRequest> {
        request.validate()?;

        let id = TraceId::new();
        let request_id = request_id.unwrap_or_else(|| Uuid::new_v4().to_string());
        info!(trace_id = %id, %request_id, model = %request.model, "invoking provider");

        let outcome = self.invoker.invoke(request).await;
        let record = TraceRecord::new(
            id,
            self.env.clone(),
            RecordedRequest::from_request(request, request_id),
            outcome,
        );

        match self.store.put(&record).await {
            Ok(()) => Ok(Recorded {
                trace_id: Some(id),
                outcome: record.outcome,
                storage_error: None,
            }),
            Err(fault) => {
                warn!(trace_id = %id, error = %fault, "trace record was not persisted");
                Ok(Recorded {
                    trace_id: None,
                    outcome: record.outcome,
                    storage_error: Some(fault),
                })
            }
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorView {
    pub kind: FailureKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_status_code: Option<u16>,
}

/// Minimal outcome shown to the operator; the full record lives in the store.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorView>,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_error: Option<String>,
}

impl From<&Recorded> for OutcomeView {
    fn from(recorded: &Recorded) -> Self {
        let (status, output_text, error) = match &recorded.outcome {
            InvocationOutcome::Success(success) => {
                ("success", Some(success.output_text.clone()), None)
            }
            InvocationOutcome::Failure(failure) => (
                "failure",
                None,
                Some(ErrorView {
                    kind: failure.kind,
                    message: failure.message.clone(),
                    provider_status_code: failure.provider_status_code,
                }),
            ),
        };

        Self {
            id: recorded.trace_id.map(|id| id.to_string()),
            status,
            output_text,
            error,
            latency_ms: recorded.outcome.latency_ms(),
            trace_error: recorded.storage_error.as_ref().map(ToString::to_string),
        }
    }
}
