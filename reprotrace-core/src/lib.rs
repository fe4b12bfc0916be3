//! Core types for reproducible LLM invocations.
//!
//! An [`InvocationRequest`] is executed by an invoker into an
//! [`InvocationOutcome`]; the caller wraps both, together with an
//! [`EnvironmentFingerprint`], into a [`TraceRecord`] and appends it to a
//! [`TraceStore`].
mod error;
mod nullable;
mod outcome;
mod record;
mod request;
mod retry;
mod store;

pub use error::{ConfigurationFault, InvalidRequest, MalformedRecord, StorageFault};
pub use outcome::{Failure, FailureKind, InvocationOutcome, ProviderMeta, Success};
pub use record::{EnvironmentFingerprint, RecordedRequest, TraceId, TraceRecord};
pub use request::InvocationRequest;
pub use retry::RetryPolicy;
pub use store::{InMemoryTraceStore, TraceStore};
