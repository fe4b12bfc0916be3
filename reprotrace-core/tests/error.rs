use std::error::Error;

use reprotrace_core::{
    ConfigurationFault, InvalidRequest, MalformedRecord, StorageFault, TraceId,
};

#[test]
fn storage_fault_display_for_duplicate_id() {
    let id: TraceId = "3f2b8c8e-8f0e-4c4e-9a57-0b1c2d3e4f50".parse().unwrap();
    let err = StorageFault::DuplicateId(id);
    assert_eq!(
        format!("{err}"),
        "trace record '3f2b8c8e-8f0e-4c4e-9a57-0b1c2d3e4f50' already exists"
    );
}

#[test]
fn storage_fault_backend_keeps_source() {
    let err = StorageFault::backend("disk full");
    assert_eq!(format!("{err}"), "trace store unavailable: disk full");
    assert!(err.source().is_some());
}

#[test]
fn storage_fault_display_for_corrupt() {
    let err = StorageFault::Corrupt {
        id: "abc".to_string(),
        reason: "missing field `env`".to_string(),
    };
    assert_eq!(
        format!("{err}"),
        "trace record 'abc' is corrupt: missing field `env`"
    );
}

#[test]
fn configuration_fault_display_for_missing_credentials() {
    let err = ConfigurationFault::MissingCredentials("OPENAI_API_KEY");
    assert_eq!(
        format!("{err}"),
        "missing credentials: OPENAI_API_KEY is not set"
    );
}

#[test]
fn invalid_request_display() {
    assert_eq!(
        format!("{}", InvalidRequest::ZeroMaxTokens),
        "max tokens must be greater than zero"
    );
}

#[test]
fn malformed_record_wraps_invalid_request() {
    let err = MalformedRecord::from(InvalidRequest::EmptyPrompt);
    assert_eq!(format!("{err}"), "invalid request: prompt must not be empty");
}
