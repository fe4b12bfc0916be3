use reprotrace_core::{
    EnvironmentFingerprint, InMemoryTraceStore, InvalidRequest, InvocationOutcome,
    InvocationRequest, MalformedRecord, ProviderMeta, RecordedRequest, StorageFault, Success,
    TraceId, TraceRecord, TraceStore,
};

fn record(output: &str, created_at_ms: i64) -> TraceRecord {
    let request = InvocationRequest::new("hi", "m", 0.2, 10);
    let mut record = TraceRecord::new(
        TraceId::new(),
        EnvironmentFingerprint {
            runtime_version: "rustc".to_string(),
            platform: "linux".to_string(),
            host_name: "host".to_string(),
            service_version: "0.1.0".to_string(),
        },
        RecordedRequest::from_request(&request, "req"),
        InvocationOutcome::Success(Success {
            output_text: output.to_string(),
            latency_ms: 5,
            provider_meta: ProviderMeta {
                response_id: None,
                request_id: None,
                model: "m".to_string(),
                usage: None,
                attempts: 1,
            },
        }),
    );
    record.created_at_ms = created_at_ms;
    record
}

#[tokio::test]
async fn put_then_get_returns_same_record() {
    let store = InMemoryTraceStore::new();
    let stored = record("hello", 1);

    store.put(&stored).await.unwrap();
    let loaded = store.get(&stored.id).await.unwrap();

    assert_eq!(loaded, Some(stored));
}

#[tokio::test]
async fn unknown_id_is_none() {
    let store = InMemoryTraceStore::new();
    assert_eq!(store.get(&TraceId::new()).await.unwrap(), None);
}

#[tokio::test]
async fn duplicate_id_is_rejected_and_first_record_kept() {
    let store = InMemoryTraceStore::new();
    let first = record("first", 1);
    let mut second = record("second", 2);
    second.id = first.id;

    store.put(&first).await.unwrap();
    let err = store.put(&second).await.unwrap_err();

    assert!(matches!(err, StorageFault::DuplicateId(id) if id == first.id));
    assert_eq!(store.get(&first.id).await.unwrap(), Some(first));
}

#[tokio::test]
async fn list_recent_is_newest_first_and_limited() {
    let store = InMemoryTraceStore::new();
    let old = record("old", 10);
    let mid = record("mid", 20);
    let new = record("new", 30);
    for item in [&mid, &old, &new] {
        store.put(item).await.unwrap();
    }

    let recent = store.list_recent(2).await.unwrap();
    assert_eq!(recent, vec![new, mid]);
}

#[tokio::test]
async fn list_recent_breaks_timestamp_ties_by_descending_id() {
    let store = InMemoryTraceStore::new();
    let mut first = record("a", 50);
    let mut second = record("b", 50);
    first.id = "00000000-0000-4000-8000-000000000001".parse().unwrap();
    second.id = "ffffffff-ffff-4fff-bfff-ffffffffffff".parse().unwrap();
    store.put(&first).await.unwrap();
    store.put(&second).await.unwrap();

    let recent = store.list_recent(10).await.unwrap();
    assert_eq!(recent, vec![second, first]);
}

#[test]
fn well_formed_record_validates() {
    assert_eq!(record("hello", 1).validate(), Ok(()));
}

#[test]
fn blank_success_output_is_malformed() {
    assert_eq!(record("  ", 1).validate(), Err(MalformedRecord::EmptyOutput));
}

#[test]
fn zero_attempts_is_malformed() {
    let mut malformed = record("hello", 1);
    if let InvocationOutcome::Success(success) = &mut malformed.outcome {
        success.provider_meta.attempts = 0;
    }
    assert_eq!(malformed.validate(), Err(MalformedRecord::ZeroAttempts));
}

#[test]
fn recorded_request_invariants_are_checked() {
    let mut malformed = record("hello", 1);
    malformed.request.max_tokens = 0;
    assert_eq!(
        malformed.validate(),
        Err(MalformedRecord::Request(InvalidRequest::ZeroMaxTokens))
    );

    malformed.request.prompt = String::new();
    assert_eq!(
        malformed.validate(),
        Err(MalformedRecord::Request(InvalidRequest::EmptyPrompt))
    );
}
