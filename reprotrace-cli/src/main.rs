use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use reprotrace_core::{TraceId, TraceRecord, TraceStore};
use reprotrace_llm::{Invoker, OpenAiClient};
use reprotrace_store_sqlite::SqliteTraceStore;
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;

mod args;
mod fingerprint;
mod recorder;

use args::{Cli, Command, RunArgs};
use recorder::{OutcomeView, Recorder};

const SERVICE_NAME: &str = "reprotrace";

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Health => {
            print_json(&json!({
                "ok": true,
                "service": SERVICE_NAME,
                "version": env!("CARGO_PKG_VERSION"),
            }))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Run(args) => run_invocation(&cli.database_url, args).await,
        Command::Show { id } => show(&cli.database_url, &id).await,
        Command::List { limit } => list(&cli.database_url, limit).await,
    }
}

/// Only `run` may create the database; reads against a missing file fail.
async fn open_store(database_url: &str, create_if_missing: bool) -> Result<SqliteTraceStore> {
    SqliteTraceStore::builder(database_url)
        .create_if_missing(create_if_missing)
        .build()
        .await
        .with_context(|| format!("failed to initialise trace store at {database_url}"))
}

async fn run_invocation(database_url: &str, args: RunArgs) -> Result<ExitCode> {
    // Both start-up faults abort before any provider call is made.
    let client = OpenAiClient::from_env().context("provider configuration")?;
    let store = open_store(database_url, true).await?;

    let recorder = Recorder::new(Invoker::new(&client), store, fingerprint::capture());
    let request = args.to_request();
    let recorded = recorder
        .record(&request, args.request_id.clone())
        .await
        .context("invalid request")?;

    print_json(&OutcomeView::from(&recorded))?;

    if recorded.outcome.is_success() && recorded.trace_id.is_some() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

async fn show(database_url: &str, id: &str) -> Result<ExitCode> {
    let id: TraceId = id
        .parse()
        .with_context(|| format!("'{id}' is not a trace id"))?;
    let store = open_store(database_url, false).await?;

    match store.get(&id).await? {
        Some(record) => {
            print_json(&record)?;
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("trace record '{id}' not found");
            Ok(ExitCode::FAILURE)
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordSummary<'a> {
    id: String,
    created_at_ms: i64,
    model: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
    latency_ms: u64,
}

impl<'a> From<&'a TraceRecord> for RecordSummary<'a> {
    fn from(record: &'a TraceRecord) -> Self {
        Self {
            id: record.id.to_string(),
            created_at_ms: record.created_at_ms,
            model: &record.request.model,
            status: if record.outcome.is_success() {
                "success"
            } else {
                "failure"
            },
            kind: record.outcome.failure_kind().map(|kind| kind.as_str()),
            latency_ms: record.outcome.latency_ms(),
        }
    }
}

async fn list(database_url: &str, limit: usize) -> Result<ExitCode> {
    let store = open_store(database_url, false).await?;
    let records = store.list_recent(limit).await?;
    let summaries: Vec<RecordSummary<'_>> = records.iter().map(RecordSummary::from).collect();
    print_json(&summaries)?;
    Ok(ExitCode::SUCCESS)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
