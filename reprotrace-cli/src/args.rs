use clap::{Args, Parser, Subcommand};
use reprotrace_core::InvocationRequest;
use reprotrace_store_sqlite::DEFAULT_DATABASE_URL;

#[derive(Debug, Parser)]
#[command(name = "reprotrace", version, about = "Invoke an LLM once and keep a reproducible trace")]
pub struct Cli {
    /// SQLite database holding trace records.
    #[arg(long, global = true, env = "REPROTRACE_DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one prompt against the provider and record the trace.
    Run(RunArgs),
    /// Print the full trace record for an id.
    Show { id: String },
    /// List the most recent trace records.
    List {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Print service name and version.
    Health,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[arg(long)]
    pub prompt: String,
    #[arg(long, env = "REPROTRACE_MODEL", default_value = "gpt-4o-mini")]
    pub model: String,
    #[arg(long, default_value_t = 0.2)]
    pub temperature: f64,
    #[arg(long, default_value_t = 256)]
    pub max_tokens: u32,
    /// Per-attempt deadline in milliseconds; 0 disables it.
    #[arg(long, default_value_t = 60_000)]
    pub timeout_ms: u64,
    /// Caller-side request id; generated when omitted.
    #[arg(long)]
    pub request_id: Option<String>,
}

impl RunArgs {
    pub fn to_request(&self) -> InvocationRequest {
        InvocationRequest::new(
            self.prompt.clone(),
            self.model.clone(),
            self.temperature,
            self.max_tokens,
        )
        .with_timeout_ms(self.timeout_ms)
    }
}
