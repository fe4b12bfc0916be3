//! Resilient single-call invocation against an LLM provider.
//!
//! ```rust,no_run
//! use reprotrace_core::InvocationRequest;
//! use reprotrace_llm::{Invoker, OpenAiClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OpenAiClient::from_env()?;
//!     let invoker = Invoker::new(&client);
//!     let request = InvocationRequest::new("Say hi", "gpt-4o-mini", 0.2, 64);
//!     let outcome = invoker.invoke(&request).await;
//!     println!("{}", serde_json::to_string_pretty(&outcome)?);
//!     Ok(())
//! }
//! ```
mod config;
mod invoker;
mod openai;
mod provider;

pub use config::{OpenAiConfig, OPENAI_API_KEY_VAR, OPENAI_BASE_URL_VAR};
pub use invoker::Invoker;
pub use openai::OpenAiClient;
pub use provider::{Provider, ProviderError, ProviderResponse};
