pub mod config;
pub mod domain;
pub mod error;
pub mod eval;
pub mod expression;
pub mod request;
pub mod runtime;
pub mod server;
pub mod stats;
pub mod tokenizer;

// Re-exports
pub use config::ServerConfig;
pub use error::*;
pub use request::{Request, Response};
pub use runtime::Orchestrator;
pub use server::Server;
pub use stats::StatsCollector;
