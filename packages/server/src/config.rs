//! Command-line and environment configuration.

use std::time::Duration;

use clap::Parser;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "pairhub-server")]
#[command(about = "Pairing and signaling server for random two-party video chat", long_about = None)]
pub struct ServerConfig {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "PAIRHUB_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "8080")]
    pub port: u16,

    /// Endpoint that records completed calls. Calls are only logged when unset.
    #[arg(long, env = "CALL_LEDGER_URL")]
    pub call_ledger_url: Option<String>,

    /// Request timeout for the call ledger, in seconds
    #[arg(long, env = "CALL_LEDGER_TIMEOUT_SECS", default_value = "5")]
    pub call_ledger_timeout_secs: u64,

    /// Log level for this crate when RUST_LOG is not set
    #[arg(long, env = "PAIRHUB_LOG_LEVEL", default_value = "debug")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn call_ledger_timeout(&self) -> Duration {
        Duration::from_secs(self.call_ledger_timeout_secs)
    }
}
