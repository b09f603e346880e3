//! Pairing and signaling server for random two-party video chat.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin pairhub-server
//! cargo run --bin pairhub-server -- --host 0.0.0.0 --port 3000 --call-ledger-url http://localhost:5000/api/call/add-call
//! ```

use std::{collections::HashMap, sync::Arc};

use clap::Parser;
use pairhub_server::{
    config::ServerConfig,
    domain::{CallLedger, Lobby},
    infrastructure::{
        call_ledger::{DisabledCallLedger, HttpCallLedger},
        message_pusher::WebSocketMessagePusher,
        repository::InMemoryLobbyRepository,
    },
    ui::{AppState, Server},
};
use pairhub_shared::{logger::setup_logger, time::SystemClock};
use tokio::sync::Mutex;

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(&[env!("CARGO_PKG_NAME"), "tower_http"], &config.log_level);

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. CallLedger
    // 4. UseCases (AppState)
    // 5. Server

    // 1. Create Repository (in-memory lobby)
    let repository = Arc::new(InMemoryLobbyRepository::new(Arc::new(Mutex::new(
        Lobby::new(),
    ))));

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
        HashMap::new(),
    ))));

    // 3. Create CallLedger
    let call_ledger: Arc<dyn CallLedger> = match &config.call_ledger_url {
        Some(url) => match HttpCallLedger::new(url.clone(), config.call_ledger_timeout()) {
            Ok(ledger) => {
                tracing::info!("Recording calls to {}", ledger.endpoint());
                Arc::new(ledger)
            }
            Err(e) => {
                tracing::error!("Failed to create call ledger client: {}", e);
                std::process::exit(1);
            }
        },
        None => {
            tracing::warn!("CALL_LEDGER_URL is not set; completed calls will only be logged");
            Arc::new(DisabledCallLedger)
        }
    };

    // 4. Create UseCases and 5. run the server
    let state = AppState::new(
        repository,
        message_pusher,
        call_ledger,
        Arc::new(SystemClock),
    );
    let server = Server::new(state);
    if let Err(e) = server.run(config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
