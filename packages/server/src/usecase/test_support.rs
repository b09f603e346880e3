//! UseCase テスト用のヘルパー

use std::{collections::HashMap, sync::Arc, time::Duration};

use pairhub_shared::time::{Clock, FixedClock};
use tokio::sync::{Mutex, mpsc};

use crate::{
    domain::{
        CallLedger, CallRecord, ConnectionId, Lobby, LobbyRepository, MessagePusher,
        MockCallLedger, RoomName, Timestamp,
    },
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryLobbyRepository,
    },
};

/// Time reported by the harness clock.
pub const TEST_NOW_MILLIS: i64 = 1_700_000_000_000;

pub struct TestHarness {
    pub repository: Arc<InMemoryLobbyRepository>,
    pub message_pusher: Arc<WebSocketMessagePusher>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self {
            repository: Arc::new(InMemoryLobbyRepository::new(Arc::new(Mutex::new(
                Lobby::new(),
            )))),
            message_pusher: Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
                HashMap::new(),
            )))),
        }
    }

    pub fn repository(&self) -> Arc<dyn LobbyRepository> {
        self.repository.clone()
    }

    pub fn message_pusher(&self) -> Arc<dyn MessagePusher> {
        self.message_pusher.clone()
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::new(FixedClock::new(TEST_NOW_MILLIS))
    }

    /// Register a connection in both the lobby and the pusher.
    pub async fn connect(&self, id: &str) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let id = ConnectionId::new(id.to_string()).unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        self.repository
            .lock()
            .await
            .connect(id.clone(), Timestamp::new(0))
            .unwrap();
        self.message_pusher.register_client(id.clone(), tx).await;
        (id, rx)
    }

    /// Put `id` into `room` directly through the aggregate.
    pub async fn join(&self, id: &ConnectionId, room: &str) {
        self.repository
            .lock()
            .await
            .join(id, room_name(room), false, Timestamp::new(0))
            .unwrap();
    }
}

pub fn room_name(name: &str) -> RoomName {
    RoomName::new(name.to_string()).unwrap()
}

/// Drain every frame currently queued for a connection.
pub fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<serde_json::Value> {
    let mut frames = Vec::new();
    while let Ok(text) = rx.try_recv() {
        frames.push(serde_json::from_str(&text).unwrap());
    }
    frames
}

/// Event names of the drained frames, in order.
pub fn events(frames: &[serde_json::Value]) -> Vec<String> {
    frames
        .iter()
        .map(|f| f["event"].as_str().unwrap_or_default().to_string())
        .collect()
}

/// A ledger that forwards every record into a channel.
pub fn recording_ledger() -> (Arc<dyn CallLedger>, mpsc::UnboundedReceiver<CallRecord>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut ledger = MockCallLedger::new();
    ledger.expect_record_call().returning(move |record| {
        let _ = tx.send(record);
        Ok(())
    });
    (Arc::new(ledger), rx)
}

/// A ledger that must never be called.
pub fn silent_ledger() -> Arc<dyn CallLedger> {
    let mut ledger = MockCallLedger::new();
    ledger.expect_record_call().times(0);
    Arc::new(ledger)
}

pub async fn next_record(rx: &mut mpsc::UnboundedReceiver<CallRecord>) -> CallRecord {
    tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .unwrap()
        .unwrap()
}
