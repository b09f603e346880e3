//! InMemory Lobby Repository 実装
//!
//! ドメイン層が定義する `LobbyRepository` trait の具体的な実装。
//! Lobby 集約をひとつの `Mutex` で保護し、イベント単位の直列化を提供します。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, MutexGuard};

use crate::domain::{Lobby, LobbyRepository, LobbySnapshot, LobbyStats};

/// インメモリ Lobby Repository 実装
pub struct InMemoryLobbyRepository {
    lobby: Arc<Mutex<Lobby>>,
}

impl InMemoryLobbyRepository {
    pub fn new(lobby: Arc<Mutex<Lobby>>) -> Self {
        Self { lobby }
    }
}

impl Default for InMemoryLobbyRepository {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(Lobby::new())))
    }
}

#[async_trait]
impl LobbyRepository for InMemoryLobbyRepository {
    async fn lock(&self) -> MutexGuard<'_, Lobby> {
        self.lobby.lock().await
    }

    async fn snapshot(&self) -> LobbySnapshot {
        self.lobby.lock().await.snapshot()
    }

    async fn stats(&self) -> LobbyStats {
        self.lobby.lock().await.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionId, RoomName, Timestamp};

    #[tokio::test]
    async fn test_changes_through_lock_are_visible_in_snapshot() {
        // テスト項目: lock() 経由の変更が snapshot() / stats() に反映される
        // given (前提条件):
        let repo = InMemoryLobbyRepository::default();
        let x = ConnectionId::new("x".to_string()).unwrap();
        let r1 = RoomName::new("r1".to_string()).unwrap();

        // when (操作):
        {
            let mut lobby = repo.lock().await;
            lobby.connect(x.clone(), Timestamp::new(0)).unwrap();
            lobby.join(&x, r1.clone(), false, Timestamp::new(1)).unwrap();
        }

        // then (期待する結果):
        let snapshot = repo.snapshot().await;
        assert_eq!(snapshot.waiting_queue, vec![r1.clone()]);
        assert_eq!(snapshot.rooms[&r1].len(), 1);
        assert_eq!(repo.stats().await.connected_clients, 1);
    }

    #[tokio::test]
    async fn test_shared_lobby_between_repositories() {
        // テスト項目: 同じ Lobby を共有する Repository 同士で状態が共有され、別インスタンスとは独立している
        // given (前提条件):
        let shared = Arc::new(Mutex::new(Lobby::new()));
        let a = InMemoryLobbyRepository::new(shared.clone());
        let b = InMemoryLobbyRepository::new(shared);
        let independent = InMemoryLobbyRepository::default();

        // when (操作):
        a.lock()
            .await
            .connect(ConnectionId::generate(), Timestamp::new(0))
            .unwrap();

        // then (期待する結果):
        assert_eq!(b.stats().await.connected_clients, 1);
        assert_eq!(independent.stats().await.connected_clients, 0);
    }
}
