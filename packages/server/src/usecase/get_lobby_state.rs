//! UseCase: Lobby 状態の取得（Reporting 向け）

use std::sync::Arc;

use pairhub_shared::time::Clock;

use crate::domain::{LobbyRepository, LobbySnapshot, LobbyStats, Timestamp};

/// Lobby の状態取得のユースケース
pub struct GetLobbyStateUseCase {
    repository: Arc<dyn LobbyRepository>,
    clock: Arc<dyn Clock>,
}

impl GetLobbyStateUseCase {
    pub fn new(repository: Arc<dyn LobbyRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// 現在のスナップショット（`getWaitingRooms` と同じ内容）
    pub async fn snapshot(&self) -> LobbySnapshot {
        self.repository.snapshot().await
    }

    /// 現在の集計値と取得時刻
    pub async fn stats(&self) -> (LobbyStats, Timestamp) {
        let stats = self.repository.stats().await;
        (stats, Timestamp::new(self.clock.now_millis()))
    }
}
