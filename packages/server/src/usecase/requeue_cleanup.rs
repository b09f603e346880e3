//! UseCase: 待機キューの整理（`leave_on` / `remove_waiting_users`）
//!
//! 既に存在しない、または待機状態でないルームをキューから取り除きます。
//! `leave_on` では整理後にスナップショットを配信し、`remove_waiting_users` では何も配信しません。

use std::sync::Arc;

use crate::domain::{LobbyRepository, MessagePusher};

use super::broadcaster::broadcast_snapshot;

pub struct RequeueCleanupUseCase {
    repository: Arc<dyn LobbyRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl RequeueCleanupUseCase {
    pub fn new(
        repository: Arc<dyn LobbyRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// キューを整理し、取り除いた件数を返す
    pub async fn execute(&self, announce: bool) -> usize {
        let mut lobby = self.repository.lock().await;
        let removed = lobby.requeue_cleanup();
        if removed > 0 {
            tracing::info!("Removed {} stale waiting queue entries", removed);
        }
        if announce {
            broadcast_snapshot(self.message_pusher.as_ref(), &lobby).await;
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::{TestHarness, drain, events};

    #[tokio::test]
    async fn test_cleanup_with_announce_broadcasts_snapshot() {
        // テスト項目: announce = true で整理後のスナップショットが配信される
        // given (前提条件):
        let harness = TestHarness::new();
        let (x, mut rx) = harness.connect("x").await;
        harness.join(&x, "r1").await;
        drain(&mut rx);
        let usecase = RequeueCleanupUseCase::new(harness.repository(), harness.message_pusher());

        // when (操作):
        let removed = usecase.execute(true).await;

        // then (期待する結果): 整合している状態なので何も取り除かれない
        assert_eq!(removed, 0);
        let frames = drain(&mut rx);
        assert_eq!(events(&frames), vec!["getWaitingRooms"]);
        assert_eq!(frames[0]["data"]["waiting_queue"], serde_json::json!(["r1"]));
    }

    #[tokio::test]
    async fn test_silent_cleanup_sends_nothing() {
        // テスト項目: announce = false では何も配信されない
        // given (前提条件):
        let harness = TestHarness::new();
        let (_x, mut rx) = harness.connect("x").await;
        let usecase = RequeueCleanupUseCase::new(harness.repository(), harness.message_pusher());

        // when (操作):
        let removed = usecase.execute(false).await;

        // then (期待する結果):
        assert_eq!(removed, 0);
        assert!(drain(&mut rx).is_empty());
    }
}
