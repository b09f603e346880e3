//! UseCase: 参加者接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//! - Connection Registry への登録と、初回スナップショットの送信
//!
//! ### なぜこのテストが必要か
//! - 接続直後のクライアントが待機ルーム一覧を受け取れることを保証
//! - 同じ接続 ID の二重登録を防ぐ
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規接続
//! - 異常系：重複した接続 ID
//! - エッジケース：既に待機中のルームがある状態での接続

use std::sync::Arc;

use pairhub_shared::time::Clock;

use crate::domain::{
    ConnectionId, LobbyRepository, MessagePusher, Notification, PusherChannel,
    Timestamp,
};

use super::error::ConnectError;

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    repository: Arc<dyn LobbyRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl ConnectParticipantUseCase {
    pub fn new(
        repository: Arc<dyn LobbyRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// 接続を登録し、現在のスナップショットを本人に送る
    ///
    /// # Returns
    ///
    /// * `Ok(Timestamp)` - 接続時刻
    /// * `Err(ConnectError)` - 既に同じ ID が登録されている
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> Result<Timestamp, ConnectError> {
        let connected_at = Timestamp::new(self.clock.now_millis());
        let mut lobby = self.repository.lock().await;

        lobby
            .connect(connection_id.clone(), connected_at)
            .map_err(|_| ConnectError::DuplicateConnection(connection_id.to_string()))?;
        self.message_pusher
            .register_client(connection_id.clone(), sender)
            .await;

        let snapshot = Notification::WaitingRooms(lobby.snapshot());
        if let Err(e) = self.message_pusher.push_to(&connection_id, &snapshot).await {
            tracing::warn!(
                "Failed to send initial snapshot to '{}': {}",
                connection_id,
                e
            );
        }

        Ok(connected_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::{TEST_NOW_MILLIS, TestHarness, drain, events};

    #[tokio::test]
    async fn test_connect_participant_success() {
        // テスト項目: 新規接続が注入された時計の時刻で登録され、初回スナップショットが届く
        // given (前提条件):
        let harness = TestHarness::new();
        let usecase = ConnectParticipantUseCase::new(
            harness.repository(),
            harness.message_pusher(),
            harness.clock(),
        );

        // when (操作):
        let id = ConnectionId::new("x".to_string()).unwrap();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let result = usecase.execute(id.clone(), tx).await;

        // then (期待する結果):
        assert_eq!(result.unwrap(), Timestamp::new(TEST_NOW_MILLIS));
        assert!(harness.repository.lock().await.session(&id).is_some());
        let frames = drain(&mut rx);
        assert_eq!(events(&frames), vec!["getWaitingRooms"]);
        assert_eq!(frames[0]["data"]["waiting_queue"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_connect_participant_duplicate_error() {
        // テスト項目: 重複した接続 ID での接続がエラーになる
        // given (前提条件):
        let harness = TestHarness::new();
        let usecase = ConnectParticipantUseCase::new(
            harness.repository(),
            harness.message_pusher(),
            harness.clock(),
        );
        let id = ConnectionId::new("x".to_string()).unwrap();
        let (tx1, _rx1) = tokio::sync::mpsc::unbounded_channel();
        usecase.execute(id.clone(), tx1).await.unwrap();

        // when (操作):
        let (tx2, mut rx2) = tokio::sync::mpsc::unbounded_channel();
        let result = usecase.execute(id, tx2).await;

        // then (期待する結果): エラーが返り、2 本目のチャンネルには何も届かない
        assert_eq!(
            result,
            Err(ConnectError::DuplicateConnection("x".to_string()))
        );
        assert!(drain(&mut rx2).is_empty());
        assert_eq!(harness.repository.stats().await.connected_clients, 1);
    }

    #[tokio::test]
    async fn test_initial_snapshot_contains_waiting_room() {
        // テスト項目: 既存の待機ルームが初回スナップショットに含まれる
        // given (前提条件):
        let harness = TestHarness::new();
        let (alice, _rx_alice) = harness.connect("alice").await;
        harness.join(&alice, "r1").await;
        let usecase = ConnectParticipantUseCase::new(
            harness.repository(),
            harness.message_pusher(),
            harness.clock(),
        );

        // when (操作):
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        usecase
            .execute(ConnectionId::new("bob".to_string()).unwrap(), tx)
            .await
            .unwrap();

        // then (期待する結果):
        let frames = drain(&mut rx);
        assert_eq!(frames[0]["data"]["waiting_queue"], serde_json::json!(["r1"]));
        assert_eq!(
            frames[0]["data"]["active_sessions_users"]["r1"][0]["id"],
            "alice"
        );
    }
}
