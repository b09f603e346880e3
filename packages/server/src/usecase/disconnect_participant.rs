//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 切断時のルーム整理（leave と同じ）と、残った相手への `leave` 通知
//!
//! ### なぜこのテストが必要か
//! - 切断は何度呼ばれても安全でなければならない（2 回目は何もしない）
//! - 1 人だけのルームは削除され、キューからも外れることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：ペア成立中の切断（相手は待機状態に戻る）
//! - 正常系：待機中の切断（ルーム削除）
//! - エッジケース：2 回目の切断

use std::sync::Arc;

use crate::domain::{ConnectionId, LobbyRepository, MessagePusher, Notification};

use super::{broadcaster::broadcast_snapshot, error::DisconnectError};

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    repository: Arc<dyn LobbyRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectParticipantUseCase {
    pub fn new(
        repository: Arc<dyn LobbyRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 切断を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ConnectionId>)` - `leave` を通知した接続
    /// * `Err(DisconnectError)` - 既に切断済み（状態は変更されない）
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Vec<ConnectionId>, DisconnectError> {
        let mut lobby = self.repository.lock().await;

        let departure = lobby
            .disconnect(connection_id)
            .map_err(|_| DisconnectError::AlreadyDisconnected(connection_id.to_string()))?;
        self.message_pusher.unregister_client(connection_id).await;

        let mut notified = Vec::new();
        match departure {
            Some(departure) => {
                if departure.dissolved {
                    tracing::info!("Room '{}' dissolved", departure.room);
                }
                let notification = Notification::PeerLeft {
                    room: departure.room.clone(),
                    snapshot: lobby.snapshot(),
                };
                if let Err(e) = self
                    .message_pusher
                    .broadcast(&departure.remaining, &notification)
                    .await
                {
                    tracing::warn!("Failed to notify peer of '{}': {}", connection_id, e);
                }
                notified = departure.remaining;
            }
            None => tracing::debug!("Connection '{}' was not in a room", connection_id),
        }

        broadcast_snapshot(self.message_pusher.as_ref(), &lobby).await;
        Ok(notified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::{TestHarness, drain, events, room_name};

    #[tokio::test]
    async fn test_disconnect_paired_notifies_peer() {
        // テスト項目: ペア成立中に切断すると、相手に leave が届きルームは待機に戻る
        // given (前提条件):
        let harness = TestHarness::new();
        let (x, _rx_x) = harness.connect("x").await;
        let (y, mut rx_y) = harness.connect("y").await;
        harness.join(&x, "r1").await;
        harness.join(&y, "r1").await;
        let usecase =
            DisconnectParticipantUseCase::new(harness.repository(), harness.message_pusher());

        // when (操作):
        let notified = usecase.execute(&x).await.unwrap();

        // then (期待する結果):
        assert_eq!(notified, vec![y.clone()]);
        let frames = drain(&mut rx_y);
        assert_eq!(events(&frames), vec!["leave", "getWaitingRooms"]);
        assert_eq!(frames[0]["data"]["room_name"], "r1");
        assert_eq!(frames[0]["data"]["waiting_queue"], serde_json::json!(["r1"]));
        assert_eq!(
            harness.repository.snapshot().await.waiting_queue,
            vec![room_name("r1")]
        );
    }

    #[tokio::test]
    async fn test_disconnect_waiting_dissolves_room() {
        // テスト項目: 待機中に切断するとルームが削除されキューから外れる（シナリオ D）
        // given (前提条件):
        let harness = TestHarness::new();
        let (x, _rx_x) = harness.connect("x").await;
        harness.join(&x, "r2").await;
        let usecase =
            DisconnectParticipantUseCase::new(harness.repository(), harness.message_pusher());

        // when (操作):
        let notified = usecase.execute(&x).await.unwrap();

        // then (期待する結果):
        assert!(notified.is_empty());
        let snapshot = harness.repository.snapshot().await;
        assert!(snapshot.waiting_queue.is_empty());
        assert!(snapshot.rooms.is_empty());
    }

    #[tokio::test]
    async fn test_disconnect_twice_is_noop() {
        // テスト項目: 2 回目の切断は状態を変えずエラーを返す
        // given (前提条件):
        let harness = TestHarness::new();
        let (x, _rx_x) = harness.connect("x").await;
        let (_y, mut rx_y) = harness.connect("y").await;
        let usecase =
            DisconnectParticipantUseCase::new(harness.repository(), harness.message_pusher());
        usecase.execute(&x).await.unwrap();
        drain(&mut rx_y);

        // when (操作):
        let result = usecase.execute(&x).await;

        // then (期待する結果): 何もブロードキャストされない
        assert_eq!(
            result,
            Err(DisconnectError::AlreadyDisconnected("x".to_string()))
        );
        assert!(drain(&mut rx_y).is_empty());
        assert_eq!(harness.repository.stats().await.connected_clients, 1);
    }
}
