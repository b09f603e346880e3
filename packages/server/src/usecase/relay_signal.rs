//! UseCase: シグナリング中継（ready / offer / answer / ice-candidate）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelaySignalUseCase の ready() / signal() メソッド
//!
//! ### なぜこのテストが必要か
//! - ペイロードが加工されずに相手だけへ届くことを保証（送信者には返らない）
//! - 同じ送信者からの中継が送信順のまま届くことを確認（シナリオ B）
//!
//! ### どのような状況を想定しているか
//! - 正常系：ペア成立中の中継
//! - エッジケース：相手が居ない（1 人だけ）のルームでの中継は何もしない
//! - 異常系：自分が居ないルームへの中継

use std::sync::Arc;

use crate::domain::{
    ConnectionId, LobbyRepository, MessagePusher, Notification, RoomName, SignalKind,
    SignalPayload,
};

use super::error::RoomEventError;

/// シグナリング中継のユースケース
pub struct RelaySignalUseCase {
    repository: Arc<dyn LobbyRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl RelaySignalUseCase {
    pub fn new(
        repository: Arc<dyn LobbyRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// `ready` を相手に中継
    pub async fn ready(
        &self,
        connection_id: &ConnectionId,
        room_name: &RoomName,
    ) -> Result<Vec<ConnectionId>, RoomEventError> {
        self.relay(connection_id, room_name, Notification::Ready)
            .await
    }

    /// offer / answer / ICE candidate をそのまま相手に中継
    pub async fn signal(
        &self,
        connection_id: &ConnectionId,
        room_name: &RoomName,
        kind: SignalKind,
        payload: SignalPayload,
    ) -> Result<Vec<ConnectionId>, RoomEventError> {
        self.relay(connection_id, room_name, Notification::Signal(kind, payload))
            .await
    }

    async fn relay(
        &self,
        connection_id: &ConnectionId,
        room_name: &RoomName,
        notification: Notification,
    ) -> Result<Vec<ConnectionId>, RoomEventError> {
        let lobby = self.repository.lock().await;
        let targets = lobby.relay_targets(connection_id, room_name)?;
        if targets.is_empty() {
            tracing::debug!(
                "No peer in room '{}' to relay to from '{}'",
                room_name,
                connection_id
            );
            return Ok(targets);
        }
        tracing::debug!(
            "Relaying {} in room '{}'",
            notification_kind(&notification),
            room_name
        );
        self.message_pusher
            .broadcast(&targets, &notification)
            .await?;
        Ok(targets)
    }
}

fn notification_kind(notification: &Notification) -> &'static str {
    match notification {
        Notification::Ready => "ready",
        Notification::Signal(SignalKind::Offer, _) => "offer",
        Notification::Signal(SignalKind::Answer, _) => "answer",
        Notification::Signal(SignalKind::IceCandidate, _) => "ice-candidate",
        _ => "notification",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::LobbyError,
        usecase::test_support::{TestHarness, drain, events, room_name},
    };
    use serde_json::json;

    #[tokio::test]
    async fn test_signals_reach_peer_verbatim_and_in_order() {
        // テスト項目: offer と ICE candidate が加工されず順番どおりに相手に届く（シナリオ B）
        // given (前提条件):
        let harness = TestHarness::new();
        let (x, mut rx_x) = harness.connect("x").await;
        let (y, mut rx_y) = harness.connect("y").await;
        harness.join(&x, "r1").await;
        harness.join(&y, "r1").await;
        let usecase = RelaySignalUseCase::new(harness.repository(), harness.message_pusher());
        let r1 = room_name("r1");
        let offer = json!({"type": "offer", "sdp": "v=0\r\n..."});
        let candidates = [json!({"candidate": "a"}), json!({"candidate": "b"})];

        // when (操作):
        usecase.ready(&x, &r1).await.unwrap();
        usecase
            .signal(&x, &r1, SignalKind::Offer, SignalPayload::new(offer.clone()))
            .await
            .unwrap();
        for candidate in &candidates {
            usecase
                .signal(
                    &x,
                    &r1,
                    SignalKind::IceCandidate,
                    SignalPayload::new(candidate.clone()),
                )
                .await
                .unwrap();
        }

        // then (期待する結果):
        let frames = drain(&mut rx_y);
        assert_eq!(
            events(&frames),
            vec!["ready", "offer", "ice-candidate", "ice-candidate"]
        );
        assert_eq!(frames[1]["data"], offer);
        assert_eq!(frames[2]["data"], candidates[0]);
        assert_eq!(frames[3]["data"], candidates[1]);
        assert!(drain(&mut rx_x).is_empty());
    }

    #[tokio::test]
    async fn test_relay_without_peer_is_noop() {
        // テスト項目: 相手が居ないルームでの中継は何もしない
        // given (前提条件):
        let harness = TestHarness::new();
        let (x, mut rx_x) = harness.connect("x").await;
        harness.join(&x, "r1").await;
        drain(&mut rx_x);
        let usecase = RelaySignalUseCase::new(harness.repository(), harness.message_pusher());

        // when (操作):
        let targets = usecase
            .signal(
                &x,
                &room_name("r1"),
                SignalKind::Answer,
                SignalPayload::new(json!({})),
            )
            .await
            .unwrap();

        // then (期待する結果):
        assert!(targets.is_empty());
        assert!(drain(&mut rx_x).is_empty());
    }

    #[tokio::test]
    async fn test_relay_from_outsider_is_rejected() {
        // テスト項目: ルームの Occupant でない接続からの中継は拒否される
        // given (前提条件):
        let harness = TestHarness::new();
        let (x, _rx_x) = harness.connect("x").await;
        let (y, mut rx_y) = harness.connect("y").await;
        let (z, _rx_z) = harness.connect("z").await;
        harness.join(&x, "r1").await;
        harness.join(&y, "r1").await;
        drain(&mut rx_y);
        let usecase = RelaySignalUseCase::new(harness.repository(), harness.message_pusher());

        // when (操作):
        let result = usecase.ready(&z, &room_name("r1")).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RoomEventError::Lobby(LobbyError::NotAnOccupant(
                "r1".to_string()
            )))
        );
        assert!(drain(&mut rx_y).is_empty());
    }
}
