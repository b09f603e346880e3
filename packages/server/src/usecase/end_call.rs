//! UseCase: 通話終了処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - EndCallUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 通話終了では Occupant もキューも変更されない（スキップとの非対称性）
//! - ペアが成立していないルームではスナップショット配信だけが行われることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：ペア成立中の通話終了（記録とチャットログ消去）
//! - エッジケース：1 人だけのルームでの通話終了

use std::sync::Arc;

use crate::domain::{
    CallDuration, CallLedger, CallRecord, ConnectionId, DisplayName, LobbyError,
    LobbyRepository, MessagePusher, Notification, RoomName,
};

use super::{broadcaster::broadcast_snapshot, error::RoomEventError, ledger::dispatch_call_record};

/// 通話終了のユースケース
pub struct EndCallUseCase {
    repository: Arc<dyn LobbyRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    call_ledger: Arc<dyn CallLedger>,
}

impl EndCallUseCase {
    pub fn new(
        repository: Arc<dyn LobbyRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        call_ledger: Arc<dyn CallLedger>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            call_ledger,
        }
    }

    /// 通話終了を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Some(CallRecord))` - 記録を送信した
    /// * `Ok(None)` - ペアが成立していなかったため、スナップショットのみ配信した
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_name: &RoomName,
        display_name: Option<DisplayName>,
        duration: CallDuration,
    ) -> Result<Option<CallRecord>, RoomEventError> {
        let record = {
            let mut lobby = self.repository.lock().await;
            let record = match lobby.end_call(connection_id, room_name, display_name, duration) {
                Ok(outcome) => {
                    tracing::info!("Call in room '{}' ended by '{}'", room_name, connection_id);
                    if let Err(e) = self
                        .message_pusher
                        .broadcast(&outcome.members, &Notification::ClearMessages)
                        .await
                    {
                        tracing::warn!("Failed to clear messages in '{}': {}", room_name, e);
                    }
                    Some(outcome.call)
                }
                Err(LobbyError::NotPaired(_) | LobbyError::RoomNotFound(_)) => {
                    tracing::debug!("end_call on unpaired room '{}'", room_name);
                    None
                }
                // Outsiders are only rejected from a live call.
                Err(LobbyError::NotAnOccupant(_))
                    if lobby.room(room_name).is_some_and(|room| !room.is_paired()) =>
                {
                    tracing::debug!(
                        "end_call from outsider '{}' on unpaired room '{}'",
                        connection_id,
                        room_name
                    );
                    None
                }
                Err(e) => return Err(e.into()),
            };
            broadcast_snapshot(self.message_pusher.as_ref(), &lobby).await;
            record
        };

        if let Some(record) = record.clone() {
            dispatch_call_record(self.call_ledger.clone(), record);
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::{
        TestHarness, drain, events, next_record, recording_ledger, room_name, silent_ledger,
    };

    #[tokio::test]
    async fn test_end_call_records_and_keeps_occupants() {
        // テスト項目: 通話終了で記録とログ消去が行われ、Occupant とキューはそのまま
        // given (前提条件):
        let harness = TestHarness::new();
        let (x, mut rx_x) = harness.connect("x").await;
        let (y, mut rx_y) = harness.connect("y").await;
        harness.join(&x, "r1").await;
        harness.join(&y, "r1").await;
        harness
            .repository
            .lock()
            .await
            .bind_identity(
                &y,
                &room_name("r1"),
                DisplayName::new("bob".to_string()).unwrap(),
            )
            .unwrap();
        let before = harness.repository.snapshot().await;
        let (ledger, mut records) = recording_ledger();
        let usecase = EndCallUseCase::new(harness.repository(), harness.message_pusher(), ledger);

        // when (操作):
        let result = usecase
            .execute(
                &x,
                &room_name("r1"),
                Some(DisplayName::new("alice".to_string()).unwrap()),
                CallDuration::from_secs(90),
            )
            .await
            .unwrap();

        // then (期待する結果):
        assert!(result.is_some());
        let record = next_record(&mut records).await;
        assert_eq!(record.participant_name, "alice");
        assert_eq!(record.peer_name, "bob");
        assert_eq!(record.duration.as_secs(), 90);
        assert_eq!(harness.repository.snapshot().await, before);
        assert_eq!(
            events(&drain(&mut rx_x)),
            vec!["clear_messages", "getWaitingRooms"]
        );
        assert_eq!(
            events(&drain(&mut rx_y)),
            vec!["clear_messages", "getWaitingRooms"]
        );
    }

    #[tokio::test]
    async fn test_end_call_unpaired_only_broadcasts_snapshot() {
        // テスト項目: 1 人だけのルームではスナップショットのみ配信され、記録されない
        // given (前提条件):
        let harness = TestHarness::new();
        let (x, mut rx_x) = harness.connect("x").await;
        harness.join(&x, "r1").await;
        drain(&mut rx_x);
        let usecase = EndCallUseCase::new(
            harness.repository(),
            harness.message_pusher(),
            silent_ledger(),
        );

        // when (操作):
        let result = usecase
            .execute(&x, &room_name("r1"), None, CallDuration::from_secs(5))
            .await;

        // then (期待する結果):
        assert_eq!(result, Ok(None));
        assert_eq!(events(&drain(&mut rx_x)), vec!["getWaitingRooms"]);
        assert_eq!(
            harness.repository.snapshot().await.waiting_queue,
            vec![room_name("r1")]
        );
    }

    #[tokio::test]
    async fn test_end_call_from_outsider_on_unpaired_room_broadcasts_snapshot() {
        // テスト項目: 1 人だけのルームに対する部外者の通話終了でも、スナップショットが配信される
        // given (前提条件):
        let harness = TestHarness::new();
        let (x, mut rx_x) = harness.connect("x").await;
        let (z, mut rx_z) = harness.connect("z").await;
        harness.join(&x, "r1").await;
        let before = harness.repository.snapshot().await;
        let usecase = EndCallUseCase::new(
            harness.repository(),
            harness.message_pusher(),
            silent_ledger(),
        );

        // when (操作):
        let result = usecase
            .execute(&z, &room_name("r1"), None, CallDuration::from_secs(5))
            .await;

        // then (期待する結果): 状態は変わらず、全員に getWaitingRooms が届く
        assert_eq!(result, Ok(None));
        assert_eq!(events(&drain(&mut rx_x)), vec!["getWaitingRooms"]);
        assert_eq!(events(&drain(&mut rx_z)), vec!["getWaitingRooms"]);
        assert_eq!(harness.repository.snapshot().await, before);
    }

    #[tokio::test]
    async fn test_end_call_from_outsider_on_paired_room_is_rejected() {
        // テスト項目: ペア成立中のルームに対する部外者の通話終了は拒否され、何も配信されない
        // given (前提条件):
        let harness = TestHarness::new();
        let (x, mut rx_x) = harness.connect("x").await;
        let (y, _rx_y) = harness.connect("y").await;
        let (z, _rx_z) = harness.connect("z").await;
        harness.join(&x, "r1").await;
        harness.join(&y, "r1").await;
        let usecase = EndCallUseCase::new(
            harness.repository(),
            harness.message_pusher(),
            silent_ledger(),
        );

        // when (操作):
        let result = usecase
            .execute(&z, &room_name("r1"), None, CallDuration::from_secs(5))
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RoomEventError::Lobby(LobbyError::NotAnOccupant(
                "r1".to_string()
            )))
        );
        assert!(drain(&mut rx_x).is_empty());
    }
}
