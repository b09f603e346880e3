//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - ルーム作成（`created`）、ペア成立（`joined`）、満員（`full`）の各応答
//!
//! ### なぜこのテストが必要か
//! - 待機キューとルーム人数の不変条件がイベント後も保たれることを保証
//! - 満員のルームへの参加が状態を一切変更しないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ルーム作成、待機中ルームへの参加（シナリオ A）
//! - 異常系：満員ルームへの 3 人目の参加
//! - エッジケース：force_new による既存ルームの置き換え、別ルームへの移動

use std::sync::Arc;

use pairhub_shared::time::Clock;

use crate::domain::{
    ConnectionId, JoinOutcome, LobbyError, LobbyRepository, MessagePusher, Notification,
    RoomName, Timestamp,
};

use super::{broadcaster::broadcast_snapshot, error::JoinRoomError};

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    repository: Arc<dyn LobbyRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
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

    /// ルーム参加を実行
    ///
    /// 満員の場合は本人に `full` を送ってから `JoinRoomError::RoomFull` を返します。
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_name: RoomName,
        force_new: bool,
    ) -> Result<JoinOutcome, JoinRoomError> {
        let mut lobby = self.repository.lock().await;

        let outcome = match lobby.join(
            connection_id,
            room_name.clone(),
            force_new,
            Timestamp::new(self.clock.now_millis()),
        ) {
            Ok(outcome) => outcome,
            Err(LobbyError::RoomFull(room)) => {
                tracing::info!("Room '{}' is full, rejecting '{}'", room, connection_id);
                self.push(connection_id, &Notification::Full).await;
                return Err(JoinRoomError::RoomFull(room));
            }
            Err(e) => return Err(JoinRoomError::Rejected(e)),
        };

        let nobody: &[ConnectionId] = &[];
        let (departure, displaced, reply) = match &outcome {
            JoinOutcome::Created {
                departure,
                displaced,
            } => {
                tracing::info!("Room '{}' created by '{}'", room_name, connection_id);
                (departure, displaced.as_slice(), Notification::Created)
            }
            JoinOutcome::Joined { peer, departure } => {
                tracing::info!(
                    "Room '{}' paired: '{}' and '{}'",
                    room_name,
                    peer,
                    connection_id
                );
                (departure, nobody, Notification::Joined)
            }
        };

        if let Some(departure) = departure {
            let notification = Notification::PeerLeft {
                room: departure.room.clone(),
                snapshot: lobby.snapshot(),
            };
            self.broadcast(&departure.remaining, &notification).await;
        }
        if !displaced.is_empty() {
            tracing::info!(
                "Room '{}' replaced, displacing {} occupant(s)",
                room_name,
                displaced.len()
            );
            let notification = Notification::PeerLeft {
                room: room_name.clone(),
                snapshot: lobby.snapshot(),
            };
            self.broadcast(displaced, &notification).await;
        }
        self.push(connection_id, &reply).await;

        broadcast_snapshot(self.message_pusher.as_ref(), &lobby).await;
        Ok(outcome)
    }

    async fn push(&self, connection_id: &ConnectionId, notification: &Notification) {
        if let Err(e) = self.message_pusher.push_to(connection_id, notification).await {
            tracing::warn!("Failed to push to '{}': {}", connection_id, e);
        }
    }

    async fn broadcast(&self, targets: &[ConnectionId], notification: &Notification) {
        if let Err(e) = self.message_pusher.broadcast(targets, notification).await {
            tracing::warn!("Failed to notify departed room: {}", e);
        }
    }
}
