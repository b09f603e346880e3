//! UseCase: ルーム退出処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveRoomUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 残った Occupant のルームがキューの末尾に戻ることを保証
//! - ルーム名が省略された場合に Connection Registry から解決されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：ペア成立中の退出（相手に `leave`）
//! - 正常系：ルーム名省略での退出
//! - 異常系：どのルームにも居ない接続の退出

use std::sync::Arc;

use crate::domain::{
    ConnectionId, Departure, LobbyRepository, MessagePusher, Notification, RoomName,
};

use super::{broadcaster::broadcast_snapshot, error::RoomEventError};

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    repository: Arc<dyn LobbyRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl LeaveRoomUseCase {
    pub fn new(
        repository: Arc<dyn LobbyRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 退出を実行
    ///
    /// `room_name` が `None` の場合は現在のルームを使います。
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_name: Option<&RoomName>,
    ) -> Result<Departure, RoomEventError> {
        let mut lobby = self.repository.lock().await;
        let departure = lobby.leave(connection_id, room_name)?;

        if departure.dissolved {
            tracing::info!("Room '{}' dissolved", departure.room);
        } else {
            tracing::info!(
                "'{}' left room '{}', room requeued",
                connection_id,
                departure.room
            );
            let notification = Notification::PeerLeft {
                room: departure.room.clone(),
                snapshot: lobby.snapshot(),
            };
            if let Err(e) = self
                .message_pusher
                .broadcast(&departure.remaining, &notification)
                .await
            {
                tracing::warn!("Failed to notify remaining occupant: {}", e);
            }
        }

        // The initiator receives its fresh snapshot through this broadcast.
        broadcast_snapshot(self.message_pusher.as_ref(), &lobby).await;
        Ok(departure)
    }
}
