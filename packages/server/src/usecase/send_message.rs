//! UseCase: チャットメッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - チャットログへの追記と、更新後のログ全体の相手への送信
//!
//! ### なぜこのテストが必要か
//! - 相手には `message_recieved` でログ全体が届く（送信者には返らない）
//! - ログが送信順に積み上がることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：ペア成立中の送信
//! - エッジケース：待機中（相手なし）の送信はログに残るが誰にも届かない

use std::sync::Arc;

use pairhub_shared::time::Clock;

use crate::domain::{
    ConnectionId, LobbyRepository, MessagePusher, MessageText, Notification, RoomName, Timestamp,
};

use super::error::RoomEventError;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    repository: Arc<dyn LobbyRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
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

    /// メッセージ送信を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ConnectionId>)` - ログを受け取った接続
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_name: &RoomName,
        text: MessageText,
    ) -> Result<Vec<ConnectionId>, RoomEventError> {
        let mut lobby = self.repository.lock().await;
        let delivery = lobby.send_message(
            connection_id,
            room_name,
            text,
            Timestamp::new(self.clock.now_millis()),
        )?;

        if !delivery.recipients.is_empty() {
            self.message_pusher
                .broadcast(
                    &delivery.recipients,
                    &Notification::MessageReceived(delivery.log),
                )
                .await?;
        }
        Ok(delivery.recipients)
    }
}
