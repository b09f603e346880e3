//! UseCase: スキップ処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SkipPeerUseCase::execute() メソッド
//! - 通話記録の送信、チャットログの消去、スキップ履歴の通知、ルームからの退出
//!
//! ### なぜこのテストが必要か
//! - ペア成立中のスキップだけが Call Ledger に記録されることを保証
//! - 記録の送信がルーム状態の変更より後（ロック解放後）に行われることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：ペア成立中のスキップ（シナリオ C）
//! - エッジケース：相手が居ない状態でのスキップ（記録なし、ルーム削除）
//! - エッジケース：表示名が無い場合は "Unknown" で記録

use std::sync::Arc;

use crate::domain::{
    CallDuration, CallLedger, ConnectionId, DisplayName, LobbyRepository, MessagePusher,
    Notification, RoomName, SkipOutcome,
};

use super::{broadcaster::broadcast_snapshot, error::RoomEventError, ledger::dispatch_call_record};

/// スキップのユースケース
pub struct SkipPeerUseCase {
    repository: Arc<dyn LobbyRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    call_ledger: Arc<dyn CallLedger>,
}

impl SkipPeerUseCase {
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

    /// スキップを実行
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_name: &RoomName,
        display_name: Option<DisplayName>,
        duration: CallDuration,
    ) -> Result<SkipOutcome, RoomEventError> {
        let outcome = {
            let mut lobby = self.repository.lock().await;
            let outcome = lobby.skip(connection_id, room_name, display_name, duration)?;
            tracing::info!(
                "'{}' skipped room '{}' (history: {})",
                connection_id,
                room_name,
                outcome.history.len()
            );

            if let Err(e) = self
                .message_pusher
                .broadcast(&outcome.members, &Notification::ClearMessages)
                .await
            {
                tracing::warn!("Failed to clear messages in '{}': {}", room_name, e);
            }

            let mut history_targets = vec![connection_id.clone()];
            history_targets.extend(outcome.peer.iter().cloned());
            if let Err(e) = self
                .message_pusher
                .broadcast(
                    &history_targets,
                    &Notification::SkippedUsers(outcome.history.clone()),
                )
                .await
            {
                tracing::warn!("Failed to send skip history: {}", e);
            }

            broadcast_snapshot(self.message_pusher.as_ref(), &lobby).await;
            outcome
        };

        if let Some(record) = outcome.call.clone() {
            dispatch_call_record(self.call_ledger.clone(), record);
        }
        Ok(outcome)
    }
}
