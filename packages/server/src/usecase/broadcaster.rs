//! State Broadcaster
//!
//! 状態を変更したイベントの最後に、最新のスナップショットを全接続へ配信します。
//! Lobby のロックを保持したまま呼び出すことで、スナップショットの順序が
//! イベントの適用順と一致します。

use crate::domain::{Lobby, MessagePusher, Notification};

/// Push `getWaitingRooms` with the current lobby state to every connection.
pub(crate) async fn broadcast_snapshot(message_pusher: &dyn MessagePusher, lobby: &Lobby) {
    let notification = Notification::WaitingRooms(lobby.snapshot());
    if let Err(e) = message_pusher.broadcast_all(&notification).await {
        tracing::warn!("Failed to broadcast lobby snapshot: {}", e);
    }
}
