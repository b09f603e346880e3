//! MessagePusher trait 定義
//!
//! クライアントへの通知手段を抽象化します。
//! UseCase 層はこの trait に依存し、WebSocket などの具体的な実装には依存しません。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{error::MessagePushError, notification::Notification, value_object::ConnectionId};

/// Outbound channel of one connection; frames are already-encoded JSON text.
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続を通知先として登録
    async fn register_client(&self, client_id: ConnectionId, sender: PusherChannel);

    /// 接続を通知先から外す
    async fn unregister_client(&self, client_id: &ConnectionId);

    /// 特定の接続へ通知
    async fn push_to(
        &self,
        client_id: &ConnectionId,
        notification: &Notification,
    ) -> Result<(), MessagePushError>;

    /// 複数の接続へ通知（一部の失敗は許容）
    async fn broadcast(
        &self,
        targets: &[ConnectionId],
        notification: &Notification,
    ) -> Result<(), MessagePushError>;

    /// 登録済みの全接続へ通知
    async fn broadcast_all(&self, notification: &Notification) -> Result<(), MessagePushError>;
}
