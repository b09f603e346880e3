//! Repository trait 定義
//!
//! Lobby 集約へのアクセスを抽象化します。
//! 状態は集約ひとつにまとまっており、1 イベントの処理中はロックを保持し続けることで
//! Room Table / Waiting Queue / Skip History への変更を直列化します。

use async_trait::async_trait;
use tokio::sync::MutexGuard;

use super::lobby::{Lobby, LobbySnapshot, LobbyStats};

#[async_trait]
pub trait LobbyRepository: Send + Sync {
    /// Lobby への排他アクセスを取得
    ///
    /// ガードを保持している間、他のイベントは待たされます。
    async fn lock(&self) -> MutexGuard<'_, Lobby>;

    /// 現在のスナップショットを取得
    async fn snapshot(&self) -> LobbySnapshot;

    /// 現在の統計値を取得
    async fn stats(&self) -> LobbyStats;
}
