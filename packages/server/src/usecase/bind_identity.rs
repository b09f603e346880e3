//! UseCase: 表示名の紐付け（`store_peer_ip`）
//!
//! 通知は行いません。紐付けた表示名はスナップショットと通話記録に使われます。

use std::sync::Arc;

use crate::domain::{ConnectionId, DisplayName, LobbyRepository, RoomName};

use super::error::RoomEventError;

/// 表示名紐付けのユースケース
pub struct BindIdentityUseCase {
    repository: Arc<dyn LobbyRepository>,
}

impl BindIdentityUseCase {
    pub fn new(repository: Arc<dyn LobbyRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_name: &RoomName,
        display_name: DisplayName,
    ) -> Result<(), RoomEventError> {
        let mut lobby = self.repository.lock().await;
        lobby.bind_identity(connection_id, room_name, display_name.clone())?;
        tracing::debug!(
            "Connection '{}' is '{}' in room '{}'",
            connection_id,
            display_name.as_str(),
            room_name
        );
        Ok(())
    }
}
