//! Conversion logic between domain models and DTOs.

use crate::domain::{
    CallRecord, ChatMessage, LobbySnapshot, LobbyStats, Notification, Occupant, SignalKind,
};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// Domain → DTO
// ========================================

impl From<&Occupant> for dto::OccupantDto {
    fn from(model: &Occupant) -> Self {
        Self {
            id: model.id.as_str().to_string(),
            username: model
                .display_name
                .as_ref()
                .map(|name| name.as_str().to_string()),
        }
    }
}

impl From<&ChatMessage> for dto::ChatMessageDto {
    fn from(model: &ChatMessage) -> Self {
        Self {
            sender: model.sender.as_str().to_string(),
            message: model.text.as_str().to_string(),
            sent_at: model.sent_at.value(),
        }
    }
}

impl From<&LobbySnapshot> for dto::SnapshotDto {
    fn from(model: &LobbySnapshot) -> Self {
        Self {
            waiting_queue: model
                .waiting_queue
                .iter()
                .map(|name| name.as_str().to_string())
                .collect(),
            active_sessions_users: model
                .rooms
                .iter()
                .map(|(name, occupants)| {
                    (
                        name.as_str().to_string(),
                        occupants.iter().map(dto::OccupantDto::from).collect(),
                    )
                })
                .collect(),
        }
    }
}

impl From<&Notification> for dto::ServerEvent {
    fn from(notification: &Notification) -> Self {
        match notification {
            Notification::Created => Self::Created,
            Notification::Joined => Self::Joined,
            Notification::Full => Self::Full,
            Notification::Ready => Self::Ready,
            Notification::Signal(kind, payload) => {
                let value = payload.as_value().clone();
                match kind {
                    SignalKind::Offer => Self::Offer(value),
                    SignalKind::Answer => Self::Answer(value),
                    SignalKind::IceCandidate => Self::IceCandidate(value),
                }
            }
            Notification::PeerLeft { room, snapshot } => Self::Leave(dto::LeaveNoticeDto {
                room_name: room.as_str().to_string(),
                snapshot: snapshot.into(),
            }),
            Notification::ClearMessages => Self::ClearMessages,
            Notification::MessageReceived(log) => {
                Self::MessageReceived(log.iter().map(dto::ChatMessageDto::from).collect())
            }
            Notification::SkippedUsers(history) => Self::SkippedUsers(
                history
                    .iter()
                    .map(|name| name.as_str().to_string())
                    .collect(),
            ),
            Notification::WaitingRooms(snapshot) => Self::WaitingRooms(snapshot.into()),
        }
    }
}

impl From<&CallRecord> for http::CallRecordRequest {
    fn from(model: &CallRecord) -> Self {
        Self {
            participant_name: model.participant_name.clone(),
            peer_name: model.peer_name.clone(),
            duration_seconds: model.duration.as_secs(),
        }
    }
}

impl http::LobbyStatsDto {
    pub fn from_stats(stats: LobbyStats, generated_at: String) -> Self {
        Self {
            connected_clients: stats.connected_clients,
            waiting_rooms: stats.waiting_rooms,
            paired_rooms: stats.paired_rooms,
            occupants: stats.occupants,
            generated_at,
        }
    }
}
