//! WebSocket message DTOs.
//!
//! Every frame is a JSON envelope `{"event": <name>, "data": <payload>}`.
//! Event names are kept exactly as existing browser clients expect them,
//! including the historical `message_recieved` spelling.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ========================================
// Inbound (client → server)
// ========================================

/// Raw envelope, before the payload is interpreted.
#[derive(Debug, Deserialize)]
pub struct ClientEnvelope {
    pub event: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JoinPayload {
    #[serde(default)]
    pub room_name: String,
    #[serde(default)]
    pub force_new: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BindIdentityPayload {
    #[serde(default)]
    pub room_name: String,
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RoomPayload {
    #[serde(default)]
    pub room_name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SignalPayloadDto {
    #[serde(default)]
    pub room_name: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MessageSendPayload {
    #[serde(default)]
    pub room_name: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LeavePayload {
    #[serde(default)]
    pub room_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CallEndPayload {
    #[serde(default)]
    pub room_name: String,
    #[serde(default)]
    pub username: Option<String>,
    /// Seconds as measured by the browser, usually fractional.
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub call_duration: f64,
}

/// Accept any JSON number or numeric string; anything else counts as zero.
///
/// The duration only feeds the call ledger, so a bad value must not drop the event.
fn lenient_seconds<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let secs = match &value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(secs.filter(|s| s.is_finite()).unwrap_or(0.0))
}

/// Parsed inbound event.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    Join(JoinPayload),
    /// `store_peer_ip`: bind a display name to this connection's occupant entry.
    BindIdentity(BindIdentityPayload),
    Ready(RoomPayload),
    Offer(SignalPayloadDto),
    Answer(SignalPayloadDto),
    IceCandidate(SignalPayloadDto),
    MessageSend(MessageSendPayload),
    Leave(LeavePayload),
    Skip(CallEndPayload),
    EndCall(CallEndPayload),
    /// `leave_on`: queue cleanup followed by a snapshot broadcast.
    LeaveOn,
    /// `remove_waiting_users`: silent queue cleanup.
    RemoveWaitingUsers,
}

#[derive(Debug, Error)]
pub enum ClientEventError {
    #[error("malformed envelope: {0}")]
    Envelope(#[source] serde_json::Error),

    #[error("unknown event '{0}'")]
    UnknownEvent(String),

    #[error("malformed payload for '{event}': {source}")]
    Payload {
        event: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientEvent {
    /// Parse one text frame.
    pub fn parse(text: &str) -> Result<Self, ClientEventError> {
        let envelope: ClientEnvelope =
            serde_json::from_str(text).map_err(ClientEventError::Envelope)?;
        let ClientEnvelope { event, data } = envelope;

        fn payload<T: for<'de> Deserialize<'de>>(
            event: &str,
            data: serde_json::Value,
        ) -> Result<T, ClientEventError> {
            serde_json::from_value(data).map_err(|source| ClientEventError::Payload {
                event: event.to_string(),
                source,
            })
        }

        let parsed = match event.as_str() {
            "join" => Self::Join(payload(&event, data)?),
            "store_peer_ip" => Self::BindIdentity(payload(&event, data)?),
            "ready" => Self::Ready(payload(&event, data)?),
            "offer" => Self::Offer(payload(&event, data)?),
            "answer" => Self::Answer(payload(&event, data)?),
            "ice-candidate" => Self::IceCandidate(payload(&event, data)?),
            "message_send" => Self::MessageSend(payload(&event, data)?),
            "leave" => {
                let leave: Option<LeavePayload> = payload(&event, data)?;
                Self::Leave(leave.unwrap_or(LeavePayload { room_name: None }))
            }
            "skip" => Self::Skip(payload(&event, data)?),
            "end_call" => Self::EndCall(payload(&event, data)?),
            "leave_on" => Self::LeaveOn,
            "remove_waiting_users" => Self::RemoveWaitingUsers,
            _ => return Err(ClientEventError::UnknownEvent(event)),
        };
        Ok(parsed)
    }
}

// ========================================
// Outbound (server → client)
// ========================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccupantDto {
    pub id: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessageDto {
    pub sender: String,
    pub message: String,
    pub sent_at: i64,
}

/// Global snapshot, as sent with `getWaitingRooms`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotDto {
    pub waiting_queue: Vec<String>,
    pub active_sessions_users: BTreeMap<String, Vec<OccupantDto>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaveNoticeDto {
    pub room_name: String,
    #[serde(flatten)]
    pub snapshot: SnapshotDto,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    #[serde(rename = "created")]
    Created,
    #[serde(rename = "joined")]
    Joined,
    #[serde(rename = "full")]
    Full,
    #[serde(rename = "ready")]
    Ready,
    #[serde(rename = "offer")]
    Offer(serde_json::Value),
    #[serde(rename = "answer")]
    Answer(serde_json::Value),
    #[serde(rename = "ice-candidate")]
    IceCandidate(serde_json::Value),
    #[serde(rename = "leave")]
    Leave(LeaveNoticeDto),
    #[serde(rename = "clear_messages")]
    ClearMessages,
    #[serde(rename = "message_recieved")]
    MessageReceived(Vec<ChatMessageDto>),
    #[serde(rename = "skipped_users")]
    SkippedUsers(Vec<String>),
    #[serde(rename = "getWaitingRooms")]
    WaitingRooms(SnapshotDto),
}
