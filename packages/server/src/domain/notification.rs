//! クライアントへ送る通知（ドメインイベント）
//!
//! ワイヤ形式（イベント名・JSON 形状）への変換は Infrastructure 層の DTO が担います。

use super::{
    entity::ChatMessage,
    lobby::LobbySnapshot,
    value_object::{RoomName, SignalPayload},
};

/// Kind of negotiation payload relayed verbatim between peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Offer,
    Answer,
    IceCandidate,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// The initiator created a new room and is waiting.
    Created,
    /// The initiator became the second occupant.
    Joined,
    /// The requested room already has two occupants.
    Full,
    /// The peer is ready to negotiate.
    Ready,
    /// Offer / answer / ICE candidate from the peer.
    Signal(SignalKind, SignalPayload),
    /// The peer left the room (or the room was taken over).
    PeerLeft {
        room: RoomName,
        snapshot: LobbySnapshot,
    },
    ClearMessages,
    /// Whole chat log of the room after a new message.
    MessageReceived(Vec<ChatMessage>),
    /// Skip history of the skipping connection.
    SkippedUsers(Vec<RoomName>),
    /// Global lobby snapshot.
    WaitingRooms(LobbySnapshot),
}
