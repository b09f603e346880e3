//! ドメイン層
//!
//! ペアリングの状態（Lobby 集約）と、外部とのやり取りに必要なインターフェース
//! （Repository / MessagePusher / CallLedger）を定義します。

pub mod call_ledger;
pub mod entity;
pub mod error;
pub mod lobby;
pub mod message_pusher;
pub mod notification;
pub mod repository;
pub mod value_object;

pub use call_ledger::CallLedger;
#[cfg(test)]
pub use call_ledger::MockCallLedger;
pub use entity::{
    CallRecord, ChatMessage, ConnectionSession, MAX_CHAT_LOG_LENGTH, Occupant, ROOM_CAPACITY,
    Room,
};
pub use error::{CallLedgerError, LobbyError, MessagePushError, ValueObjectError};
pub use lobby::{
    ChatDelivery, Departure, EndCallOutcome, JoinOutcome, Lobby, LobbySnapshot, LobbyStats,
    SkipOutcome,
};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use notification::{Notification, SignalKind};
pub use repository::LobbyRepository;
pub use value_object::{
    CallDuration, ConnectionId, DisplayName, MessageText, RoomName, SignalPayload, Timestamp,
};
