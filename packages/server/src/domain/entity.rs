//! エンティティ
//!
//! - `Room`: 最大 2 人の Occupant とチャットログを持つペアリングの単位
//! - `ConnectionSession`: 接続ごとのセッション（Connection Registry のエントリ）
//! - `CallRecord`: Call Ledger に送る通話記録

use serde::Serialize;

use super::{
    error::LobbyError,
    value_object::{
        CallDuration, ConnectionId, DisplayName, MessageText, RoomName, Timestamp,
        UNKNOWN_DISPLAY_NAME,
    },
};

/// A room never holds more than this many occupants.
pub const ROOM_CAPACITY: usize = 2;

/// Oldest chat entries are dropped once a room's log exceeds this.
pub const MAX_CHAT_LOG_LENGTH: usize = 200;

/// A connection's placeholder inside a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occupant {
    pub id: ConnectionId,
    pub display_name: Option<DisplayName>,
}

impl Occupant {
    pub fn new(id: ConnectionId, display_name: Option<DisplayName>) -> Self {
        Self { id, display_name }
    }

    /// Name used for ledger records; falls back to a fixed placeholder.
    pub fn ledger_name(&self) -> String {
        self.display_name
            .as_ref()
            .map(|name| name.as_str().to_string())
            .unwrap_or_else(|| UNKNOWN_DISPLAY_NAME.to_string())
    }
}

/// One entry in a room's transient chat log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub sender: ConnectionId,
    pub text: MessageText,
    pub sent_at: Timestamp,
}

impl ChatMessage {
    pub fn new(sender: ConnectionId, text: MessageText, sent_at: Timestamp) -> Self {
        Self {
            sender,
            text,
            sent_at,
        }
    }
}

/// Pairing unit: one or two occupants plus their chat log.
///
/// A `Room` with zero occupants is never stored; the lobby deletes it as soon
/// as the last occupant is removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Room {
    pub name: RoomName,
    pub occupants: Vec<Occupant>,
    pub messages: Vec<ChatMessage>,
    pub created_at: Timestamp,
}

impl Room {
    /// Create a room around its first occupant.
    pub fn new(name: RoomName, first: Occupant, created_at: Timestamp) -> Self {
        Self {
            name,
            occupants: vec![first],
            messages: Vec::new(),
            created_at,
        }
    }

    pub fn occupant_count(&self) -> usize {
        self.occupants.len()
    }

    pub fn is_full(&self) -> bool {
        self.occupants.len() >= ROOM_CAPACITY
    }

    pub fn is_paired(&self) -> bool {
        self.occupants.len() == ROOM_CAPACITY
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.occupants.iter().any(|o| &o.id == id)
    }

    /// Add the second occupant.
    ///
    /// # Errors
    ///
    /// `LobbyError::RoomFull` if the room already holds two occupants.
    pub fn add_occupant(&mut self, occupant: Occupant) -> Result<(), LobbyError> {
        if self.is_full() {
            return Err(LobbyError::RoomFull(self.name.as_str().to_string()));
        }
        self.occupants.push(occupant);
        Ok(())
    }

    /// Remove an occupant, returning whether it was present.
    pub fn remove_occupant(&mut self, id: &ConnectionId) -> bool {
        let before = self.occupants.len();
        self.occupants.retain(|o| &o.id != id);
        self.occupants.len() != before
    }

    /// Every occupant except `id`.
    pub fn others(&self, id: &ConnectionId) -> Vec<&Occupant> {
        self.occupants.iter().filter(|o| &o.id != id).collect()
    }

    pub fn other_ids(&self, id: &ConnectionId) -> Vec<ConnectionId> {
        self.others(id).into_iter().map(|o| o.id.clone()).collect()
    }

    pub fn occupant_ids(&self) -> Vec<ConnectionId> {
        self.occupants.iter().map(|o| o.id.clone()).collect()
    }

    /// Attach a display name to an existing occupant entry.
    pub fn bind_display_name(&mut self, id: &ConnectionId, name: DisplayName) -> bool {
        match self.occupants.iter_mut().find(|o| &o.id == id) {
            Some(occupant) => {
                occupant.display_name = Some(name);
                true
            }
            None => false,
        }
    }

    pub fn push_message(&mut self, message: ChatMessage) {
        self.messages.push(message);
        if self.messages.len() > MAX_CHAT_LOG_LENGTH {
            let overflow = self.messages.len() - MAX_CHAT_LOG_LENGTH;
            self.messages.drain(..overflow);
        }
    }

    pub fn clear_messages(&mut self) {
        self.messages.clear();
    }
}

/// Connection Registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSession {
    pub id: ConnectionId,
    pub display_name: Option<DisplayName>,
    pub current_room: Option<RoomName>,
    pub connected_at: Timestamp,
}

impl ConnectionSession {
    pub fn new(id: ConnectionId, connected_at: Timestamp) -> Self {
        Self {
            id,
            display_name: None,
            current_room: None,
            connected_at,
        }
    }
}

/// A completed pairing, as handed to the Call Ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRecord {
    pub participant_name: String,
    pub peer_name: String,
    pub duration: CallDuration,
}

impl CallRecord {
    /// Build a record from the initiator's claimed name and the peer occupant.
    pub fn between(
        participant_name: Option<DisplayName>,
        peer: &Occupant,
        duration: CallDuration,
    ) -> Self {
        Self {
            participant_name: participant_name
                .map(DisplayName::into_string)
                .unwrap_or_else(|| UNKNOWN_DISPLAY_NAME.to_string()),
            peer_name: peer.ledger_name(),
            duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: &str) -> ConnectionId {
        ConnectionId::new(value.to_string()).unwrap()
    }

    fn room_with(first: &str) -> Room {
        Room::new(
            RoomName::new("r1".to_string()).unwrap(),
            Occupant::new(id(first), None),
            Timestamp::new(1000),
        )
    }

    #[test]
    fn test_room_rejects_third_occupant() {
        // テスト項目: 2 人が入室済みのルームには 3 人目を追加できない
        // given (前提条件):
        let mut room = room_with("x");
        room.add_occupant(Occupant::new(id("y"), None)).unwrap();

        // when (操作):
        let result = room.add_occupant(Occupant::new(id("z"), None));

        // then (期待する結果):
        assert_eq!(result, Err(LobbyError::RoomFull("r1".to_string())));
        assert_eq!(room.occupant_count(), 2);
        assert!(!room.contains(&id("z")));
    }

    #[test]
    fn test_room_others_excludes_given_occupant() {
        // テスト項目: others() は指定した Occupant 以外を返す
        // given (前提条件):
        let mut room = room_with("x");
        room.add_occupant(Occupant::new(id("y"), None)).unwrap();

        // when (操作):
        let others = room.other_ids(&id("x"));

        // then (期待する結果):
        assert_eq!(others, vec![id("y")]);
    }

    #[test]
    fn test_bind_display_name_only_for_occupants() {
        // テスト項目: 表示名は入室中の Occupant にのみ設定できる
        // given (前提条件):
        let mut room = room_with("x");
        let alice = DisplayName::new("alice".to_string()).unwrap();

        // when (操作):
        let bound = room.bind_display_name(&id("x"), alice.clone());
        let stranger = room.bind_display_name(&id("nobody"), alice.clone());

        // then (期待する結果):
        assert!(bound);
        assert!(!stranger);
        assert_eq!(room.occupants[0].display_name, Some(alice));
    }

    #[test]
    fn test_call_record_falls_back_to_unknown_names() {
        // テスト項目: 表示名がない場合は "Unknown" として記録される
        // given (前提条件):
        let peer = Occupant::new(id("y"), None);

        // when (操作):
        let record = CallRecord::between(None, &peer, CallDuration::from_secs(7));

        // then (期待する結果):
        assert_eq!(record.participant_name, "Unknown");
        assert_eq!(record.peer_name, "Unknown");
        assert_eq!(record.duration.as_secs(), 7);
    }

    #[test]
    fn test_push_message_keeps_only_latest_entries() {
        // テスト項目: チャットログは上限を超えると古いものから捨てられる
        // given (前提条件):
        let mut room = room_with("x");

        // when (操作):
        for i in 0..MAX_CHAT_LOG_LENGTH + 5 {
            let text = MessageText::new(format!("m{i}")).unwrap();
            room.push_message(ChatMessage::new(id("x"), text, Timestamp::new(i as i64)));
        }

        // then (期待する結果):
        assert_eq!(room.messages.len(), MAX_CHAT_LOG_LENGTH);
        assert_eq!(room.messages[0].text.as_str(), "m5");
        assert_eq!(
            room.messages[MAX_CHAT_LOG_LENGTH - 1].text.as_str(),
            format!("m{}", MAX_CHAT_LOG_LENGTH + 4)
        );
    }
}
