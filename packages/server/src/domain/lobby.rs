//! Lobby 集約
//!
//! Room Table / Waiting Queue / Skip History / Connection Registry をひとつの集約として保持し、
//! ペアリングの状態遷移をすべてここで行います。
//!
//! ## 不変条件
//!
//! - Waiting Queue に含まれるルーム名 ⇔ そのルームの Occupant がちょうど 1 人
//! - どのルームも Occupant は 2 人以下、0 人のルームは存在しない
//! - `ConnectionSession::current_room == Some(r)` ⇔ ルーム `r` にその接続が Occupant として存在する
//!
//! この集約は同期的な純粋ロジックのみを持ち、I/O は一切行いません。
//! 排他制御は Repository 側の `Mutex` が担います。

use std::collections::{BTreeMap, HashMap, VecDeque};

use serde::Serialize;

use super::{
    entity::{CallRecord, ChatMessage, ConnectionSession, Occupant, Room},
    error::LobbyError,
    value_object::{CallDuration, ConnectionId, DisplayName, MessageText, RoomName, Timestamp},
};

/// Global view of queue and occupancy, pushed to every client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LobbySnapshot {
    pub waiting_queue: Vec<RoomName>,
    pub rooms: BTreeMap<RoomName, Vec<Occupant>>,
}

/// Live counters exposed to reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LobbyStats {
    pub connected_clients: usize,
    pub waiting_rooms: usize,
    pub paired_rooms: usize,
    pub occupants: usize,
}

/// What happened to a room when one occupant was taken out of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub room: RoomName,
    /// Occupants still in the room afterwards (at most one).
    pub remaining: Vec<ConnectionId>,
    /// `true` when the room reached zero occupants and was deleted.
    pub dissolved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// A fresh room was created with the initiator as sole occupant.
    Created {
        /// Room the initiator implicitly left, if it was elsewhere.
        departure: Option<Departure>,
        /// Occupants evicted because `force_new` replaced an existing room.
        displaced: Vec<ConnectionId>,
    },
    /// The initiator became the second occupant of a waiting room.
    Joined {
        peer: ConnectionId,
        departure: Option<Departure>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatDelivery {
    pub recipients: Vec<ConnectionId>,
    pub log: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipOutcome {
    /// Everyone who occupied the room when the skip was issued, skipper included.
    pub members: Vec<ConnectionId>,
    /// The skipper's peer, if the room was paired.
    pub peer: Option<ConnectionId>,
    /// Present only when the room was paired.
    pub call: Option<CallRecord>,
    /// Skip history of the skipper, including this room.
    pub history: Vec<RoomName>,
    pub departure: Departure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndCallOutcome {
    pub members: Vec<ConnectionId>,
    pub call: CallRecord,
}

/// Process-wide pairing state.
#[derive(Debug, Default)]
pub struct Lobby {
    rooms: BTreeMap<RoomName, Room>,
    waiting_queue: VecDeque<RoomName>,
    skip_history: HashMap<ConnectionId, Vec<RoomName>>,
    sessions: HashMap<ConnectionId, ConnectionSession>,
}

impl Lobby {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================
    // Read side
    // ========================================

    pub fn session(&self, id: &ConnectionId) -> Option<&ConnectionSession> {
        self.sessions.get(id)
    }

    pub fn room(&self, name: &RoomName) -> Option<&Room> {
        self.rooms.get(name)
    }

    pub fn waiting_queue(&self) -> Vec<RoomName> {
        self.waiting_queue.iter().cloned().collect()
    }

    pub fn skip_history(&self, id: &ConnectionId) -> Vec<RoomName> {
        self.skip_history.get(id).cloned().unwrap_or_default()
    }

    pub fn snapshot(&self) -> LobbySnapshot {
        LobbySnapshot {
            waiting_queue: self.waiting_queue(),
            rooms: self
                .rooms
                .iter()
                .map(|(name, room)| (name.clone(), room.occupants.clone()))
                .collect(),
        }
    }

    pub fn stats(&self) -> LobbyStats {
        LobbyStats {
            connected_clients: self.sessions.len(),
            waiting_rooms: self.waiting_queue.len(),
            paired_rooms: self.rooms.values().filter(|r| r.is_paired()).count(),
            occupants: self.rooms.values().map(Room::occupant_count).sum(),
        }
    }

    // ========================================
    // Connection lifecycle
    // ========================================

    /// Register a new connection in the registry.
    pub fn connect(&mut self, id: ConnectionId, now: Timestamp) -> Result<(), LobbyError> {
        if self.sessions.contains_key(&id) {
            return Err(LobbyError::DuplicateConnection(id.into_string()));
        }
        self.sessions
            .insert(id.clone(), ConnectionSession::new(id, now));
        Ok(())
    }

    /// Tear a connection down, reconciling its room like `leave`.
    ///
    /// Returns `Ok(None)` if the connection was registered but not in a room.
    ///
    /// # Errors
    ///
    /// `UnknownConnection` if the connection was already torn down.
    pub fn disconnect(&mut self, id: &ConnectionId) -> Result<Option<Departure>, LobbyError> {
        let current_room = self
            .sessions
            .get(id)
            .ok_or_else(|| LobbyError::UnknownConnection(id.as_str().to_string()))?
            .current_room
            .clone();

        let departure = current_room.and_then(|room| self.depart(id, &room));
        self.sessions.remove(id);
        self.skip_history.remove(id);
        Ok(departure)
    }

    // ========================================
    // Pairing
    // ========================================

    /// Join (or create) `room_name`.
    ///
    /// A full room is rejected before anything is touched.
    pub fn join(
        &mut self,
        id: &ConnectionId,
        room_name: RoomName,
        force_new: bool,
        now: Timestamp,
    ) -> Result<JoinOutcome, LobbyError> {
        let session = self
            .sessions
            .get(id)
            .ok_or_else(|| LobbyError::UnknownConnection(id.as_str().to_string()))?;
        let current_room = session.current_room.clone();
        let display_name = session.display_name.clone();

        if current_room.as_ref() == Some(&room_name) && !force_new {
            return Err(LobbyError::AlreadyInRoom(room_name.into_string()));
        }
        if !force_new
            && let Some(room) = self.rooms.get(&room_name)
            && room.is_full()
        {
            return Err(LobbyError::RoomFull(room_name.into_string()));
        }

        let departure = match current_room {
            Some(previous) if previous != room_name => self.depart(id, &previous),
            _ => None,
        };
        let occupant = Occupant::new(id.clone(), display_name);

        let pairs_existing = !force_new && self.rooms.contains_key(&room_name);
        let outcome = if pairs_existing {
            let room = self
                .rooms
                .get_mut(&room_name)
                .ok_or_else(|| LobbyError::RoomNotFound(room_name.as_str().to_string()))?;
            let peer = room
                .occupants
                .first()
                .map(|o| o.id.clone())
                .ok_or_else(|| LobbyError::RoomNotFound(room_name.as_str().to_string()))?;
            room.add_occupant(occupant)?;
            self.dequeue(&room_name);
            JoinOutcome::Joined { peer, departure }
        } else {
            let displaced: Vec<ConnectionId> = self
                .rooms
                .remove(&room_name)
                .map(|old| old.other_ids(id))
                .unwrap_or_default();
            for evicted in &displaced {
                if let Some(session) = self.sessions.get_mut(evicted) {
                    session.current_room = None;
                }
            }
            self.rooms.insert(
                room_name.clone(),
                Room::new(room_name.clone(), occupant, now),
            );
            self.enqueue(&room_name);
            JoinOutcome::Created {
                departure,
                displaced,
            }
        };

        if let Some(session) = self.sessions.get_mut(id) {
            session.current_room = Some(room_name);
        }
        Ok(outcome)
    }

    /// Attach a display name to this connection's occupant entry in `room_name`.
    pub fn bind_identity(
        &mut self,
        id: &ConnectionId,
        room_name: &RoomName,
        display_name: DisplayName,
    ) -> Result<(), LobbyError> {
        let room = self
            .rooms
            .get_mut(room_name)
            .ok_or_else(|| LobbyError::RoomNotFound(room_name.as_str().to_string()))?;
        if !room.bind_display_name(id, display_name.clone()) {
            return Err(LobbyError::NotAnOccupant(room_name.as_str().to_string()));
        }
        if let Some(session) = self.sessions.get_mut(id) {
            session.display_name = Some(display_name);
        }
        Ok(())
    }

    /// Who should receive a relayed negotiation payload from `id`.
    ///
    /// Empty while the room has fewer than two occupants.
    pub fn relay_targets(
        &self,
        id: &ConnectionId,
        room_name: &RoomName,
    ) -> Result<Vec<ConnectionId>, LobbyError> {
        let room = self.occupied_room(id, room_name)?;
        if !room.is_paired() {
            return Ok(Vec::new());
        }
        Ok(room.other_ids(id))
    }

    /// Append a chat message and return the updated log for the peer.
    pub fn send_message(
        &mut self,
        id: &ConnectionId,
        room_name: &RoomName,
        text: MessageText,
        now: Timestamp,
    ) -> Result<ChatDelivery, LobbyError> {
        self.occupied_room(id, room_name)?;
        let room = self
            .rooms
            .get_mut(room_name)
            .ok_or_else(|| LobbyError::RoomNotFound(room_name.as_str().to_string()))?;
        room.push_message(ChatMessage::new(id.clone(), text, now));
        Ok(ChatDelivery {
            recipients: room.other_ids(id),
            log: room.messages.clone(),
        })
    }

    /// Leave a room. Without `room_name` the room is looked up in the registry.
    pub fn leave(
        &mut self,
        id: &ConnectionId,
        room_name: Option<&RoomName>,
    ) -> Result<Departure, LobbyError> {
        let room_name = match room_name {
            Some(name) => name.clone(),
            None => self.registered_room(id)?,
        };
        self.occupied_room(id, &room_name)?;
        self.depart(id, &room_name)
            .ok_or_else(|| LobbyError::NotAnOccupant(room_name.into_string()))
    }

    /// Skip the current peer: record the call, remember the room, leave it.
    pub fn skip(
        &mut self,
        id: &ConnectionId,
        room_name: &RoomName,
        display_name: Option<DisplayName>,
        duration: CallDuration,
    ) -> Result<SkipOutcome, LobbyError> {
        let room = self.occupied_room(id, room_name)?;
        let members = room.occupant_ids();
        let peer_occupant = room.others(id).into_iter().next().cloned();
        let call = if room.is_paired() {
            peer_occupant.as_ref().map(|peer| {
                CallRecord::between(self.claimed_name(id, display_name), peer, duration)
            })
        } else {
            None
        };

        let history = self.skip_history.entry(id.clone()).or_default();
        history.push(room_name.clone());
        let history = history.clone();

        let departure = self
            .depart(id, room_name)
            .ok_or_else(|| LobbyError::NotAnOccupant(room_name.as_str().to_string()))?;

        Ok(SkipOutcome {
            members,
            peer: peer_occupant.map(|o| o.id),
            call,
            history,
            departure,
        })
    }

    /// End the call in a paired room: record it and clear the chat log.
    ///
    /// Occupants stay where they are and the queue is untouched.
    pub fn end_call(
        &mut self,
        id: &ConnectionId,
        room_name: &RoomName,
        display_name: Option<DisplayName>,
        duration: CallDuration,
    ) -> Result<EndCallOutcome, LobbyError> {
        let room = self.occupied_room(id, room_name)?;
        if !room.is_paired() {
            return Err(LobbyError::NotPaired(room_name.as_str().to_string()));
        }
        let members = room.occupant_ids();
        let peer = room
            .others(id)
            .into_iter()
            .next()
            .cloned()
            .ok_or_else(|| LobbyError::NotPaired(room_name.as_str().to_string()))?;
        let call = CallRecord::between(self.claimed_name(id, display_name), &peer, duration);

        if let Some(room) = self.rooms.get_mut(room_name) {
            room.clear_messages();
        }
        Ok(EndCallOutcome { members, call })
    }

    /// Drop queue entries that no longer point at a waiting room.
    ///
    /// Returns how many entries were removed.
    pub fn requeue_cleanup(&mut self) -> usize {
        let before = self.waiting_queue.len();
        let rooms = &self.rooms;
        self.waiting_queue
            .retain(|name| rooms.get(name).is_some_and(|r| r.occupant_count() == 1));
        before - self.waiting_queue.len()
    }

    // ========================================
    // Internals
    // ========================================

    fn registered_room(&self, id: &ConnectionId) -> Result<RoomName, LobbyError> {
        self.sessions
            .get(id)
            .ok_or_else(|| LobbyError::UnknownConnection(id.as_str().to_string()))?
            .current_room
            .clone()
            .ok_or(LobbyError::NotInRoom)
    }

    fn occupied_room(&self, id: &ConnectionId, room_name: &RoomName) -> Result<&Room, LobbyError> {
        let room = self
            .rooms
            .get(room_name)
            .ok_or_else(|| LobbyError::RoomNotFound(room_name.as_str().to_string()))?;
        if !room.contains(id) {
            return Err(LobbyError::NotAnOccupant(room_name.as_str().to_string()));
        }
        Ok(room)
    }

    fn claimed_name(&self, id: &ConnectionId, claimed: Option<DisplayName>) -> Option<DisplayName> {
        claimed.or_else(|| self.sessions.get(id).and_then(|s| s.display_name.clone()))
    }

    fn enqueue(&mut self, name: &RoomName) {
        if !self.waiting_queue.contains(name) {
            self.waiting_queue.push_back(name.clone());
        }
    }

    fn dequeue(&mut self, name: &RoomName) {
        self.waiting_queue.retain(|queued| queued != name);
    }

    /// Remove `id` from `room_name`, then delete or re-queue the room.
    fn depart(&mut self, id: &ConnectionId, room_name: &RoomName) -> Option<Departure> {
        let room = self.rooms.get_mut(room_name)?;
        if !room.remove_occupant(id) {
            return None;
        }
        room.clear_messages();
        let remaining = room.occupant_ids();

        if let Some(session) = self.sessions.get_mut(id)
            && session.current_room.as_ref() == Some(room_name)
        {
            session.current_room = None;
        }

        let dissolved = remaining.is_empty();
        if dissolved {
            self.rooms.remove(room_name);
            self.dequeue(room_name);
        } else {
            // re-queued at the tail
            self.dequeue(room_name);
            self.waiting_queue.push_back(room_name.clone());
        }

        Some(Departure {
            room: room_name.clone(),
            remaining,
            dissolved,
        })
    }

    /// Panics if any lobby invariant is broken.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        for (name, room) in &self.rooms {
            assert!(room.occupant_count() >= 1, "empty room '{}' kept", name);
            assert!(room.occupant_count() <= 2, "room '{}' over capacity", name);
            let queued = self.waiting_queue.iter().filter(|q| *q == name).count();
            let expected = usize::from(room.occupant_count() == 1);
            assert_eq!(queued, expected, "queue mismatch for room '{}'", name);
            for occupant in &room.occupants {
                let session = self
                    .sessions
                    .get(&occupant.id)
                    .expect("occupant without session");
                assert_eq!(session.current_room.as_ref(), Some(name));
            }
        }
        for name in &self.waiting_queue {
            assert!(self.rooms.contains_key(name), "dangling queue entry '{}'", name);
        }
        for session in self.sessions.values() {
            if let Some(name) = &session.current_room {
                assert!(self.rooms.get(name).is_some_and(|r| r.contains(&session.id)));
            }
        }
    }
}
