//! ドメイン層のエラー定義

use thiserror::Error;

/// Validation failure while building a value object from external input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
}

/// Rejections produced by the lobby state machine.
///
/// None of these mutate state; the caller decides whether to surface them
/// (`RoomFull`) or drop them silently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LobbyError {
    #[error("connection '{0}' is already registered")]
    DuplicateConnection(String),

    #[error("connection '{0}' is not registered")]
    UnknownConnection(String),

    #[error("room '{0}' already has two occupants")]
    RoomFull(String),

    #[error("room '{0}' does not exist")]
    RoomNotFound(String),

    #[error("connection is not an occupant of room '{0}'")]
    NotAnOccupant(String),

    #[error("room '{0}' is not paired")]
    NotPaired(String),

    #[error("connection already occupies room '{0}'")]
    AlreadyInRoom(String),

    #[error("connection is not in any room")]
    NotInRoom,
}

/// MessagePusher のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' is not registered")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),

    #[error("failed to encode notification: {0}")]
    Encode(String),
}

/// CallLedger のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallLedgerError {
    #[error("call ledger request failed: {0}")]
    Request(String),

    #[error("call ledger responded with status {0}")]
    Status(u16),
}
