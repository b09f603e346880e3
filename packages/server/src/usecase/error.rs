//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{LobbyError, MessagePushError};

/// 接続処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("connection '{0}' is already registered")]
    DuplicateConnection(String),
}

/// 切断処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisconnectError {
    /// 既に切断処理済み（2 回目の切断）
    #[error("connection '{0}' is already disconnected")]
    AlreadyDisconnected(String),
}

/// ルーム参加のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRoomError {
    /// ルームが満員（`full` を返した上でのエラー）
    #[error("room '{0}' is full")]
    RoomFull(String),

    #[error(transparent)]
    Rejected(LobbyError),
}

/// ルーム内イベント（relay / chat / leave / skip / end_call）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomEventError {
    #[error(transparent)]
    Lobby(#[from] LobbyError),

    #[error(transparent)]
    Push(#[from] MessagePushError),
}
