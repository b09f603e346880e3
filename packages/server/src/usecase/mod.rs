//! UseCase 層
//!
//! クライアントからの各イベントをひとつのユースケースとして扱います。
//! どのユースケースも Lobby のロックを取得してから状態を変更し、通知を送り、
//! Call Ledger への送信だけはロックを解放した後に行います。

mod bind_identity;
mod broadcaster;
mod connect_participant;
mod disconnect_participant;
mod end_call;
mod error;
mod get_lobby_state;
mod join_room;
mod leave_room;
mod ledger;
mod relay_signal;
mod requeue_cleanup;
mod send_message;
mod skip_peer;

#[cfg(test)]
pub(crate) mod test_support;

pub use bind_identity::BindIdentityUseCase;
pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use end_call::EndCallUseCase;
pub use error::{ConnectError, DisconnectError, JoinRoomError, RoomEventError};
pub use get_lobby_state::GetLobbyStateUseCase;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use relay_signal::RelaySignalUseCase;
pub use requeue_cleanup::RequeueCleanupUseCase;
pub use send_message::SendMessageUseCase;
pub use skip_peer::SkipPeerUseCase;
