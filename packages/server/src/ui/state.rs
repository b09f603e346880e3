//! Server state shared by all handlers.

use std::sync::Arc;

use pairhub_shared::time::Clock;

use crate::{
    domain::{CallLedger, LobbyRepository, MessagePusher},
    usecase::{
        BindIdentityUseCase, ConnectParticipantUseCase, DisconnectParticipantUseCase,
        EndCallUseCase, GetLobbyStateUseCase, JoinRoomUseCase, LeaveRoomUseCase,
        RelaySignalUseCase, RequeueCleanupUseCase, SendMessageUseCase, SkipPeerUseCase,
    },
};

/// Shared application state
pub struct AppState {
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    pub bind_identity_usecase: Arc<BindIdentityUseCase>,
    pub relay_signal_usecase: Arc<RelaySignalUseCase>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    pub skip_peer_usecase: Arc<SkipPeerUseCase>,
    pub end_call_usecase: Arc<EndCallUseCase>,
    pub requeue_cleanup_usecase: Arc<RequeueCleanupUseCase>,
    pub get_lobby_state_usecase: Arc<GetLobbyStateUseCase>,
}

impl AppState {
    /// Build every usecase on top of the same repository, pusher and ledger.
    pub fn new(
        repository: Arc<dyn LobbyRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        call_ledger: Arc<dyn CallLedger>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            connect_participant_usecase: Arc::new(ConnectParticipantUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            )),
            disconnect_participant_usecase: Arc::new(DisconnectParticipantUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            join_room_usecase: Arc::new(JoinRoomUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            )),
            bind_identity_usecase: Arc::new(BindIdentityUseCase::new(repository.clone())),
            relay_signal_usecase: Arc::new(RelaySignalUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            send_message_usecase: Arc::new(SendMessageUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            )),
            leave_room_usecase: Arc::new(LeaveRoomUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            skip_peer_usecase: Arc::new(SkipPeerUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                call_ledger.clone(),
            )),
            end_call_usecase: Arc::new(EndCallUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                call_ledger,
            )),
            requeue_cleanup_usecase: Arc::new(RequeueCleanupUseCase::new(
                repository.clone(),
                message_pusher,
            )),
            get_lobby_state_usecase: Arc::new(GetLobbyStateUseCase::new(repository, clock)),
        }
    }
}
