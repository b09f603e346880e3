//! HTTP DTOs: reporting responses and the outbound Call Ledger request.

use serde::{Deserialize, Serialize};

/// Response of `GET /api/stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LobbyStatsDto {
    pub connected_clients: usize,
    pub waiting_rooms: usize,
    pub paired_rooms: usize,
    pub occupants: usize,
    /// RFC 3339 (UTC)
    pub generated_at: String,
}

/// Body posted to the Call Ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRecordRequest {
    pub participant_name: String,
    pub peer_name: String,
    pub duration_seconds: u64,
}
