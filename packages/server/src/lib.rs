//! Pairing and signaling coordinator for random two-party video chat.
//!
//! Participants connect over WebSocket, wait in single-occupant rooms, get
//! paired two at a time, and exchange negotiation payloads and chat through
//! the server. Completed calls are reported to an external Call Ledger.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
