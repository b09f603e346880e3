//! Data Transfer Objects (DTOs) for the pairing server.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket event envelopes
//! - `http`: HTTP API responses and the Call Ledger request body

pub mod conversion;
pub mod http;
pub mod websocket;
