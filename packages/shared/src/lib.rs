//! Utilities shared between Pairhub binaries and libraries.

pub mod logger;
pub mod time;
