//! Repository 実装
//!
//! - `inmemory`: プロセス内メモリに Lobby を保持する実装（再起動時の復元は行わない）

pub mod inmemory;

pub use inmemory::InMemoryLobbyRepository;
