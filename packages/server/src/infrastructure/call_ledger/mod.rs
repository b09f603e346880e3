//! Call Ledger クライアント実装
//!
//! - `http`: 外部 API へ POST する実装
//! - `disabled`: URL 未設定時に記録をログに出すだけの実装

pub mod disabled;
pub mod http;

pub use disabled::DisabledCallLedger;
pub use http::HttpCallLedger;
