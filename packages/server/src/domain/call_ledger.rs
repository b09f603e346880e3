//! CallLedger trait 定義
//!
//! 完了した通話（2 人の表示名と通話時間）を外部の Call Ledger に記録するためのインターフェース。
//! 呼び出しは常にバックグラウンドで行われ、結果が状態遷移に影響することはありません。

use async_trait::async_trait;

use super::{entity::CallRecord, error::CallLedgerError};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CallLedger: Send + Sync {
    /// 通話を 1 件記録
    async fn record_call(&self, record: CallRecord) -> Result<(), CallLedgerError>;
}
