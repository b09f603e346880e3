//! Call Ledger への記録送信
//!
//! 記録は別タスクで送信し、結果はログに残すだけでクライアントには返しません。
//! 呼び出し側は Lobby のロックを解放してから呼び出します。

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::domain::{CallLedger, CallRecord};

/// Fire-and-forget dispatch of a completed call.
pub(crate) fn dispatch_call_record(
    call_ledger: Arc<dyn CallLedger>,
    record: CallRecord,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let participant = record.participant_name.clone();
        let peer = record.peer_name.clone();
        match call_ledger.record_call(record).await {
            Ok(()) => tracing::debug!("Call '{}' <-> '{}' recorded", participant, peer),
            Err(e) => tracing::warn!(
                "Failed to record call '{}' <-> '{}': {}",
                participant,
                peer,
                e
            ),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CallDuration, CallLedgerError, MockCallLedger};

    fn record() -> CallRecord {
        CallRecord {
            participant_name: "alice".to_string(),
            peer_name: "bob".to_string(),
            duration: CallDuration::from_secs(42),
        }
    }

    #[tokio::test]
    async fn test_dispatch_sends_record_to_ledger() {
        // テスト項目: 記録が Call Ledger に渡される
        // given (前提条件):
        let mut ledger = MockCallLedger::new();
        ledger
            .expect_record_call()
            .withf(|r| r.participant_name == "alice" && r.peer_name == "bob")
            .times(1)
            .returning(|_| Ok(()));

        // when (操作):
        let handle = dispatch_call_record(Arc::new(ledger), record());

        // then (期待する結果): タスクが正常に完了する（times(1) は drop 時に検証される）
        assert!(handle.await.is_ok());
    }

    #[tokio::test]
    async fn test_dispatch_swallows_ledger_failure() {
        // テスト項目: Call Ledger の失敗はタスク外に伝播しない
        // given (前提条件):
        let mut ledger = MockCallLedger::new();
        ledger
            .expect_record_call()
            .times(1)
            .returning(|_| Err(CallLedgerError::Status(503)));

        // when (操作):
        let handle = dispatch_call_record(Arc::new(ledger), record());

        // then (期待する結果):
        assert!(handle.await.is_ok());
    }
}
