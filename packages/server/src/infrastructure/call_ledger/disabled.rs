//! Call Ledger が設定されていない場合の実装

use async_trait::async_trait;

use crate::domain::{CallLedger, CallLedgerError, CallRecord};

/// Logs completed calls instead of posting them anywhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledCallLedger;

#[async_trait]
impl CallLedger for DisabledCallLedger {
    async fn record_call(&self, record: CallRecord) -> Result<(), CallLedgerError> {
        tracing::info!(
            participant = %record.participant_name,
            peer = %record.peer_name,
            duration_secs = record.duration.as_secs(),
            "Call ledger disabled; call not recorded"
        );
        Ok(())
    }
}
