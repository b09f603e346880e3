//! HTTP 経由の Call Ledger クライアント
//!
//! `POST <endpoint>` に `{"participantName", "peerName", "durationSeconds"}` を送ります。
//! 失敗はエラーとして返すだけで、リトライはしません。

use std::time::Duration;

use async_trait::async_trait;

use crate::{
    domain::{CallLedger, CallLedgerError, CallRecord},
    infrastructure::dto::http::CallRecordRequest,
};

pub struct HttpCallLedger {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpCallLedger {
    /// Build a client that gives up on a request after `timeout`.
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, CallLedgerError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CallLedgerError::Request(e.to_string()))?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CallLedger for HttpCallLedger {
    async fn record_call(&self, record: CallRecord) -> Result<(), CallLedgerError> {
        let body = CallRecordRequest::from(&record);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| CallLedgerError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CallLedgerError::Status(status.as_u16()));
        }
        tracing::debug!(
            "Recorded call '{}' <-> '{}' ({}s)",
            body.participant_name,
            body.peer_name,
            body.duration_seconds
        );
        Ok(())
    }
}
