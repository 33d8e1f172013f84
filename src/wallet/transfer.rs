//! Transfer submission.

use crate::blockchain::types::{TransferReceipt, WalletResult};
use crate::observability::metrics;
use crate::provider::{ProviderSession, SigningAuthority, TransferRequest};

/// Dispatches one transfer at a time through the provider session.
#[derive(Debug, Default)]
pub struct TransferSubmitter {
    in_progress: Option<TransferRequest>,
}

impl TransferSubmitter {
    /// The request currently being submitted, if any.
    pub fn in_progress(&self) -> Option<&TransferRequest> {
        self.in_progress.as_ref()
    }

    /// Submit `request` and wait for its confirmation.
    ///
    /// The request is cleared whatever the outcome; a failed transfer has to
    /// be entered again.
    pub async fn submit(
        &mut self,
        session: &ProviderSession,
        authority: &dyn SigningAuthority,
        request: TransferRequest,
    ) -> WalletResult<TransferReceipt> {
        tracing::info!(
            request_id = %request.id,
            recipient = %request.recipient_address,
            amount = %request.amount_decimal_string,
            "Submitting transfer"
        );
        let request = self.in_progress.insert(request);
        let result = session.send_transfer(authority, request).await;
        self.in_progress = None;

        match &result {
            Ok(_) => metrics::record_transfer("confirmed"),
            Err(e) if e.is_validation() => metrics::record_transfer("rejected"),
            Err(_) => metrics::record_transfer("failed"),
        }
        result
    }
}
