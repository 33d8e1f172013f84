//! The single provider session slot and transfer dispatch.

use alloy::primitives::{Address, U256};
use uuid::Uuid;

use crate::blockchain::types::{TransferReceipt, WalletError, WalletResult};
use crate::blockchain::units::{parse_amount, parse_recipient};
use crate::provider::SigningAuthority;

/// Raw transfer input, as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    /// Correlates log lines for one submission attempt.
    pub id: Uuid,
    pub recipient_address: String,
    pub amount_decimal_string: String,
}

impl TransferRequest {
    pub fn new(recipient_address: impl Into<String>, amount_decimal_string: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipient_address: recipient_address.into(),
            amount_decimal_string: amount_decimal_string.into(),
        }
    }
}

/// Whether an external signer currently authorizes an account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderSession {
    connected_address: Option<Address>,
}

impl ProviderSession {
    pub fn connected_address(&self) -> Option<Address> {
        self.connected_address
    }

    pub fn is_connected(&self) -> bool {
        self.connected_address.is_some()
    }

    /// Request account access from `authority`.
    ///
    /// On failure the session is left as it was.
    pub async fn connect(&mut self, authority: &dyn SigningAuthority) -> WalletResult<Address> {
        let accounts = authority.request_access().await.map_err(|e| match e {
            WalletError::NoProviderAvailable(_) => e,
            other => WalletError::NoProviderAvailable(other.to_string()),
        })?;

        let address = accounts.first().copied().ok_or_else(|| {
            WalletError::NoProviderAvailable("signing authority offered no accounts".to_string())
        })?;

        if self.connected_address != Some(address) {
            tracing::info!(address = %address, previous = ?self.connected_address, "Provider session connected");
        }
        self.connected_address = Some(address);
        Ok(address)
    }

    /// End the session.
    pub fn disconnect(&mut self) {
        if let Some(address) = self.connected_address.take() {
            tracing::info!(address = %address, "Provider session closed");
        }
    }

    /// Check a transfer without touching the network.
    pub fn validate(&self, request: &TransferRequest) -> WalletResult<(Address, Address, U256)> {
        let from = self.connected_address.ok_or(WalletError::NotConnected)?;
        let value = parse_amount(&request.amount_decimal_string)?;
        let to = parse_recipient(&request.recipient_address)?;
        Ok((from, to, value))
    }

    /// Sign, submit and wait for one confirmation.
    pub async fn send_transfer(
        &self,
        authority: &dyn SigningAuthority,
        request: &TransferRequest,
    ) -> WalletResult<TransferReceipt> {
        let (from, to, value) = self.validate(request)?;

        let tx_hash = authority
            .sign_and_submit(from, to, value)
            .await
            .map_err(as_transfer_failure)?;
        tracing::info!(request_id = %request.id, tx_hash = %tx_hash, from = %from, to = %to, "Transfer submitted");

        let receipt = authority
            .await_confirmation(tx_hash)
            .await
            .map_err(as_transfer_failure)?;
        tracing::info!(
            request_id = %request.id,
            tx_hash = %receipt.tx_hash,
            block_number = receipt.block_number,
            "Transfer confirmed"
        );
        Ok(receipt)
    }
}

fn as_transfer_failure(e: WalletError) -> WalletError {
    match e {
        WalletError::TransferFailed(_) => e,
        other => WalletError::TransferFailed(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::TxHash;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const RECIPIENT: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";

    #[derive(Default)]
    struct StubAuthority {
        accounts: Vec<Address>,
        submits: AtomicUsize,
    }

    #[async_trait]
    impl SigningAuthority for StubAuthority {
        async fn request_access(&self) -> WalletResult<Vec<Address>> {
            Ok(self.accounts.clone())
        }

        async fn sign_and_submit(&self, _from: Address, _to: Address, _value: U256) -> WalletResult<TxHash> {
            self.submits.fetch_add(1, Ordering::SeqCst);
            Ok(TxHash::repeat_byte(0xab))
        }

        async fn await_confirmation(&self, tx_hash: TxHash) -> WalletResult<TransferReceipt> {
            Err(WalletError::QueryFailed(format!("receipt for {} unavailable", tx_hash)))
        }
    }

    #[tokio::test]
    async fn test_connect_takes_first_account() {
        let authority = StubAuthority {
            accounts: vec![Address::repeat_byte(1), Address::repeat_byte(2)],
            ..Default::default()
        };
        let mut session = ProviderSession::default();

        let address = session.connect(&authority).await.unwrap();
        assert_eq!(address, Address::repeat_byte(1));
        assert_eq!(session.connected_address(), Some(address));
    }

    #[tokio::test]
    async fn test_connect_without_accounts_leaves_session_unchanged() {
        let authority = StubAuthority::default();
        let mut session = ProviderSession::default();

        let err = session.connect(&authority).await.unwrap_err();
        assert!(matches!(err, WalletError::NoProviderAvailable(_)));
        assert!(!session.is_connected());
    }

    #[tokio::test]
    async fn test_validation_order() {
        let authority = StubAuthority::default();
        let disconnected = ProviderSession::default();
        let err = disconnected
            .send_transfer(&authority, &TransferRequest::new("bad", "-1"))
            .await
            .unwrap_err();
        assert_eq!(err, WalletError::NotConnected);

        let session = ProviderSession {
            connected_address: Some(Address::repeat_byte(1)),
        };
        let err = session
            .send_transfer(&authority, &TransferRequest::new("bad", "-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::InvalidAmount(_)));

        let err = session
            .send_transfer(&authority, &TransferRequest::new("bad", "1"))
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::InvalidRecipient(_)));
        assert_eq!(authority.submits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_confirmation_errors_become_transfer_failures() {
        let authority = StubAuthority::default();
        let session = ProviderSession {
            connected_address: Some(Address::repeat_byte(1)),
        };

        let err = session
            .send_transfer(&authority, &TransferRequest::new(RECIPIENT, "0.1"))
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::TransferFailed(_)));
        assert_eq!(authority.submits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_disconnect() {
        let mut session = ProviderSession {
            connected_address: Some(Address::repeat_byte(1)),
        };
        session.disconnect();
        assert!(!session.is_connected());
    }
}
