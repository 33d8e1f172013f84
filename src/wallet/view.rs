//! The wallet view: the session object that owns all wallet state.
//!
//! Built when the display surface activates and torn down when it goes away.
//! Every write to credential, session, balance or chain status goes through
//! this type or the poller it owns, and every outcome is reported on the
//! notification channel.

use alloy::primitives::Address;
use std::sync::Arc;

use crate::blockchain::client::ChainRpc;
use crate::blockchain::credential::{CredentialGenerator, WalletCredential};
use crate::blockchain::types::{
    BalanceView, ChainStatus, TransferReceipt, WalletError, WalletResult,
};
use crate::config::WalletConfig;
use crate::monitor::ChainPoller;
use crate::provider::{ProviderSession, SigningAuthority, TransferRequest};
use crate::wallet::balance::BalanceTracker;
use crate::wallet::clipboard::ClipboardSink;
use crate::wallet::notify::{Notification, NotificationReceiver, Notifier};
use crate::wallet::transfer::TransferSubmitter;

/// A credential field the user can copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialField {
    Address,
    Mnemonic,
    PrivateKey,
}

impl CredentialField {
    pub fn label(self) -> &'static str {
        match self {
            CredentialField::Address => "address",
            CredentialField::Mnemonic => "mnemonic",
            CredentialField::PrivateKey => "private key",
        }
    }
}

impl std::str::FromStr for CredentialField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "address" => Ok(CredentialField::Address),
            "mnemonic" | "phrase" => Ok(CredentialField::Mnemonic),
            "key" | "private-key" => Ok(CredentialField::PrivateKey),
            other => Err(format!("unknown field '{}'", other)),
        }
    }
}

pub struct WalletView {
    config: WalletConfig,
    authority: Arc<dyn SigningAuthority>,
    clipboard: Arc<dyn ClipboardSink>,
    notifier: Notifier,
    generator: CredentialGenerator,
    credential: Option<WalletCredential>,
    session: ProviderSession,
    poller: ChainPoller,
    balance: BalanceTracker,
    transfers: TransferSubmitter,
}

impl WalletView {
    pub fn new(
        config: WalletConfig,
        rpc: Arc<dyn ChainRpc>,
        authority: Arc<dyn SigningAuthority>,
        clipboard: Arc<dyn ClipboardSink>,
    ) -> (Self, NotificationReceiver) {
        let (notifier, rx) = Notifier::channel();
        let poller = ChainPoller::new(rpc.clone(), config.poller.interval(), notifier.clone());

        let view = Self {
            config,
            authority,
            clipboard,
            notifier,
            generator: CredentialGenerator,
            credential: None,
            session: ProviderSession::default(),
            poller,
            balance: BalanceTracker::new(rpc),
            transfers: TransferSubmitter::default(),
        };
        (view, rx)
    }

    /// Start background polling. Must be called from within a Tokio runtime.
    pub fn activate(&mut self) -> WalletResult<()> {
        if !self.config.poller.enabled {
            tracing::info!("Chain poller disabled");
            return Ok(());
        }
        let result = self.poller.start();
        self.report(result)
    }

    /// Stop polling and discard session state and key material.
    pub fn deactivate(&mut self) {
        self.poller.stop();
        self.session.disconnect();
        self.balance.clear();
        self.credential = None;
    }

    /// Replace the current credential with a new one.
    pub fn generate_credential(&mut self) -> WalletResult<&WalletCredential> {
        let result = self.generator.generate();
        let credential = self.report(result)?;
        self.notifier.send(Notification::CredentialGenerated {
            address: credential.address(),
        });
        Ok(self.credential.insert(credential))
    }

    /// Connect to the signing authority and refresh the balance of the
    /// connected account.
    pub async fn connect(&mut self) -> WalletResult<Address> {
        let result = self.session.connect(self.authority.as_ref()).await;
        let address = self.report(result)?;
        self.notifier.send(Notification::Connected { address });

        self.balance.retain_for(Some(address));
        // A failed refresh is reported but does not undo the connection.
        let _ = self.refresh_balance().await;
        Ok(address)
    }

    /// Refresh the balance of the connected account.
    pub async fn refresh_balance(&mut self) -> WalletResult<BalanceView> {
        let Some(address) = self.session.connected_address() else {
            return self.report(Err(WalletError::NotConnected));
        };

        let result = self.balance.refresh(address).await;
        let view = self.report(result)?;
        self.notifier.send(Notification::BalanceUpdated {
            address,
            amount: view.amount.clone(),
        });
        Ok(view)
    }

    /// Send `amount` ether to `recipient` and refresh the balance once the
    /// transfer is confirmed.
    pub async fn send_transfer(
        &mut self,
        recipient: &str,
        amount: &str,
    ) -> WalletResult<TransferReceipt> {
        let request = TransferRequest::new(recipient, amount);
        let result = self
            .transfers
            .submit(&self.session, self.authority.as_ref(), request)
            .await;
        let receipt = self.report(result)?;
        self.notifier.send(Notification::TransferConfirmed {
            tx_hash: receipt.tx_hash,
            block_number: receipt.block_number,
        });

        let _ = self.refresh_balance().await;
        Ok(receipt)
    }

    /// Address shown in the receive view: the connected account, else the
    /// generated one.
    pub fn receive_address(&self) -> WalletResult<Address> {
        self.session
            .connected_address()
            .or_else(|| self.credential.as_ref().map(|c| c.address()))
            .ok_or(WalletError::NotConnected)
    }

    /// EIP-681 payment URI for the receive address, suitable for a QR code.
    pub fn receive_uri(&self) -> WalletResult<String> {
        let result = self
            .receive_address()
            .map(|address| format!("ethereum:{}@{}", address, self.config.rpc.chain_id));
        self.report(result)
    }

    /// Copy a field of the current credential to the clipboard.
    pub fn copy(&self, field: CredentialField) -> WalletResult<()> {
        let result = self.credential.as_ref().ok_or_else(|| {
            WalletError::Credential("no credential has been generated".to_string())
        });
        let credential = self.report(result)?;

        let text = match field {
            CredentialField::Address => credential.address().to_string(),
            CredentialField::Mnemonic => credential.mnemonic_phrase().to_string(),
            CredentialField::PrivateKey => credential.private_key_hex().to_string(),
        };
        self.clipboard.copy(&text);
        self.notifier.send(Notification::Copied {
            field: field.label(),
        });
        Ok(())
    }

    pub fn credential(&self) -> Option<&WalletCredential> {
        self.credential.as_ref()
    }

    pub fn connected_address(&self) -> Option<Address> {
        self.session.connected_address()
    }

    /// Balance of the connected account, never of a previous one.
    pub fn balance(&self) -> Option<&BalanceView> {
        self.balance.view_for(self.session.connected_address()?)
    }

    pub fn chain_status(&self) -> ChainStatus {
        self.poller.status()
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_running()
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    fn report<T>(&self, result: WalletResult<T>) -> WalletResult<T> {
        if let Err(e) = &result {
            self.notifier.failure(e);
        }
        result
    }
}

impl std::fmt::Debug for WalletView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletView")
            .field("credential", &self.credential)
            .field("session", &self.session)
            .field("poller", &self.poller)
            .field("balance", &self.balance)
            .finish_non_exhaustive()
    }
}
