//! Signing authority backed by a local private key.
//!
//! # Security
//! - Keys come ONLY from an environment variable or an in-memory credential
//! - Keys are never logged or serialized

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::blockchain::client::RpcClient;
use crate::blockchain::credential::WalletCredential;
use crate::blockchain::transaction::{transfer_request, ConfirmationWaiter};
use crate::blockchain::types::{TransferReceipt, WalletError, WalletResult};
use crate::config::WalletConfig;
use crate::provider::SigningAuthority;
use crate::resilience::timeouts::bounded;

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "DAVINCI_WALLET_PRIVATE_KEY";

/// Native adapter: signs with a local key and submits over the RPC endpoint.
pub struct LocalSigningAuthority {
    signer: RwLock<Option<PrivateKeySigner>>,
    url: url::Url,
    chain_id: u64,
    submit_timeout: Duration,
    waiter: ConfirmationWaiter,
}

impl LocalSigningAuthority {
    /// Create an authority with no key loaded.
    pub fn new(config: &WalletConfig) -> WalletResult<Self> {
        let client = RpcClient::new(&config.rpc)?;
        let url = config.rpc.url.parse().map_err(|e| {
            WalletError::NoProviderAvailable(format!("Invalid RPC URL '{}': {}", config.rpc.url, e))
        })?;

        Ok(Self {
            signer: RwLock::new(None),
            url,
            chain_id: config.rpc.chain_id,
            submit_timeout: config.rpc.timeout(),
            waiter: ConfirmationWaiter::new(
                client,
                config.transfer.receipt_poll_interval(),
                config.transfer.confirmation_timeout(),
            ),
        })
    }

    /// Create an authority, loading a key from `DAVINCI_WALLET_PRIVATE_KEY` if set.
    pub fn from_env(config: &WalletConfig) -> WalletResult<Self> {
        let authority = Self::new(config)?;
        match std::env::var(PRIVATE_KEY_ENV_VAR) {
            Ok(key) => {
                let key_hex = key.trim().strip_prefix("0x").unwrap_or(key.trim());
                let signer: PrivateKeySigner = key_hex.parse().map_err(|e| {
                    WalletError::Credential(format!("Invalid private key format: {}", e))
                })?;
                authority.authorize(signer);
            }
            Err(_) => {
                tracing::info!(
                    env_var = PRIVATE_KEY_ENV_VAR,
                    "No private key in environment; import a credential to connect"
                );
            }
        }
        Ok(authority)
    }

    /// Use a generated credential as the signing key.
    pub fn import(&self, credential: &WalletCredential) -> WalletResult<()> {
        self.authorize(credential.signer()?);
        Ok(())
    }

    fn authorize(&self, signer: PrivateKeySigner) {
        tracing::info!(address = %signer.address(), chain_id = self.chain_id, "Signing key loaded");
        *self.signer.write().unwrap_or_else(|p| p.into_inner()) = Some(signer);
    }

    fn current_signer(&self) -> Option<PrivateKeySigner> {
        self.signer.read().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

#[async_trait]
impl SigningAuthority for LocalSigningAuthority {
    async fn request_access(&self) -> WalletResult<Vec<Address>> {
        match self.current_signer() {
            Some(signer) => Ok(vec![signer.address()]),
            None => Err(WalletError::NoProviderAvailable(format!(
                "no signing key loaded (set {})",
                PRIVATE_KEY_ENV_VAR
            ))),
        }
    }

    async fn sign_and_submit(&self, from: Address, to: Address, value: U256) -> WalletResult<TxHash> {
        let signer = self
            .current_signer()
            .ok_or_else(|| WalletError::TransferFailed("no signing key loaded".to_string()))?;
        if signer.address() != from {
            return Err(WalletError::TransferFailed(format!(
                "account {} is not authorized by this signer",
                from
            )));
        }

        let provider: Arc<dyn Provider + Send + Sync> = Arc::new(
            ProviderBuilder::new()
                .wallet(EthereumWallet::from(signer))
                .connect_http(self.url.clone()),
        );
        let tx = transfer_request(from, to, value, self.chain_id);

        match bounded(self.submit_timeout, provider.send_transaction(tx)).await {
            Ok(Ok(pending)) => Ok(*pending.tx_hash()),
            Ok(Err(e)) => Err(WalletError::TransferFailed(format!("submission failed: {}", e))),
            Err(elapsed) => Err(WalletError::TransferFailed(format!("submission {}", elapsed))),
        }
    }

    async fn await_confirmation(&self, tx_hash: TxHash) -> WalletResult<TransferReceipt> {
        self.waiter.wait(tx_hash).await
    }
}

impl std::fmt::Debug for LocalSigningAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSigningAuthority")
            .field("rpc_url", &self.url.as_str())
            .field("chain_id", &self.chain_id)
            .field("address", &self.current_signer().map(|s| s.address()))
            .finish()
    }
}
