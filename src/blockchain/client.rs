//! Chain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the single JSON-RPC endpoint
//! - Query chain state (block number, balances, receipts)
//! - Bound every call with a timeout and map failures to `QueryFailed`

use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionReceipt;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::blockchain::types::{ChainId, WalletError, WalletResult};
use crate::config::RpcConfig;
use crate::observability::metrics;
use crate::resilience::timeouts::{bounded, TimedOut};

/// Read-only chain queries consumed by the poller and balance tracker.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Current block height.
    async fn block_number(&self) -> WalletResult<u64>;

    /// Balance of `address` in wei.
    async fn balance(&self, address: Address) -> WalletResult<U256>;
}

/// JSON-RPC client over a single HTTP endpoint.
#[derive(Clone)]
pub struct RpcClient {
    provider: Arc<dyn Provider + Send + Sync>,
    config: RpcConfig,
    timeout_duration: Duration,
}

impl RpcClient {
    /// Create a client without touching the network.
    pub fn new(config: &RpcConfig) -> WalletResult<Self> {
        let url: url::Url = config.url.parse().map_err(|e| {
            WalletError::QueryFailed(format!("Invalid RPC URL '{}': {}", config.url, e))
        })?;

        Ok(Self {
            provider: Arc::new(ProviderBuilder::new().connect_http(url)),
            config: config.clone(),
            timeout_duration: config.timeout(),
        })
    }

    /// Create a client and check the endpoint serves the configured chain.
    ///
    /// A failed check is logged, not returned: the view still works against
    /// an endpoint that is down at startup.
    pub async fn connect(config: &RpcConfig) -> WalletResult<Self> {
        let client = Self::new(config)?;

        match client.verify_chain_id().await {
            Ok(()) => {
                tracing::info!(
                    rpc_url = %config.url,
                    chain_id = config.chain_id,
                    "RPC client initialized"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "RPC client initialized but chain verification failed"
                );
            }
        }

        Ok(client)
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> WalletResult<()> {
        let chain_id = self.chain_id().await?;
        if chain_id.0 != self.config.chain_id {
            return Err(WalletError::QueryFailed(format!(
                "Chain ID mismatch: expected {}, got {}",
                self.config.chain_id, chain_id.0
            )));
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn chain_id(&self) -> WalletResult<ChainId> {
        let result = bounded(self.timeout_duration, self.provider.get_chain_id()).await;
        self.finish("chain_id", result).map(ChainId)
    }

    /// Get a transaction receipt by hash.
    pub async fn transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> WalletResult<Option<TransactionReceipt>> {
        let result = bounded(
            self.timeout_duration,
            self.provider.get_transaction_receipt(tx_hash),
        )
        .await;
        self.finish("transaction_receipt", result)
    }

    /// Get the configuration.
    pub fn config(&self) -> &RpcConfig {
        &self.config
    }

    fn finish<T, E: std::fmt::Display>(
        &self,
        op: &'static str,
        result: Result<Result<T, E>, TimedOut>,
    ) -> WalletResult<T> {
        match result {
            Ok(Ok(value)) => {
                metrics::record_rpc_query(op, "ok");
                Ok(value)
            }
            Ok(Err(e)) => {
                metrics::record_rpc_query(op, "error");
                tracing::warn!(op, error = %e, "RPC error");
                Err(WalletError::QueryFailed(format!("{} failed: {}", op, e)))
            }
            Err(elapsed) => {
                metrics::record_rpc_query(op, "timeout");
                tracing::warn!(op, "RPC timeout");
                Err(WalletError::QueryFailed(format!("{} {}", op, elapsed)))
            }
        }
    }
}

#[async_trait]
impl ChainRpc for RpcClient {
    async fn block_number(&self) -> WalletResult<u64> {
        let result = bounded(self.timeout_duration, self.provider.get_block_number()).await;
        self.finish("block_number", result)
    }

    async fn balance(&self, address: Address) -> WalletResult<U256> {
        let result = bounded(self.timeout_duration, self.provider.get_balance(address)).await;
        self.finish("balance", result)
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("rpc_url", &self.config.url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.timeout_secs)
            .finish()
    }
}
