//! Transfer request building and confirmation monitoring.
//!
//! # Responsibilities
//! - Build plain value-transfer requests (gas, nonce and fees are filled by
//!   the signing provider)
//! - Wait for the single confirmation of a submitted transfer

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

use crate::blockchain::client::RpcClient;
use crate::blockchain::types::{TransferReceipt, WalletError, WalletResult};
use crate::resilience::timeouts::bounded;

/// Build a value transfer from `from` to `to`.
pub fn transfer_request(from: Address, to: Address, value: U256, chain_id: u64) -> TransactionRequest {
    TransactionRequest::default()
        .with_from(from)
        .with_to(to)
        .with_value(value)
        .with_chain_id(chain_id)
}

/// Polls for a receipt until the transfer is included in a block.
#[derive(Debug, Clone)]
pub struct ConfirmationWaiter {
    client: RpcClient,
    poll_interval: Duration,
    timeout: Duration,
}

impl ConfirmationWaiter {
    pub fn new(client: RpcClient, poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            client,
            poll_interval,
            timeout,
        }
    }

    /// Wait for one confirmation of `tx_hash`.
    ///
    /// A reverted receipt or an expired deadline is a `TransferFailed`.
    /// Transient receipt query errors are logged and polled again.
    pub async fn wait(&self, tx_hash: TxHash) -> WalletResult<TransferReceipt> {
        let result = bounded(self.timeout, async {
            let mut ticker = interval(self.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let receipt = match self.client.transaction_receipt(tx_hash).await {
                    Ok(Some(r)) => r,
                    Ok(None) => {
                        tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                        continue;
                    }
                    Err(e) => {
                        tracing::debug!(tx_hash = %tx_hash, error = %e, "Receipt query failed");
                        continue;
                    }
                };

                if !receipt.status() {
                    return Err(WalletError::TransferFailed(format!(
                        "transaction {} reverted",
                        tx_hash
                    )));
                }

                return Ok(TransferReceipt {
                    tx_hash,
                    block_number: receipt.block_number.unwrap_or_default(),
                });
            }
        })
        .await;

        match result {
            Ok(outcome) => outcome,
            Err(elapsed) => Err(WalletError::TransferFailed(format!(
                "confirmation of {} {}",
                tx_hash, elapsed
            ))),
        }
    }
}
