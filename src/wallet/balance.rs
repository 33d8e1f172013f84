//! Balance tracking for the connected address.

use alloy::primitives::Address;
use std::sync::Arc;

use crate::blockchain::client::ChainRpc;
use crate::blockchain::types::{BalanceView, WalletResult};
use crate::blockchain::units::display_ether;

/// Holds the last fetched balance and the address it belongs to.
pub struct BalanceTracker {
    rpc: Arc<dyn ChainRpc>,
    view: Option<BalanceView>,
}

impl BalanceTracker {
    pub fn new(rpc: Arc<dyn ChainRpc>) -> Self {
        Self { rpc, view: None }
    }

    /// Fetch the balance of `address` and replace the current view.
    ///
    /// On failure the previous view is kept and the error returned.
    pub async fn refresh(&mut self, address: Address) -> WalletResult<BalanceView> {
        match self.rpc.balance(address).await {
            Ok(wei) => {
                let view = BalanceView {
                    amount: display_ether(wei),
                    for_address: address,
                    wei,
                };
                tracing::debug!(address = %address, amount = %view.amount, "Balance refreshed");
                self.view = Some(view.clone());
                Ok(view)
            }
            Err(e) => {
                tracing::warn!(address = %address, error = %e, "Balance refresh failed; keeping previous value");
                Err(e)
            }
        }
    }

    /// The current view, only if it was fetched for `address`.
    pub fn view_for(&self, address: Address) -> Option<&BalanceView> {
        self.view.as_ref().filter(|v| v.for_address == address)
    }

    /// Drop a view that does not belong to `address`.
    pub fn retain_for(&mut self, address: Option<Address>) {
        if self.view.as_ref().is_some_and(|v| Some(v.for_address) != address) {
            self.view = None;
        }
    }

    pub fn clear(&mut self) {
        self.view = None;
    }
}

impl std::fmt::Debug for BalanceTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BalanceTracker").field("view", &self.view).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::types::WalletError;
    use alloy::primitives::U256;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedRpc {
        balances: Mutex<Vec<WalletResult<U256>>>,
    }

    #[async_trait]
    impl ChainRpc for ScriptedRpc {
        async fn block_number(&self) -> WalletResult<u64> {
            Ok(1)
        }

        async fn balance(&self, _address: Address) -> WalletResult<U256> {
            self.balances.lock().unwrap().remove(0)
        }
    }

    fn tracker(script: Vec<WalletResult<U256>>) -> BalanceTracker {
        BalanceTracker::new(Arc::new(ScriptedRpc {
            balances: Mutex::new(script),
        }))
    }

    #[tokio::test]
    async fn test_refresh_replaces_view() {
        let address = Address::repeat_byte(0xab);
        let mut tracker = tracker(vec![
            Ok(U256::from(1_000_000_000_000_000_000u128)),
            Ok(U256::from(2_500_000_000_000_000_000u128)),
        ]);

        assert_eq!(tracker.refresh(address).await.unwrap().amount, "1.0");
        assert_eq!(tracker.refresh(address).await.unwrap().amount, "2.5");
        assert_eq!(tracker.view_for(address).unwrap().amount, "2.5");
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_view() {
        let address = Address::repeat_byte(0xab);
        let mut tracker = tracker(vec![
            Ok(U256::from(2_500_000_000_000_000_000u128)),
            Err(WalletError::QueryFailed("endpoint down".into())),
        ]);

        tracker.refresh(address).await.unwrap();
        let err = tracker.refresh(address).await.unwrap_err();
        assert!(matches!(err, WalletError::QueryFailed(_)));
        assert_eq!(tracker.view_for(address).unwrap().amount, "2.5");
    }

    #[tokio::test]
    async fn test_view_is_scoped_to_address() {
        let first = Address::repeat_byte(0x01);
        let second = Address::repeat_byte(0x02);
        let mut tracker = tracker(vec![Ok(U256::from(1u64))]);

        tracker.refresh(first).await.unwrap();
        assert!(tracker.view_for(second).is_none());

        tracker.retain_for(Some(first));
        assert!(tracker.view_for(first).is_some());

        tracker.retain_for(Some(second));
        assert!(tracker.view_for(first).is_none());
    }
}
