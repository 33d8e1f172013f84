//! Scripted chain and signer doubles for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use tokio::sync::Notify;

use davinci_wallet::blockchain::TransferReceipt;
use davinci_wallet::config::WalletConfig;
use davinci_wallet::wallet::{MemoryClipboard, Notification, NotificationReceiver};
use davinci_wallet::{ChainRpc, SigningAuthority, WalletError, WalletResult, WalletView};

pub const ONE_ETHER: u128 = 1_000_000_000_000_000_000;
pub const RECIPIENT: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";

/// In-memory chain with call counters and switchable failures.
#[derive(Default)]
pub struct MockRpc {
    pub height: AtomicU64,
    pub block_calls: AtomicUsize,
    pub balance_calls: AtomicUsize,
    pub fail_block: AtomicBool,
    pub fail_balance: AtomicBool,
    balances: Mutex<HashMap<Address, U256>>,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl MockRpc {
    pub fn set_balance(&self, address: Address, wei: U256) {
        self.balances.lock().unwrap().insert(address, wei);
    }

    /// Hold every subsequent block query until the returned handle is notified.
    pub fn hold_block_queries(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn reset_counters(&self) {
        self.block_calls.store(0, Ordering::SeqCst);
        self.balance_calls.store(0, Ordering::SeqCst);
    }
}

#[async_trait]
impl ChainRpc for MockRpc {
    async fn block_number(&self) -> WalletResult<u64> {
        self.block_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.fail_block.load(Ordering::SeqCst) {
            return Err(WalletError::QueryFailed("block_number failed: connection refused".into()));
        }
        Ok(self.height.load(Ordering::SeqCst))
    }

    async fn balance(&self, address: Address) -> WalletResult<U256> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_balance.load(Ordering::SeqCst) {
            return Err(WalletError::QueryFailed("balance failed: connection refused".into()));
        }
        Ok(self.balances.lock().unwrap().get(&address).copied().unwrap_or_default())
    }
}

/// Signing authority that approves whatever accounts it is given.
#[derive(Default)]
pub struct MockAuthority {
    pub accounts: Mutex<Vec<Address>>,
    pub access_calls: AtomicUsize,
    pub submit_calls: AtomicUsize,
    pub confirm_calls: AtomicUsize,
    pub fail_submit: AtomicBool,
}

impl MockAuthority {
    pub fn with_account(address: Address) -> Self {
        let authority = Self::default();
        authority.set_accounts(vec![address]);
        authority
    }

    pub fn set_accounts(&self, accounts: Vec<Address>) {
        *self.accounts.lock().unwrap() = accounts;
    }

    pub fn network_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst) + self.confirm_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SigningAuthority for MockAuthority {
    async fn request_access(&self) -> WalletResult<Vec<Address>> {
        self.access_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn sign_and_submit(&self, _from: Address, _to: Address, _value: U256) -> WalletResult<TxHash> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_submit.load(Ordering::SeqCst) {
            return Err(WalletError::TransferFailed("insufficient funds for gas".into()));
        }
        Ok(TxHash::repeat_byte(0x42))
    }

    async fn await_confirmation(&self, tx_hash: TxHash) -> WalletResult<TransferReceipt> {
        self.confirm_calls.fetch_add(1, Ordering::SeqCst);
        Ok(TransferReceipt {
            tx_hash,
            block_number: 12,
        })
    }
}

pub struct Harness {
    pub view: WalletView,
    pub notifications: NotificationReceiver,
    pub rpc: Arc<MockRpc>,
    pub authority: Arc<MockAuthority>,
    pub clipboard: Arc<MemoryClipboard>,
}

pub fn harness(authority: MockAuthority) -> Harness {
    let rpc = Arc::new(MockRpc::default());
    let authority = Arc::new(authority);
    let clipboard = Arc::new(MemoryClipboard::default());
    let (view, notifications) = WalletView::new(
        WalletConfig::default(),
        rpc.clone(),
        authority.clone(),
        clipboard.clone(),
    );
    Harness {
        view,
        notifications,
        rpc,
        authority,
        clipboard,
    }
}

pub fn drain(rx: &mut NotificationReceiver) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(n) = rx.try_recv() {
        out.push(n);
    }
    out
}

/// Let spawned tasks run on the current-thread test runtime.
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}
