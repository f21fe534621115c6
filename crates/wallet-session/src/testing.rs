//! Scriptable in-memory gateway for tests and demos.
//!
//! Behaves like a real gateway with respect to its own state: a successful
//! connect registers the returned wallets, a successful disconnect removes
//! the wallet, and a successful `set_chain` moves the primary wallet.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::error::GatewayError;
use crate::gateway::{ConnectedWallet, GatewayState, WalletAccount, WalletChain, WalletGateway};

/// A gateway call as recorded by [`MockGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    Connect,
    SetChain(String),
    Disconnect(String),
}

/// Wallet with one account on one chain; its provider is `"<label> provider"`.
pub fn mock_wallet(label: &str, address: &str, chain_hex: &str) -> ConnectedWallet<String> {
    ConnectedWallet {
        label: label.to_string(),
        accounts: vec![WalletAccount {
            address: address.to_string(),
        }],
        chains: vec![WalletChain::evm(chain_hex)],
        provider: format!("{label} provider"),
    }
}

struct MockState {
    connect_result: Result<Vec<ConnectedWallet<String>>, GatewayError>,
    set_chain_error: Option<GatewayError>,
    disconnect_error: Option<GatewayError>,
    wallets: Vec<ConnectedWallet<String>>,
    calls: Vec<GatewayCall>,
    connect_gate: Option<Arc<Notify>>,
    set_chain_gate: Option<Arc<Notify>>,
}

pub struct MockGateway {
    inner: Mutex<MockState>,
}

impl MockGateway {
    /// A gateway with no wallet: connect fails with `NoWalletAvailable`.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MockState {
                connect_result: Err(GatewayError::NoWalletAvailable),
                set_chain_error: None,
                disconnect_error: None,
                wallets: Vec::new(),
                calls: Vec::new(),
                connect_gate: None,
                set_chain_gate: None,
            }),
        }
    }

    /// Connect resolves with a single wallet.
    pub fn with_wallet(self, label: &str, address: &str, chain_hex: &str) -> Self {
        self.connect_returns(vec![mock_wallet(label, address, chain_hex)])
    }

    pub fn connect_returns(self, wallets: Vec<ConnectedWallet<String>>) -> Self {
        self.set_connect_result(Ok(wallets));
        self
    }

    pub fn connect_fails(self, err: GatewayError) -> Self {
        self.set_connect_result(Err(err));
        self
    }

    pub fn set_chain_fails(self, err: GatewayError) -> Self {
        self.inner.lock().set_chain_error = Some(err);
        self
    }

    pub fn disconnect_fails(self, err: GatewayError) -> Self {
        self.inner.lock().disconnect_error = Some(err);
        self
    }

    pub fn set_connect_result(&self, result: Result<Vec<ConnectedWallet<String>>, GatewayError>) {
        self.inner.lock().connect_result = result;
    }

    /// Replaces the wallets reported by [`WalletGateway::state`].
    pub fn set_active_wallets(&self, wallets: Vec<ConnectedWallet<String>>) {
        self.inner.lock().wallets = wallets;
    }

    pub fn clear_active_wallets(&self) {
        self.inner.lock().wallets.clear();
    }

    /// Makes every later connect wait until the returned handle is notified.
    pub fn hold_connect(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.inner.lock().connect_gate = Some(gate.clone());
        gate
    }

    /// Makes every later `set_chain` wait until the returned handle is notified.
    pub fn hold_set_chain(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.inner.lock().set_chain_gate = Some(gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.inner.lock().calls.clone()
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WalletGateway for MockGateway {
    type Provider = String;

    async fn connect(&self) -> Result<Vec<ConnectedWallet<String>>, GatewayError> {
        let gate = {
            let mut inner = self.inner.lock();
            inner.calls.push(GatewayCall::Connect);
            inner.connect_gate.clone()
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mut inner = self.inner.lock();
        let result = inner.connect_result.clone();
        if let Ok(wallets) = &result {
            inner.wallets = wallets.clone();
        }
        result
    }

    async fn set_chain(&self, chain_id: &str) -> Result<(), GatewayError> {
        let gate = {
            let mut inner = self.inner.lock();
            inner.calls.push(GatewayCall::SetChain(chain_id.to_string()));
            inner.set_chain_gate.clone()
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mut inner = self.inner.lock();
        if let Some(err) = inner.set_chain_error.clone() {
            return Err(err);
        }
        if let Some(wallet) = inner.wallets.first_mut() {
            wallet.chains = vec![WalletChain::evm(chain_id)];
        }
        Ok(())
    }

    async fn disconnect(&self, label: &str) -> Result<(), GatewayError> {
        let mut inner = self.inner.lock();
        inner.calls.push(GatewayCall::Disconnect(label.to_string()));
        if let Some(err) = inner.disconnect_error.clone() {
            return Err(err);
        }
        inner.wallets.retain(|w| w.label != label);
        Ok(())
    }

    fn state(&self) -> GatewayState<String> {
        GatewayState {
            wallets: self.inner.lock().wallets.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[tokio::test]
    async fn connect_registers_wallets() {
        let gateway = MockGateway::new().with_wallet("MetaMask", ADDR, "0x1");
        assert!(gateway.state().wallets.is_empty());

        let wallets = gateway.connect().await.unwrap();
        assert_eq!(wallets.len(), 1);
        assert_eq!(gateway.state().primary_wallet().unwrap().label, "MetaMask");
    }

    #[tokio::test]
    async fn default_connect_has_no_wallet() {
        let gateway = MockGateway::default();
        assert_eq!(gateway.connect().await, Err(GatewayError::NoWalletAvailable));
    }

    #[tokio::test]
    async fn disconnect_removes_wallet() {
        let gateway = MockGateway::new();
        gateway.set_active_wallets(vec![mock_wallet("WalletLink", ADDR, "0x4")]);

        gateway.disconnect("WalletLink").await.unwrap();
        assert!(gateway.state().wallets.is_empty());
        assert_eq!(
            gateway.calls(),
            vec![GatewayCall::Disconnect("WalletLink".into())]
        );
    }

    #[tokio::test]
    async fn failed_disconnect_keeps_wallet() {
        let gateway = MockGateway::new().disconnect_fails(GatewayError::UserRejected);
        gateway.set_active_wallets(vec![mock_wallet("WalletLink", ADDR, "0x4")]);

        assert!(gateway.disconnect("WalletLink").await.is_err());
        assert_eq!(gateway.state().wallets.len(), 1);
    }

    #[tokio::test]
    async fn set_chain_moves_primary_wallet() {
        let gateway = MockGateway::new();
        gateway.set_active_wallets(vec![mock_wallet("MetaMask", ADDR, "0x4")]);

        gateway.set_chain("0x3").await.unwrap();
        assert_eq!(gateway.state().wallets[0].chains, vec![WalletChain::evm("0x3")]);
    }
}
