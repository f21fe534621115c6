//! Contract with the external wallet provider gateway.
//!
//! The gateway owns wallet discovery, provider negotiation and the
//! `wallet_switchEthereumChain` round trip. The panel only sees it through
//! [`WalletGateway`], and every call hands back a `Result` the caller must
//! handle on both branches.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// An account exposed by a connected wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletAccount {
    pub address: String,
}

/// A chain a wallet reports being on. `id` is gateway hex (`"0x4"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletChain {
    pub id: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

impl WalletChain {
    pub fn evm(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            namespace: default_namespace(),
        }
    }
}

fn default_namespace() -> String {
    "evm".to_string()
}

/// A wallet the gateway has connected, along with its opaque provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedWallet<P> {
    pub label: String,
    pub accounts: Vec<WalletAccount>,
    pub chains: Vec<WalletChain>,
    pub provider: P,
}

/// Synchronous snapshot of the gateway's own state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayState<P> {
    pub wallets: Vec<ConnectedWallet<P>>,
}

impl<P> GatewayState<P> {
    pub fn empty() -> Self {
        Self {
            wallets: Vec::new(),
        }
    }

    /// The wallet the gateway considers primary (the first one).
    pub fn primary_wallet(&self) -> Option<&ConnectedWallet<P>> {
        self.wallets.first()
    }
}

impl<P> Default for GatewayState<P> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Capability interface of the wallet provider gateway.
///
/// Created once at application start and shared with the panel by `Arc`.
#[async_trait]
pub trait WalletGateway: Send + Sync {
    /// Handle to the wallet's injected provider. Opaque to the panel.
    type Provider: Clone + Send + Sync + 'static;

    /// Prompts the user to pick and connect a wallet.
    ///
    /// Fails when the user rejects or no wallet is available.
    async fn connect(&self) -> Result<Vec<ConnectedWallet<Self::Provider>>, GatewayError>;

    /// Asks the primary wallet to switch to `chain_id` (gateway hex).
    async fn set_chain(&self, chain_id: &str) -> Result<(), GatewayError>;

    /// Disconnects the wallet registered under `label`.
    async fn disconnect(&self, label: &str) -> Result<(), GatewayError>;

    fn state(&self) -> GatewayState<Self::Provider>;
}
