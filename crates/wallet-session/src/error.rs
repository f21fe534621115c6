use chain_eth::{ChainId, EthError};
use thiserror::Error;

/// Failure reported by a wallet gateway call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("user rejected the request")]
    UserRejected,

    #[error("no wallet available")]
    NoWalletAvailable,

    #[error("{0}")]
    Rejected(String),
}

/// Why a connect attempt did not produce a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectFailure {
    #[error("{0}")]
    Gateway(#[from] GatewayError),

    #[error("gateway returned no wallets")]
    NoWallets,

    #[error("wallet {0} exposed no accounts")]
    NoAccounts(String),

    #[error("wallet {0} reported no chain")]
    NoChains(String),

    #[error("{0}")]
    InvalidAccount(EthError),

    #[error("{0}")]
    InvalidChain(EthError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Connect failed: {0}")]
    ConnectFailed(ConnectFailure),

    #[error("Switch to network {chain_id} failed: {source}")]
    SwitchNetworkFailed {
        chain_id: ChainId,
        source: GatewayError,
    },

    #[error("Disconnect of {label} failed: {source}")]
    DisconnectFailed { label: String, source: GatewayError },

    #[error("Wallet state out of sync: {0}")]
    SyncFailed(ConnectFailure),

    #[error("A connect request is already in flight")]
    ConnectInFlight,

    #[error("A disconnect request is already in flight")]
    DisconnectInFlight,

    #[error("Wallet already connected")]
    AlreadyConnected,

    #[error("No wallet connected")]
    NotConnected,

    #[error("No network selected")]
    NoNetworkSelected,

    #[error("Unsupported network: {0}")]
    UnsupportedNetwork(ChainId),
}

/// Problems loading or validating a [`crate::config::PanelConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Invalid chain in config: {0}")]
    Chain(#[from] EthError),

    #[error("API key variable {0} is not set")]
    MissingApiKey(String),
}
