//! # wallet-session
//!
//! The wallet connection panel: connect a wallet through an external
//! provider gateway, show the connected account and chain, and request a
//! network switch.
//!
//! The gateway is injected as an `Arc<G: WalletGateway>`; all wallet and
//! RPC work happens behind it. [`ConnectionPanel`] owns the session state
//! machine and publishes every transition, and [`PanelView`] is what a
//! renderer draws.

pub mod config;
pub mod error;
pub mod gateway;
pub mod panel;
pub mod testing;
pub mod types;
pub mod view;

pub use config::PanelConfig;
pub use error::{ConfigError, ConnectFailure, GatewayError, SessionError};
pub use gateway::{ConnectedWallet, GatewayState, WalletAccount, WalletChain, WalletGateway};
pub use panel::ConnectionPanel;
pub use types::{ConnectionStatus, DisconnectOutcome, NetworkOption, PanelState, Session};
pub use view::PanelView;

pub use chain_eth::ChainId;
