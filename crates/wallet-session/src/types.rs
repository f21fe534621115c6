use chain_eth::ChainId;
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Where the panel is in its connect/disconnect cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Disconnecting,
}

/// The connected account and chain.
///
/// Only exists while connected, so an empty account is unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub account: String,
    pub chain_id: ChainId,
    /// Gateway label of the wallet backing this session.
    pub wallet_label: String,
}

/// A network the user may pick in the switch control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkOption {
    pub id: ChainId,
    pub label: String,
}

/// Everything the panel tracks, published to subscribers on every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelState<P> {
    pub status: ConnectionStatus,
    pub session: Option<Session>,
    pub provider: Option<P>,
    /// Chosen but not yet requested network.
    pub pending_network: Option<ChainId>,
    /// True strictly while a connect request is outstanding.
    pub loading: bool,
    pub last_error: Option<SessionError>,
}

impl<P> PanelState<P> {
    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    pub fn account(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.account.as_str())
    }

    pub fn chain_id(&self) -> Option<ChainId> {
        self.session.as_ref().map(|s| s.chain_id)
    }

    /// The switch control is usable only with a pending selection.
    pub fn can_switch_network(&self) -> bool {
        self.status == ConnectionStatus::Connected && self.pending_network.is_some()
    }

    pub(crate) fn clear_session(&mut self) {
        self.session = None;
        self.provider = None;
        self.pending_network = None;
    }
}

impl<P> Default for PanelState<P> {
    fn default() -> Self {
        Self {
            status: ConnectionStatus::Disconnected,
            session: None,
            provider: None,
            pending_network: None,
            loading: false,
            last_error: None,
        }
    }
}

/// Result of a disconnect request that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisconnectOutcome {
    /// The gateway had no wallet; nothing was called.
    NoActiveWallet,
    /// The wallet with this label was disconnected.
    Disconnected { label: String },
}
