//! Renderer-agnostic view of the panel.
//!
//! A renderer draws [`PanelView`] and nothing else; every field is derived
//! from [`PanelState`] and the configured network options.

use chain_eth::address::{checksum_address, truncate_address};
use chain_eth::ChainId;
use serde::Serialize;

use crate::types::{NetworkOption, PanelState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PrimaryAction {
    Connect,
    Disconnect,
}

impl PrimaryAction {
    pub fn label(self) -> &'static str {
        match self {
            PrimaryAction::Connect => "Connect Wallet",
            PrimaryAction::Disconnect => "Disconnect",
        }
    }
}

/// Connection status icon: a check when connected, a warning otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatusIndicator {
    Connected,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkChoice {
    pub id: ChainId,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelView {
    pub loading: bool,
    pub primary_action: PrimaryAction,
    pub status: StatusIndicator,
    pub account_label: String,
    /// Full account address, shown on hover.
    pub account_tooltip: Option<String>,
    pub network_label: String,
    /// Empty unless connected.
    pub network_options: Vec<NetworkChoice>,
    pub switch_enabled: bool,
    pub error_text: Option<String>,
}

impl PanelView {
    pub fn new<P>(state: &PanelState<P>, networks: &[NetworkOption]) -> Self {
        let account = state.account();
        // Display the EIP-55 form when the wallet hands back a lowercase address.
        let display_account =
            account.map(|a| checksum_address(a).unwrap_or_else(|_| a.to_string()));

        let network_label = match state.chain_id() {
            Some(id) => format!("Network ID: {id}"),
            None => "Network ID: No Network".to_string(),
        };

        let network_options = if state.is_connected() {
            networks
                .iter()
                .map(|n| NetworkChoice {
                    id: n.id,
                    label: n.label.clone(),
                    selected: state.pending_network == Some(n.id),
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            loading: state.loading,
            primary_action: if state.is_connected() {
                PrimaryAction::Disconnect
            } else {
                PrimaryAction::Connect
            },
            status: if state.is_connected() {
                StatusIndicator::Connected
            } else {
                StatusIndicator::Warning
            },
            account_label: format!(
                "Account: {}",
                truncate_address(display_account.as_deref().unwrap_or(""))
            ),
            account_tooltip: display_account,
            network_label,
            network_options,
            switch_enabled: state.can_switch_network(),
            error_text: state.last_error.as_ref().map(|e| e.to_string()),
        }
    }

    /// JSON form for renderers living outside Rust.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConnectFailure, GatewayError, SessionError};
    use crate::types::{ConnectionStatus, Session};

    fn networks() -> Vec<NetworkOption> {
        vec![
            NetworkOption {
                id: ChainId(3),
                label: "Ropsten".into(),
            },
            NetworkOption {
                id: ChainId(4),
                label: "Rinkeby".into(),
            },
        ]
    }

    fn connected(account: &str) -> PanelState<()> {
        PanelState {
            status: ConnectionStatus::Connected,
            session: Some(Session {
                account: account.into(),
                chain_id: ChainId(4),
                wallet_label: "MetaMask".into(),
            }),
            provider: Some(()),
            ..PanelState::default()
        }
    }

    #[test]
    fn disconnected_view() {
        let view = PanelView::new(&PanelState::<()>::default(), &networks());
        assert_eq!(view.primary_action, PrimaryAction::Connect);
        assert_eq!(view.primary_action.label(), "Connect Wallet");
        assert_eq!(view.status, StatusIndicator::Warning);
        assert_eq!(view.account_label, "Account: No Account");
        assert_eq!(view.account_tooltip, None);
        assert_eq!(view.network_label, "Network ID: No Network");
        assert!(view.network_options.is_empty());
        assert!(!view.switch_enabled);
        assert!(!view.loading);
    }

    #[test]
    fn connected_view_checksums_and_truncates() {
        let state = connected("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed");
        let view = PanelView::new(&state, &networks());
        assert_eq!(view.primary_action, PrimaryAction::Disconnect);
        assert_eq!(view.status, StatusIndicator::Connected);
        assert_eq!(view.account_label, "Account: 0x5a\u{2026}ed");
        assert_eq!(
            view.account_tooltip.as_deref(),
            Some("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed")
        );
        assert_eq!(view.network_label, "Network ID: 4");
        assert_eq!(view.network_options.len(), 2);
        assert!(view.network_options.iter().all(|n| !n.selected));
        assert!(!view.switch_enabled);
    }

    #[test]
    fn pending_selection_enables_switch() {
        let mut state = connected("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
        state.pending_network = Some(ChainId(3));
        let view = PanelView::new(&state, &networks());
        assert!(view.switch_enabled);
        let selected: Vec<_> = view.network_options.iter().filter(|n| n.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].label, "Ropsten");
    }

    #[test]
    fn error_is_plain_text() {
        let state = PanelState::<()> {
            last_error: Some(SessionError::ConnectFailed(ConnectFailure::Gateway(
                GatewayError::UserRejected,
            ))),
            ..PanelState::default()
        };
        let view = PanelView::new(&state, &networks());
        assert_eq!(
            view.error_text.as_deref(),
            Some("Connect failed: user rejected the request")
        );
    }

    #[test]
    fn loading_is_shown_while_connecting() {
        let state = PanelState::<()> {
            status: ConnectionStatus::Connecting,
            loading: true,
            ..PanelState::default()
        };
        let view = PanelView::new(&state, &networks());
        assert!(view.loading);
        assert_eq!(view.primary_action, PrimaryAction::Connect);
    }

    #[test]
    fn serializes_for_renderer() {
        let view = PanelView::new(&PanelState::<()>::default(), &networks());
        let json: serde_json::Value = serde_json::from_str(&view.to_json().unwrap()).unwrap();
        assert_eq!(json["primary_action"], "Connect");
        assert_eq!(json["network_label"], "Network ID: No Network");
        assert_eq!(json["switch_enabled"], false);
    }
}
