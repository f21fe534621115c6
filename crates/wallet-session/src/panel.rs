//! The connection panel state machine.
//!
//! ```text
//! Disconnected -> Connecting -> Connected -> Disconnecting -> Disconnected
//!                     |
//!                     +--(failure, last_error set)--> Disconnected
//! ```
//!
//! State lives in a `watch` channel: every transition is published, and the
//! status checks guarding a transition happen inside the same
//! `send_if_modified` that performs it. No state borrow is held across a
//! gateway await.

use std::sync::Arc;

use chain_eth::address::validate_address;
use chain_eth::{ChainId, EthError};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::PanelConfig;
use crate::error::{ConnectFailure, SessionError};
use crate::gateway::{ConnectedWallet, WalletGateway};
use crate::types::{ConnectionStatus, DisconnectOutcome, NetworkOption, PanelState, Session};
use crate::view::PanelView;

/// Wallet session over an injected gateway.
///
/// Owns the session, the pending network selection and the last error, and
/// publishes every change to [`Self::subscribe`] receivers. All methods take
/// `&self`, so one panel can be shared behind an `Arc`.
pub struct ConnectionPanel<G: WalletGateway> {
    gateway: Arc<G>,
    networks: Vec<NetworkOption>,
    state: watch::Sender<PanelState<G::Provider>>,
}

impl<G: WalletGateway> ConnectionPanel<G> {
    /// Builds a panel offering the networks listed in `config`.
    pub fn new(gateway: Arc<G>, config: &PanelConfig) -> Self {
        Self::with_networks(gateway, config.networks.clone())
    }

    pub fn with_networks(gateway: Arc<G>, networks: Vec<NetworkOption>) -> Self {
        let (state, _) = watch::channel(PanelState::default());
        Self {
            gateway,
            networks,
            state,
        }
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    pub fn networks(&self) -> &[NetworkOption] {
        &self.networks
    }

    pub fn snapshot(&self) -> PanelState<G::Provider> {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change, for re-rendering.
    pub fn subscribe(&self) -> watch::Receiver<PanelState<G::Provider>> {
        self.state.subscribe()
    }

    pub fn view(&self) -> PanelView {
        PanelView::new(&*self.state.borrow(), &self.networks)
    }

    /// Connects the first wallet the gateway hands back.
    ///
    /// Rejected without touching state while another connect is in flight or
    /// a session exists. Any failure, including a gateway that resolves with
    /// no wallets, is recorded in `last_error` and leaves the panel
    /// disconnected. A wallet the gateway connected but the panel rejected is
    /// disconnected again so both sides agree.
    pub async fn connect(&self) -> Result<Session, SessionError> {
        let mut rejected = None;
        self.state.send_if_modified(|state| match state.status {
            ConnectionStatus::Disconnected => {
                state.status = ConnectionStatus::Connecting;
                state.loading = true;
                true
            }
            ConnectionStatus::Connecting => {
                rejected = Some(SessionError::ConnectInFlight);
                false
            }
            ConnectionStatus::Connected | ConnectionStatus::Disconnecting => {
                rejected = Some(SessionError::AlreadyConnected);
                false
            }
        });
        if let Some(err) = rejected {
            debug!(%err, "connect request ignored");
            return Err(err);
        }

        info!("requesting wallet connection");
        let (outcome, rejected_wallet) = match self.gateway.connect().await {
            Ok(wallets) => {
                let label = wallets.first().map(|w| w.label.clone());
                (primary_session(wallets), label)
            }
            Err(e) => (Err(ConnectFailure::Gateway(e)), None),
        };

        match outcome {
            Ok((session, provider)) => {
                info!(
                    account = %session.account,
                    chain_id = %session.chain_id,
                    wallet = %session.wallet_label,
                    "wallet connected"
                );
                let connected = session.clone();
                self.state.send_modify(|state| {
                    state.status = ConnectionStatus::Connected;
                    state.session = Some(connected);
                    state.provider = Some(provider);
                    state.pending_network = None;
                    state.loading = false;
                    state.last_error = None;
                });
                Ok(session)
            }
            Err(failure) => {
                warn!(%failure, "wallet connection failed");
                if let Some(label) = rejected_wallet {
                    // Still Connecting here, so no other connect or
                    // disconnect can race this cleanup.
                    if let Err(source) = self.gateway.disconnect(&label).await {
                        warn!(wallet = %label, %source, "releasing rejected wallet failed");
                    }
                }
                let err = SessionError::ConnectFailed(failure);
                let recorded = err.clone();
                self.state.send_modify(|state| {
                    state.status = ConnectionStatus::Disconnected;
                    state.clear_session();
                    state.loading = false;
                    state.last_error = Some(recorded);
                });
                Err(err)
            }
        }
    }

    /// Records the network the switch control should request.
    pub fn select_network(&self, chain_id: ChainId) -> Result<(), SessionError> {
        if !self.networks.iter().any(|n| n.id == chain_id) {
            return Err(SessionError::UnsupportedNetwork(chain_id));
        }

        let mut rejected = false;
        self.state.send_if_modified(|state| {
            if state.status != ConnectionStatus::Connected {
                rejected = true;
                return false;
            }
            let changed = state.pending_network != Some(chain_id);
            state.pending_network = Some(chain_id);
            changed
        });
        if rejected {
            return Err(SessionError::NotConnected);
        }

        debug!(%chain_id, "network selected");
        Ok(())
    }

    /// Drops the pending selection, disabling the switch control.
    pub fn clear_network_selection(&self) {
        self.state.send_if_modified(|state| state.pending_network.take().is_some());
    }

    /// Asks the gateway to move to the pending network.
    ///
    /// The panel does not wait for the wallet to confirm: the pending
    /// selection is cleared once the request succeeds, and the session chain
    /// is only updated by [`Self::sync_from_gateway`].
    pub async fn switch_network(&self) -> Result<ChainId, SessionError> {
        let chain_id = {
            let state = self.state.borrow();
            if state.status != ConnectionStatus::Connected {
                return Err(SessionError::NotConnected);
            }
            state.pending_network.ok_or(SessionError::NoNetworkSelected)?
        };

        info!(%chain_id, "requesting network switch");
        match self.gateway.set_chain(&chain_id.to_hex()).await {
            Ok(()) => {
                self.state.send_if_modified(|state| {
                    // A newer selection made while the request was out stays.
                    if state.pending_network == Some(chain_id) {
                        state.pending_network = None;
                        true
                    } else {
                        false
                    }
                });
                Ok(chain_id)
            }
            Err(source) => {
                warn!(%chain_id, %source, "network switch failed");
                let err = SessionError::SwitchNetworkFailed { chain_id, source };
                let recorded = err.clone();
                // A disconnect that finished meanwhile owns the panel now.
                self.state.send_if_modified(|state| {
                    if state.status != ConnectionStatus::Connected {
                        return false;
                    }
                    state.last_error = Some(recorded);
                    true
                });
                Err(err)
            }
        }
    }

    /// Disconnects the gateway's primary wallet.
    ///
    /// With no primary wallet this is a no-op that makes no gateway call.
    /// Otherwise the local session is cleared whatever the gateway answers;
    /// a gateway failure is still returned and recorded, while success clears
    /// any earlier error.
    pub async fn disconnect(&self) -> Result<DisconnectOutcome, SessionError> {
        let label = match self.gateway.state().primary_wallet() {
            Some(wallet) => wallet.label.clone(),
            None => {
                debug!("no active wallet, nothing to disconnect");
                return Ok(DisconnectOutcome::NoActiveWallet);
            }
        };

        let mut rejected = None;
        self.state.send_if_modified(|state| match state.status {
            ConnectionStatus::Connecting => {
                rejected = Some(SessionError::ConnectInFlight);
                false
            }
            ConnectionStatus::Disconnecting => {
                rejected = Some(SessionError::DisconnectInFlight);
                false
            }
            ConnectionStatus::Connected | ConnectionStatus::Disconnected => {
                state.status = ConnectionStatus::Disconnecting;
                true
            }
        });
        if let Some(err) = rejected {
            debug!(%err, "disconnect request ignored");
            return Err(err);
        }

        info!(wallet = %label, "disconnecting wallet");
        let failure = self
            .gateway
            .disconnect(&label)
            .await
            .err()
            .map(|source| SessionError::DisconnectFailed {
                label: label.clone(),
                source,
            });

        let recorded = failure.clone();
        self.state.send_modify(|state| {
            state.status = ConnectionStatus::Disconnected;
            state.clear_session();
            state.loading = false;
            state.last_error = recorded;
        });

        match failure {
            Some(err) => {
                warn!(%err, "gateway disconnect failed, local session cleared anyway");
                Err(err)
            }
            None => Ok(DisconnectOutcome::Disconnected { label }),
        }
    }

    /// Re-reads the gateway's primary wallet into the session.
    ///
    /// Picks up account or chain changes made in the wallet, such as a
    /// confirmed network switch. A gateway with no wallet ends the session.
    pub fn sync_from_gateway(&self) -> Result<Option<Session>, SessionError> {
        if self.state.borrow().status != ConnectionStatus::Connected {
            return Err(SessionError::NotConnected);
        }

        let gateway_state = self.gateway.state();
        let Some(wallet) = gateway_state.wallets.into_iter().next() else {
            info!("gateway reports no wallet, ending session");
            self.state.send_modify(|state| {
                state.status = ConnectionStatus::Disconnected;
                state.clear_session();
            });
            return Ok(None);
        };

        let (session, provider) = session_from_wallet(wallet).map_err(SessionError::SyncFailed)?;
        let synced = session.clone();
        self.state.send_if_modified(|state| {
            if state.status != ConnectionStatus::Connected || state.session.as_ref() == Some(&synced) {
                return false;
            }
            debug!(account = %synced.account, chain_id = %synced.chain_id, "session synced");
            state.session = Some(synced);
            state.provider = Some(provider);
            true
        });
        Ok(Some(session))
    }
}

fn primary_session<P>(wallets: Vec<ConnectedWallet<P>>) -> Result<(Session, P), ConnectFailure> {
    let wallet = wallets.into_iter().next().ok_or(ConnectFailure::NoWallets)?;
    session_from_wallet(wallet)
}

fn session_from_wallet<P>(wallet: ConnectedWallet<P>) -> Result<(Session, P), ConnectFailure> {
    let ConnectedWallet {
        label,
        accounts,
        chains,
        provider,
    } = wallet;

    let account = accounts
        .into_iter()
        .next()
        .ok_or_else(|| ConnectFailure::NoAccounts(label.clone()))?
        .address;
    if !validate_address(&account).map_err(ConnectFailure::InvalidAccount)? {
        return Err(ConnectFailure::InvalidAccount(EthError::InvalidAddress(
            format!("{account} fails its EIP-55 checksum"),
        )));
    }

    let chain = chains
        .first()
        .ok_or_else(|| ConnectFailure::NoChains(label.clone()))?;
    let chain_id = ChainId::from_hex(&chain.id).map_err(ConnectFailure::InvalidChain)?;

    Ok((
        Session {
            account,
            chain_id,
            wallet_label: label,
        },
        provider,
    ))
}
