//! Wallet session: connected account, current chain, and network switching.

use std::sync::Arc;

use alloy::primitives::Address;
use serde::Serialize;
use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::config::NetworkConfig;
use crate::observability::metrics;
use crate::wallet::provider::WalletProvider;
use crate::wallet::types::{ChainId, ProviderEvent, WalletError, WalletResult};

/// Notice shown when the user declines to connect.
pub const CONNECT_DECLINED_NOTICE: &str = "Please connect your wallet to continue";

/// Locally tracked session state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    pub address: Option<Address>,
    pub chain_id: Option<ChainId>,
}

impl Session {
    pub fn is_connected(&self) -> bool {
        self.address.is_some()
    }

    /// Whether the wallet currently sits on `target`.
    pub fn is_target_chain(&self, target: ChainId) -> bool {
        self.chain_id == Some(target)
    }

    /// Reconcile a provider notification in place.
    pub fn apply(&mut self, event: &ProviderEvent) {
        match event {
            ProviderEvent::AccountsChanged(accounts) => match accounts.first() {
                Some(first) => self.address = Some(*first),
                None => self.clear(),
            },
            ProviderEvent::ChainChanged(chain_id) => self.chain_id = Some(*chain_id),
        }
    }

    pub fn clear(&mut self) {
        self.address = None;
        self.chain_id = None;
    }
}

/// How a `connect()` call ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ConnectOutcome {
    Connected {
        address: Address,
        chain_id: ChainId,
        /// A network switch was requested during the connect.
        switched: bool,
    },
    /// The user cancelled; the session is unchanged.
    Declined { notice: String },
}

/// Tracks the connected account and chain, and drives network switches.
pub struct SessionManager<P: WalletProvider + ?Sized> {
    provider: Arc<P>,
    network: NetworkConfig,
    session: Session,
    events: broadcast::Receiver<ProviderEvent>,
    connecting: bool,
}

impl<P: WalletProvider + ?Sized> SessionManager<P> {
    /// Create a manager and subscribe to the provider's notifications.
    pub fn new(provider: Arc<P>, network: NetworkConfig) -> Self {
        let events = provider.subscribe();
        Self {
            provider,
            network,
            session: Session::default(),
            events,
            connecting: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    pub fn target_chain(&self) -> ChainId {
        self.network.chain()
    }

    pub fn is_connecting(&self) -> bool {
        self.connecting
    }

    /// Whether the session is connected and on the target network.
    pub fn is_ready(&self) -> bool {
        self.session.is_connected() && self.session.is_target_chain(self.target_chain())
    }

    /// Pick up an existing authorisation without prompting.
    ///
    /// Errors are logged and leave the session empty.
    pub async fn restore(&mut self) -> &Session {
        let accounts = match self.provider.accounts().await {
            Ok(accounts) => accounts,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to check existing wallet authorisation");
                return &self.session;
            }
        };

        let Some(address) = accounts.first().copied() else {
            return &self.session;
        };

        match self.provider.chain_id().await {
            Ok(chain_id) => {
                self.drain_events();
                self.session.address = Some(address);
                self.session.chain_id = Some(ChainId(chain_id));
                tracing::info!(address = %address, chain_id, "Restored wallet session");
            }
            Err(e) => tracing::warn!(error = %e, "Failed to read chain ID while restoring session"),
        }
        &self.session
    }

    /// Request account access and make sure the wallet is on the target network.
    ///
    /// A user cancellation is reported as [`ConnectOutcome::Declined`], not an error.
    /// Unless the outcome is `Connected`, the session is left as it was and
    /// notifications raised during the attempt are discarded.
    pub async fn connect(&mut self) -> WalletResult<ConnectOutcome> {
        self.sync_events();
        self.connecting = true;
        let result = self.connect_inner().await;
        self.connecting = false;

        let result = match result {
            Err(WalletError::Provider(e)) if e.is_user_rejection() => {
                tracing::info!("User declined the wallet connection");
                Ok(self.declined())
            }
            other => other,
        };
        if !matches!(result, Ok(ConnectOutcome::Connected { .. })) {
            self.drain_events();
        }
        result
    }

    async fn connect_inner(&mut self) -> WalletResult<ConnectOutcome> {
        let accounts = self.provider.request_accounts().await?;
        let Some(address) = accounts.first().copied() else {
            return Ok(self.declined());
        };

        let mut chain_id = ChainId(self.provider.chain_id().await?);
        let switched = chain_id != self.target_chain();
        if switched {
            tracing::info!(
                current = %chain_id,
                target = %self.target_chain(),
                "Wallet on a different network, requesting switch"
            );
            self.switch_to_target_network().await?;
            chain_id = ChainId(self.provider.chain_id().await?);
        }

        // Our own connect triggered these; the values read above are newer.
        self.drain_events();
        self.session.address = Some(address);
        self.session.chain_id = Some(chain_id);

        tracing::info!(address = %address, chain_id = %chain_id, "Wallet connected");
        Ok(ConnectOutcome::Connected {
            address,
            chain_id,
            switched,
        })
    }

    fn declined(&self) -> ConnectOutcome {
        ConnectOutcome::Declined {
            notice: CONNECT_DECLINED_NOTICE.to_string(),
        }
    }

    /// Switch to the target network, adding it to the wallet if unknown.
    pub async fn switch_to_target_network(&mut self) -> WalletResult<()> {
        let hex_chain_id = self.network.hex_chain_id();

        match self.provider.switch_chain(&hex_chain_id).await {
            Ok(()) => metrics::record_network_switch("switched"),
            Err(e) if e.is_unrecognized_chain() => {
                tracing::info!(
                    chain_id = %hex_chain_id,
                    chain_name = %self.network.chain_name,
                    "Wallet does not know the target network, adding it"
                );
                let params = self.network.add_chain_params();
                if let Err(source) = self.provider.add_chain(&params).await {
                    metrics::record_network_switch("add_failed");
                    return Err(WalletError::AddNetwork {
                        chain_name: self.network.chain_name.clone(),
                        source,
                    });
                }
                metrics::record_network_switch("added");
            }
            Err(e) => {
                metrics::record_network_switch("failed");
                return Err(e.into());
            }
        }

        if self.session.is_connected() {
            let chain_id = ChainId(self.provider.chain_id().await?);
            self.drain_events();
            self.session.chain_id = Some(chain_id);
        }
        Ok(())
    }

    /// Forget the local session. Provider-level permission is untouched.
    pub fn disconnect(&mut self) {
        self.drain_events();
        self.session.clear();
        tracing::info!("Wallet session cleared");
    }

    /// Apply every pending provider notification. Returns how many were applied.
    pub fn sync_events(&mut self) -> usize {
        let mut applied = 0;
        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    tracing::debug!(?event, "Provider notification");
                    self.session.apply(&event);
                    applied += 1;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Missed provider notifications");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        applied
    }

    fn drain_events(&mut self) {
        while !matches!(
            self.events.try_recv(),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed)
        ) {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn test_accounts_changed_updates_or_clears() {
        let mut session = Session {
            address: Some(address!("00000000000000000000000000000000000000aa")),
            chain_id: Some(ChainId(14601)),
        };

        let next = address!("00000000000000000000000000000000000000bb");
        session.apply(&ProviderEvent::AccountsChanged(vec![next]));
        assert_eq!(session.address, Some(next));
        assert_eq!(session.chain_id, Some(ChainId(14601)));

        session.apply(&ProviderEvent::AccountsChanged(Vec::new()));
        assert_eq!(session, Session::default());
    }

    #[test]
    fn test_chain_changed_in_place() {
        let mut session = Session {
            address: Some(Address::ZERO),
            chain_id: Some(ChainId(1)),
        };
        session.apply(&ProviderEvent::ChainChanged(ChainId(14601)));
        assert!(session.is_target_chain(ChainId(14601)));
        assert!(session.is_connected());
    }
}
