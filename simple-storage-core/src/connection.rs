// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The wallet connection: which account is active, and the collaborator traits through
//! which a wallet is reached.

use std::{fmt, sync::Arc};

use alloy_primitives::{Address, Bytes, TxHash};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{context::ChainContext, view::shorten_address, StorageError};

/// How to reach a wallet.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectorKind {
    /// The accounts exposed by the provider itself.
    #[default]
    Injected,
    /// A private key held by the client.
    LocalKey,
}

impl fmt::Display for ConnectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectorKind::Injected => write!(f, "injected"),
            ConnectorKind::LocalKey => write!(f, "local-key"),
        }
    }
}

/// Negotiates access to a wallet.
#[async_trait]
pub trait WalletConnector: Send + Sync {
    /// Requests authorization from the wallet. This may stay pending while the user
    /// approves the request elsewhere.
    async fn connect(&self, kind: ConnectorKind) -> Result<Arc<dyn WalletSession>, StorageError>;
}

/// An authorized wallet account able to sign and broadcast transactions.
#[async_trait]
pub trait WalletSession: Send + Sync {
    fn address(&self) -> Address;

    /// Signs and broadcasts a call to `to`, and waits for it to be confirmed.
    async fn send_transaction(&self, to: Address, calldata: Bytes)
        -> Result<TxHash, StorageError>;

    /// Releases the session. Called once, on disconnect.
    fn close(&self) {}
}

/// A connected wallet account.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Account {
    pub address: Address,
}

impl Account {
    /// The EIP-55 form of the address.
    pub fn checksummed(&self) -> String {
        self.address.to_checksum(None)
    }

    /// The address as displayed: `0xAbCd...1234`.
    pub fn short(&self) -> String {
        shorten_address(&self.checksummed())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum WalletState {
    #[default]
    Disconnected,
    Connecting,
    Connected(Account),
}

/// Identifies one connection attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConnectTicket(u64);

/// The result of a connection attempt, to be applied with [`ConnectionState::finish_connect`].
pub struct ConnectOutcome {
    pub ticket: ConnectTicket,
    pub result: Result<Arc<dyn WalletSession>, StorageError>,
}

/// Tracks the wallet connection and owns the [`ChainContext`] while connected.
#[derive(Default)]
pub struct ConnectionState {
    state: WalletState,
    context: Option<ChainContext>,
    error: Option<StorageError>,
    attempts: u64,
}

impl ConnectionState {
    pub fn state(&self) -> &WalletState {
        &self.state
    }

    pub fn account(&self) -> Option<&Account> {
        match &self.state {
            WalletState::Connected(account) => Some(account),
            _ => None,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state, WalletState::Connected(_))
    }

    pub fn is_connecting(&self) -> bool {
        matches!(self.state, WalletState::Connecting)
    }

    pub fn error(&self) -> Option<&StorageError> {
        self.error.as_ref()
    }

    /// The chain access of the current session, if connected.
    pub fn context(&self) -> Option<&ChainContext> {
        self.context.as_ref()
    }

    /// Starts a connection attempt. Returns `None` if one is already running or a wallet
    /// is already connected.
    pub fn begin_connect(&mut self) -> Option<ConnectTicket> {
        if self.state != WalletState::Disconnected {
            debug!("ignoring connection request while {:?}", self.state);
            return None;
        }
        self.attempts += 1;
        self.state = WalletState::Connecting;
        self.error = None;
        Some(ConnectTicket(self.attempts))
    }

    /// Applies the result of a connection attempt. Attempts invalidated by a disconnect
    /// are dropped, closing the session they may have opened.
    ///
    /// Returns whether the outcome was applied.
    pub fn finish_connect(&mut self, outcome: ConnectOutcome, contract: Address) -> bool {
        let ConnectOutcome { ticket, result } = outcome;
        if ticket != ConnectTicket(self.attempts) || !self.is_connecting() {
            debug!("discarding outdated connection attempt {ticket:?}");
            if let Ok(session) = result {
                session.close();
            }
            return false;
        }
        match result {
            Ok(session) => {
                let account = Account {
                    address: session.address(),
                };
                info!("wallet connected as {}", account.checksummed());
                self.context = Some(ChainContext::new(session, contract));
                self.state = WalletState::Connected(account);
                self.error = None;
            }
            Err(error) => {
                self.state = WalletState::Disconnected;
                self.error = Some(error);
            }
        }
        true
    }

    /// Clears the active account immediately and tears down the chain context.
    pub fn disconnect(&mut self) {
        // Invalidates any attempt still in flight.
        self.attempts += 1;
        if let Some(context) = self.context.take() {
            info!("disconnecting wallet {}", context.account().checksummed());
            context.close();
        }
        self.state = WalletState::Disconnected;
        self.error = None;
    }
}
