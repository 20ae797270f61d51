// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Wallet access through an Ethereum node: either the accounts the node manages, or a
//! private key held by the client.

use std::{str::FromStr as _, sync::Arc};

use alloy::{
    network::{EthereumWallet, ReceiptResponse as _},
    primitives::{Address, Bytes, TxHash},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::eth::request::{TransactionInput, TransactionRequest},
    signers::local::PrivateKeySigner,
};
use async_trait::async_trait;
use simple_storage_core::{ConnectorKind, StorageError, WalletConnector, WalletSession};
use tracing::{debug, info, instrument};
use url::Url;

use crate::common::EthereumServiceError;

/// Connects to the wallets reachable through the node at `url`.
#[derive(Clone)]
pub struct EthereumConnector {
    url: Url,
    signer: Option<PrivateKeySigner>,
}

impl EthereumConnector {
    pub fn new(url: &str) -> Result<Self, EthereumServiceError> {
        Ok(Self {
            url: Url::parse(url)?,
            signer: None,
        })
    }

    /// Enables the local-key connector with the given hex-encoded private key.
    pub fn with_private_key(mut self, private_key: &str) -> Result<Self, EthereumServiceError> {
        self.signer = Some(PrivateKeySigner::from_str(private_key.trim())?);
        Ok(self)
    }

    /// The account of the local key, if one is configured.
    pub fn local_address(&self) -> Option<Address> {
        self.signer.as_ref().map(|signer| signer.address())
    }

    async fn connect_injected(&self) -> Result<EthereumSession, EthereumServiceError> {
        let provider = ProviderBuilder::new()
            .connect_http(self.url.clone())
            .erased();
        let accounts = provider.get_accounts().await?;
        let address = *accounts.first().ok_or(EthereumServiceError::NoAccounts)?;
        debug!("node manages {} accounts", accounts.len());
        Ok(EthereumSession { address, provider })
    }

    fn connect_local_key(&self, signer: PrivateKeySigner) -> EthereumSession {
        let address = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(self.url.clone())
            .erased();
        EthereumSession { address, provider }
    }
}

#[async_trait]
impl WalletConnector for EthereumConnector {
    #[instrument(level = "debug", skip(self), fields(url = %self.url))]
    async fn connect(&self, kind: ConnectorKind) -> Result<Arc<dyn WalletSession>, StorageError> {
        let session = match kind {
            ConnectorKind::Injected => match self.connect_injected().await {
                Ok(session) => session,
                Err(EthereumServiceError::NoAccounts) => return Err(StorageError::NoWallet(kind)),
                Err(error) => return Err(error.into_transport()),
            },
            ConnectorKind::LocalKey => {
                let signer = self.signer.clone().ok_or(StorageError::NoWallet(kind))?;
                self.connect_local_key(signer)
            }
        };
        info!("connected {kind} wallet {}", session.address);
        Ok(Arc::new(session))
    }
}

/// An account able to send transactions through a node.
pub struct EthereumSession {
    address: Address,
    provider: DynProvider,
}

impl EthereumSession {
    async fn send(&self, to: Address, data: Bytes) -> Result<TxHash, EthereumServiceError> {
        let tx = TransactionRequest::default()
            .from(self.address)
            .to(to)
            .input(TransactionInput::new(data));
        let pending = self.provider.send_transaction(tx).await?;
        debug!("transaction {} broadcast", pending.tx_hash());
        let receipt = pending.get_receipt().await?;
        if !receipt.status() {
            return Err(EthereumServiceError::Reverted(receipt.transaction_hash()));
        }
        Ok(receipt.transaction_hash())
    }
}

#[async_trait]
impl WalletSession for EthereumSession {
    fn address(&self) -> Address {
        self.address
    }

    #[instrument(level = "debug", skip(self, calldata), fields(from = %self.address))]
    async fn send_transaction(
        &self,
        to: Address,
        calldata: Bytes,
    ) -> Result<TxHash, StorageError> {
        self.send(to, calldata)
            .await
            .map_err(EthereumServiceError::into_transaction)
    }

    fn close(&self) {
        debug!("closing session of {}", self.address);
    }
}
