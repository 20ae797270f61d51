// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use alloy::{
    providers::PendingTransactionError, signers::local::LocalSignerError,
    transports::TransportError,
};
use simple_storage_core::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EthereumServiceError {
    /// RPC error
    #[error(transparent)]
    RpcError(#[from] TransportError),

    /// The transaction was sent but could not be confirmed
    #[error(transparent)]
    PendingTransactionError(#[from] PendingTransactionError),

    /// Private key parsing error
    #[error(transparent)]
    SignerError(#[from] LocalSignerError),

    /// URL parsing error
    #[error(transparent)]
    UrlParseError(#[from] url::ParseError),

    /// The node does not manage any account
    #[error("the node exposes no accounts")]
    NoAccounts,

    /// The transaction was mined but reverted
    #[error("transaction {0} reverted")]
    Reverted(alloy::primitives::TxHash),
}

impl EthereumServiceError {
    /// Converts a failure of a read or of a connection request.
    pub fn into_transport(self) -> StorageError {
        StorageError::transport(self)
    }

    /// Converts a failure of a transaction.
    pub fn into_transaction(self) -> StorageError {
        StorageError::transaction(self)
    }
}
