// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use crate::connection::ConnectorKind;

/// The errors of the three asynchronous operations of the page: connecting, reading and
/// writing.
///
/// Errors are kept in the view state, hence the `Clone` bound and the `Arc` around
/// collaborator errors.
#[derive(Clone, Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("no wallet available for connector `{0}`")]
    NoWallet(ConnectorKind),
    #[error("connection request rejected: {0}")]
    Rejected(String),
    #[error("wallet is not connected")]
    NotConnected,
    #[error("invalid value `{input}`: {reason}")]
    InvalidInput { input: String, reason: String },
    #[error("malformed contract response: {0}")]
    MalformedResponse(String),
    #[error("transport error: {0}")]
    Transport(#[source] Arc<dyn std::error::Error + Send + Sync>),
    #[error("transaction failed: {0}")]
    Transaction(#[source] Arc<dyn std::error::Error + Send + Sync>),
}

impl StorageError {
    /// Wraps an error raised while talking to the node.
    pub fn transport(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        StorageError::Transport(Arc::new(error))
    }

    /// Wraps an error raised while sending or confirming a transaction.
    pub fn transaction(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        StorageError::Transaction(Arc::new(error))
    }
}
