// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# `simple-storage-core`

The state behind the simple storage client page: the wallet connection, the last value
read from the contract, the pending write, and a view rendering the three.

The wallet and the chain are reached through the [`WalletConnector`] and
[`ContractCaller`] traits. `simple-storage-ethereum` implements them on top of `alloy`;
the `test` feature provides an in-memory chain in [`test_utils`].
*/

pub mod abi;
pub mod config;
pub mod connection;
pub mod context;
mod error;
pub mod page;
pub mod query;
pub mod reader;
pub mod view;
pub mod writer;

/// Helper types for tests.
#[cfg(any(test, feature = "test"))]
pub mod test_utils;

pub use crate::{
    config::{ErrorPolicy, PageConfig, RefreshPolicy},
    connection::{Account, ConnectionState, ConnectorKind, WalletConnector, WalletSession},
    context::ChainContext,
    error::StorageError,
    page::{Event, StoragePage},
    reader::{ContractCaller, StorageContract, ValueReader},
    view::{Action, Control, Page},
    writer::ValueWriter,
};
