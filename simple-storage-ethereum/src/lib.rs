// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! This module provides access to the storage contract through an Ethereum node.

pub mod common;
pub mod provider;
pub mod wallet;

pub use crate::{
    common::EthereumServiceError,
    provider::EthereumClient,
    wallet::{EthereumConnector, EthereumSession},
};
