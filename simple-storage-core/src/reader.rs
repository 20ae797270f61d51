// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::{future::Future, sync::Arc};

use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::{
    abi,
    query::{QueryState, QueryTicket},
    StorageError,
};

/// Executes read-only calls against deployed contracts.
#[async_trait]
pub trait ContractCaller: Send + Sync {
    /// Runs `calldata` against the contract at `to` without creating a transaction, and
    /// returns the raw return data.
    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes, StorageError>;
}

/// Typed read access to the storage contract.
#[derive(Clone)]
pub struct StorageContract {
    caller: Arc<dyn ContractCaller>,
    address: Address,
}

impl StorageContract {
    pub fn new(caller: Arc<dyn ContractCaller>, address: Address) -> Self {
        Self { caller, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    #[instrument(level = "debug", skip(self), fields(contract = %self.address))]
    pub async fn get_value(&self) -> Result<U256, StorageError> {
        let data = self
            .caller
            .call(self.address, abi::get_value_calldata())
            .await?;
        abi::decode_value(&data)
    }

    #[instrument(level = "debug", skip(self), fields(contract = %self.address))]
    pub async fn owner(&self) -> Result<Address, StorageError> {
        let data = self.caller.call(self.address, abi::owner_calldata()).await?;
        abi::decode_owner(&data)
    }
}

/// The result of one read, to be applied with [`ValueReader::apply`].
#[derive(Debug)]
pub struct ReadOutcome {
    pub ticket: QueryTicket,
    pub result: Result<U256, StorageError>,
}

/// Mirrors the value stored in the contract.
pub struct ValueReader {
    contract: StorageContract,
    state: QueryState<U256>,
}

impl ValueReader {
    pub fn new(contract: StorageContract) -> Self {
        Self {
            contract,
            state: QueryState::default(),
        }
    }

    /// The value of the last successful read, if any.
    pub fn value(&self) -> Option<U256> {
        self.state.value().copied()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error(&self) -> Option<&StorageError> {
        self.state.error()
    }

    /// Starts a new read, superseding any read in flight. The returned future performs
    /// the call; nothing happens until it is polled.
    pub fn refetch(&mut self) -> impl Future<Output = ReadOutcome> + Send + 'static {
        let ticket = self.state.start();
        debug!("reading stored value ({ticket:?})");
        let contract = self.contract.clone();
        async move {
            let result = contract.get_value().await;
            ReadOutcome { ticket, result }
        }
    }

    /// Applies the outcome of a read. Returns `false` for superseded reads.
    pub fn apply(&mut self, outcome: ReadOutcome) -> bool {
        let ReadOutcome { ticket, result } = outcome;
        let applied = self.state.resolve(ticket, result);
        if !applied {
            debug!("discarding superseded read {ticket:?}");
        }
        applied
    }
}
