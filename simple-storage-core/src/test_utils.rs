// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! An in-memory chain holding one storage contract, acting both as wallet and as node.

use std::sync::{Arc, Mutex, MutexGuard};

use alloy_primitives::{address, keccak256, Address, Bytes, TxHash, U256};
use alloy_sol_types::SolInterface as _;
use async_trait::async_trait;

use crate::{
    abi::{SimpleStorage::SimpleStorageCalls, DEFAULT_CONTRACT_ADDRESS},
    ConnectorKind, ContractCaller, StorageError, WalletConnector, WalletSession,
};

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct MemoryChainError(&'static str);

#[derive(Debug)]
struct ChainState {
    contract: Address,
    value: U256,
    accounts: Vec<Address>,
    local_key: Option<Address>,
    reject_connections: bool,
    fail_reads: bool,
    fail_writes: bool,
    open_sessions: usize,
    connections: usize,
    reads: usize,
    writes: Vec<(Address, U256)>,
}

/// A chain with a single storage contract and a wallet with one account.
///
/// Clones share the same state.
#[derive(Clone, Debug)]
pub struct MemoryChain {
    state: Arc<Mutex<ChainState>>,
}

impl Default for MemoryChain {
    fn default() -> Self {
        Self::with_value(U256::ZERO)
    }
}

impl MemoryChain {
    /// The account the injected wallet connects with.
    pub const DEFAULT_ACCOUNT: Address = address!("abcd00000000000000000000000000000000f234");
    /// The owner of the contract.
    pub const OWNER: Address = address!("1111111111111111111111111111111111111111");

    pub fn with_value(value: U256) -> Self {
        let state = ChainState {
            contract: DEFAULT_CONTRACT_ADDRESS,
            value,
            accounts: vec![Self::DEFAULT_ACCOUNT],
            local_key: None,
            reject_connections: false,
            fail_reads: false,
            fail_writes: false,
            open_sessions: 0,
            connections: 0,
            reads: 0,
            writes: Vec::new(),
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn state(&self) -> MutexGuard<'_, ChainState> {
        self.state.lock().expect("memory chain lock poisoned")
    }

    pub fn value(&self) -> U256 {
        self.state().value
    }

    /// Changes the stored value, as another user of the contract would.
    pub fn set_value(&self, value: U256) {
        self.state().value = value;
    }

    /// Sets the accounts exposed to the injected connector. No accounts means no wallet.
    pub fn set_accounts(&self, accounts: Vec<Address>) {
        self.state().accounts = accounts;
    }

    /// Makes the local-key connector available with the given account.
    pub fn set_local_key(&self, account: Option<Address>) {
        self.state().local_key = account;
    }

    pub fn reject_connections(&self, reject: bool) {
        self.state().reject_connections = reject;
    }

    pub fn fail_reads(&self, fail: bool) {
        self.state().fail_reads = fail;
    }

    pub fn fail_writes(&self, fail: bool) {
        self.state().fail_writes = fail;
    }

    pub fn open_sessions(&self) -> usize {
        self.state().open_sessions
    }

    /// The number of successful connection requests.
    pub fn connections(&self) -> usize {
        self.state().connections
    }

    /// The number of `getValue` calls served.
    pub fn reads(&self) -> usize {
        self.state().reads
    }

    /// The confirmed writes, as sender and value.
    pub fn writes(&self) -> Vec<(Address, U256)> {
        self.state().writes.clone()
    }
}

#[async_trait]
impl ContractCaller for MemoryChain {
    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes, StorageError> {
        let mut state = self.state();
        if state.fail_reads {
            return Err(StorageError::transport(MemoryChainError("node unreachable")));
        }
        if to != state.contract {
            // Calls to accounts without code return nothing.
            return Ok(Bytes::new());
        }
        match SimpleStorageCalls::abi_decode(&calldata) {
            Ok(SimpleStorageCalls::getValue(_)) => {
                state.reads += 1;
                Ok(Bytes::copy_from_slice(&state.value.to_be_bytes::<32>()))
            }
            Ok(SimpleStorageCalls::owner(_)) => {
                Ok(Bytes::copy_from_slice(Self::OWNER.into_word().as_slice()))
            }
            Ok(SimpleStorageCalls::setValue(_)) | Err(_) => {
                Err(StorageError::transport(MemoryChainError("execution reverted")))
            }
        }
    }
}

#[async_trait]
impl WalletConnector for MemoryChain {
    async fn connect(&self, kind: ConnectorKind) -> Result<Arc<dyn WalletSession>, StorageError> {
        let mut state = self.state();
        let address = match kind {
            ConnectorKind::Injected => state.accounts.first().copied(),
            ConnectorKind::LocalKey => state.local_key,
        }
        .ok_or(StorageError::NoWallet(kind))?;
        if state.reject_connections {
            return Err(StorageError::Rejected("user rejected the request".to_string()));
        }
        state.connections += 1;
        state.open_sessions += 1;
        Ok(Arc::new(MemorySession {
            chain: self.clone(),
            address,
        }))
    }
}

/// A wallet session on a [`MemoryChain`].
pub struct MemorySession {
    chain: MemoryChain,
    address: Address,
}

#[async_trait]
impl WalletSession for MemorySession {
    fn address(&self) -> Address {
        self.address
    }

    async fn send_transaction(
        &self,
        to: Address,
        calldata: Bytes,
    ) -> Result<TxHash, StorageError> {
        let mut state = self.chain.state();
        if state.fail_writes {
            return Err(StorageError::transaction(MemoryChainError(
                "insufficient funds for gas",
            )));
        }
        let value = match SimpleStorageCalls::abi_decode(&calldata) {
            Ok(SimpleStorageCalls::setValue(call)) if to == state.contract => call._value,
            _ => {
                return Err(StorageError::transaction(MemoryChainError(
                    "execution reverted",
                )))
            }
        };
        state.value = value;
        state.writes.push((self.address, value));
        let nonce = state.writes.len() as u64;
        Ok(keccak256([self.address.as_slice(), &nonce.to_be_bytes()[..]].concat()))
    }

    fn close(&self) {
        self.chain.state().open_sessions -= 1;
    }
}
