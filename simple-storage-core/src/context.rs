// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use alloy_primitives::{Address, TxHash, U256};
use tracing::instrument;

use crate::{abi, connection::WalletSession, Account, StorageError};

/// Chain access on behalf of a connected account.
///
/// Created when a wallet connects and closed when it disconnects; everything that sends
/// transactions receives it explicitly.
#[derive(Clone)]
pub struct ChainContext {
    session: Arc<dyn WalletSession>,
    contract: Address,
}

impl ChainContext {
    pub fn new(session: Arc<dyn WalletSession>, contract: Address) -> Self {
        Self { session, contract }
    }

    pub fn account(&self) -> Account {
        Account {
            address: self.session.address(),
        }
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    /// Calls `setValue(value)` on the contract and waits for the transaction to be
    /// confirmed.
    #[instrument(level = "debug", skip(self), fields(contract = %self.contract))]
    pub async fn set_value(&self, value: U256) -> Result<TxHash, StorageError> {
        self.session
            .send_transaction(self.contract, abi::set_value_calldata(value))
            .await
    }

    pub(crate) fn close(&self) {
        self.session.close();
    }
}
