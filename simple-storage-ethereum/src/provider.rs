// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use alloy::{
    primitives::{Address, Bytes},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::eth::request::{TransactionInput, TransactionRequest},
};
use async_trait::async_trait;
use simple_storage_core::{ContractCaller, StorageError};
use tracing::instrument;
use url::Url;

use crate::common::EthereumServiceError;

/// The Ethereum endpoint and its provider used for reading contracts.
#[derive(Clone)]
pub struct EthereumClient {
    pub url: Url,
    pub provider: DynProvider,
}

impl EthereumClient {
    /// Creates an `EthereumClient` for the node at `url`. No request is made until the
    /// first call.
    pub fn new(url: &str) -> Result<Self, EthereumServiceError> {
        let url = Url::parse(url)?;
        let provider = ProviderBuilder::new().connect_http(url.clone()).erased();
        Ok(Self { url, provider })
    }

    pub async fn get_block_number(&self) -> Result<u64, EthereumServiceError> {
        Ok(self.provider.get_block_number().await?)
    }

    /// Runs `calldata` against `contract_address` with `eth_call`.
    pub async fn non_executive_call(
        &self,
        contract_address: Address,
        data: Bytes,
    ) -> Result<Bytes, EthereumServiceError> {
        let input = TransactionInput::new(data);
        let tx = TransactionRequest::default()
            .to(contract_address)
            .input(input);
        Ok(self.provider.call(tx).await?)
    }
}

#[async_trait]
impl ContractCaller for EthereumClient {
    #[instrument(level = "debug", skip(self, calldata), fields(url = %self.url))]
    async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes, StorageError> {
        self.non_executive_call(to, calldata)
            .await
            .map_err(EthereumServiceError::into_transport)
    }
}
