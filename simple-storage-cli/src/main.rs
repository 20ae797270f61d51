// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

#![deny(clippy::large_futures)]

mod client_options;
mod interactive;
mod logging;

use std::{fmt::Display, future::Future, process, sync::Arc};

use alloy_primitives::U256;
use anyhow::Context as _;
use simple_storage_core::{
    writer::parse_input, ChainContext, PageConfig, StorageContract, StoragePage, WalletConnector,
    WalletSession as _,
};
use simple_storage_ethereum::{EthereumClient, EthereumConnector};
use tracing::{error, info, warn, Instrument as _};

use crate::client_options::{ClientCommand, ClientOptions};

async fn run(options: &ClientOptions) -> anyhow::Result<()> {
    let config = options.page_config()?;
    let client = EthereumClient::new(&options.rpc_url)?;
    let mut connector = EthereumConnector::new(&options.rpc_url)?;
    if let Some(private_key) = &options.private_key {
        connector = connector.with_private_key(private_key)?;
    }

    match options.command() {
        ClientCommand::Interactive => {
            let page = StoragePage::new(config, Arc::new(connector), Arc::new(client));
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            interactive::run(page, input, tokio::io::stdout()).await
        }

        ClientCommand::Get => {
            let contract = StorageContract::new(Arc::new(client.clone()), config.contract_address);
            let value = read_value(&contract, client.get_block_number()).await?;
            println!("{value}");
            Ok(())
        }

        ClientCommand::Owner => {
            let contract = StorageContract::new(Arc::new(client), config.contract_address);
            let owner = contract.owner().await?;
            println!("{}", owner.to_checksum(None));
            Ok(())
        }

        ClientCommand::Set { value } => set_value(&config, &connector, &value).await,
    }
}

/// Reads the stored value. The block number is only logged: failing to fetch it is not
/// an error.
async fn read_value<E: Display>(
    contract: &StorageContract,
    block_number: impl Future<Output = Result<u64, E>>,
) -> anyhow::Result<U256> {
    let value = contract.get_value().await?;
    match block_number.await {
        Ok(block) => info!("read {} at block {block}", contract.address()),
        Err(error) => warn!("read {} at an unknown block: {error}", contract.address()),
    }
    Ok(value)
}

async fn set_value(
    config: &PageConfig,
    connector: &EthereumConnector,
    input: &str,
) -> anyhow::Result<()> {
    let value = parse_input(input)?.context("no value to write")?;
    let session = connector.connect(config.connector).await?;
    let context = ChainContext::new(session.clone(), config.contract_address);
    let result = context.set_value(value).await;
    session.close();
    let hash = result?;
    info!("{} set the value to {value}", context.account().short());
    println!("{hash}");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let options = ClientOptions::init();
    logging::init("simple-storage");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let span = tracing::info_span!("simple_storage::main");
    let result = runtime.block_on(run(&options).instrument(span));

    let error_code = match result {
        Ok(()) => 0,
        Err(msg) => {
            error!("Error is {:?}", msg);
            2
        }
    };
    process::exit(error_code);
}
