// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use alloy_primitives::Address;
use simple_storage_core::{ConnectorKind, ErrorPolicy, PageConfig, RefreshPolicy};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("invalid configuration file: {0}")]
    Config(#[from] serde_json::Error),
}

#[derive(Clone, Debug, clap::Parser)]
#[command(
    name = "simple-storage",
    version,
    about = "Reads and updates the value held by a simple storage contract"
)]
pub struct ClientOptions {
    /// The JSON-RPC endpoint of the Ethereum node.
    #[arg(long, env = "SIMPLE_STORAGE_RPC_URL", default_value = "http://127.0.0.1:8545")]
    pub rpc_url: String,

    /// The address of the storage contract.
    #[arg(long = "contract", env = "SIMPLE_STORAGE_CONTRACT")]
    pub contract_address: Option<Address>,

    /// A hex-encoded private key enabling the `local-key` connector.
    #[arg(long, env = "SIMPLE_STORAGE_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// How to reach a wallet.
    #[arg(long)]
    pub connector: Option<ConnectorKind>,

    /// Whether a confirmed write refreshes the displayed value.
    #[arg(long)]
    pub refresh: Option<RefreshPolicy>,

    /// How failures are surfaced.
    #[arg(long)]
    pub errors: Option<ErrorPolicy>,

    /// Clear the input after submitting it.
    #[arg(long)]
    pub clear_input: bool,

    /// A JSON file with the page configuration. Command line flags take precedence.
    #[arg(long = "config")]
    pub config_path: Option<PathBuf>,

    /// Subcommand. Defaults to `interactive`.
    #[command(subcommand)]
    pub command: Option<ClientCommand>,
}

#[derive(Clone, Debug, clap::Subcommand)]
pub enum ClientCommand {
    /// Run the storage page in the terminal.
    Interactive,

    /// Print the stored value.
    Get,

    /// Print the owner of the contract.
    Owner,

    /// Connect a wallet and write a new value.
    Set {
        /// The new value, in decimal.
        value: String,
    },
}

impl ClientOptions {
    pub fn init() -> Self {
        <ClientOptions as clap::Parser>::parse()
    }

    pub fn command(&self) -> ClientCommand {
        self.command.clone().unwrap_or(ClientCommand::Interactive)
    }

    /// The configuration file, if any, overridden by the command line.
    pub fn page_config(&self) -> Result<PageConfig, Error> {
        let mut config = match &self.config_path {
            Some(path) => serde_json::from_str(&fs_err::read_to_string(path)?)?,
            None => PageConfig::default(),
        };
        if let Some(contract_address) = self.contract_address {
            config.contract_address = contract_address;
        }
        if let Some(connector) = self.connector {
            config.connector = connector;
        }
        if let Some(refresh) = self.refresh {
            config.refresh = refresh;
        }
        if let Some(errors) = self.errors {
            config.errors = errors;
        }
        if self.clear_input {
            config.clear_input_on_submit = true;
        }
        Ok(config)
    }
}
