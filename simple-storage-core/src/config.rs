// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::{abi::DEFAULT_CONTRACT_ADDRESS, ConnectorKind};

/// Whether a confirmed write triggers a new read.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum RefreshPolicy {
    /// The user refreshes the value explicitly.
    #[default]
    Manual,
    /// The value is read again once a write is confirmed.
    AfterWrite,
}

/// How failures of the connect, read and write operations are surfaced.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Show the error in the page, and log it.
    #[default]
    Display,
    /// Log the error only.
    Log,
    /// Only record the error at debug level.
    Silent,
}

/// The configuration of a [`crate::StoragePage`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub contract_address: Address,
    pub connector: ConnectorKind,
    pub refresh: RefreshPolicy,
    pub errors: ErrorPolicy,
    pub clear_input_on_submit: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            contract_address: DEFAULT_CONTRACT_ADDRESS,
            connector: ConnectorKind::default(),
            refresh: RefreshPolicy::default(),
            errors: ErrorPolicy::default(),
            clear_input_on_submit: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_uses_defaults() {
        let config: PageConfig = serde_json::from_str(r#"{ "refresh": "after-write" }"#).unwrap();
        assert_eq!(config.refresh, RefreshPolicy::AfterWrite);
        assert_eq!(config.contract_address, DEFAULT_CONTRACT_ADDRESS);
        assert_eq!(config.errors, ErrorPolicy::Display);
        assert!(!config.clear_input_on_submit);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = PageConfig {
            connector: ConnectorKind::LocalKey,
            errors: ErrorPolicy::Silent,
            clear_input_on_submit: true,
            ..PageConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""connector":"local-key""#));
        assert_eq!(serde_json::from_str::<PageConfig>(&json).unwrap(), config);
    }
}
