// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The interface of the deployed storage contract.

use alloy_primitives::{address, Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};

use crate::StorageError;

sol! {
    /// A contract holding a single `uint256`, readable by anyone and writable through
    /// `setValue`.
    interface SimpleStorage {
        event OwnerSet(address indexed owner);
        event ValueUpdated(uint256 newValue);

        function getValue() external view returns (uint256);
        function owner() external view returns (address);
        function setValue(uint256 _value) external;
    }
}

/// The deployed instance the page talks to unless configured otherwise.
pub const DEFAULT_CONTRACT_ADDRESS: Address = address!("f07826135b10ae7eade5ad6876bd1765ed62a6bd");

pub fn get_value_calldata() -> Bytes {
    SimpleStorage::getValueCall {}.abi_encode().into()
}

pub fn owner_calldata() -> Bytes {
    SimpleStorage::ownerCall {}.abi_encode().into()
}

pub fn set_value_calldata(value: U256) -> Bytes {
    SimpleStorage::setValueCall { _value: value }
        .abi_encode()
        .into()
}

/// Decodes the return data of `getValue()`.
pub fn decode_value(data: &[u8]) -> Result<U256, StorageError> {
    SimpleStorage::getValueCall::abi_decode_returns_validate(data).map_err(malformed)
}

/// Decodes the return data of `owner()`.
pub fn decode_owner(data: &[u8]) -> Result<Address, StorageError> {
    SimpleStorage::ownerCall::abi_decode_returns_validate(data).map_err(malformed)
}

fn malformed(error: alloy_sol_types::Error) -> StorageError {
    StorageError::MalformedResponse(error.to_string())
}
