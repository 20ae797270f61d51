// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::future::Future;

use alloy_primitives::{TxHash, U256};
use tracing::{debug, info};

use crate::{ChainContext, StorageError};

/// The result of one write, to be applied with [`ValueWriter::apply`].
#[derive(Debug)]
pub struct WriteOutcome {
    pub value: U256,
    pub result: Result<TxHash, StorageError>,
}

/// Parses the user's input. Empty input is `None`: there is nothing to submit.
pub fn parse_input(input: &str) -> Result<Option<U256>, StorageError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    U256::from_str_radix(input, 10)
        .map(Some)
        .map_err(|error| StorageError::InvalidInput {
            input: input.to_string(),
            reason: error.to_string(),
        })
}

/// Submits new values to the contract.
#[derive(Debug, Default)]
pub struct ValueWriter {
    in_flight: usize,
    pending: Option<U256>,
    last_transaction: Option<TxHash>,
    error: Option<StorageError>,
}

impl ValueWriter {
    /// Whether any dispatched write has neither confirmed nor failed yet.
    pub fn is_pending(&self) -> bool {
        self.in_flight > 0
    }

    /// The last value submitted, while a write is pending.
    pub fn pending_value(&self) -> Option<U256> {
        self.pending
    }

    /// The hash of the last confirmed write.
    pub fn last_transaction(&self) -> Option<TxHash> {
        self.last_transaction
    }

    pub fn error(&self) -> Option<&StorageError> {
        self.error.as_ref()
    }

    /// Parses `input` and dispatches `setValue` through `context`.
    ///
    /// Returns `Ok(None)` for empty input: nothing is dispatched and nothing changes.
    /// Rejected submissions are also recorded as the writer's error. A pending write
    /// does not prevent a new one.
    pub fn submit(
        &mut self,
        context: Option<&ChainContext>,
        input: &str,
    ) -> Result<Option<impl Future<Output = WriteOutcome> + Send + 'static>, StorageError> {
        let (value, context) = match Self::check(context, input) {
            Ok(Some(checked)) => checked,
            Ok(None) => {
                debug!("ignoring submission of an empty value");
                return Ok(None);
            }
            Err(error) => {
                self.error = Some(error.clone());
                return Err(error);
            }
        };
        info!("submitting new value {value}");
        self.in_flight += 1;
        self.pending = Some(value);
        self.error = None;
        Ok(Some(async move {
            let result = context.set_value(value).await;
            WriteOutcome { value, result }
        }))
    }

    fn check(
        context: Option<&ChainContext>,
        input: &str,
    ) -> Result<Option<(U256, ChainContext)>, StorageError> {
        let Some(value) = parse_input(input)? else {
            return Ok(None);
        };
        let context = context.ok_or(StorageError::NotConnected)?;
        Ok(Some((value, context.clone())))
    }

    /// Applies the outcome of a write. Returns whether it succeeded.
    pub fn apply(&mut self, outcome: WriteOutcome) -> bool {
        let WriteOutcome { value, result } = outcome;
        self.in_flight = self.in_flight.saturating_sub(1);
        if self.in_flight == 0 {
            self.pending = None;
        }
        match result {
            Ok(hash) => {
                info!("value {value} written in transaction {hash}");
                self.last_transaction = Some(hash);
                self.error = None;
                true
            }
            Err(error) => {
                self.error = Some(error);
                false
            }
        }
    }
}
