// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! A state holder for a repeatable asynchronous query.

use crate::StorageError;

/// Identifies one run of a query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct QueryTicket(u64);

/// The last known result of a query, whether a run is in flight, and the error of the
/// last run if it failed.
///
/// Runs are tickets: starting a run supersedes all earlier ones, and only the outcome of
/// the latest run is applied.
#[derive(Clone, Debug)]
pub struct QueryState<T> {
    value: Option<T>,
    is_loading: bool,
    error: Option<StorageError>,
    latest: u64,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            value: None,
            is_loading: false,
            error: None,
            latest: 0,
        }
    }
}

impl<T> QueryState<T> {
    /// The result of the last successful run, if any.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&StorageError> {
        self.error.as_ref()
    }

    pub fn start(&mut self) -> QueryTicket {
        self.latest += 1;
        self.is_loading = true;
        QueryTicket(self.latest)
    }

    /// Applies the outcome of a run. Returns `false`, leaving the state untouched, if
    /// the run has been superseded.
    ///
    /// A failure keeps the previous value.
    pub fn resolve(&mut self, ticket: QueryTicket, result: Result<T, StorageError>) -> bool {
        if ticket != QueryTicket(self.latest) {
            return false;
        }
        self.is_loading = false;
        match result {
            Ok(value) => {
                self.value = Some(value);
                self.error = None;
            }
            Err(error) => self.error = Some(error),
        }
        true
    }
}
