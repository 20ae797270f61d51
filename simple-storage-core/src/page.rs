// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The page: user events in, collaborator calls out, completions applied back.

use std::sync::Arc;

use futures::{future::BoxFuture, stream::FuturesUnordered, FutureExt as _, StreamExt as _};
use tracing::{debug, warn};

use crate::{
    connection::ConnectOutcome,
    reader::ReadOutcome,
    view::{self, Action, ViewState},
    writer::WriteOutcome,
    ConnectionState, ContractCaller, ErrorPolicy, Page, PageConfig, RefreshPolicy,
    StorageContract, StorageError, ValueReader, ValueWriter, WalletConnector,
};

/// A user interaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Connect,
    Disconnect,
    Refresh,
    InputChanged(String),
    SetValue,
}

impl Event {
    /// The button producing this event, if any.
    fn action(&self) -> Option<Action> {
        match self {
            Event::Connect => Some(Action::Connect),
            Event::Disconnect => Some(Action::Disconnect),
            Event::Refresh => Some(Action::Refresh),
            Event::SetValue => Some(Action::SetValue),
            Event::InputChanged(_) => None,
        }
    }
}

enum Completion {
    Connected(ConnectOutcome),
    Read(ReadOutcome),
    Written(WriteOutcome),
}

/// The storage page.
///
/// Asynchronous work is queued, not spawned: it only makes progress while the owner
/// awaits [`StoragePage::next_completion`] or [`StoragePage::settle`]. All state is
/// updated by the owner, between two polls.
pub struct StoragePage {
    config: PageConfig,
    connector: Arc<dyn WalletConnector>,
    connection: ConnectionState,
    reader: ValueReader,
    writer: ValueWriter,
    input: String,
    tasks: FuturesUnordered<BoxFuture<'static, Completion>>,
}

impl StoragePage {
    pub fn new(
        config: PageConfig,
        connector: Arc<dyn WalletConnector>,
        caller: Arc<dyn ContractCaller>,
    ) -> Self {
        let contract = StorageContract::new(caller, config.contract_address);
        Self {
            config,
            connector,
            connection: ConnectionState::default(),
            reader: ValueReader::new(contract),
            writer: ValueWriter::default(),
            input: String::new(),
            tasks: FuturesUnordered::new(),
        }
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn connection(&self) -> &ConnectionState {
        &self.connection
    }

    pub fn reader(&self) -> &ValueReader {
        &self.reader
    }

    pub fn writer(&self) -> &ValueWriter {
        &self.writer
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Issues the initial read.
    pub fn mount(&mut self) {
        self.refresh();
    }

    pub fn view(&self) -> Page {
        view::render(&ViewState {
            connection: &self.connection,
            reader: &self.reader,
            writer: &self.writer,
            input: &self.input,
            errors: self.config.errors,
        })
    }

    /// Handles a user event. Clicks on controls the current view disables are ignored.
    pub fn handle(&mut self, event: Event) {
        if let Some(action) = event.action() {
            if !self.view().is_enabled(action) {
                debug!("ignoring {event:?}: control is disabled");
                return;
            }
        }
        match event {
            Event::Connect => self.connect(),
            Event::Disconnect => self.connection.disconnect(),
            Event::Refresh => self.refresh(),
            Event::InputChanged(input) => self.input = input,
            Event::SetValue => self.submit(),
        }
    }

    pub fn has_pending_tasks(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Waits for the next piece of asynchronous work to finish and applies it. Returns
    /// `false` if nothing was queued.
    pub async fn next_completion(&mut self) -> bool {
        match self.tasks.next().await {
            Some(completion) => {
                self.apply(completion);
                true
            }
            None => false,
        }
    }

    /// Runs until all queued work, including work queued meanwhile, has finished.
    pub async fn settle(&mut self) {
        while self.next_completion().await {}
    }

    fn connect(&mut self) {
        let Some(ticket) = self.connection.begin_connect() else {
            return;
        };
        let connector = self.connector.clone();
        let kind = self.config.connector;
        self.tasks.push(
            async move {
                let result = connector.connect(kind).await;
                Completion::Connected(ConnectOutcome { ticket, result })
            }
            .boxed(),
        );
    }

    fn refresh(&mut self) {
        self.tasks
            .push(self.reader.refetch().map(Completion::Read).boxed());
    }

    fn submit(&mut self) {
        match self.writer.submit(self.connection.context(), &self.input) {
            Ok(Some(write)) => {
                self.tasks.push(write.map(Completion::Written).boxed());
                if self.config.clear_input_on_submit {
                    self.input.clear();
                }
            }
            Ok(None) => (),
            Err(error) => self.report("write", Some(error)),
        }
    }

    fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Connected(outcome) => {
                if self
                    .connection
                    .finish_connect(outcome, self.config.contract_address)
                {
                    self.report("connect", self.connection.error().cloned());
                }
            }
            Completion::Read(outcome) => {
                if self.reader.apply(outcome) {
                    self.report("read", self.reader.error().cloned());
                }
            }
            Completion::Written(outcome) => {
                let succeeded = self.writer.apply(outcome);
                if succeeded && self.config.refresh == RefreshPolicy::AfterWrite {
                    self.refresh();
                }
                self.report("write", self.writer.error().cloned());
            }
        }
    }

    fn report(&self, operation: &str, error: Option<StorageError>) {
        let Some(error) = error else {
            return;
        };
        match self.config.errors {
            ErrorPolicy::Display | ErrorPolicy::Log => warn!("{operation} failed: {error}"),
            ErrorPolicy::Silent => debug!("{operation} failed: {error}"),
        }
    }
}
