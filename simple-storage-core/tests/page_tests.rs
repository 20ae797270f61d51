// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use alloy_primitives::{Address, Bytes, U256};
use anyhow::anyhow;
use async_trait::async_trait;
use futures::channel::oneshot;
use simple_storage_core::{
    test_utils::MemoryChain, Action, ConnectorKind, ContractCaller, ErrorPolicy, Event,
    PageConfig, RefreshPolicy, StorageError, StoragePage,
};

/// A node answering `getValue` calls only once the test releases each answer.
#[derive(Default)]
struct GatedNode {
    answers: Mutex<VecDeque<oneshot::Receiver<U256>>>,
}

impl GatedNode {
    /// Queues the answer to the next call.
    fn next_answer(&self) -> oneshot::Sender<U256> {
        let (sender, receiver) = oneshot::channel();
        self.answers.lock().unwrap().push_back(receiver);
        sender
    }
}

#[async_trait]
impl ContractCaller for GatedNode {
    async fn call(&self, _to: Address, _calldata: Bytes) -> Result<Bytes, StorageError> {
        let answer = self.answers.lock().unwrap().pop_front();
        let value = answer
            .expect("unexpected call")
            .await
            .map_err(StorageError::transport)?;
        Ok(Bytes::copy_from_slice(&value.to_be_bytes::<32>()))
    }
}

fn page_with(chain: &MemoryChain, config: PageConfig) -> StoragePage {
    StoragePage::new(config, Arc::new(chain.clone()), Arc::new(chain.clone()))
}

fn page(chain: &MemoryChain) -> StoragePage {
    page_with(chain, PageConfig::default())
}

async fn connected_page(chain: &MemoryChain, config: PageConfig) -> StoragePage {
    let mut page = page_with(chain, config);
    page.mount();
    page.handle(Event::Connect);
    page.settle().await;
    assert!(page.connection().is_connected());
    page
}

#[test_log::test(tokio::test)]
async fn mount_reads_the_stored_value() {
    let chain = MemoryChain::with_value(U256::from(42));
    let mut page = page(&chain);
    assert_eq!(page.view().value_text(), Some(""));

    page.mount();
    let view = page.view();
    assert_eq!(view.spinner(), Some("Loading value..."));
    assert_eq!(view.value_text(), None);

    page.settle().await;
    let view = page.view();
    assert_eq!(view.spinner(), None);
    assert_eq!(view.value_text(), Some("42"));
}

#[test_log::test(tokio::test)]
async fn connect_shows_shortened_address() {
    let chain = MemoryChain::default();
    let mut page = page(&chain);
    assert_eq!(page.view().button_label(Action::Connect), Some("Connect Wallet"));

    page.handle(Event::Connect);
    let view = page.view();
    assert_eq!(view.button_label(Action::Connect), Some("Connecting..."));
    assert!(!view.is_enabled(Action::Connect));

    page.settle().await;
    let view = page.view();
    let checksummed = MemoryChain::DEFAULT_ACCOUNT.to_checksum(None);
    let expected = format!("{}...{}", &checksummed[..6], &checksummed[38..]);
    assert_eq!(view.field("Connected Wallet"), Some(expected.as_str()));
    assert!(view.button(Action::Connect).is_none());
    assert!(view.is_enabled(Action::Disconnect));
}

#[test_log::test(tokio::test)]
async fn disconnect_and_reconnect_restore_the_same_account() {
    let chain = MemoryChain::default();
    let mut page = connected_page(&chain, PageConfig::default()).await;
    let shown = page.view().field("Connected Wallet").map(str::to_string);
    assert!(shown.is_some());

    page.handle(Event::Disconnect);
    let view = page.view();
    assert_eq!(view.field("Connected Wallet"), None);
    assert!(view.is_enabled(Action::Connect));
    assert!(!view.is_enabled(Action::SetValue));
    assert_eq!(chain.open_sessions(), 0);

    page.handle(Event::Connect);
    page.settle().await;
    assert_eq!(page.view().field("Connected Wallet").map(str::to_string), shown);
    assert_eq!(chain.connections(), 2);
}

#[test_log::test(tokio::test)]
async fn connection_without_wallet_shows_an_error() {
    let chain = MemoryChain::default();
    chain.set_accounts(Vec::new());
    let mut page = page(&chain);

    page.handle(Event::Connect);
    page.settle().await;
    let view = page.view();
    assert!(view.is_enabled(Action::Connect));
    assert_eq!(
        view.errors(),
        vec!["no wallet available for connector `injected`"]
    );
}

#[test_log::test(tokio::test)]
async fn local_key_connector_is_configurable() -> anyhow::Result<()> {
    let chain = MemoryChain::default();
    let key_account: Address = "0x2222222222222222222222222222222222222222".parse()?;
    chain.set_local_key(Some(key_account));
    let config = PageConfig {
        connector: ConnectorKind::LocalKey,
        ..PageConfig::default()
    };
    let page = connected_page(&chain, config).await;
    assert_eq!(
        page.connection().account().map(|account| account.address),
        Some(key_account)
    );
    Ok(())
}

#[test_log::test(tokio::test)]
async fn set_value_then_manual_refresh() {
    let chain = MemoryChain::with_value(U256::from(42));
    let mut page = connected_page(&chain, PageConfig::default()).await;
    assert_eq!(page.view().value_text(), Some("42"));

    page.handle(Event::InputChanged("100".to_string()));
    page.handle(Event::SetValue);
    let view = page.view();
    assert_eq!(view.button_label(Action::SetValue), Some("Updating..."));
    assert!(!view.is_enabled(Action::SetValue));

    page.settle().await;
    assert_eq!(chain.writes(), vec![(MemoryChain::DEFAULT_ACCOUNT, U256::from(100))]);
    let view = page.view();
    assert_eq!(view.button_label(Action::SetValue), Some("Set Value"));
    // The write does not touch the displayed value.
    assert_eq!(view.value_text(), Some("42"));
    // The input is kept after submission.
    assert_eq!(page.input(), "100");

    page.handle(Event::Refresh);
    page.settle().await;
    assert_eq!(page.view().value_text(), Some("100"));
}

#[test_log::test(tokio::test)]
async fn submitted_values_are_read_back() {
    let chain = MemoryChain::default();
    let mut page = connected_page(&chain, PageConfig::default()).await;
    for value in [U256::ZERO, U256::from(1), U256::from(u64::MAX), U256::MAX] {
        page.handle(Event::InputChanged(value.to_string()));
        page.handle(Event::SetValue);
        page.settle().await;
        page.handle(Event::Refresh);
        page.settle().await;
        assert_eq!(page.reader().value(), Some(value));
    }
}

#[test_log::test(tokio::test)]
async fn refresh_after_write_when_configured() {
    let chain = MemoryChain::with_value(U256::from(1));
    let config = PageConfig {
        refresh: RefreshPolicy::AfterWrite,
        ..PageConfig::default()
    };
    let mut page = connected_page(&chain, config).await;
    let reads = chain.reads();

    page.handle(Event::InputChanged("5".to_string()));
    page.handle(Event::SetValue);
    page.settle().await;
    assert_eq!(chain.reads(), reads + 1);
    assert_eq!(page.view().value_text(), Some("5"));
}

#[test_log::test(tokio::test)]
async fn empty_input_performs_no_write() {
    let chain = MemoryChain::default();
    let mut page = connected_page(&chain, PageConfig::default()).await;

    page.handle(Event::SetValue);
    assert!(!page.has_pending_tasks());
    assert!(!page.writer().is_pending());
    page.settle().await;
    assert!(chain.writes().is_empty());
    assert!(page.view().errors().is_empty());
}

#[test_log::test(tokio::test)]
async fn set_value_is_disabled_while_disconnected() {
    let chain = MemoryChain::default();
    let mut page = page(&chain);

    page.handle(Event::InputChanged("7".to_string()));
    page.handle(Event::SetValue);
    assert!(!page.has_pending_tasks());
    assert!(chain.writes().is_empty());
}

#[test_log::test(tokio::test)]
async fn submit_is_ignored_while_a_write_is_pending() {
    let chain = MemoryChain::default();
    let mut page = connected_page(&chain, PageConfig::default()).await;

    page.handle(Event::InputChanged("1".to_string()));
    page.handle(Event::SetValue);
    page.handle(Event::InputChanged("2".to_string()));
    page.handle(Event::SetValue);
    page.settle().await;
    assert_eq!(chain.writes(), vec![(MemoryChain::DEFAULT_ACCOUNT, U256::from(1))]);
}

#[test_log::test(tokio::test)]
async fn input_is_cleared_when_configured() {
    let chain = MemoryChain::default();
    let config = PageConfig {
        clear_input_on_submit: true,
        ..PageConfig::default()
    };
    let mut page = connected_page(&chain, config).await;

    page.handle(Event::InputChanged("9".to_string()));
    page.handle(Event::SetValue);
    assert_eq!(page.input(), "");
    page.settle().await;
    assert_eq!(chain.value(), U256::from(9));
}

#[test_log::test(tokio::test)]
async fn invalid_input_is_displayed() {
    let chain = MemoryChain::default();
    let mut page = connected_page(&chain, PageConfig::default()).await;

    page.handle(Event::InputChanged("twelve".to_string()));
    page.handle(Event::SetValue);
    assert!(!page.has_pending_tasks());
    let errors = page.view().errors().join("\n");
    assert!(errors.starts_with("invalid value `twelve`"), "{errors}");
}

#[test_log::test(tokio::test)]
async fn errors_follow_the_configured_policy() {
    for (policy, shown) in [
        (ErrorPolicy::Display, true),
        (ErrorPolicy::Log, false),
        (ErrorPolicy::Silent, false),
    ] {
        let chain = MemoryChain::default();
        chain.fail_reads(true);
        let config = PageConfig {
            errors: policy,
            ..PageConfig::default()
        };
        let mut page = page_with(&chain, config);
        page.mount();
        page.settle().await;

        assert!(page.reader().error().is_some());
        assert!(!page.reader().is_loading());
        assert_eq!(page.view().value_text(), Some(""));
        assert_eq!(!page.view().errors().is_empty(), shown, "{policy:?}");
    }
}

#[test_log::test(tokio::test)]
async fn failed_write_is_displayed_and_value_kept() {
    let chain = MemoryChain::with_value(U256::from(3));
    let mut page = connected_page(&chain, PageConfig::default()).await;
    chain.fail_writes(true);

    page.handle(Event::InputChanged("4".to_string()));
    page.handle(Event::SetValue);
    page.settle().await;
    let view = page.view();
    assert_eq!(view.value_text(), Some("3"));
    assert!(view.is_enabled(Action::SetValue));
    assert_eq!(
        view.errors(),
        vec!["transaction failed: insufficient funds for gas"]
    );
}

#[test_log::test(tokio::test)]
async fn older_refresh_completing_last_is_discarded() -> anyhow::Result<()> {
    let node = Arc::new(GatedNode::default());
    let mut page = StoragePage::new(
        PageConfig::default(),
        Arc::new(MemoryChain::default()),
        node.clone(),
    );
    let older = node.next_answer();
    let newer = node.next_answer();

    page.handle(Event::Refresh);
    page.handle(Event::Refresh);
    assert!(page.view().spinner().is_some());

    newer
        .send(U256::from(9))
        .map_err(|_| anyhow!("newer read was dropped"))?;
    assert!(page.next_completion().await);
    assert!(!page.reader().is_loading());
    assert_eq!(page.view().value_text(), Some("9"));

    older
        .send(U256::from(8))
        .map_err(|_| anyhow!("older read was dropped"))?;
    assert!(page.next_completion().await);
    assert!(!page.has_pending_tasks());
    assert_eq!(page.view().value_text(), Some("9"));
    Ok(())
}

#[test_log::test(tokio::test)]
async fn rendered_page_lists_all_controls() {
    let chain = MemoryChain::with_value(U256::from(42));
    let mut page = page(&chain);
    page.mount();
    page.settle().await;

    let text = page.view().to_string();
    assert!(text.contains("== Blockchain Storage =="));
    assert!(text.contains("[ Connect Wallet ]"));
    assert!(text.contains("ON-CHAIN VALUE (Current stored value)"));
    assert!(text.contains("  42"));
    assert!(text.contains("> <Enter new value>"));
    assert!(text.contains("( Set Value )"));
}
