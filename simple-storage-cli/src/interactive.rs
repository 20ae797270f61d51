// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The storage page driven from a line-oriented terminal.

use simple_storage_core::{Event, StoragePage};
use tokio::io::{AsyncBufRead, AsyncBufReadExt as _, AsyncWrite, AsyncWriteExt as _};
use tracing::debug;

const HELP: &str = "\
commands:
  connect          connect a wallet
  disconnect       forget the connected wallet
  refresh          read the stored value again
  input <text>     replace the pending input
  set [value]      submit the pending input, or the given value
  wait             wait for all requests in flight
  show             print the page
  help             print this message
  quit             leave
";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Events(Vec<Event>),
    Wait,
    Show,
    Help,
    Quit,
}

/// Parses one input line. Blank lines give `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let command = match word {
        "" => return Ok(None),
        "connect" => Command::Events(vec![Event::Connect]),
        "disconnect" => Command::Events(vec![Event::Disconnect]),
        "refresh" => Command::Events(vec![Event::Refresh]),
        "input" => Command::Events(vec![Event::InputChanged(rest.to_string())]),
        "set" if rest.is_empty() => Command::Events(vec![Event::SetValue]),
        "set" => Command::Events(vec![
            Event::InputChanged(rest.to_string()),
            Event::SetValue,
        ]),
        "wait" => Command::Wait,
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command `{other}`, try `help`")),
    };
    Ok(Some(command))
}

/// Runs `page` until `quit` or the end of `input`. The page is printed after every
/// command and every completed request.
///
/// At the end of `input`, requests still in flight are awaited first.
pub async fn run<R, W>(mut page: StoragePage, input: R, mut output: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    page.mount();
    print_page(&page, &mut output).await?;
    let mut lines = input.lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    page.settle().await;
                    print_page(&page, &mut output).await?;
                    break;
                };
                match parse_command(&line) {
                    Ok(None) => continue,
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(Command::Help)) => {
                        output.write_all(HELP.as_bytes()).await?;
                        output.flush().await?;
                        continue;
                    }
                    Ok(Some(Command::Show)) => (),
                    Ok(Some(Command::Wait)) => page.settle().await,
                    Ok(Some(Command::Events(events))) => {
                        for event in events {
                            page.handle(event);
                        }
                    }
                    Err(message) => {
                        output.write_all(format!("{message}\n").as_bytes()).await?;
                        output.flush().await?;
                        continue;
                    }
                }
                print_page(&page, &mut output).await?;
            }
            true = page.next_completion(), if page.has_pending_tasks() => {
                print_page(&page, &mut output).await?;
            }
        }
    }
    debug!("leaving the page");
    Ok(())
}

async fn print_page<W>(page: &StoragePage, output: &mut W) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(format!("{}\n", page.view()).as_bytes()).await?;
    output.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use alloy_primitives::U256;
    use simple_storage_core::{test_utils::MemoryChain, Account, PageConfig};

    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command("   "), Ok(None));
        assert_eq!(
            parse_command("connect"),
            Ok(Some(Command::Events(vec![Event::Connect])))
        );
        assert_eq!(
            parse_command("input  12 "),
            Ok(Some(Command::Events(vec![Event::InputChanged("12".into())])))
        );
        assert_eq!(
            parse_command("input"),
            Ok(Some(Command::Events(vec![Event::InputChanged(String::new())])))
        );
        assert_eq!(
            parse_command("set"),
            Ok(Some(Command::Events(vec![Event::SetValue])))
        );
        assert_eq!(
            parse_command("set 7"),
            Ok(Some(Command::Events(vec![
                Event::InputChanged("7".into()),
                Event::SetValue
            ])))
        );
        assert_eq!(parse_command("quit"), Ok(Some(Command::Quit)));
        assert!(parse_command("fly").is_err());
    }

    #[test_log::test(tokio::test)]
    async fn scripted_session_updates_the_value() -> anyhow::Result<()> {
        let chain = MemoryChain::with_value(U256::from(42));
        let page = StoragePage::new(
            PageConfig::default(),
            Arc::new(chain.clone()),
            Arc::new(chain.clone()),
        );
        let script = "connect\nwait\nset 100\nwait\nrefresh\nwait\nbogus\nquit\nrefresh\n";
        let mut output = Vec::new();
        run(page, script.as_bytes(), &mut output).await?;

        let output = String::from_utf8(output)?;
        let account = Account {
            address: MemoryChain::DEFAULT_ACCOUNT,
        };
        assert!(output.contains(&format!("Connected Wallet: {}", account.short())));
        assert!(output.contains("  42\n"));
        assert!(output.contains("  100\n"));
        assert!(output.contains("unknown command `bogus`"));
        assert_eq!(chain.value(), U256::from(100));
        assert_eq!(chain.reads(), 2);
        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn end_of_input_finishes_pending_work() -> anyhow::Result<()> {
        let chain = MemoryChain::with_value(U256::from(5));
        let page = StoragePage::new(
            PageConfig::default(),
            Arc::new(chain.clone()),
            Arc::new(chain.clone()),
        );
        let mut output = Vec::new();
        run(page, &b""[..], &mut output).await?;

        let output = String::from_utf8(output)?;
        assert!(output.contains("Loading value..."));
        assert!(output.contains("  5\n"));
        assert_eq!(chain.reads(), 1);
        Ok(())
    }
}
