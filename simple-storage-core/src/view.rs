// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Rendering of the page state into controls.

use std::fmt;

use crate::{ConnectionState, ErrorPolicy, StorageError, ValueReader, ValueWriter};

const PREFIX_LEN: usize = 6;
const SUFFIX_LEN: usize = 4;

/// Shortens an address for display: `0x1234...abcd`. Strings too short to be shortened
/// are returned unchanged.
pub fn shorten_address(address: &str) -> String {
    if !address.is_ascii() || address.len() <= PREFIX_LEN + SUFFIX_LEN {
        return address.to_string();
    }
    format!(
        "{}...{}",
        &address[..PREFIX_LEN],
        &address[address.len() - SUFFIX_LEN..]
    )
}

/// What a button does when clicked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Connect,
    Disconnect,
    Refresh,
    SetValue,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Control {
    Heading(String),
    /// A caption followed by a line of text.
    Field { caption: String, text: String },
    Button {
        action: Action,
        label: String,
        enabled: bool,
        busy: bool,
    },
    Spinner(String),
    /// The stored value, empty while unknown.
    Value(String),
    Input { value: String, placeholder: String },
    Error(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Section {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub controls: Vec<Control>,
}

/// A rendered page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Page {
    pub sections: Vec<Section>,
}

impl Page {
    pub fn controls(&self) -> impl Iterator<Item = &Control> {
        self.sections
            .iter()
            .flat_map(|section| section.controls.iter())
    }

    /// The button triggering `action`, if shown.
    pub fn button(&self, action: Action) -> Option<&Control> {
        self.controls().find(
            |control| matches!(control, Control::Button { action: shown, .. } if *shown == action),
        )
    }

    pub fn is_enabled(&self, action: Action) -> bool {
        matches!(self.button(action), Some(Control::Button { enabled: true, .. }))
    }

    pub fn button_label(&self, action: Action) -> Option<&str> {
        match self.button(action)? {
            Control::Button { label, .. } => Some(label.as_str()),
            _ => None,
        }
    }

    pub fn value_text(&self) -> Option<&str> {
        self.controls().find_map(|control| match control {
            Control::Value(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn spinner(&self) -> Option<&str> {
        self.controls().find_map(|control| match control {
            Control::Spinner(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn field(&self, caption: &str) -> Option<&str> {
        self.controls().find_map(|control| match control {
            Control::Field { caption: shown, text } if shown == caption => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn errors(&self) -> Vec<&str> {
        self.controls()
            .filter_map(|control| match control {
                Control::Error(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Everything the view depends on.
pub struct ViewState<'a> {
    pub connection: &'a ConnectionState,
    pub reader: &'a ValueReader,
    pub writer: &'a ValueWriter,
    pub input: &'a str,
    pub errors: ErrorPolicy,
}

/// Renders the page. Pure: the same state always gives the same page.
pub fn render(state: &ViewState<'_>) -> Page {
    let heading = Section {
        controls: vec![Control::Heading("Blockchain Storage".to_string())],
        ..Section::default()
    };
    Page {
        sections: vec![
            heading,
            connection_section(state),
            value_section(state),
            update_section(state),
        ],
    }
}

fn connection_section(state: &ViewState<'_>) -> Section {
    let connection = state.connection;
    let mut controls = match connection.account() {
        Some(account) => vec![
            Control::Field {
                caption: "Connected Wallet".to_string(),
                text: account.short(),
            },
            Control::Button {
                action: Action::Disconnect,
                label: "Disconnect Wallet".to_string(),
                enabled: true,
                busy: false,
            },
        ],
        None => {
            let connecting = connection.is_connecting();
            vec![Control::Button {
                action: Action::Connect,
                label: if connecting { "Connecting..." } else { "Connect Wallet" }.to_string(),
                enabled: !connecting,
                busy: connecting,
            }]
        }
    };
    controls.extend(error_control(state.errors, connection.error()));
    Section {
        controls,
        ..Section::default()
    }
}

fn value_section(state: &ViewState<'_>) -> Section {
    let reader = state.reader;
    let mut controls = vec![Control::Button {
        action: Action::Refresh,
        label: "Refresh".to_string(),
        enabled: true,
        busy: false,
    }];
    if reader.is_loading() {
        controls.push(Control::Spinner("Loading value...".to_string()));
    } else {
        let text = reader.value().map(|value| value.to_string()).unwrap_or_default();
        controls.push(Control::Value(text));
    }
    controls.extend(error_control(state.errors, reader.error()));
    Section {
        title: Some("On-chain Value".to_string()),
        subtitle: Some("Current stored value".to_string()),
        controls,
    }
}

fn update_section(state: &ViewState<'_>) -> Section {
    let writer = state.writer;
    let pending = writer.is_pending();
    let mut controls = vec![
        Control::Input {
            value: state.input.to_string(),
            placeholder: "Enter new value".to_string(),
        },
        Control::Button {
            action: Action::SetValue,
            label: if pending { "Updating..." } else { "Set Value" }.to_string(),
            enabled: !pending && state.connection.is_connected(),
            busy: pending,
        },
    ];
    controls.extend(error_control(state.errors, writer.error()));
    Section {
        title: Some("Update Contract Value".to_string()),
        controls,
        ..Section::default()
    }
}

fn error_control(policy: ErrorPolicy, error: Option<&StorageError>) -> Option<Control> {
    match (policy, error) {
        (ErrorPolicy::Display, Some(error)) => Some(Control::Error(error.to_string())),
        _ => None,
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, section) in self.sections.iter().enumerate() {
            if index > 0 {
                writeln!(f, "{}", "-".repeat(40))?;
            }
            write!(f, "{section}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(title) = &self.title {
            write!(f, "{}", title.to_uppercase())?;
            if let Some(subtitle) = &self.subtitle {
                write!(f, " ({subtitle})")?;
            }
            writeln!(f)?;
        }
        for control in &self.controls {
            writeln!(f, "{control}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Control::Heading(text) => write!(f, "== {text} =="),
            Control::Field { caption, text } => write!(f, "{caption}: {text}"),
            Control::Button {
                label,
                enabled,
                busy,
                ..
            } => {
                let marker = if *busy { "~ " } else { "" };
                if *enabled {
                    write!(f, "[ {marker}{label} ]")
                } else {
                    write!(f, "( {marker}{label} )")
                }
            }
            Control::Spinner(text) => write!(f, "  ~ {text}"),
            Control::Value(text) if text.is_empty() => write!(f, "  ?"),
            Control::Value(text) => write!(f, "  {text}"),
            Control::Input { value, placeholder } if value.is_empty() => {
                write!(f, "> <{placeholder}>")
            }
            Control::Input { value, .. } => write!(f, "> {value}"),
            Control::Error(message) => write!(f, "! {message}"),
        }
    }
}
