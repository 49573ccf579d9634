// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport-agnostic inline keyboard model.

use crate::token::CallbackToken;

/// One inline button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub token: CallbackToken,
}

impl Button {
    pub fn new(label: impl Into<String>, token: CallbackToken) -> Self {
        Self {
            label: label.into(),
            token,
        }
    }
}

/// Rows of inline buttons, top to bottom.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    pub fn new(rows: Vec<Vec<Button>>) -> Self {
        Self { rows }
    }

    /// Total number of buttons across all rows.
    pub fn button_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }
}
