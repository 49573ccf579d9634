// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Callback tokens carried by inline keyboard buttons.
//!
//! On the wire a token is a short colon-delimited string,
//! `code:entity_id[:number]`, well under Telegram's 64-byte callback limit.
//! Inside the crate it is always the [`CallbackToken`] enum; every string
//! that does not match one of the shapes below is rejected with
//! [`GrocerError::InvalidToken`].
//!
//! | code | meaning | number |
//! |---|---|---|
//! | `a` / `r` | accept / skip a suggestion | item index |
//! | `ri` / `rmi` | toggle a recipe / remove picker row | item index |
//! | `rp` / `rmp` | go to page | page |
//! | `ra` / `rma` | select all | - |
//! | `rc` / `rmc` | clear all | - |
//! | `rs` / `rms` | finalize | - |

use std::fmt;
use std::str::FromStr;

use crate::error::GrocerError;
use crate::types::{SessionKind, SuggestionAction};

/// An operation on a selection session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerOp {
    Toggle(usize),
    Page(usize),
    SelectAll,
    ClearAll,
    Finalize,
}

/// A parsed button token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackToken {
    /// Accept or skip one entry of a suggestion batch.
    Suggestion {
        batch_id: String,
        index: usize,
        action: SuggestionAction,
    },
    /// Mutate a recipe or remove picker.
    Picker {
        kind: SessionKind,
        session_id: String,
        op: PickerOp,
    },
}

/// Shape of a code: what it decodes to and whether it carries a number.
enum Shape {
    Suggestion(SuggestionAction),
    Picker(SessionKind, OpShape),
}

#[derive(Clone, Copy)]
enum OpShape {
    Toggle,
    Page,
    SelectAll,
    ClearAll,
    Finalize,
}

impl OpShape {
    fn takes_number(self) -> bool {
        matches!(self, OpShape::Toggle | OpShape::Page)
    }
}

fn shape_of(code: &str) -> Option<Shape> {
    use OpShape::*;
    use SessionKind::{Recipe, Remove};

    let shape = match code {
        "a" => Shape::Suggestion(SuggestionAction::Accept),
        "r" => Shape::Suggestion(SuggestionAction::Skip),
        "ri" => Shape::Picker(Recipe, Toggle),
        "rp" => Shape::Picker(Recipe, Page),
        "ra" => Shape::Picker(Recipe, SelectAll),
        "rc" => Shape::Picker(Recipe, ClearAll),
        "rs" => Shape::Picker(Recipe, Finalize),
        "rmi" => Shape::Picker(Remove, Toggle),
        "rmp" => Shape::Picker(Remove, Page),
        "rma" => Shape::Picker(Remove, SelectAll),
        "rmc" => Shape::Picker(Remove, ClearAll),
        "rms" => Shape::Picker(Remove, Finalize),
        _ => return None,
    };
    Some(shape)
}

fn picker_code(kind: SessionKind, op: &PickerOp) -> &'static str {
    match (kind, op) {
        (SessionKind::Recipe, PickerOp::Toggle(_)) => "ri",
        (SessionKind::Recipe, PickerOp::Page(_)) => "rp",
        (SessionKind::Recipe, PickerOp::SelectAll) => "ra",
        (SessionKind::Recipe, PickerOp::ClearAll) => "rc",
        (SessionKind::Recipe, PickerOp::Finalize) => "rs",
        (SessionKind::Remove, PickerOp::Toggle(_)) => "rmi",
        (SessionKind::Remove, PickerOp::Page(_)) => "rmp",
        (SessionKind::Remove, PickerOp::SelectAll) => "rma",
        (SessionKind::Remove, PickerOp::ClearAll) => "rmc",
        (SessionKind::Remove, PickerOp::Finalize) => "rms",
    }
}

impl CallbackToken {
    /// Builds a picker token.
    pub fn picker(kind: SessionKind, session_id: impl Into<String>, op: PickerOp) -> Self {
        CallbackToken::Picker {
            kind,
            session_id: session_id.into(),
            op,
        }
    }

    /// Builds a suggestion token.
    pub fn suggestion(batch_id: impl Into<String>, index: usize, action: SuggestionAction) -> Self {
        CallbackToken::Suggestion {
            batch_id: batch_id.into(),
            index,
            action,
        }
    }

    /// Encodes the token into its wire form.
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CallbackToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackToken::Suggestion {
                batch_id,
                index,
                action,
            } => {
                let code = match action {
                    SuggestionAction::Accept => "a",
                    SuggestionAction::Skip => "r",
                };
                write!(f, "{code}:{batch_id}:{index}")
            }
            CallbackToken::Picker {
                kind,
                session_id,
                op,
            } => {
                let code = picker_code(*kind, op);
                match op {
                    PickerOp::Toggle(n) | PickerOp::Page(n) => {
                        write!(f, "{code}:{session_id}:{n}")
                    }
                    _ => write!(f, "{code}:{session_id}"),
                }
            }
        }
    }
}

impl FromStr for CallbackToken {
    type Err = GrocerError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let invalid = |why: &str| GrocerError::InvalidToken(format!("{why}: {data:?}"));

        let parts: Vec<&str> = data.split(':').collect();
        let shape = shape_of(parts[0]).ok_or_else(|| invalid("unknown action code"))?;

        let takes_number = match &shape {
            Shape::Suggestion(_) => true,
            Shape::Picker(_, op) => op.takes_number(),
        };
        let expected = if takes_number { 3 } else { 2 };
        if parts.len() != expected {
            return Err(invalid("wrong segment count"));
        }

        let id = parts[1];
        if id.is_empty() {
            return Err(invalid("empty entity id"));
        }

        let number = if takes_number {
            Some(
                parts[2]
                    .parse::<usize>()
                    .map_err(|_| invalid("index is not a non-negative integer"))?,
            )
        } else {
            None
        };

        let token = match shape {
            Shape::Suggestion(action) => CallbackToken::Suggestion {
                batch_id: id.to_string(),
                index: number.unwrap_or_default(),
                action,
            },
            Shape::Picker(kind, op) => {
                let n = number.unwrap_or_default();
                let op = match op {
                    OpShape::Toggle => PickerOp::Toggle(n),
                    OpShape::Page => PickerOp::Page(n),
                    OpShape::SelectAll => PickerOp::SelectAll,
                    OpShape::ClearAll => PickerOp::ClearAll,
                    OpShape::Finalize => PickerOp::Finalize,
                };
                CallbackToken::Picker {
                    kind,
                    session_id: id.to_string(),
                    op,
                }
            }
        };
        Ok(token)
    }
}
