// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Paginated multi-select pickers for the Grocer list bot.
//!
//! A picker is a persisted [`SelectionSession`](grocer_core::SelectionSession)
//! addressed by callback tokens. [`SessionManager`] loads, mutates and
//! finalizes sessions; [`render`] turns one into a keyboard page.

pub mod manager;
pub mod render;

pub use manager::{FinalizeReport, PickerOutcome, SessionManager};
pub use render::{RenderedPicker, header, render};
