// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyboard and header for a picker page.

use grocer_core::selection::SessionPayload;
use grocer_core::types::SessionKind;
use grocer_core::{Button, CallbackToken, Keyboard, PAGE_SIZE, PickerOp, SelectionSession};

const SELECTED_PREFIX: &str = "✓ ";

/// A picker page ready to send or edit in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPicker {
    pub keyboard: Keyboard,
    /// Zero-based page shown.
    pub page: usize,
    pub total_pages: usize,
    pub selected_count: usize,
}

fn finalize_label(kind: SessionKind) -> &'static str {
    match kind {
        SessionKind::Recipe => "Save to list",
        SessionKind::Remove => "Remove selected",
    }
}

/// Renders the session's current page.
///
/// Rows, top to bottom: up to [`PAGE_SIZE`] entries, `Prev`/`Next` when
/// either applies, `Select all`/`Clear all`, then the finalize button.
pub fn render(session: &SelectionSession) -> RenderedPicker {
    let kind = session.kind();
    let total_pages = session.total_pages();
    let page = session.page.min(total_pages - 1);
    let token = |op| CallbackToken::picker(kind, &session.id, op);

    let start = page * PAGE_SIZE;
    let end = (start + PAGE_SIZE).min(session.len());
    let mut rows: Vec<Vec<Button>> = (start..end)
        .map(|index| {
            let label = session.label(index).unwrap_or_default();
            let prefix = if session.selected.contains(&index) {
                SELECTED_PREFIX
            } else {
                ""
            };
            vec![Button::new(
                format!("{prefix}{label}"),
                token(PickerOp::Toggle(index)),
            )]
        })
        .collect();

    let mut nav = Vec::new();
    if page > 0 {
        nav.push(Button::new("Prev", token(PickerOp::Page(page - 1))));
    }
    if page + 1 < total_pages {
        nav.push(Button::new("Next", token(PickerOp::Page(page + 1))));
    }
    if !nav.is_empty() {
        rows.push(nav);
    }

    rows.push(vec![
        Button::new("Select all", token(PickerOp::SelectAll)),
        Button::new("Clear all", token(PickerOp::ClearAll)),
    ]);
    rows.push(vec![Button::new(
        finalize_label(kind),
        token(PickerOp::Finalize),
    )]);

    RenderedPicker {
        keyboard: Keyboard::new(rows),
        page,
        total_pages,
        selected_count: session.selected.len(),
    }
}

/// Message text shown above the picker keyboard. Pages count from 1.
pub fn header(session: &SelectionSession, rendered: &RenderedPicker) -> String {
    let position = format!(
        "page {}/{}, selected {}",
        rendered.page + 1,
        rendered.total_pages,
        rendered.selected_count
    );
    match &session.payload {
        SessionPayload::Recipe { title, .. } => format!("Ingredients for {title} ({position}):"),
        SessionPayload::Remove { .. } => format!("Select items to remove ({position}):"),
    }
}
