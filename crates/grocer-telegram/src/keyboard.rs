// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion of the transport-agnostic keyboard into Telegram markup.

use grocer_core::Keyboard;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

/// Builds inline markup; each button carries its encoded callback token.
pub fn to_markup(keyboard: &Keyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.rows.iter().map(|row| {
        row.iter()
            .map(|button| InlineKeyboardButton::callback(button.label.clone(), button.token.encode()))
            .collect::<Vec<_>>()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use grocer_core::types::SuggestionAction;
    use grocer_core::{Button, CallbackToken};
    use teloxide::types::InlineKeyboardButtonKind;

    #[test]
    fn rows_and_tokens_are_preserved() {
        let keyboard = Keyboard::new(vec![vec![
            Button::new(
                "Add Milk",
                CallbackToken::suggestion("b1", 0, SuggestionAction::Accept),
            ),
            Button::new("Skip", CallbackToken::suggestion("b1", 0, SuggestionAction::Skip)),
        ]]);

        let markup = to_markup(&keyboard);
        assert_eq!(markup.inline_keyboard.len(), 1);
        let row = &markup.inline_keyboard[0];
        assert_eq!(row.len(), 2);
        assert_eq!(row[0].text, "Add Milk");
        match &row[1].kind {
            InlineKeyboardButtonKind::CallbackData(data) => assert_eq!(data, "r:b1:0"),
            other => panic!("expected callback button, got {other:?}"),
        }
    }

    #[test]
    fn empty_keyboard_has_no_rows() {
        assert!(to_markup(&Keyboard::default()).inline_keyboard.is_empty());
    }
}
