// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing texts and the mapping of callback failures to alerts.

use grocer_core::GrocerError;
use grocer_core::types::SessionKind;

pub const START: &str =
    "Ready. Use /add <item> to add groceries, /list to see your list, and /suggest for weekly proposals.";
pub const RESTRICTED: &str = "Sorry, this bot is restricted to the admin chat.";
pub const NOT_AUTHORIZED: &str = "Not authorized.";
pub const ADD_USAGE: &str = "Usage: /add <item>";
pub const REMOVEALL_USAGE: &str = "Usage: /removeall <item>";
pub const RECIPE_USAGE: &str = "Usage: /recipe <url>";
pub const LIST_EMPTY: &str = "Your list is empty.";
pub const LIST_HEADER: &str = "Your grocery list:";
pub const ITEM_NOT_FOUND: &str = "Item not found in your list.";
pub const CLEARED: &str = "Cleared your grocery list.";
pub const NO_SUGGESTIONS: &str = "No suggestions yet. Add items over time and I’ll learn.";
pub const RECIPE_UNREADABLE: &str = "I couldn't read that recipe URL. Try another one.";
pub const RECIPE_NO_INGREDIENTS: &str = "No ingredients found on that page.";
pub const UNKNOWN_COMMAND: &str = "Unknown command. Try /help to see available commands.";
pub const ALREADY_RECORDED: &str = "Already recorded.";

pub const HELP: &str = "Available commands:\n\
/add <item> — add an item\n\
/remove — select items to remove\n\
/remove <item> — remove a specific item\n\
/removeall <item> — remove all of a specific item\n\
/clear — clear the whole list\n\
/list — show the current list\n\
/suggest — get weekly suggestions now\n\
/recipe <url> — import ingredients from a recipe URL\n\
/help — show this help";

/// What a button press was aimed at, for choosing failure wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackScope {
    /// The token could not be read at all.
    Unparsed,
    Suggestion,
    Picker(SessionKind),
}

/// How a failed button press is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReply {
    /// Answer the press with a modal alert.
    Alert(&'static str),
    /// Answer silently and post a message in the chat.
    Message(&'static str),
}

/// Maps a callback failure to what the user sees.
pub fn callback_failure(scope: CallbackScope, error: &GrocerError) -> FailureReply {
    use CallbackScope::*;
    use FailureReply::*;

    match (error, scope) {
        (GrocerError::InvalidToken(_), _) => Alert("Invalid action."),
        (GrocerError::InvalidSession(_), Suggestion) => Alert("Invalid batch."),
        (GrocerError::InvalidSession(_), _) => Alert("Invalid session."),
        (GrocerError::Expired, Suggestion) => Alert("Suggestion batch expired."),
        (GrocerError::Expired, _) => Alert("Session expired."),
        (GrocerError::InvalidIndex { .. }, _) => Alert("Invalid item."),
        (GrocerError::InvalidPage { .. }, _) => Alert("Invalid page."),
        (GrocerError::NothingSelected, Picker(SessionKind::Remove)) => Message("No items selected."),
        (GrocerError::NothingSelected, _) => Message("No ingredients selected."),
        _ => Alert("Something went wrong. Please try again."),
    }
}

/// `Your grocery list:` followed by one `- item` line per entry.
pub fn format_list<'a>(display_names: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let lines: Vec<String> = display_names
        .into_iter()
        .map(|name| format!("- {name}"))
        .collect();
    if lines.is_empty() {
        return None;
    }
    Some(format!("{LIST_HEADER}\n{}", lines.join("\n")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestion_failures_use_batch_wording() {
        assert_eq!(
            callback_failure(CallbackScope::Suggestion, &GrocerError::Expired),
            FailureReply::Alert("Suggestion batch expired.")
        );
        assert_eq!(
            callback_failure(
                CallbackScope::Suggestion,
                &GrocerError::InvalidSession("x".into())
            ),
            FailureReply::Alert("Invalid batch.")
        );
    }

    #[test]
    fn picker_failures_use_session_wording() {
        let scope = CallbackScope::Picker(SessionKind::Recipe);
        assert_eq!(
            callback_failure(scope, &GrocerError::Expired),
            FailureReply::Alert("Session expired.")
        );
        assert_eq!(
            callback_failure(scope, &GrocerError::InvalidPage { page: 3, total_pages: 1 }),
            FailureReply::Alert("Invalid page.")
        );
        assert_eq!(
            callback_failure(scope, &GrocerError::NothingSelected),
            FailureReply::Message("No ingredients selected.")
        );
        assert_eq!(
            callback_failure(CallbackScope::Picker(SessionKind::Remove), &GrocerError::NothingSelected),
            FailureReply::Message("No items selected.")
        );
    }

    #[test]
    fn unreadable_tokens_and_internal_errors() {
        assert_eq!(
            callback_failure(CallbackScope::Unparsed, &GrocerError::InvalidToken("zz".into())),
            FailureReply::Alert("Invalid action.")
        );
        assert!(matches!(
            callback_failure(CallbackScope::Suggestion, &GrocerError::Internal("db".into())),
            FailureReply::Alert(_)
        ));
    }

    #[test]
    fn list_formatting() {
        assert_eq!(format_list([]), None);
        assert_eq!(
            format_list(["Bread", "milk"]).as_deref(),
            Some("Your grocery list:\n- Bread\n- milk")
        );
    }

    #[test]
    fn help_lists_every_command() {
        for cmd in ["/add", "/remove", "/removeall", "/clear", "/list", "/suggest", "/recipe", "/help"] {
            assert!(HELP.contains(cmd), "missing {cmd}");
        }
    }
}
