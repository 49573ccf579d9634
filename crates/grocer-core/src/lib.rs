// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Grocer list bot.
//!
//! This crate provides the trait definitions, error type, domain records,
//! callback tokens and item normalizer shared by every crate in the
//! workspace. All adapters implement traits defined here.

pub mod error;
pub mod json;
pub mod keyboard;
pub mod normalize;
pub mod selection;
pub mod token;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::GrocerError;
pub use keyboard::{Button, Keyboard};
pub use selection::{PAGE_SIZE, SelectionSession, SessionPayload};
pub use token::{CallbackToken, PickerOp};
pub use types::{AdapterType, ChatId, HealthStatus, MessageId};

pub use traits::{ChannelAdapter, CompletionAdapter, PluginAdapter, RecipeSource, StorageAdapter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grocer_error_messages() {
        let err = GrocerError::InvalidIndex { index: 9, len: 3 };
        assert_eq!(err.to_string(), "index 9 out of range for 3 items");

        let err = GrocerError::InvalidPage {
            page: 2,
            total_pages: 2,
        };
        assert_eq!(err.to_string(), "page 2 out of range for 2 pages");

        let err = GrocerError::storage(std::io::Error::other("disk full"));
        assert_eq!(err.to_string(), "storage error: disk full");

        assert_eq!(GrocerError::Expired.to_string(), "session expired");
    }

    #[test]
    fn adapter_type_round_trip() {
        use std::str::FromStr;

        for variant in [
            AdapterType::Channel,
            AdapterType::Completion,
            AdapterType::Storage,
            AdapterType::RecipeSource,
        ] {
            let s = variant.to_string();
            let parsed = AdapterType::from_str(&s).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn suggestion_action_serializes_lowercase() {
        use types::SuggestionAction;

        let json = serde_json::to_string(&SuggestionAction::Accept).expect("should serialize");
        assert_eq!(json, "\"accept\"");
        assert_eq!(SuggestionAction::Skip.to_string(), "skip");
    }

    #[test]
    fn session_kind_display() {
        assert_eq!(types::SessionKind::Recipe.to_string(), "recipe");
        assert_eq!(types::SessionKind::Remove.to_string(), "remove");
    }

    #[test]
    fn timestamps_sort_chronologically() {
        let a = types::now_timestamp();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = types::now_timestamp();
        assert!(a < b);
        assert!(a.ends_with('Z'));
        assert_eq!(a.len(), "2026-01-01T00:00:00.000Z".len());
    }

    #[test]
    fn all_traits_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_channel_adapter<T: ChannelAdapter>() {}
        fn _assert_completion_adapter<T: CompletionAdapter>() {}
        fn _assert_storage_adapter<T: StorageAdapter>() {}
        fn _assert_recipe_source<T: RecipeSource>() {}
    }
}
