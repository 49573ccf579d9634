// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Grocer list bot.

use thiserror::Error;

/// The primary error type used across all Grocer adapter traits and core operations.
#[derive(Debug, Error)]
pub enum GrocerError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Channel adapter errors (connection failure, message format, rate limiting).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Text-completion provider errors (API failure, malformed response).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An external collaborator (recipe page, mirror) could not be reached or parsed.
    #[error("upstream unavailable: {message}")]
    Upstream {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Empty or malformed user input. No state was changed.
    #[error("validation error: {0}")]
    Validation(String),

    /// No matching item, chat, or batch.
    #[error("not found: {0}")]
    NotFound(String),

    /// A callback token could not be parsed.
    #[error("invalid callback token: {0}")]
    InvalidToken(String),

    /// A session reference is malformed (not a session identifier at all).
    #[error("invalid session reference: {0}")]
    InvalidSession(String),

    /// The session or batch reference is well-formed but the document is gone.
    #[error("session expired")]
    Expired,

    /// An item index outside `[0, len)`.
    #[error("index {index} out of range for {len} items")]
    InvalidIndex { index: usize, len: usize },

    /// A page outside `[0, total_pages)`.
    #[error("page {page} out of range for {total_pages} pages")]
    InvalidPage { page: usize, total_pages: usize },

    /// Finalize was requested with an empty selection.
    #[error("nothing selected")]
    NothingSelected,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GrocerError {
    /// False for errors a user causes by pressing a stale or forged button
    /// or naming something that is not there.
    pub fn is_unexpected(&self) -> bool {
        !matches!(
            self,
            Self::NotFound(_)
                | Self::InvalidToken(_)
                | Self::InvalidSession(_)
                | Self::Expired
                | Self::InvalidIndex { .. }
                | Self::InvalidPage { .. }
                | Self::NothingSelected
        )
    }

    /// Shorthand for a storage error built from any error value.
    pub fn storage(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        GrocerError::Storage {
            source: source.into(),
        }
    }
}
