// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Grocer list bot.
//!
//! WAL-mode SQLite with embedded migrations, a single-writer model through
//! `tokio-rusqlite`, and typed query modules for chats, list items, feedback
//! counters, suggestion batches and selection sessions.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteStorage;
pub use database::Database;
