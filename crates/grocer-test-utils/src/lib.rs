// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Grocer integration tests.
//!
//! Mock adapters and a temp-database harness for fast, deterministic tests
//! without Telegram, Anthropic or the network.
//!
//! # Components
//!
//! - [`MockProvider`] - completion adapter with queued replies and failures
//! - [`MockChannel`] - channel with event injection and call capture
//! - [`MockRecipeSource`] - recipe pages keyed by URL
//! - [`FlakyStorage`] - storage wrapper failing a chosen item or stats write
//! - [`TestHarness`] - initialized SQLite storage plus the mocks

pub mod harness;
pub mod mock_channel;
pub mod mock_provider;
pub mod mock_recipe;
pub mod mock_storage;

pub use harness::{TestHarness, temp_storage};
pub use mock_channel::MockChannel;
pub use mock_provider::MockProvider;
pub use mock_recipe::MockRecipeSource;
pub use mock_storage::FlakyStorage;
