// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Temp-directory SQLite storage plus mock adapters for integration tests.

use std::sync::Arc;

use grocer_config::model::StorageConfig;
use grocer_core::{GrocerError, StorageAdapter};
use grocer_storage::SqliteStorage;

use crate::mock_channel::MockChannel;
use crate::mock_provider::MockProvider;
use crate::mock_recipe::MockRecipeSource;

/// An initialized storage adapter over a throwaway database, and the mocks
/// a bot needs around it.
///
/// The temp directory lives as long as the harness.
pub struct TestHarness {
    pub storage: Arc<SqliteStorage>,
    pub provider: Arc<MockProvider>,
    pub channel: Arc<MockChannel>,
    pub recipes: Arc<MockRecipeSource>,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Build a harness whose mock provider replies with `responses` in order.
    pub async fn with_mock_responses(responses: Vec<String>) -> Result<Self, GrocerError> {
        let temp_dir = tempfile::TempDir::new().map_err(GrocerError::storage)?;
        let db_path = temp_dir.path().join("test.db");

        let storage = SqliteStorage::new(StorageConfig {
            database_path: db_path.to_string_lossy().into_owned(),
            wal_mode: true,
        });
        storage.initialize().await?;

        Ok(Self {
            storage: Arc::new(storage),
            provider: Arc::new(MockProvider::with_responses(responses)),
            channel: Arc::new(MockChannel::new()),
            recipes: Arc::new(MockRecipeSource::new()),
            _temp_dir: temp_dir,
        })
    }

    pub async fn new() -> Result<Self, GrocerError> {
        Self::with_mock_responses(Vec::new()).await
    }

    /// The storage as the trait object the crates take.
    pub fn storage(&self) -> Arc<dyn StorageAdapter> {
        self.storage.clone()
    }
}

/// Storage only, for crates that need nothing else.
pub async fn temp_storage() -> Result<(Arc<dyn StorageAdapter>, tempfile::TempDir), GrocerError> {
    let temp_dir = tempfile::TempDir::new().map_err(GrocerError::storage)?;
    let db_path = temp_dir.path().join("test.db");
    let storage = SqliteStorage::new(StorageConfig {
        database_path: db_path.to_string_lossy().into_owned(),
        wal_mode: true,
    });
    storage.initialize().await?;
    let storage: Arc<dyn StorageAdapter> = Arc::new(storage);
    Ok((storage, temp_dir))
}
