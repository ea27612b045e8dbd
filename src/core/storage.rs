//! Durable key/value storage.
//!
//! [`LocalStorage`] gives the `getItem`/`setItem`/`removeItem` contract of a
//! browser's local storage on top of the `local_storage` table. Values are
//! opaque strings; this layer never looks inside them.

use crate::{
    entities::{LocalStorage as LocalStorageEntity, local_storage},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{DatabaseConnection, Set, prelude::*};
use tracing::{debug, instrument};

/// Handle to the key/value table.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    db: DatabaseConnection,
}

impl LocalStorage {
    /// Wraps a connection whose tables already exist.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the value stored under `key`, or `None` if it was never set.
    #[instrument(skip(self))]
    pub async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let row = LocalStorageEntity::find_by_id(key.to_string())
            .one(&self.db)
            .await?;
        debug!(found = row.is_some(), "Read storage key");
        Ok(row.map(|r| r.value))
    }

    /// Stores `value` under `key`, replacing any previous value.
    #[instrument(skip(self, value), fields(bytes = value.len()))]
    pub async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let now = Utc::now().naive_utc();

        let existing = LocalStorageEntity::find_by_id(key.to_string())
            .one(&self.db)
            .await?;

        if let Some(row) = existing {
            let mut active_model: local_storage::ActiveModel = row.into();
            active_model.value = Set(value.to_string());
            active_model.updated_at = Set(now);
            active_model.update(&self.db).await?;
        } else {
            let new_row = local_storage::ActiveModel {
                key: Set(key.to_string()),
                value: Set(value.to_string()),
                updated_at: Set(now),
            };
            new_row.insert(&self.db).await?;
        }

        debug!("Wrote storage key");
        Ok(())
    }

    /// Deletes `key`. Removing a key that does not exist is not an error.
    #[instrument(skip(self))]
    pub async fn remove_item(&self, key: &str) -> Result<()> {
        LocalStorageEntity::delete_by_id(key.to_string())
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
