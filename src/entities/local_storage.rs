//! Local storage entity - a durable key/value table.
//!
//! Each row holds one string value under a unique key, the same contract a
//! browser's `localStorage` offers. The whole application document lives in a
//! single row.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Local storage row
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "local_storage")]
pub struct Model {
    /// Storage key (e.g., `"metaforma_app_data"`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    /// Stored value, opaque to this layer
    #[sea_orm(column_type = "Text")]
    pub value: String,
    /// When this key was last written
    pub updated_at: DateTime,
}

/// `LocalStorage` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
