//! Storage entry entity - Stores key-value pairs for on-device persistence.
//! This is the desktop analog of the mobile device's key-value storage: the
//! serialized cart snapshot lives under `"user_cart"` and the bearer token
//! under `"auth-token"`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Storage database model - stores key-value pairs
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "storage_entries")]
pub struct Model {
    /// Storage key (e.g., `"user_cart"`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    /// Stored value, serialized as a string
    pub value: String,
    /// When this entry was last written
    pub updated_at: DateTime,
}

/// `StorageEntry` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
