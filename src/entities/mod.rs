//! Entity module - Contains all SeaORM entity definitions for local storage.
//! These entities represent the on-device tables backing the persistence
//! bridge. Each entity has a Model struct for data and an Entity struct for
//! operations.

pub mod storage_entry;

// Re-export specific types to avoid conflicts
pub use storage_entry::{
    Column as StorageEntryColumn, Entity as StorageEntry, Model as StorageEntryModel,
};
