//! Persistence bridge - saves and restores the cart snapshot across restarts.
//!
//! Carts are serialized to JSON and kept in the key-value storage table under
//! a fixed key, next to the auth token the login flow writes. Persistence is
//! deliberately non-fatal: a failed write is logged and swallowed (the UI must
//! never block on it), and a missing or corrupt snapshot loads as an empty
//! cart rather than an error. Every load runs [`sanitize_carts`], since
//! persisted data may predate schema changes between app versions.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Set};
use tracing::{debug, warn};

use crate::entities::{StorageEntry, storage_entry};
use crate::errors::Result;

use super::cart::Cart;

/// Storage key holding the JSON-serialized cart list.
pub const CART_STORAGE_KEY: &str = "user_cart";

/// Storage key holding the bearer token; written by the login flow, read-only
/// here.
pub const AUTH_TOKEN_KEY: &str = "auth-token";

/// Reads a raw value from the key-value storage.
pub async fn get_value(db: &DatabaseConnection, key: &str) -> Result<Option<String>> {
    let entry = StorageEntry::find_by_id(key).one(db).await?;
    Ok(entry.map(|e| e.value))
}

/// Writes a raw value to the key-value storage, inserting or updating as
/// needed. Last writer wins.
pub async fn put_value<C>(db: &C, key: &str, value: String) -> Result<()>
where
    C: ConnectionTrait,
{
    let now = Utc::now().naive_utc();

    let existing = StorageEntry::find_by_id(key).one(db).await?;
    if let Some(entry) = existing {
        let mut active_model: storage_entry::ActiveModel = entry.into();
        active_model.value = Set(value);
        active_model.updated_at = Set(now);
        let _ = active_model.update(db).await?;
    } else {
        let entry = storage_entry::ActiveModel {
            key: Set(key.to_owned()),
            value: Set(value),
            updated_at: Set(now),
        };
        let _ = entry.insert(db).await?;
    }

    Ok(())
}

/// Drops carts missing a store reference, items missing an id, and any cart
/// left empty after item-level cleanup. Idempotent.
#[must_use]
pub fn sanitize_carts(carts: Vec<Cart>) -> Vec<Cart> {
    carts
        .into_iter()
        .filter(|c| !c.store_id.is_empty())
        .map(|mut cart| {
            cart.items.retain(|i| !i.id.is_empty());
            cart
        })
        .filter(|c| !c.is_empty())
        .collect()
}

/// Persists the cart snapshot.
///
/// Failures are logged and swallowed; persistence is best-effort by contract
/// and the in-process store stays authoritative either way.
pub async fn save_cart_to_storage(db: &DatabaseConnection, carts: &[Cart]) {
    if let Err(e) = persist_carts(db, carts).await {
        warn!("Failed to persist cart snapshot, continuing without: {e}");
    }
}

async fn persist_carts(db: &DatabaseConnection, carts: &[Cart]) -> Result<()> {
    let sanitized = sanitize_carts(carts.to_vec());
    let serialized = serde_json::to_string(&sanitized)?;
    put_value(db, CART_STORAGE_KEY, serialized).await
}

/// Restores the cart snapshot.
///
/// A missing key or unreadable snapshot yields an empty list, never an
/// error; the result is always sanitized.
pub async fn load_cart_from_storage(db: &DatabaseConnection) -> Vec<Cart> {
    let raw = match get_value(db, CART_STORAGE_KEY).await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("No persisted cart snapshot");
            return Vec::new();
        }
        Err(e) => {
            warn!("Failed to read cart snapshot, starting empty: {e}");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<Cart>>(&raw) {
        Ok(carts) => sanitize_carts(carts),
        Err(e) => {
            warn!("Persisted cart snapshot is unreadable, starting empty: {e}");
            Vec::new()
        }
    }
}

/// Reads the bearer token the login flow stored, if any.
pub async fn load_auth_token(db: &DatabaseConnection) -> Result<Option<String>> {
    get_value(db, AUTH_TOKEN_KEY).await
}
