//! Shared test utilities for `StorefrontClient`.
//!
//! This module provides common helper functions for setting up test storage
//! and building cart entities with sensible defaults.

use sea_orm::DatabaseConnection;
use url::Url;

use crate::api::Connection;
use crate::config::api::ApiConfig;
use crate::config::database;
use crate::core::cart::{Cart, CartItem, Customization, ProductSnapshot, StoreRef};
use crate::core::checkout::DeliveryAddress;
use crate::core::store::CartLine;
use crate::errors::Result;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all storage-touching tests.
pub async fn setup_test_storage() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    database::create_tables(&db).await?;
    Ok(db)
}

/// Creates an API connection over fresh in-memory storage.
/// No token is stored, so authenticated calls fail until a test writes one.
pub async fn setup_test_connection() -> Result<Connection> {
    let db = setup_test_storage().await?;
    let base_url = Url::parse("http://localhost:8080/")?;
    Connection::new(&ApiConfig::new(base_url), db)
}

/// Builds a store reference with a derived display name.
pub fn test_store(id: &str) -> StoreRef {
    StoreRef {
        id: id.to_owned(),
        name: format!("Store {id}"),
    }
}

/// Builds a cart item with sensible defaults.
///
/// # Defaults
/// * `slug`: `"product-<id>"`
/// * `catalog_id`: `"catalog-1"`
/// * `unit_max_price`: equal to `unit_price`
/// * no customizations, in stock, totals consistent with the inputs
pub fn test_item(id: &str, quantity: u32, unit_price: f64) -> CartItem {
    let mut item = CartItem {
        id: id.to_owned(),
        slug: format!("product-{id}"),
        catalog_id: "catalog-1".to_owned(),
        quantity,
        unit_price,
        unit_max_price: unit_price,
        total_price: 0.0,
        total_max_price: 0.0,
        customizations: Vec::new(),
        product: ProductSnapshot {
            name: format!("Product {id}"),
            image_url: None,
            base_price: unit_price,
            in_stock: true,
            customizable: false,
            custom_group_ids: Vec::new(),
        },
    };
    item.reprice();
    item
}

/// Builds a cart item carrying the given customizations, with totals
/// recomputed to include them.
pub fn test_item_with_customizations(
    id: &str,
    quantity: u32,
    unit_price: f64,
    customizations: Vec<Customization>,
) -> CartItem {
    let mut item = test_item(id, quantity, unit_price);
    item.product.customizable = true;
    item.customizations = customizations;
    item.reprice();
    item
}

/// Builds a cart for one store holding the given items.
pub fn test_cart(store_id: &str, items: Vec<CartItem>) -> Cart {
    let store = test_store(store_id);
    Cart {
        store_id: store.id,
        store_name: store.name,
        items,
    }
}

/// Builds one store line for [`crate::core::store::CartStore::reorder`].
pub fn test_line(store_id: &str, item: CartItem) -> CartLine {
    CartLine {
        store: test_store(store_id),
        item,
    }
}

/// Builds a delivery address with placeholder coordinates.
pub fn test_address(id: &str) -> DeliveryAddress {
    DeliveryAddress {
        id: id.to_owned(),
        pincode: "560001".to_owned(),
        lat: 12.9716,
        lon: 77.5946,
    }
}
