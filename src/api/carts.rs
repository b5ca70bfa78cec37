//! Cart list endpoint and server-shape conversion.
//!
//! The server's cart objects arrive loosely shaped (optional store info,
//! optional price ceilings, count-only carts). Conversion into the local
//! [`Cart`] model happens here, at the edge: defaults are filled in, line
//! totals are recomputed so the local price invariants hold regardless of
//! what the payload carried, and carts with nothing to render are dropped.

use serde::Deserialize;

use crate::core::cart::{Cart, CartItem, Customization, ProductSnapshot, StoreRef};
use crate::errors::Result;

use super::Connection;

/// Store info embedded in a server cart.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerStore {
    /// Store id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Store display name, when the server has one.
    #[serde(default)]
    pub name: Option<String>,
}

/// Product fields embedded in a server cart item.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerProduct {
    /// Product display name.
    pub name: String,
    /// Primary image URL.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Base unit price.
    #[serde(default)]
    pub price: f64,
    /// Stock flag; assumed in stock when the server omits it.
    #[serde(default = "default_true")]
    pub in_stock: bool,
    /// Whether the product supports customizations.
    #[serde(default)]
    pub customizable: bool,
    /// Linked customization group ids.
    #[serde(default)]
    pub custom_group_ids: Vec<String>,
}

/// Customization selection on a server cart item.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerCustomization {
    /// Custom group id.
    pub group_id: String,
    /// Selected option id.
    pub option_id: String,
    /// Option display name.
    #[serde(default)]
    pub name: String,
    /// Unit price delta.
    #[serde(default)]
    pub unit_price: f64,
    /// Extended price, when the server sends one.
    #[serde(default)]
    pub total_price: Option<f64>,
    /// Ordered units; defaults to one.
    #[serde(default = "default_one")]
    pub order_qty: u32,
}

/// One item in a server cart.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerCartItem {
    /// Item id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Product slug.
    #[serde(default)]
    pub slug: String,
    /// Catalog id.
    #[serde(default)]
    pub catalog_id: String,
    /// Quantity.
    pub quantity: u32,
    /// Effective unit price.
    pub unit_price: f64,
    /// Pre-discount unit price ceiling; falls back to the unit price.
    #[serde(default)]
    pub unit_max_price: Option<f64>,
    /// Selected customizations.
    #[serde(default)]
    pub customizations: Vec<ServerCustomization>,
    /// Embedded product snapshot.
    pub product: ServerProduct,
}

/// One cart as the server reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerCart {
    /// Server-side cart id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Owning store id, when present.
    #[serde(default)]
    pub store_id: Option<String>,
    /// Embedded store info, when present.
    #[serde(default)]
    pub store: Option<ServerStore>,
    /// Items; may be empty for count-only payloads.
    #[serde(default)]
    pub cart_items: Vec<ServerCartItem>,
    /// Server-reported item count, for payloads that omit the items.
    #[serde(rename = "cartItemsCount", default)]
    pub cart_items_count: Option<u32>,
}

impl ServerCart {
    /// Whether the server reports anything in this cart.
    #[must_use]
    pub fn has_items(&self) -> bool {
        !self.cart_items.is_empty() || self.cart_items_count.unwrap_or(0) > 0
    }
}

/// Fetches the signed-in user's carts.
pub async fn fetch_user_carts(conn: &Connection) -> Result<Vec<ServerCart>> {
    conn.get("carts", &[]).await
}

/// Converts server carts to the local shape, keeping only carts with items.
#[must_use]
pub fn into_local_carts(server_carts: Vec<ServerCart>) -> Vec<Cart> {
    server_carts
        .into_iter()
        .filter(ServerCart::has_items)
        .map(into_local_cart)
        .collect()
}

fn into_local_cart(cart: ServerCart) -> Cart {
    let store = resolve_store(&cart);
    Cart {
        store_id: store.id,
        store_name: store.name,
        items: cart.cart_items.into_iter().map(into_local_item).collect(),
    }
}

/// Missing store info defaults to a placeholder keyed by the best id we
/// have: the explicit store id if any, otherwise the server cart id.
fn resolve_store(cart: &ServerCart) -> StoreRef {
    let id = cart
        .store_id
        .clone()
        .or_else(|| cart.store.as_ref().map(|s| s.id.clone()))
        .unwrap_or_else(|| cart.id.clone());

    let mut store = StoreRef::unknown(id);
    if let Some(name) = cart.store.as_ref().and_then(|s| s.name.clone()) {
        store.name = name;
    }
    store
}

fn into_local_item(item: ServerCartItem) -> CartItem {
    let customizations = item
        .customizations
        .into_iter()
        .map(|c| {
            let total_price = c
                .total_price
                .unwrap_or(c.unit_price * f64::from(c.order_qty));
            Customization {
                group_id: c.group_id,
                option_id: c.option_id,
                name: c.name,
                unit_price: c.unit_price,
                total_price,
                order_qty: c.order_qty,
            }
        })
        .collect();

    let mut local = CartItem {
        id: item.id,
        slug: item.slug,
        catalog_id: item.catalog_id,
        quantity: item.quantity,
        unit_price: item.unit_price,
        unit_max_price: item.unit_max_price.unwrap_or(item.unit_price),
        total_price: 0.0,
        total_max_price: 0.0,
        customizations,
        product: ProductSnapshot {
            name: item.product.name,
            image_url: item.product.image_url,
            base_price: item.product.price,
            in_stock: item.product.in_stock,
            customizable: item.product.customizable,
            custom_group_ids: item.product.custom_group_ids,
        },
    };
    // Totals are recomputed locally rather than trusted from the payload.
    local.reprice();
    local
}

const fn default_true() -> bool {
    true
}

const fn default_one() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    fn fixture() -> Vec<ServerCart> {
        serde_json::from_str(
            r#"[
                {
                    "_id": "cart-1",
                    "store_id": "store-1",
                    "store": {"_id": "store-1", "name": "Corner Grocer"},
                    "cart_items": [
                        {
                            "_id": "item-1",
                            "slug": "organic-milk",
                            "catalog_id": "cat-1",
                            "quantity": 2,
                            "unit_price": 50.0,
                            "unit_max_price": 60.0,
                            "product": {
                                "name": "Organic Milk",
                                "image_url": "https://cdn.example.com/milk.png",
                                "price": 60.0,
                                "in_stock": true,
                                "customizable": false
                            }
                        }
                    ]
                },
                {
                    "_id": "cart-2",
                    "cart_items": [
                        {
                            "_id": "item-2",
                            "quantity": 1,
                            "unit_price": 120.0,
                            "customizations": [
                                {
                                    "group_id": "g1",
                                    "option_id": "o1",
                                    "name": "Extra shot",
                                    "unit_price": 30.0
                                }
                            ],
                            "product": {"name": "Latte", "price": 120.0, "customizable": true}
                        }
                    ]
                },
                {
                    "_id": "cart-3",
                    "store_id": "store-3",
                    "cart_items": [],
                    "cartItemsCount": 0
                }
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn cartless_payload_is_filtered_out() {
        let local = into_local_carts(fixture());
        assert_eq!(local.len(), 2);
    }

    #[test]
    fn store_info_is_carried_through_when_present() {
        let local = into_local_carts(fixture());
        assert_eq!(local[0].store_id, "store-1");
        assert_eq!(local[0].store_name, "Corner Grocer");
    }

    #[test]
    fn missing_store_defaults_to_unknown_with_cart_id() {
        let local = into_local_carts(fixture());
        assert_eq!(local[1].store_id, "cart-2");
        assert_eq!(local[1].store_name, "Unknown Store");
    }

    #[test]
    fn line_totals_are_recomputed_at_the_edge() {
        let local = into_local_carts(fixture());

        let milk = &local[0].items[0];
        assert_eq!(milk.total_price, 100.0);
        assert_eq!(milk.total_max_price, 120.0);

        // 120 base + 30 customization (order_qty defaulted to 1)
        let latte = &local[1].items[0];
        assert_eq!(latte.customizations[0].total_price, 30.0);
        assert_eq!(latte.total_price, 150.0);
    }

    #[test]
    fn missing_max_price_falls_back_to_unit_price() {
        let local = into_local_carts(fixture());
        let latte = &local[1].items[0];
        assert_eq!(latte.unit_max_price, latte.unit_price);
    }

    #[test]
    fn malformed_cart_payload_fails_to_decode() {
        let result = serde_json::from_str::<Vec<ServerCart>>(r#"[{"cart_items": "nope"}]"#);
        assert!(result.is_err());
    }
}
