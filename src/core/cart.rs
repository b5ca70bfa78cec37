//! Cart domain model.
//!
//! These types are the strict internal shape of everything the cart subsystem
//! handles: line items with their price fields and customization selections,
//! the product snapshot captured at add time, per-seller carts, and the
//! optimistic per-cart offer. Server payloads are converted into these types
//! at the network edge and persisted snapshots round-trip through them.

use serde::{Deserialize, Serialize};

/// A selectable modifier on a product (e.g. size, add-on) with its own price
/// delta. Belongs to a named custom group on the product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customization {
    /// Custom group this option belongs to.
    pub group_id: String,
    /// Selected option within the group.
    pub option_id: String,
    /// Display name of the option.
    pub name: String,
    /// Price delta for a single unit of this option.
    pub unit_price: f64,
    /// Extended price, `unit_price * order_qty`.
    pub total_price: f64,
    /// How many units of the option were ordered.
    pub order_qty: u32,
}

impl Customization {
    /// Creates a customization with its extended price computed from the
    /// unit price and quantity.
    #[must_use]
    pub fn new(
        group_id: impl Into<String>,
        option_id: impl Into<String>,
        name: impl Into<String>,
        unit_price: f64,
        order_qty: u32,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            option_id: option_id.into(),
            name: name.into(),
            unit_price,
            total_price: unit_price * f64::from(order_qty),
            order_qty,
        }
    }
}

/// Denormalized copy of the product a line item refers to, captured when the
/// item is added so the cart can render without another product fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    /// Product display name.
    pub name: String,
    /// Primary product image, if any.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Base (undiscounted) unit price at add time.
    pub base_price: f64,
    /// Stock flag at add time.
    pub in_stock: bool,
    /// Whether the product supports customizations.
    pub customizable: bool,
    /// Ids of the customization groups linked to the product.
    #[serde(default)]
    pub custom_group_ids: Vec<String>,
}

/// One purchasable line in a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Opaque item id, assigned server-side.
    pub id: String,
    /// Product slug.
    pub slug: String,
    /// Catalog the product belongs to.
    pub catalog_id: String,
    /// Quantity; always positive inside the store (zero means removal).
    pub quantity: u32,
    /// Effective unit price.
    pub unit_price: f64,
    /// Pre-discount unit price ceiling.
    pub unit_max_price: f64,
    /// Extended line price including customizations.
    pub total_price: f64,
    /// Extended pre-discount line price including customizations.
    pub total_max_price: f64,
    /// Selected customizations, in selection order.
    #[serde(default)]
    pub customizations: Vec<Customization>,
    /// Product snapshot captured at add time.
    pub product: ProductSnapshot,
}

impl CartItem {
    /// Summed extended price of the selected customizations.
    #[must_use]
    pub fn customization_total(&self) -> f64 {
        self.customizations.iter().map(|c| c.total_price).sum()
    }

    /// Line total implied by the unit price, quantity, and customizations.
    #[must_use]
    pub fn expected_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity) + self.customization_total()
    }

    /// Pre-discount line total implied by the max unit price, quantity, and
    /// customizations.
    #[must_use]
    pub fn expected_max_total(&self) -> f64 {
        self.unit_max_price * f64::from(self.quantity) + self.customization_total()
    }

    /// Recomputes both extended totals from the unit prices and quantity.
    /// Called after any quantity change to keep the price invariants intact.
    pub fn reprice(&mut self) {
        self.total_price = self.expected_total();
        self.total_max_price = self.expected_max_total();
    }

    /// How much cheaper the line is than its pre-discount ceiling.
    #[must_use]
    pub fn savings(&self) -> f64 {
        (self.total_max_price - self.total_price).max(0.0)
    }
}

/// Reference to the seller a line was added from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRef {
    /// Seller/store id.
    pub id: String,
    /// Seller display name.
    pub name: String,
}

impl StoreRef {
    /// Placeholder used when the server omits store info on a cart; the
    /// caller supplies a fallback id (typically the server cart id).
    #[must_use]
    pub fn unknown(fallback_id: impl Into<String>) -> Self {
        Self {
            id: fallback_id.into(),
            name: "Unknown Store".to_owned(),
        }
    }
}

/// All items belonging to one seller within the user's session.
///
/// Carts with zero items are filtered out at every read/write boundary; an
/// empty `Cart` value only exists transiently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    /// Seller/store id this cart belongs to.
    pub store_id: String,
    /// Seller display name, snapshotted for rendering.
    pub store_name: String,
    /// Line items.
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Whether the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total quantity across all items.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// Offer optimistically applied to one cart.
///
/// At most one per cart; applying another replaces it. Validation is
/// server-side at checkout, so nothing here ties the offer to server state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedOffer {
    /// Offer id as the server knows it.
    pub offer_id: String,
    /// Discount amount the offer grants.
    pub discount: f64,
    /// Cart total after the discount, as quoted when the offer was applied.
    pub total: f64,
}
