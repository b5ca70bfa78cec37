//! Checkout projection - a point-in-time, read-only summary of one cart.
//!
//! The projection is a pure function of its inputs and is rebuilt whenever
//! any of them change; it is never mutated in place and never persisted.
//! When a required input is missing it reports which one, instead of
//! computing a partial total that would mislead the checkout screen.

use serde::Serialize;

use super::cart::{AppliedOffer, Cart};

/// Delivery address chosen for checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryAddress {
    /// Address id as the server knows it.
    pub id: String,
    /// Postal code, used for serviceability.
    pub pincode: String,
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
}

/// One row of the price breakup. Children are an informational decomposition
/// (tax inside a fee, customizations inside a line); the parent `amount` is
/// authoritative and children are never re-summed into totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakupEntry {
    /// Display label.
    pub title: String,
    /// Authoritative amount for this row; negative for discounts.
    pub amount: f64,
    /// Informational sub-rows.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BreakupEntry>,
}

/// The computed checkout summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutSummary {
    /// Store whose cart is being checked out.
    pub store_id: String,
    /// Chosen fulfillment option.
    pub fulfillment_id: String,
    /// Chosen delivery address.
    pub address_id: String,
    /// Itemized price decomposition.
    pub breakup: Vec<BreakupEntry>,
    /// Payable total: the sum of top-level breakup amounts.
    pub total: f64,
    /// Savings versus pre-discount prices, including any applied offer.
    pub savings: f64,
    /// Total quantity across the cart.
    pub item_count: u32,
}

/// Which required input is missing from an incomplete projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingInput {
    /// No delivery address chosen yet.
    Address,
    /// No fulfillment option chosen yet.
    Fulfillment,
    /// The cart has no items.
    EmptyCart,
}

/// Result of projecting a cart into a checkout summary.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutProjection {
    /// All inputs present; summary computed.
    Ready(CheckoutSummary),
    /// A required input is missing; no totals were computed.
    Incomplete(MissingInput),
}

/// Builds the checkout summary for one cart.
///
/// Pure: no retries, no mutation, no I/O. The server remains the source of
/// truth for the final quote at checkout selection; this projection only
/// reflects what the client already knows.
#[must_use]
pub fn project_checkout(
    cart: &Cart,
    address: Option<&DeliveryAddress>,
    fulfillment_id: Option<&str>,
    offer: Option<&AppliedOffer>,
) -> CheckoutProjection {
    if cart.is_empty() {
        return CheckoutProjection::Incomplete(MissingInput::EmptyCart);
    }
    let Some(address) = address else {
        return CheckoutProjection::Incomplete(MissingInput::Address);
    };
    let Some(fulfillment_id) = fulfillment_id else {
        return CheckoutProjection::Incomplete(MissingInput::Fulfillment);
    };

    let mut breakup: Vec<BreakupEntry> = cart
        .items
        .iter()
        .map(|item| BreakupEntry {
            title: item.product.name.clone(),
            amount: item.total_price,
            children: item
                .customizations
                .iter()
                .map(|c| BreakupEntry {
                    title: c.name.clone(),
                    amount: c.total_price,
                    children: Vec::new(),
                })
                .collect(),
        })
        .collect();

    let item_savings: f64 = cart.items.iter().map(super::cart::CartItem::savings).sum();
    let offer_discount = offer.map_or(0.0, |o| o.discount);

    if let Some(offer) = offer {
        breakup.push(BreakupEntry {
            title: format!("Offer {}", offer.offer_id),
            amount: -offer.discount,
            children: Vec::new(),
        });
    }

    let total = breakup.iter().map(|e| e.amount).sum();

    CheckoutProjection::Ready(CheckoutSummary {
        store_id: cart.store_id.clone(),
        fulfillment_id: fulfillment_id.to_owned(),
        address_id: address.id.clone(),
        breakup,
        total,
        savings: item_savings + offer_discount,
        item_count: cart.total_quantity(),
    })
}
