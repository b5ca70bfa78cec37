//! Checkout selection endpoint.
//!
//! Selecting a cart starts the asynchronous server-side quote: the backend
//! acknowledges with transaction/message ids that the caller polls against.

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

use super::Connection;

/// Optional transaction context carried on retried selections.
#[derive(Debug, Clone, Serialize)]
pub struct SelectContext {
    /// Transaction id from a prior selection attempt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

/// Body of the select-cart call. Key casing mirrors the backend contract.
#[derive(Debug, Clone, Serialize)]
pub struct SelectCartRequest {
    /// Delivery latitude.
    pub lat: f64,
    /// Delivery longitude.
    pub lon: f64,
    /// Delivery postal code.
    pub pincode: String,
    /// Optional transaction context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<SelectContext>,
    /// Seller's provider id.
    pub provider_id: String,
    /// Seller's location id.
    pub location_id: String,
    /// Cart's store id.
    #[serde(rename = "storeId")]
    pub store_id: String,
    /// Chosen delivery address.
    #[serde(rename = "deliveryAddressId")]
    pub delivery_address_id: String,
    /// Applied offer, if any.
    #[serde(rename = "offerId", skip_serializing_if = "Option::is_none")]
    pub offer_id: Option<String>,
}

/// Acknowledgement of a selection; poll with these ids for the quote.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectCartAck {
    /// Transaction id for the quote flow.
    pub transaction_id: String,
    /// Message id of this selection.
    pub message_id: String,
}

/// Initiates checkout for one cart.
///
/// The cart and address must already be chosen; a request without them is a
/// precondition failure the server never sees.
pub async fn select_cart(conn: &Connection, request: &SelectCartRequest) -> Result<SelectCartAck> {
    if request.store_id.is_empty() {
        return Err(Error::Precondition {
            message: "no cart selected for checkout".to_owned(),
        });
    }
    if request.delivery_address_id.is_empty() {
        return Err(Error::Precondition {
            message: "no delivery address selected".to_owned(),
        });
    }

    conn.post("v1/select-cart", request).await
}
