//! Order list, detail, and cancellation endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::Result;

use super::Connection;

/// One row of the order history list.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderSummary {
    /// Order id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Lifecycle state as the server reports it.
    pub state: String,
    /// Order total.
    #[serde(default)]
    pub total: f64,
    /// Seller the order was placed with.
    #[serde(default)]
    pub store_name: Option<String>,
    /// When the order was placed.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A page of the order history.
#[derive(Debug, Clone, Deserialize)]
pub struct OrdersPage {
    /// Orders on this page.
    pub orders: Vec<OrderSummary>,
    /// Total orders across all pages.
    pub count: u32,
}

/// Fetches one page of the signed-in user's order history.
pub async fn list_orders(conn: &Connection, page: u32, size: u32) -> Result<OrdersPage> {
    conn.get(
        "orders",
        &[
            ("action", "list".to_owned()),
            ("page", page.to_string()),
            ("size", size.to_string()),
        ],
    )
    .await
}

/// Delivery address on an order.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderAddress {
    /// Recipient name.
    #[serde(default)]
    pub name: Option<String>,
    /// Street / building line.
    #[serde(default)]
    pub building: Option<String>,
    /// City.
    #[serde(default)]
    pub city: Option<String>,
    /// Postal code.
    #[serde(default)]
    pub area_code: Option<String>,
}

/// Fulfillment attached to an order.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderFulfillment {
    /// Fulfillment id.
    pub id: String,
    /// Fulfillment category (e.g. delivery, self-pickup).
    #[serde(default)]
    pub category: Option<String>,
    /// Current fulfillment state.
    #[serde(default)]
    pub state: Option<String>,
}

/// One row of an order's price breakup; children decompose the parent and
/// are informational only.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderBreakupEntry {
    /// Display label.
    pub title: String,
    /// Amount for this row.
    pub price: f64,
    /// Informational sub-rows (e.g. tax inside a fee).
    #[serde(default)]
    pub children: Vec<OrderBreakupEntry>,
}

/// One purchased line on an order.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemLine {
    /// Item id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Product name.
    pub name: String,
    /// Quantity ordered.
    pub quantity: u32,
    /// Extended line price.
    pub price: f64,
}

/// Full order detail.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderDetail {
    /// Order id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Lifecycle state.
    pub state: String,
    /// Purchased lines.
    #[serde(default)]
    pub items: Vec<OrderItemLine>,
    /// Delivery address.
    #[serde(default)]
    pub delivery_address: Option<OrderAddress>,
    /// Fulfillments.
    #[serde(default)]
    pub fulfillments: Vec<OrderFulfillment>,
    /// Price breakup.
    #[serde(default)]
    pub breakup: Vec<OrderBreakupEntry>,
    /// Order total.
    #[serde(default)]
    pub total: f64,
}

/// Fetches one order in full.
pub async fn order_detail(conn: &Connection, order_id: &str) -> Result<OrderDetail> {
    conn.get(
        "orders",
        &[
            ("action", "detail".to_owned()),
            ("orderId", order_id.to_owned()),
        ],
    )
    .await
}

/// Cancellation request body.
#[derive(Debug, Clone, Serialize)]
pub struct CancelOrderRequest {
    /// Order to cancel.
    pub order_id: String,
    /// Network-defined cancellation reason code.
    pub reason_code: String,
}

/// Cancellation acknowledgement.
#[derive(Debug, Clone, Deserialize)]
pub struct CancelOrderAck {
    /// Whether the cancellation was accepted.
    pub success: bool,
    /// Optional server message.
    #[serde(default)]
    pub message: Option<String>,
}

/// Requests cancellation of an order.
pub async fn cancel_order(conn: &Connection, request: &CancelOrderRequest) -> Result<CancelOrderAck> {
    conn.post("cancel", request).await
}
