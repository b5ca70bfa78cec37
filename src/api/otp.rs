//! OTP generation endpoint.

use serde::Deserialize;

use crate::errors::Result;

use super::Connection;

/// Acknowledgement of an OTP send.
#[derive(Debug, Clone, Deserialize)]
pub struct OtpAck {
    /// Whether the OTP was dispatched.
    pub success: bool,
    /// Optional server message.
    #[serde(default)]
    pub message: Option<String>,
}

/// Asks the backend to generate and send an OTP, optionally scoped to an
/// order (e.g. delivery confirmation codes).
pub async fn request_otp(
    conn: &Connection,
    send_to: &str,
    order_id: Option<&str>,
) -> Result<OtpAck> {
    let mut query = vec![("action", "gen".to_owned()), ("sendTo", send_to.to_owned())];
    if let Some(order_id) = order_id {
        query.push(("orderId", order_id.to_owned()));
    }

    conn.get("get-otp", &query).await
}
