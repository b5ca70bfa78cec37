//! Typed REST client for the commerce backend.
//!
//! The backend contract is consumed, not defined, here: each module wraps
//! one endpoint family with request/response DTOs that are decoded strictly
//! at the edge and converted to the core model before anything else touches
//! them.

/// Presigned asset upload
pub mod assets;
/// Cart list endpoint and server-shape conversion
pub mod carts;
/// Checkout selection endpoint
pub mod checkout;
/// Connection management - base URL, bearer auth, status and decode handling
pub mod connection;
/// Issue (IGM) and support ticket endpoints
pub mod issues;
/// Order list, detail, and cancellation endpoints
pub mod orders;
/// OTP generation endpoint
pub mod otp;

pub use connection::Connection;
