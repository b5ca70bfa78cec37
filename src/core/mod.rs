//! Core business logic - framework-agnostic cart state, persistence, sync,
//! and checkout operations.

/// Cart domain model - items, customizations, carts, offers
pub mod cart;

/// Checkout projection - read-only summary of one cart
pub mod checkout;

/// Persistence bridge - cart snapshot and token storage
pub mod persistence;

/// Cart store - in-process cart state and its mutations
pub mod store;

/// Cart sync - reconciliation against the server's cart list
pub mod sync;
