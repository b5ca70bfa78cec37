//! Cart sync - reconciles local cart state with the server's view.
//!
//! A sync pass fetches the server's cart list, converts it to the local
//! shape, and then decides whether to install it. Two guards sit between the
//! response and the store:
//!
//! - a fingerprint check (per-cart line counts) that skips snapshots
//!   identical to the last one applied, so redundant responses cause no
//!   churn;
//! - a revision guard that discards the snapshot when the store mutated
//!   while the fetch was in flight, so a stale response can never clobber an
//!   optimistic local change.
//!
//! Network and decode failures leave local state untouched and surface to
//! the caller, who owns retry policy (see
//! [`Error::is_retryable`](crate::errors::Error::is_retryable)).

use tracing::{debug, info};

use crate::api::{Connection, carts};
use crate::errors::Result;

use super::cart::Cart;
use super::persistence::sanitize_carts;
use super::store::CartStore;

/// Cheap structural identity of a cart snapshot: ordered
/// `(store_id, line count)` pairs. Snapshots with equal fingerprints are
/// treated as "no meaningful change" without a deep comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartFingerprint(Vec<(String, usize)>);

impl CartFingerprint {
    /// Fingerprints a snapshot. Pair order is normalized so the result is
    /// independent of the order carts arrived in.
    #[must_use]
    pub fn of(carts: &[Cart]) -> Self {
        let mut pairs: Vec<(String, usize)> = carts
            .iter()
            .map(|c| (c.store_id.clone(), c.items.len()))
            .collect();
        pairs.sort();
        Self(pairs)
    }
}

/// What a sync pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Server snapshot installed into the store.
    Applied,
    /// Snapshot fingerprint matched the last applied one; store untouched.
    Unchanged,
    /// The store mutated while the fetch was in flight; snapshot discarded.
    StaleLocal,
    /// No auth token in storage; sync is a no-op for signed-out users.
    Disabled,
}

/// Drives sync passes and remembers the fingerprint of the last snapshot it
/// applied.
#[derive(Debug, Default)]
pub struct CartSync {
    last_applied: Option<CartFingerprint>,
}

impl CartSync {
    /// Creates an orchestrator that has applied nothing yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one sync pass against the server.
    pub async fn run(&mut self, conn: &Connection, store: &mut CartStore) -> Result<SyncOutcome> {
        if conn.auth_token().await?.is_none() {
            debug!("No auth token, cart sync disabled");
            return Ok(SyncOutcome::Disabled);
        }

        let baseline = store.revision();
        let server_carts = carts::fetch_user_carts(conn).await?;
        let snapshot = sanitize_carts(carts::into_local_carts(server_carts));

        let outcome = self.reconcile(store, baseline, snapshot);
        info!(?outcome, "Cart sync pass finished");
        Ok(outcome)
    }

    /// Decides whether a transformed server snapshot replaces the store.
    ///
    /// `baseline` is the store revision captured before the fetch started.
    /// Pure decision logic; the network never reaches this far.
    pub fn reconcile(
        &mut self,
        store: &mut CartStore,
        baseline: u64,
        snapshot: Vec<Cart>,
    ) -> SyncOutcome {
        let fingerprint = CartFingerprint::of(&snapshot);

        if self.last_applied.as_ref() == Some(&fingerprint) {
            return SyncOutcome::Unchanged;
        }

        if store.revision() != baseline {
            debug!(
                baseline,
                current = store.revision(),
                "Local cart mutated during sync, discarding server snapshot"
            );
            return SyncOutcome::StaleLocal;
        }

        store.apply_server_snapshot(snapshot);
        self.last_applied = Some(fingerprint);
        SyncOutcome::Applied
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{setup_test_connection, test_cart, test_item, test_store};

    #[test]
    fn fingerprint_ignores_cart_order() {
        let a = test_cart("A", vec![test_item("a1", 1, 10.0)]);
        let b = test_cart("B", vec![test_item("b1", 2, 10.0)]);

        let forward = CartFingerprint::of(&[a.clone(), b.clone()]);
        let backward = CartFingerprint::of(&[b, a]);

        assert_eq!(forward, backward);
    }

    #[test]
    fn fingerprint_sees_line_count_changes_only() {
        let one_line = test_cart("A", vec![test_item("a1", 1, 10.0)]);
        let same_shape = test_cart("A", vec![test_item("a9", 7, 99.0)]);
        let two_lines = test_cart(
            "A",
            vec![test_item("a1", 1, 10.0), test_item("a2", 1, 10.0)],
        );

        assert_eq!(
            CartFingerprint::of(std::slice::from_ref(&one_line)),
            CartFingerprint::of(std::slice::from_ref(&same_shape))
        );
        assert_ne!(
            CartFingerprint::of(&[one_line]),
            CartFingerprint::of(&[two_lines])
        );
    }

    #[test]
    fn first_snapshot_is_applied() {
        let mut sync = CartSync::new();
        let mut store = CartStore::new();
        let baseline = store.revision();

        let outcome = sync.reconcile(
            &mut store,
            baseline,
            vec![test_cart("A", vec![test_item("a1", 2, 10.0)])],
        );

        assert_eq!(outcome, SyncOutcome::Applied);
        assert_eq!(store.count(), 2);
    }

    #[test]
    fn matching_fingerprint_leaves_store_untouched() {
        let mut sync = CartSync::new();
        let mut store = CartStore::new();

        let baseline = store.revision();
        let outcome = sync.reconcile(
            &mut store,
            baseline,
            vec![test_cart("A", vec![test_item("a1", 2, 10.0)])],
        );
        assert_eq!(outcome, SyncOutcome::Applied);
        let revision_after_apply = store.revision();

        // Same fingerprint (one cart, one line) but deeply different content:
        // the store must not be overwritten.
        let baseline = store.revision();
        let outcome = sync.reconcile(
            &mut store,
            baseline,
            vec![test_cart("A", vec![test_item("a2", 9, 99.0)])],
        );

        assert_eq!(outcome, SyncOutcome::Unchanged);
        assert_eq!(store.revision(), revision_after_apply);
        assert!(store.find_item("a1").is_some());
        assert!(store.find_item("a2").is_none());
    }

    #[test]
    fn local_mutation_during_fetch_discards_snapshot() {
        let mut sync = CartSync::new();
        let mut store = CartStore::new();

        // Revision captured before the (simulated) fetch started.
        let baseline = store.revision();

        // An optimistic mutation lands while the response is in flight.
        store.add_item(test_store("B"), test_item("b1", 1, 10.0));

        let outcome = sync.reconcile(
            &mut store,
            baseline,
            vec![test_cart("A", vec![test_item("a1", 2, 10.0)])],
        );

        assert_eq!(outcome, SyncOutcome::StaleLocal);
        assert!(store.find_item("b1").is_some());
        assert!(store.find_item("a1").is_none());
    }

    #[tokio::test]
    async fn sync_is_disabled_without_an_auth_token() -> Result<()> {
        let conn = setup_test_connection().await?;
        let mut sync = CartSync::new();
        let mut store = CartStore::new();

        let outcome = sync.run(&conn, &mut store).await?;

        assert_eq!(outcome, SyncOutcome::Disabled);
        assert!(store.is_empty());
        Ok(())
    }
}
