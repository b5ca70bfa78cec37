//! Cart store - the canonical in-process view of the user's carts.
//!
//! All cart writes funnel through the methods here; there is no other path to
//! the state. Every mutation is a pure, synchronous state transition that
//! cannot fail: "not found" cases leave the store unchanged instead of
//! erroring, which is what lets callers apply mutations optimistically before
//! the matching network call resolves.
//!
//! The store keeps a flat list of lines (each line pairs an item with the
//! seller it was added from) plus a running quantity count. Boundary-shaped
//! per-seller [`Cart`]s are derived on demand via [`CartStore::carts`], which
//! is also where the "empty carts are never visible" invariant is enforced.
//!
//! A monotonic revision counter is bumped on every state change. The sync
//! orchestrator records the revision before it fetches and refuses to install
//! a server snapshot if the revision moved in the meantime, so an in-flight
//! optimistic mutation can never be silently clobbered by a stale response.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::cart::{AppliedOffer, Cart, CartItem, Customization, StoreRef};

/// One line of the store: an item plus the seller it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Seller the item was added from.
    pub store: StoreRef,
    /// The item itself.
    pub item: CartItem,
}

/// In-process cart state: lines, running count, per-cart offers.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    lines: Vec<CartLine>,
    count: u32,
    offers: HashMap<String, AppliedOffer>,
    revision: u64,
}

impl CartStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the store contents wholesale; used on hydration from
    /// persistent storage.
    ///
    /// `None` inputs coerce to empty/zero as a defensive default rather than
    /// an error. When no count is supplied it is recomputed from the items,
    /// so a snapshot persisted by an older app version cannot desync the
    /// running count.
    pub fn init_user_cart(&mut self, carts: Option<Vec<Cart>>, count: Option<u32>) {
        self.lines = flatten(carts.unwrap_or_default());
        self.count = count.unwrap_or_else(|| summed_quantity(&self.lines));
        self.offers.clear();
        self.bump();
    }

    /// Appends a new line and increments the count by the item's quantity.
    ///
    /// Duplicate adds of the same product+customization combination create
    /// separate lines; they are not merged.
    pub fn add_item(&mut self, store: StoreRef, item: CartItem) {
        self.count += item.quantity;
        self.lines.push(CartLine { store, item });
        self.bump();
    }

    /// Sets an item's quantity, adjusting the count by the difference.
    ///
    /// No-op if the id is unknown. A new quantity of zero removes the line,
    /// since zero-quantity items are invalid.
    pub fn update_item_qty(&mut self, id: &str, new_qty: u32) {
        if new_qty == 0 {
            self.remove_item(id);
            return;
        }

        let Some(line) = self.lines.iter_mut().find(|l| l.item.id == id) else {
            return;
        };

        let old_qty = line.item.quantity;
        line.item.quantity = new_qty;
        line.item.reprice();
        self.count = self.count.saturating_sub(old_qty) + new_qty;
        self.bump();
    }

    /// Replaces an item's customization list and total price, leaving its
    /// quantity and the count untouched. No-op if the id is unknown.
    pub fn update_item_customizations(
        &mut self,
        id: &str,
        customizations: Vec<Customization>,
        new_total_price: f64,
    ) {
        let Some(line) = self.lines.iter_mut().find(|l| l.item.id == id) else {
            return;
        };

        line.item.customizations = customizations;
        line.item.total_price = new_total_price;
        self.bump();
    }

    /// Removes a line, decrementing the count by its quantity. No-op if the
    /// id is unknown.
    pub fn remove_item(&mut self, id: &str) {
        let Some(position) = self.lines.iter().position(|l| l.item.id == id) else {
            return;
        };

        let removed = self.lines.remove(position);
        self.count = self.count.saturating_sub(removed.item.quantity);
        self.drop_offer_if_cart_empty(&removed.store.id);
        self.bump();
    }

    /// Removes a seller's cart, or a subset of its lines when explicit item
    /// ids are given.
    ///
    /// All removal shapes converge on one path keyed by the set of removed
    /// lines: the count always decrements by the summed quantity of what was
    /// actually removed. No-op if nothing matches.
    pub fn remove_cart(&mut self, store_id: &str, item_ids: Option<&[String]>) {
        let matches = |line: &CartLine| {
            line.store.id == store_id
                && item_ids.is_none_or(|ids| ids.iter().any(|id| *id == line.item.id))
        };

        let removed_qty: u32 = self
            .lines
            .iter()
            .filter(|l| matches(l))
            .map(|l| l.item.quantity)
            .sum();
        let before = self.lines.len();
        self.lines.retain(|l| !matches(l));

        if self.lines.len() == before {
            return;
        }

        self.count = self.count.saturating_sub(removed_qty);
        self.drop_offer_if_cart_empty(store_id);
        self.bump();
    }

    /// Clears all carts, offers, and the count; used on logout.
    pub fn reset(&mut self) {
        self.lines.clear();
        self.offers.clear();
        self.count = 0;
        self.bump();
    }

    /// Merges a batch of lines into the store, replacing any existing lines
    /// that belong to the same store ids as the incoming batch. Re-adding a
    /// previous order therefore never duplicates its lines.
    pub fn reorder(&mut self, lines: Vec<CartLine>) {
        let incoming_stores: Vec<&str> = lines.iter().map(|l| l.store.id.as_str()).collect();
        let replaced = |line: &CartLine| incoming_stores.contains(&line.store.id.as_str());

        let removed_qty: u32 = self
            .lines
            .iter()
            .filter(|l| replaced(l))
            .map(|l| l.item.quantity)
            .sum();
        let added_qty = summed_quantity(&lines);

        self.lines.retain(|l| !replaced(l));
        self.lines.extend(lines);
        self.count = self.count.saturating_sub(removed_qty) + added_qty;
        self.bump();
    }

    /// Applies an offer to a cart, replacing any prior offer on it.
    pub fn apply_offer(&mut self, store_id: impl Into<String>, offer: AppliedOffer) {
        drop(self.offers.insert(store_id.into(), offer));
        self.bump();
    }

    /// Clears a cart's offer. No-op if none is applied.
    pub fn clear_offer(&mut self, store_id: &str) {
        if self.offers.remove(store_id).is_some() {
            self.bump();
        }
    }

    /// Installs a reconciled server snapshot, replacing lines and count.
    ///
    /// Only the sync orchestrator calls this; it is still an ordinary
    /// mutation as far as the revision counter is concerned.
    pub fn apply_server_snapshot(&mut self, carts: Vec<Cart>) {
        self.lines = flatten(carts);
        self.count = summed_quantity(&self.lines);
        self.bump();
    }

    /// All lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Looks up an item by id.
    #[must_use]
    pub fn find_item(&self, id: &str) -> Option<&CartItem> {
        self.lines.iter().find(|l| l.item.id == id).map(|l| &l.item)
    }

    /// Derives the boundary shape: non-empty per-seller carts, sellers in
    /// first-seen order.
    #[must_use]
    pub fn carts(&self) -> Vec<Cart> {
        let mut carts: Vec<Cart> = Vec::new();
        for line in &self.lines {
            match carts.iter_mut().find(|c| c.store_id == line.store.id) {
                Some(cart) => cart.items.push(line.item.clone()),
                None => carts.push(Cart {
                    store_id: line.store.id.clone(),
                    store_name: line.store.name.clone(),
                    items: vec![line.item.clone()],
                }),
            }
        }
        carts
    }

    /// Running total count (sum of item quantities).
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Number of distinct non-empty carts.
    #[must_use]
    pub fn store_count(&self) -> usize {
        let mut seen: Vec<&str> = Vec::new();
        for line in &self.lines {
            if !seen.contains(&line.store.id.as_str()) {
                seen.push(&line.store.id);
            }
        }
        seen.len()
    }

    /// Whether the store holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The offer applied to a cart, if any.
    #[must_use]
    pub fn offer(&self, store_id: &str) -> Option<&AppliedOffer> {
        self.offers.get(store_id)
    }

    /// Monotonic revision, bumped on every state change.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn bump(&mut self) {
        self.revision += 1;
    }

    fn drop_offer_if_cart_empty(&mut self, store_id: &str) {
        if !self.lines.iter().any(|l| l.store.id == store_id) {
            drop(self.offers.remove(store_id));
        }
    }
}

fn flatten(carts: Vec<Cart>) -> Vec<CartLine> {
    carts
        .into_iter()
        .filter(|c| !c.is_empty())
        .flat_map(|cart| {
            let store = StoreRef {
                id: cart.store_id,
                name: cart.store_name,
            };
            cart.items.into_iter().map(move |item| CartLine {
                store: store.clone(),
                item,
            })
        })
        .collect()
}

fn summed_quantity(lines: &[CartLine]) -> u32 {
    lines.iter().map(|l| l.item.quantity).sum()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::{test_cart, test_item, test_line, test_store};

    /// The §-defining invariant: after any sequence of mutations the running
    /// count equals the sum of quantities across current items.
    fn assert_count_invariant(store: &CartStore) {
        let summed: u32 = store.lines().iter().map(|l| l.item.quantity).sum();
        assert_eq!(store.count(), summed, "count must equal summed quantities");
    }

    #[test]
    fn add_and_remove_keep_count_in_sync() {
        let mut store = CartStore::new();

        store.add_item(test_store("s1"), test_item("i1", 2, 50.0));
        store.add_item(test_store("s1"), test_item("i2", 1, 30.0));
        store.add_item(test_store("s2"), test_item("i3", 4, 10.0));
        assert_count_invariant(&store);
        assert_eq!(store.count(), 7);

        store.remove_item("i2");
        assert_count_invariant(&store);
        assert_eq!(store.count(), 6);

        store.remove_item("i1");
        store.remove_item("i3");
        assert_count_invariant(&store);
        assert!(store.is_empty());
    }

    #[test]
    fn duplicate_adds_create_separate_lines() {
        let mut store = CartStore::new();
        let item = test_item("i1", 1, 50.0);

        store.add_item(test_store("s1"), item.clone());
        store.add_item(test_store("s1"), item);

        assert_eq!(store.lines().len(), 2);
        assert_eq!(store.count(), 2);
    }

    #[test]
    fn update_qty_recomputes_delta_internally() {
        let mut store = CartStore::new();
        store.add_item(test_store("s1"), test_item("i1", 2, 50.0));
        let count_before = store.count();

        store.update_item_qty("i1", 5);

        let item = store.find_item("i1").unwrap();
        assert_eq!(item.quantity, 5);
        assert_eq!(item.total_price, 250.0);
        assert_eq!(store.count(), count_before + 3);
        assert_count_invariant(&store);
    }

    #[test]
    fn update_qty_unknown_id_leaves_state_unchanged() {
        let mut store = CartStore::new();
        store.add_item(test_store("s1"), test_item("i1", 2, 50.0));
        let lines_before = store.lines().to_vec();
        let count_before = store.count();
        let revision_before = store.revision();

        store.update_item_qty("missing", 5);

        assert_eq!(store.lines(), lines_before.as_slice());
        assert_eq!(store.count(), count_before);
        assert_eq!(store.revision(), revision_before);
    }

    #[test]
    fn update_qty_to_zero_removes_the_line() {
        let mut store = CartStore::new();
        store.add_item(test_store("s1"), test_item("i1", 2, 50.0));

        store.update_item_qty("i1", 0);

        assert!(store.is_empty());
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn update_customizations_leaves_quantity_and_count_alone() {
        let mut store = CartStore::new();
        store.add_item(test_store("s1"), test_item("i1", 2, 100.0));

        let customizations = vec![Customization::new("g1", "o1", "Large", 30.0, 1)];
        store.update_item_customizations("i1", customizations.clone(), 230.0);

        let item = store.find_item("i1").unwrap();
        assert_eq!(item.customizations, customizations);
        assert_eq!(item.total_price, 230.0);
        assert_eq!(item.quantity, 2);
        assert_eq!(store.count(), 2);
    }

    #[test]
    fn remove_cart_by_store_matches_explicit_id_removal() {
        let build = || {
            let mut store = CartStore::new();
            store.add_item(test_store("A"), test_item("a1", 1, 10.0));
            store.add_item(test_store("A"), test_item("a2", 2, 10.0));
            store.add_item(test_store("B"), test_item("b1", 3, 10.0));
            store
        };

        let mut by_store = build();
        by_store.remove_cart("A", None);

        let mut by_ids = build();
        by_ids.remove_cart("A", Some(&["a1".to_owned(), "a2".to_owned()]));

        assert_eq!(by_store.lines(), by_ids.lines());
        assert_eq!(by_store.count(), by_ids.count());
        assert_eq!(by_store.count(), 3);
        assert_count_invariant(&by_store);
    }

    #[test]
    fn remove_cart_with_subset_of_ids_keeps_the_rest() {
        let mut store = CartStore::new();
        store.add_item(test_store("A"), test_item("a1", 1, 10.0));
        store.add_item(test_store("A"), test_item("a2", 2, 10.0));

        store.remove_cart("A", Some(&["a1".to_owned()]));

        assert_eq!(store.lines().len(), 1);
        assert!(store.find_item("a2").is_some());
        assert_eq!(store.count(), 2);
    }

    #[test]
    fn remove_cart_drops_that_carts_offer() {
        let mut store = CartStore::new();
        store.add_item(test_store("A"), test_item("a1", 1, 10.0));
        store.apply_offer(
            "A",
            AppliedOffer {
                offer_id: "OFF10".to_owned(),
                discount: 10.0,
                total: 0.0,
            },
        );

        store.remove_cart("A", None);

        assert!(store.offer("A").is_none());
    }

    #[test]
    fn reorder_replaces_lines_for_incoming_stores_only() {
        let mut store = CartStore::new();
        store.add_item(test_store("A"), test_item("a1", 1, 10.0));
        store.add_item(test_store("A"), test_item("a2", 1, 10.0));
        store.add_item(test_store("B"), test_item("b1", 3, 10.0));

        store.reorder(vec![test_line("A", test_item("a3", 4, 10.0))]);

        assert!(store.find_item("a1").is_none());
        assert!(store.find_item("a2").is_none());
        assert_eq!(store.find_item("a3").unwrap().quantity, 4);
        assert_eq!(store.find_item("b1").unwrap().quantity, 3);
        // old 5 - 2 removed for A + 4 added
        assert_eq!(store.count(), 7);
        assert_count_invariant(&store);
    }

    #[test]
    fn removing_last_item_empties_the_cart_out_of_carts() {
        let mut store = CartStore::new();
        store.add_item(test_store("A"), test_item("a1", 1, 10.0));
        store.add_item(test_store("B"), test_item("b1", 1, 10.0));
        assert_eq!(store.store_count(), 2);

        store.remove_item("a1");

        let carts = store.carts();
        assert_eq!(carts.len(), 1);
        assert_eq!(carts[0].store_id, "B");
        assert_eq!(store.store_count(), 1);
    }

    #[test]
    fn init_coerces_missing_inputs_to_empty() {
        let mut store = CartStore::new();
        store.add_item(test_store("A"), test_item("a1", 1, 10.0));

        store.init_user_cart(None, None);

        assert!(store.is_empty());
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn init_recomputes_count_when_not_supplied() {
        let mut store = CartStore::new();
        let carts = vec![test_cart(
            "A",
            vec![test_item("a1", 2, 10.0), test_item("a2", 3, 10.0)],
        )];

        store.init_user_cart(Some(carts), None);

        assert_eq!(store.count(), 5);
        assert_count_invariant(&store);
    }

    #[test]
    fn init_drops_empty_carts() {
        let mut store = CartStore::new();
        let carts = vec![
            test_cart("A", vec![]),
            test_cart("B", vec![test_item("b1", 1, 10.0)]),
        ];

        store.init_user_cart(Some(carts), None);

        assert_eq!(store.store_count(), 1);
        assert_eq!(store.carts()[0].store_id, "B");
    }

    #[test]
    fn applying_an_offer_replaces_the_previous_one() {
        let mut store = CartStore::new();
        store.add_item(test_store("A"), test_item("a1", 1, 100.0));

        store.apply_offer(
            "A",
            AppliedOffer {
                offer_id: "OFF10".to_owned(),
                discount: 10.0,
                total: 90.0,
            },
        );
        store.apply_offer(
            "A",
            AppliedOffer {
                offer_id: "OFF20".to_owned(),
                discount: 20.0,
                total: 80.0,
            },
        );

        assert_eq!(store.offer("A").unwrap().offer_id, "OFF20");

        store.clear_offer("A");
        assert!(store.offer("A").is_none());
    }

    #[test]
    fn reset_clears_everything() {
        let mut store = CartStore::new();
        store.add_item(test_store("A"), test_item("a1", 2, 10.0));
        store.apply_offer(
            "A",
            AppliedOffer {
                offer_id: "OFF10".to_owned(),
                discount: 10.0,
                total: 10.0,
            },
        );

        store.reset();

        assert!(store.is_empty());
        assert_eq!(store.count(), 0);
        assert!(store.offer("A").is_none());
    }

    #[test]
    fn every_mutation_bumps_the_revision() {
        let mut store = CartStore::new();
        let r0 = store.revision();

        store.add_item(test_store("A"), test_item("a1", 1, 10.0));
        let r1 = store.revision();
        assert!(r1 > r0);

        store.update_item_qty("a1", 3);
        let r2 = store.revision();
        assert!(r2 > r1);

        store.remove_item("a1");
        assert!(store.revision() > r2);
    }
}
