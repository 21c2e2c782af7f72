//! Ordering and lookup by identifier.
//!
//! An [`IdentifierIndex`] is a permutation of positions into a backing slice,
//! sorted by each element's key. It is rebuilt lazily: mutations of the
//! backing collection only mark it stale, and the next lookup or ordered
//! traversal pays for the sort. Lookups are then binary searches.

use std::cell::{Cell, Ref, RefCell};

#[derive(Debug)]
pub struct IdentifierIndex {
    positions: RefCell<Vec<usize>>,
    stale: Cell<bool>,
}

impl IdentifierIndex {
    pub fn new() -> Self {
        Self {
            positions: RefCell::new(Vec::new()),
            stale: Cell::new(false),
        }
    }
    /// Marks the index as out of date with its backing collection.
    pub fn invalidate(&self) {
        self.stale.set(true);
    }
    pub fn is_stale(&self) -> bool {
        self.stale.get()
    }
    // Only ever borrows mutably when stale, and staleness can only be set
    // through a mutation of the owner, so outstanding `ordered` borrows are safe.
    fn refresh<T, K: Ord>(&self, items: &[T], key: impl Fn(&T) -> K) {
        if !self.stale.get() {
            return;
        }
        let mut positions = self.positions.borrow_mut();
        positions.clear();
        positions.extend(0..items.len());
        // slice::sort_by_key is a stable merge sort
        positions.sort_by_key(|&p| key(&items[p]));
        self.stale.set(false);
    }
    /// Searches the sorted permutation. `Ok` carries the position in `items` of
    /// the element whose key equals `wanted`, `Err` the slot at which such an
    /// element would be ordered.
    pub fn search<T, K: Ord>(
        &self,
        items: &[T],
        wanted: &K,
        key: impl Fn(&T) -> K,
    ) -> Result<usize, usize> {
        self.refresh(items, &key);
        let positions = self.positions.borrow();
        positions
            .binary_search_by_key(wanted, |&p| key(&items[p]))
            .map(|i| positions[i])
    }
    /// Position in `items` of the element whose key equals `wanted`.
    pub fn position<T, K: Ord>(
        &self,
        items: &[T],
        wanted: &K,
        key: impl Fn(&T) -> K,
    ) -> Option<usize> {
        self.search(items, wanted, key).ok()
    }
    /// Records that `position` was appended to the backing collection and orders
    /// at `slot`, as returned by a [`search`](Self::search) made just before the
    /// append. A stale index stays stale.
    pub fn insert(&self, slot: usize, position: usize) {
        if !self.stale.get() {
            self.positions.borrow_mut().insert(slot, position);
        }
    }
    /// Positions of `items` in ascending key order.
    pub fn ordered<T, K: Ord>(&self, items: &[T], key: impl Fn(&T) -> K) -> Ref<'_, [usize]> {
        self.refresh(items, key);
        Ref::map(self.positions.borrow(), |p| p.as_slice())
    }
}

impl Default for IdentifierIndex {
    fn default() -> Self {
        Self::new()
    }
}

