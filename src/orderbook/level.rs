//! Price level management for orders at the same (side, price).
//!
//! ## Design
//!
//! A `PriceLevel` holds the queue metadata for every live order at one
//! price on one side. Orders form a doubly-linked list through their slab
//! nodes, so any order can be unlinked in O(1) given its slab key:
//!
//! ```text
//! head (oldest) <-> order2 <-> order3 <-> tail (newest)
//! ```
//!
//! The head is the order reported by `best_bid` / `best_ask`, which gives
//! price-time priority among orders at the best price.
//!
//! A level is never kept empty: the book drops it as soon as `is_empty()`
//! turns true.

use slab::Slab;

use crate::orderbook::OrderNode;

/// Orders resting at a single price on one side.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    /// Price for this level (fixed-point, scaled by 10^8)
    pub price: u64,

    /// Sum of open quantity across the level
    pub total_quantity: u64,

    /// Oldest order (slab key)
    pub head: Option<usize>,

    /// Newest order (slab key)
    pub tail: Option<usize>,

    /// Number of live orders at this level
    pub order_count: usize,
}

impl PriceLevel {
    pub fn new(price: u64) -> Self {
        Self {
            price,
            total_quantity: 0,
            head: None,
            tail: None,
            order_count: 0,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order_count == 0
    }

    /// Append an order to the tail of the queue.
    ///
    /// A key that is not in the slab leaves the level untouched.
    pub fn push_back(&mut self, key: usize, slab: &mut Slab<OrderNode>) {
        let Some(node) = slab.get_mut(key) else {
            return;
        };
        let quantity = node.quantity();
        node.prev = self.tail;
        node.next = None;

        match self.tail.and_then(|tail_key| slab.get_mut(tail_key)) {
            Some(tail_node) => tail_node.next = Some(key),
            None => self.head = Some(key),
        }

        self.tail = Some(key);
        self.order_count += 1;
        self.total_quantity = self.total_quantity.saturating_add(quantity);
    }

    /// Unlink an order from the queue.
    ///
    /// Returns the open quantity of the removed order, or `None` if the key
    /// is not in the slab.
    pub fn remove(&mut self, key: usize, slab: &mut Slab<OrderNode>) -> Option<u64> {
        let node = slab.get_mut(key)?;
        let quantity = node.quantity();
        let prev_key = node.prev.take();
        let next_key = node.next.take();

        match prev_key.and_then(|prev| slab.get_mut(prev)) {
            Some(prev_node) => prev_node.next = next_key,
            None => self.head = next_key,
        }

        match next_key.and_then(|next| slab.get_mut(next)) {
            Some(next_node) => next_node.prev = prev_key,
            None => self.tail = prev_key,
        }

        self.order_count = self.order_count.saturating_sub(1);
        self.total_quantity = self.total_quantity.saturating_sub(quantity);

        Some(quantity)
    }

    /// Oldest order's slab key
    #[inline]
    pub fn peek_head(&self) -> Option<usize> {
        self.head
    }

    /// Account for an in-place quantity change of one of this level's orders
    pub fn replace_quantity(&mut self, old_quantity: u64, new_quantity: u64) {
        self.total_quantity = self
            .total_quantity
            .saturating_sub(old_quantity)
            .saturating_add(new_quantity);
    }

    /// Slab keys from head (oldest) to tail (newest)
    pub fn keys<'a>(&self, slab: &'a Slab<OrderNode>) -> LevelKeys<'a> {
        LevelKeys {
            slab,
            cursor: self.head,
        }
    }
}

/// Iterator over the slab keys of a level, oldest first.
#[derive(Debug, Clone)]
pub struct LevelKeys<'a> {
    slab: &'a Slab<OrderNode>,
    cursor: Option<usize>,
}

impl Iterator for LevelKeys<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let key = self.cursor?;
        self.cursor = self.slab.get(key).and_then(|node| node.next);
        Some(key)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Order, Side};

    const PRICE: u64 = 10_000_000_000;

    fn create_test_node(slab: &mut Slab<OrderNode>, id: u64, quantity: u64) -> usize {
        let order = Order::new(id, Side::Bid, PRICE, quantity);
        slab.insert(OrderNode::new(order, Side::Bid))
    }

    #[test]
    fn test_price_level_new() {
        let level = PriceLevel::new(PRICE);

        assert_eq!(level.price, PRICE);
        assert_eq!(level.total_quantity, 0);
        assert!(level.head.is_none());
        assert!(level.tail.is_none());
        assert!(level.is_empty());
    }

    #[test]
    fn test_price_level_push_multiple() {
        let mut slab = Slab::with_capacity(10);
        let mut level = PriceLevel::new(PRICE);

        let key1 = create_test_node(&mut slab, 1, 10);
        let key2 = create_test_node(&mut slab, 2, 20);
        let key3 = create_test_node(&mut slab, 3, 30);

        level.push_back(key1, &mut slab);
        level.push_back(key2, &mut slab);
        level.push_back(key3, &mut slab);

        assert_eq!(level.order_count, 3);
        assert_eq!(level.total_quantity, 60);
        assert_eq!(level.peek_head(), Some(key1));
        assert_eq!(level.tail, Some(key3));

        // key1 <-> key2 <-> key3
        assert_eq!(slab[key1].next, Some(key2));
        assert_eq!(slab[key2].prev, Some(key1));
        assert_eq!(slab[key2].next, Some(key3));
        assert_eq!(slab[key3].prev, Some(key2));
        assert!(slab[key3].next.is_none());

        let keys: Vec<usize> = level.keys(&slab).collect();
        assert_eq!(keys, vec![key1, key2, key3]);
    }

    #[test]
    fn test_price_level_remove_middle() {
        let mut slab = Slab::with_capacity(10);
        let mut level = PriceLevel::new(PRICE);

        let key1 = create_test_node(&mut slab, 1, 10);
        let key2 = create_test_node(&mut slab, 2, 20);
        let key3 = create_test_node(&mut slab, 3, 30);
        for key in [key1, key2, key3] {
            level.push_back(key, &mut slab);
        }

        assert_eq!(level.remove(key2, &mut slab), Some(20));
        assert_eq!(level.order_count, 2);
        assert_eq!(level.total_quantity, 40);
        assert_eq!(slab[key1].next, Some(key3));
        assert_eq!(slab[key3].prev, Some(key1));
        assert!(slab[key2].is_unlinked());
    }

    #[test]
    fn test_price_level_remove_head_and_tail() {
        let mut slab = Slab::with_capacity(10);
        let mut level = PriceLevel::new(PRICE);

        let key1 = create_test_node(&mut slab, 1, 10);
        let key2 = create_test_node(&mut slab, 2, 20);
        level.push_back(key1, &mut slab);
        level.push_back(key2, &mut slab);

        level.remove(key1, &mut slab);
        assert_eq!(level.head, Some(key2));
        assert_eq!(level.tail, Some(key2));
        assert!(slab[key2].is_unlinked());

        level.remove(key2, &mut slab);
        assert!(level.is_empty());
        assert_eq!(level.total_quantity, 0);
        assert!(level.head.is_none());
        assert!(level.tail.is_none());
    }

    #[test]
    fn test_price_level_remove_unknown_key() {
        let mut slab = Slab::with_capacity(10);
        let mut level = PriceLevel::new(PRICE);

        assert_eq!(level.remove(99, &mut slab), None);
        assert!(level.is_empty());
    }

    #[test]
    fn test_price_level_replace_quantity() {
        let mut slab = Slab::with_capacity(10);
        let mut level = PriceLevel::new(PRICE);

        let key = create_test_node(&mut slab, 1, 10);
        level.push_back(key, &mut slab);

        level.replace_quantity(10, 25);
        assert_eq!(level.total_quantity, 25);
    }
}
