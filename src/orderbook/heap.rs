//! Best-price heaps with lazy deletion.
//!
//! A `PriceHeap` holds candidate prices for one side of the book. A price is
//! pushed once per level creation and never removed when the level empties.
//! The heap may therefore hold stale prices (no live level) and repeated
//! prices (a level created, emptied, and created again).
//!
//! Staleness is repaired at read time by [`PriceHeap::best_live`]: the top is
//! popped while the caller's liveness check rejects it. Every pop pairs with
//! an earlier push, so reads cost amortized O(1).
//!
//! The ordering comes from the key type:
//!
//! | Side | Key | Top of heap |
//! |------|-----|-------------|
//! | Bid | `u64` | highest price |
//! | Ask | `Reverse<u64>` | lowest price |

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tracing::trace;

/// Heap key wrapping a fixed-point price.
pub trait PriceKey: Ord + Copy {
    fn from_price(price: u64) -> Self;
    fn price(self) -> u64;
}

impl PriceKey for u64 {
    #[inline]
    fn from_price(price: u64) -> Self {
        price
    }

    #[inline]
    fn price(self) -> u64 {
        self
    }
}

impl PriceKey for Reverse<u64> {
    #[inline]
    fn from_price(price: u64) -> Self {
        Reverse(price)
    }

    #[inline]
    fn price(self) -> u64 {
        self.0
    }
}

/// Max-heap of bid prices
pub type BidHeap = PriceHeap<u64>;

/// Min-heap of ask prices
pub type AskHeap = PriceHeap<Reverse<u64>>;

/// Priority queue of candidate best prices, cleaned lazily on read.
#[derive(Debug, Clone)]
pub struct PriceHeap<K: PriceKey> {
    keys: BinaryHeap<K>,
    discarded: u64,
}

impl<K: PriceKey> Default for PriceHeap<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: PriceKey> PriceHeap<K> {
    pub fn new() -> Self {
        Self {
            keys: BinaryHeap::new(),
            discarded: 0,
        }
    }

    /// Record a newly created price level
    #[inline]
    pub fn push(&mut self, price: u64) {
        self.keys.push(K::from_price(price));
    }

    /// Return the best price for which `is_live` holds.
    ///
    /// Stale tops are popped and discarded along the way. Returns `None` once
    /// the heap is exhausted.
    pub fn best_live<F>(&mut self, mut is_live: F) -> Option<u64>
    where
        F: FnMut(u64) -> bool,
    {
        while let Some(&top) = self.keys.peek() {
            let price = top.price();
            if is_live(price) {
                return Some(price);
            }
            self.keys.pop();
            self.discarded += 1;
            trace!(price, "discarded stale heap entry");
        }
        None
    }

    /// Number of entries, stale ones included
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Total stale entries discarded over the heap's lifetime
    #[inline]
    pub fn discarded(&self) -> u64 {
        self.discarded
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
