//! Order book module: one capability contract, two implementations.
//!
//! ## Components
//!
//! - [`OrderBook`]: The operation set both books expose identically
//! - [`NaiveOrderBook`]: Two price-sorted vectors, re-sorted on every
//!   mutation. The correctness oracle.
//! - [`OptimizedOrderBook`]: Slab storage, hash identity index, hash level
//!   index, and lazily-cleaned best-price heaps
//! - [`BookKind`] / [`create_book`]: Factory selecting a book by mode string
//!
//! ## Performance
//!
//! | Operation | Naive | Optimized |
//! |-----------|-------|-----------|
//! | Add order | O(n log n) | O(1) |
//! | Amend / delete | O(n log n) | O(1) |
//! | Lookup by id | O(n) | O(1) |
//! | Orders at price | O(n) | O(level size) |
//! | Best bid/ask | O(1) | O(1) amortized |
//!
//! ## Example
//!
//! ```
//! use lazybook::orderbook::create_book;
//! use lazybook::types::{Order, Side};
//!
//! let mut book = create_book("optimized").unwrap();
//!
//! book.add_order(Order::new(1, Side::Bid, 10_000_000_000, 10)).unwrap();
//! book.add_order(Order::new(2, Side::Bid, 10_500_000_000, 5)).unwrap();
//! book.add_order(Order::new(3, Side::Ask, 11_000_000_000, 3)).unwrap();
//!
//! assert_eq!(book.best_bid().map(|o| o.price), Some(10_500_000_000));
//! assert_eq!(book.best_ask().map(|o| o.price), Some(11_000_000_000));
//! ```

pub mod heap;
pub mod level;
pub mod naive;
pub mod node;
pub mod optimized;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use sha2::{Digest, Sha256};

pub use heap::{AskHeap, BidHeap, PriceHeap};
pub use level::PriceLevel;
pub use naive::NaiveOrderBook;
pub use node::OrderNode;
pub use optimized::OptimizedOrderBook;

use crate::error::BookError;
use crate::types::{Order, OrderId, Side};

/// Operations shared by every order book implementation.
///
/// Both implementations reject invalid sides and duplicate live ids, and both
/// remove an order whose quantity is amended to zero or below.
pub trait OrderBook: fmt::Debug {
    /// Which implementation this is
    fn kind(&self) -> BookKind;

    /// Insert a new live order.
    ///
    /// # Errors
    ///
    /// - [`BookError::InvalidSide`] if the side code is not Bid or Ask
    /// - [`BookError::DuplicateId`] if the id is already live
    fn add_order(&mut self, order: Order) -> Result<(), BookError>;

    /// Set the quantity of a live order.
    ///
    /// A non-positive quantity removes the order. Returns whether the id was
    /// found.
    fn amend_order(&mut self, id: OrderId, new_quantity: i64) -> bool;

    /// Remove a live order. Returns whether the id was found.
    fn delete_order(&mut self, id: OrderId) -> bool;

    fn lookup_by_id(&self, id: OrderId) -> Option<&Order>;

    /// Live orders at exactly `price`, on one side or on both (bids first).
    ///
    /// Returns an empty vector when no live order matches.
    fn get_orders_at_price(&self, price: u64, side: Option<Side>) -> Vec<&Order>;

    /// The oldest live order at the highest bid price
    fn best_bid(&mut self) -> Option<&Order>;

    /// The oldest live order at the lowest ask price
    fn best_ask(&mut self) -> Option<&Order>;

    /// Number of live orders
    fn order_count(&self) -> usize;

    /// Every live order, read from the price view
    fn orders(&self) -> Vec<&Order>;

    fn is_empty(&self) -> bool {
        self.order_count() == 0
    }

    /// SHA-256 over the SSZ encoding of every live order, sorted by id.
    ///
    /// Books holding the same live orders produce the same root regardless
    /// of implementation or operation history.
    fn state_root(&self) -> Result<[u8; 32], BookError> {
        let mut orders = self.orders();
        orders.sort_unstable_by_key(|order| order.id);

        let mut hasher = Sha256::new();
        for order in orders {
            let bytes = ssz_rs::serialize(order).map_err(|e| BookError::Encoding {
                id: order.id,
                reason: format!("{e:?}"),
            })?;
            hasher.update(&bytes);
        }

        let mut root = [0u8; 32];
        root.copy_from_slice(&hasher.finalize());
        Ok(root)
    }
}

// ============================================================================
// Factory
// ============================================================================

/// Order book implementation selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BookKind {
    Naive,
    Optimized,
}

impl BookKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BookKind::Naive => "naive",
            BookKind::Optimized => "optimized",
        }
    }

    /// Build an empty book of this kind
    pub fn create(self) -> Box<dyn OrderBook> {
        match self {
            BookKind::Naive => Box::new(NaiveOrderBook::new()),
            BookKind::Optimized => Box::new(OptimizedOrderBook::new()),
        }
    }

    /// Build an empty book sized for `capacity` orders
    pub fn with_capacity(self, capacity: usize) -> Box<dyn OrderBook> {
        match self {
            BookKind::Naive => Box::new(NaiveOrderBook::with_capacity(capacity)),
            BookKind::Optimized => Box::new(OptimizedOrderBook::with_capacity(capacity)),
        }
    }
}

impl FromStr for BookKind {
    type Err = BookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "naive" => Ok(BookKind::Naive),
            "optimized" => Ok(BookKind::Optimized),
            other => Err(BookError::UnknownBookKind(other.to_string())),
        }
    }
}

impl fmt::Display for BookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build an empty book from a mode string (`"naive"` or `"optimized"`).
pub fn create_book(mode: &str) -> Result<Box<dyn OrderBook>, BookError> {
    Ok(mode.parse::<BookKind>()?.create())
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_kind_from_str() {
        assert_eq!("naive".parse::<BookKind>(), Ok(BookKind::Naive));
        assert_eq!("optimized".parse::<BookKind>(), Ok(BookKind::Optimized));
        assert_eq!(
            "fast".parse::<BookKind>(),
            Err(BookError::UnknownBookKind("fast".to_string()))
        );
    }

    #[test]
    fn test_create_book_selects_implementation() {
        assert_eq!(create_book("naive").unwrap().kind(), BookKind::Naive);
        assert_eq!(create_book("optimized").unwrap().kind(), BookKind::Optimized);
        assert!(create_book("Naive").is_err());
    }

    #[test]
    fn test_state_root_empty_books_match() {
        let naive = BookKind::Naive.create();
        let optimized = BookKind::Optimized.create();

        assert_eq!(naive.state_root().unwrap(), optimized.state_root().unwrap());
    }

    #[test]
    fn test_state_root_ignores_insertion_order() {
        let mut a = BookKind::Optimized.create();
        let mut b = BookKind::Optimized.create();

        a.add_order(Order::new(1, Side::Bid, 100, 5)).unwrap();
        a.add_order(Order::new(2, Side::Ask, 200, 5)).unwrap();
        b.add_order(Order::new(2, Side::Ask, 200, 5)).unwrap();
        b.add_order(Order::new(1, Side::Bid, 100, 5)).unwrap();

        assert_eq!(a.state_root().unwrap(), b.state_root().unwrap());
    }

    #[test]
    fn test_state_root_tracks_quantity() {
        let mut book = BookKind::Naive.create();
        book.add_order(Order::new(1, Side::Bid, 100, 5)).unwrap();
        let before = book.state_root().unwrap();

        book.amend_order(1, 6);
        assert_ne!(before, book.state_root().unwrap());
    }
}
