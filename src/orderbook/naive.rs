//! Reference order book: two vectors kept sorted by price.
//!
//! Bids are sorted high-to-low and asks low-to-high, with a stable sort run
//! after every successful mutation. Lookups and price queries are linear
//! scans. Slow on purpose: every answer can be checked by reading the
//! vectors, which makes this book the oracle for [`OptimizedOrderBook`].
//!
//! Because the sort is stable and orders are only ever appended or removed,
//! orders at equal prices stay in insertion order, so the first element of
//! each vector is the oldest order at the best price.
//!
//! [`OptimizedOrderBook`]: crate::orderbook::OptimizedOrderBook

use std::cmp::Reverse;

use tracing::debug;

use crate::error::BookError;
use crate::orderbook::{BookKind, OrderBook};
use crate::types::{Order, OrderId, Side};

/// Sorted-vector order book.
#[derive(Debug, Default, Clone)]
pub struct NaiveOrderBook {
    /// Bid orders, highest price first
    bids: Vec<Order>,

    /// Ask orders, lowest price first
    asks: Vec<Order>,
}

impl NaiveOrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bids: Vec::with_capacity(capacity / 2),
            asks: Vec::with_capacity(capacity / 2),
        }
    }

    fn sort_books(&mut self) {
        self.bids.sort_by_key(|order| Reverse(order.price));
        self.asks.sort_by_key(|order| order.price);
    }

    /// Locate an order: (side, index into that side's vector)
    fn position(&self, id: OrderId) -> Option<(Side, usize)> {
        if let Some(index) = self.bids.iter().position(|order| order.id == id) {
            return Some((Side::Bid, index));
        }
        self.asks
            .iter()
            .position(|order| order.id == id)
            .map(|index| (Side::Ask, index))
    }

    fn side_mut(&mut self, side: Side) -> &mut Vec<Order> {
        match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        }
    }
}

impl OrderBook for NaiveOrderBook {
    fn kind(&self) -> BookKind {
        BookKind::Naive
    }

    fn add_order(&mut self, order: Order) -> Result<(), BookError> {
        let side = order.side()?;
        if self.position(order.id).is_some() {
            debug!(order_id = order.id, "rejected duplicate order id");
            return Err(BookError::DuplicateId(order.id));
        }

        self.side_mut(side).push(order);
        self.sort_books();
        Ok(())
    }

    fn amend_order(&mut self, id: OrderId, new_quantity: i64) -> bool {
        let Some((side, index)) = self.position(id) else {
            return false;
        };

        let orders = self.side_mut(side);
        match u64::try_from(new_quantity) {
            Ok(quantity) if quantity > 0 => orders[index].quantity = quantity,
            _ => {
                orders.remove(index);
            }
        }
        self.sort_books();
        true
    }

    fn delete_order(&mut self, id: OrderId) -> bool {
        let Some((side, index)) = self.position(id) else {
            return false;
        };

        self.side_mut(side).remove(index);
        self.sort_books();
        true
    }

    fn lookup_by_id(&self, id: OrderId) -> Option<&Order> {
        self.bids
            .iter()
            .chain(self.asks.iter())
            .find(|order| order.id == id)
    }

    fn get_orders_at_price(&self, price: u64, side: Option<Side>) -> Vec<&Order> {
        let mut out = Vec::new();

        if side.is_none() || side == Some(Side::Bid) {
            out.extend(self.bids.iter().filter(|order| order.price == price));
        }
        if side.is_none() || side == Some(Side::Ask) {
            out.extend(self.asks.iter().filter(|order| order.price == price));
        }

        out
    }

    fn best_bid(&mut self) -> Option<&Order> {
        self.bids.first()
    }

    fn best_ask(&mut self) -> Option<&Order> {
        self.asks.first()
    }

    fn order_count(&self) -> usize {
        self.bids.len() + self.asks.len()
    }

    fn orders(&self) -> Vec<&Order> {
        self.bids.iter().chain(self.asks.iter()).collect()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn bid(id: u64, price: u64, quantity: u64) -> Order {
        Order::new(id, Side::Bid, price, quantity)
    }

    fn ask(id: u64, price: u64, quantity: u64) -> Order {
        Order::new(id, Side::Ask, price, quantity)
    }

    #[test]
    fn test_naive_keeps_sides_sorted() {
        let mut book = NaiveOrderBook::new();
        book.add_order(bid(1, 100, 1)).unwrap();
        book.add_order(bid(2, 300, 1)).unwrap();
        book.add_order(bid(3, 200, 1)).unwrap();
        book.add_order(ask(4, 500, 1)).unwrap();
        book.add_order(ask(5, 400, 1)).unwrap();

        let bid_prices: Vec<u64> = book.bids.iter().map(|o| o.price).collect();
        let ask_prices: Vec<u64> = book.asks.iter().map(|o| o.price).collect();
        assert_eq!(bid_prices, vec![300, 200, 100]);
        assert_eq!(ask_prices, vec![400, 500]);
        assert_eq!(book.best_bid().map(|o| o.id), Some(2));
        assert_eq!(book.best_ask().map(|o| o.id), Some(5));
    }

    #[test]
    fn test_naive_equal_prices_keep_insertion_order() {
        let mut book = NaiveOrderBook::new();
        book.add_order(bid(1, 100, 1)).unwrap();
        book.add_order(bid(2, 100, 1)).unwrap();
        book.add_order(bid(3, 150, 1)).unwrap();
        book.add_order(bid(4, 100, 1)).unwrap();

        book.delete_order(3);
        let ids: Vec<u64> = book.bids.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 2, 4]);
    }

    #[test]
    fn test_naive_rejects_duplicate_id() {
        let mut book = NaiveOrderBook::new();
        book.add_order(bid(1, 100, 1)).unwrap();

        assert_eq!(book.add_order(ask(1, 200, 1)), Err(BookError::DuplicateId(1)));
        assert_eq!(book.order_count(), 1);
    }

    #[test]
    fn test_naive_rejects_invalid_side() {
        let mut book = NaiveOrderBook::new();

        let result = book.add_order(Order::from_raw(1, 2, 100, 1));
        assert!(matches!(result, Err(BookError::InvalidSide(_))));
        assert!(book.is_empty());
    }

    #[test]
    fn test_naive_amend_to_zero_removes() {
        let mut book = NaiveOrderBook::new();
        book.add_order(ask(1, 100, 5)).unwrap();

        assert!(book.amend_order(1, 0));
        assert!(book.lookup_by_id(1).is_none());
        assert!(book.best_ask().is_none());

        book.add_order(ask(2, 100, 5)).unwrap();
        assert!(book.amend_order(2, -3));
        assert!(book.is_empty());
    }

    #[test]
    fn test_naive_amend_and_delete_not_found() {
        let mut book = NaiveOrderBook::new();

        assert!(!book.amend_order(9, 10));
        assert!(!book.delete_order(9));
    }

    #[test]
    fn test_naive_orders_at_price_by_side() {
        let mut book = NaiveOrderBook::new();
        book.add_order(bid(1, 100, 1)).unwrap();
        book.add_order(ask(2, 100, 1)).unwrap();
        book.add_order(bid(3, 100, 1)).unwrap();

        let either: Vec<u64> = book.get_orders_at_price(100, None).iter().map(|o| o.id).collect();
        assert_eq!(either, vec![1, 3, 2]);
        assert_eq!(book.get_orders_at_price(100, Some(Side::Ask)).len(), 1);
        assert!(book.get_orders_at_price(101, None).is_empty());
    }
}
