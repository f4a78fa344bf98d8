//! Hash-indexed order book with lazily-cleaned best-price heaps.
//!
//! ## Architecture
//!
//! - **Slab**: single owner of every live order node
//! - **Identity index**: `HashMap<OrderId, usize>` from order id to slab key
//! - **Level index**: one `HashMap<price, PriceLevel>` per side; each level
//!   chains its orders' slab keys in arrival order
//! - **Best-price heaps**: a max-heap of bid prices and a min-heap of ask
//!   prices
//!
//! ## Lazy Deletion
//!
//! A price enters its side's heap only when its level is created. Emptying a
//! level removes it from the level index and leaves the heap alone. The heap
//! can hold stale and repeated prices; `best_bid` / `best_ask` pop stale tops
//! until one names a live level. Total pops never exceed total pushes, and
//! pushes never exceed `add_order` calls.
//!
//! ## Example
//!
//! ```
//! use lazybook::orderbook::{OptimizedOrderBook, OrderBook};
//! use lazybook::types::{Order, Side};
//!
//! let mut book = OptimizedOrderBook::with_capacity(100);
//! book.add_order(Order::new(1, Side::Bid, 10_000_000_000, 10)).unwrap();
//! book.add_order(Order::new(2, Side::Bid, 10_500_000_000, 5)).unwrap();
//!
//! book.delete_order(2);
//! // The 105 entry is still in the heap until the next read
//! assert_eq!(book.pending_prices(Side::Bid), 2);
//!
//! assert_eq!(book.best_bid().map(|o| o.price), Some(10_000_000_000));
//! assert_eq!(book.pending_prices(Side::Bid), 1);
//! ```

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use slab::Slab;
use tracing::debug;

use crate::error::BookError;
use crate::orderbook::{AskHeap, BidHeap, BookKind, OrderBook, OrderNode, PriceLevel};
use crate::types::{Order, OrderId, Side};

/// Order book with O(1) id operations and amortized O(1) best prices.
#[derive(Debug, Default)]
pub struct OptimizedOrderBook {
    /// Order storage
    /// Key: slab index, Value: OrderNode
    orders: Slab<OrderNode>,

    /// Order ID to slab key mapping
    order_index: HashMap<OrderId, usize>,

    /// Bid levels by price
    bid_levels: HashMap<u64, PriceLevel>,

    /// Ask levels by price
    ask_levels: HashMap<u64, PriceLevel>,

    /// Candidate best bid prices (may be stale)
    bid_heap: BidHeap,

    /// Candidate best ask prices (may be stale)
    ask_heap: AskHeap,
}

impl OptimizedOrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a book with pre-allocated order storage
    pub fn with_capacity(order_capacity: usize) -> Self {
        Self {
            orders: Slab::with_capacity(order_capacity),
            order_index: HashMap::with_capacity(order_capacity),
            ..Self::default()
        }
    }

    // ========================================================================
    // Capacity and Size
    // ========================================================================

    #[inline]
    pub fn capacity(&self) -> usize {
        self.orders.capacity()
    }

    /// Number of live price levels on one side
    #[inline]
    pub fn level_count(&self, side: Side) -> usize {
        self.levels(side).len()
    }

    /// Heap entries on one side, stale ones included
    #[inline]
    pub fn pending_prices(&self, side: Side) -> usize {
        match side {
            Side::Bid => self.bid_heap.len(),
            Side::Ask => self.ask_heap.len(),
        }
    }

    /// Stale heap entries discarded on one side so far
    #[inline]
    pub fn stale_discards(&self, side: Side) -> u64 {
        match side {
            Side::Bid => self.bid_heap.discarded(),
            Side::Ask => self.ask_heap.discarded(),
        }
    }

    /// The live level at (side, price), if any
    #[inline]
    pub fn level(&self, side: Side, price: u64) -> Option<&PriceLevel> {
        self.levels(side).get(&price)
    }

    #[inline]
    fn levels(&self, side: Side) -> &HashMap<u64, PriceLevel> {
        match side {
            Side::Bid => &self.bid_levels,
            Side::Ask => &self.ask_levels,
        }
    }

    /// Orders of one level, oldest first
    fn level_orders(&self, level: &PriceLevel) -> impl Iterator<Item = &Order> + '_ {
        level
            .keys(&self.orders)
            .filter_map(move |key| self.orders.get(key))
            .map(|node| &node.order)
    }

    /// Oldest order of the level at (side, price)
    fn level_head(&self, side: Side, price: u64) -> Option<&Order> {
        let key = self.levels(side).get(&price)?.peek_head()?;
        self.orders.get(key).map(|node| &node.order)
    }

    /// Unlink an order from every structure except the heaps.
    fn remove_key(&mut self, key: usize) -> Option<Order> {
        let node = self.orders.get(key)?;
        let order_id = node.order_id();
        let price = node.price();
        let side = node.side;

        let levels = match side {
            Side::Bid => &mut self.bid_levels,
            Side::Ask => &mut self.ask_levels,
        };
        if let Some(level) = levels.get_mut(&price) {
            level.remove(key, &mut self.orders);

            // Heap entry stays behind; it is discarded on the next read
            if level.is_empty() {
                levels.remove(&price);
                debug!(%side, price, "removed empty price level");
            }
        }

        self.order_index.remove(&order_id);
        Some(self.orders.remove(key).order)
    }
}

impl OrderBook for OptimizedOrderBook {
    fn kind(&self) -> BookKind {
        BookKind::Optimized
    }

    fn add_order(&mut self, order: Order) -> Result<(), BookError> {
        let side = order.side()?;
        let order_id = order.id;
        if self.order_index.contains_key(&order_id) {
            debug!(order_id, "rejected duplicate order id");
            return Err(BookError::DuplicateId(order_id));
        }

        let price = order.price;
        let key = self.orders.insert(OrderNode::new(order, side));
        self.order_index.insert(order_id, key);

        let levels = match side {
            Side::Bid => &mut self.bid_levels,
            Side::Ask => &mut self.ask_levels,
        };
        let level = match levels.entry(price) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                // First order at this price since the level was last empty
                match side {
                    Side::Bid => self.bid_heap.push(price),
                    Side::Ask => self.ask_heap.push(price),
                }
                debug!(%side, price, "created price level");
                entry.insert(PriceLevel::new(price))
            }
        };
        level.push_back(key, &mut self.orders);

        Ok(())
    }

    fn amend_order(&mut self, id: OrderId, new_quantity: i64) -> bool {
        let Some(&key) = self.order_index.get(&id) else {
            return false;
        };

        let quantity = match u64::try_from(new_quantity) {
            Ok(quantity) if quantity > 0 => quantity,
            _ => {
                self.remove_key(key);
                return true;
            }
        };

        let Some(node) = self.orders.get_mut(key) else {
            return false;
        };
        let old_quantity = node.order.quantity;
        node.order.quantity = quantity;
        let (side, price) = (node.side, node.price());

        let levels = match side {
            Side::Bid => &mut self.bid_levels,
            Side::Ask => &mut self.ask_levels,
        };
        if let Some(level) = levels.get_mut(&price) {
            level.replace_quantity(old_quantity, quantity);
        }
        true
    }

    fn delete_order(&mut self, id: OrderId) -> bool {
        match self.order_index.get(&id) {
            Some(&key) => self.remove_key(key).is_some(),
            None => false,
        }
    }

    fn lookup_by_id(&self, id: OrderId) -> Option<&Order> {
        let key = *self.order_index.get(&id)?;
        self.orders.get(key).map(|node| &node.order)
    }

    fn get_orders_at_price(&self, price: u64, side: Option<Side>) -> Vec<&Order> {
        let mut out = Vec::new();

        for candidate in [Side::Bid, Side::Ask] {
            if side.is_some_and(|wanted| wanted != candidate) {
                continue;
            }
            if let Some(level) = self.levels(candidate).get(&price) {
                out.extend(self.level_orders(level));
            }
        }

        out
    }

    fn best_bid(&mut self) -> Option<&Order> {
        let levels = &self.bid_levels;
        let price = self.bid_heap.best_live(|price| levels.contains_key(&price))?;
        self.level_head(Side::Bid, price)
    }

    fn best_ask(&mut self) -> Option<&Order> {
        let levels = &self.ask_levels;
        let price = self.ask_heap.best_live(|price| levels.contains_key(&price))?;
        self.level_head(Side::Ask, price)
    }

    fn order_count(&self) -> usize {
        self.order_index.len()
    }

    fn orders(&self) -> Vec<&Order> {
        self.bid_levels
            .values()
            .chain(self.ask_levels.values())
            .flat_map(move |level| self.level_orders(level))
            .collect()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
