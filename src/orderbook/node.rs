//! Order node for slab-based storage.
//!
//! `OrderNode` wraps an `Order` with the decoded side and doubly-linked list
//! pointers into its price level. The slab is the single owner of the order
//! record: the identity index maps ids to slab keys and each level chains
//! slab keys, so both views see the same quantity.

use crate::types::{Order, OrderId, Side};

/// Order node stored in the slab.
#[derive(Debug, Clone)]
pub struct OrderNode {
    /// The order data
    pub order: Order,

    /// Side decoded at insertion
    pub side: Side,

    /// Next (newer) order in the price level queue (slab key)
    pub next: Option<usize>,

    /// Previous (older) order in the price level queue (slab key)
    pub prev: Option<usize>,
}

impl OrderNode {
    /// Create a new, unlinked node for an order whose side is already validated
    #[inline]
    pub fn new(order: Order, side: Side) -> Self {
        Self {
            order,
            side,
            next: None,
            prev: None,
        }
    }

    /// Check if this node is unlinked (alone in its level, or in none)
    #[inline]
    pub fn is_unlinked(&self) -> bool {
        self.next.is_none() && self.prev.is_none()
    }

    #[inline]
    pub fn order_id(&self) -> OrderId {
        self.order.id
    }

    #[inline]
    pub fn price(&self) -> u64 {
        self.order.price
    }

    #[inline]
    pub fn quantity(&self) -> u64 {
        self.order.quantity
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_node_new() {
        let order = Order::new(42, Side::Ask, 11_000_000_000, 3);
        let node = OrderNode::new(order.clone(), Side::Ask);

        assert_eq!(node.order, order);
        assert_eq!(node.side, Side::Ask);
        assert!(node.is_unlinked());
        assert_eq!(node.order_id(), 42);
        assert_eq!(node.price(), 11_000_000_000);
        assert_eq!(node.quantity(), 3);
    }

    #[test]
    fn test_order_node_linking() {
        let order = Order::new(1, Side::Bid, 10_000_000_000, 10);
        let mut node = OrderNode::new(order, Side::Bid);

        node.next = Some(2);
        assert!(!node.is_unlinked());

        node.next = None;
        node.prev = Some(0);
        assert!(!node.is_unlinked());
    }
}
