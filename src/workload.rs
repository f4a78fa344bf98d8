//! Synthetic order workloads.
//!
//! [`OrderGenerator`] produces the deterministic input records the benchmark
//! harness feeds to both books. Same seed, same records.
//!
//! ## Record Layout
//!
//! | Field | Values |
//! |-------|--------|
//! | `order_id` | `1..=n` |
//! | `price` | uniform over the 0.00000001 ticks in `[50.0, 200.0)` |
//! | `quantity` | uniform in `[1, 100]` |
//! | `side` | `"bid"` at even positions, `"ask"` at odd |
//!
//! ```
//! use lazybook::workload::OrderGenerator;
//!
//! let orders = OrderGenerator::new().gen_orders(4, 42);
//! assert_eq!(orders[0].side, "ask");
//! assert_eq!(orders[1].side, "bid");
//! ```

use std::ops::Range;
use std::ops::RangeInclusive;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::BookError;
use crate::types::{price, Order, OrderId, Side};

/// One input record, as produced by the generator or read from a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: OrderId,
    pub price: f64,
    pub quantity: u64,
    pub side: String,
}

impl TryFrom<&OrderRecord> for Order {
    type Error = BookError;

    /// # Errors
    ///
    /// [`BookError::InvalidSide`] for a side other than `bid`/`ask`,
    /// [`BookError::InvalidPrice`] for a price that is not representable.
    fn try_from(record: &OrderRecord) -> Result<Self, Self::Error> {
        let side: Side = record.side.parse()?;
        let price = price::from_f64(record.price)?;
        Ok(Order::new(record.order_id, side, price, record.quantity))
    }
}

/// Seeded generator of order records.
///
/// Prices are drawn in ticks, so every record price converts to a level key
/// exactly.
#[derive(Debug, Clone)]
pub struct OrderGenerator {
    price_range: Range<u64>,
    quantity_range: RangeInclusive<u64>,
}

impl Default for OrderGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderGenerator {
    /// Generator with the standard ranges: price `[50, 200)`, quantity `[1, 100]`
    pub fn new() -> Self {
        Self {
            price_range: 50 * price::SCALE..200 * price::SCALE,
            quantity_range: 1..=100,
        }
    }

    /// Generate `n` records with ids `1..=n`.
    ///
    /// The side depends only on the 1-based position, so the side pattern is
    /// identical across seeds.
    pub fn gen_orders(&self, n: usize, seed: u64) -> Vec<OrderRecord> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut orders = Vec::with_capacity(n);

        for i in 1..=n as u64 {
            let side = if i % 2 == 0 { Side::Bid } else { Side::Ask };
            let price = price::to_f64(rng.gen_range(self.price_range.clone()));
            let quantity = rng.gen_range(self.quantity_range.clone());

            orders.push(OrderRecord {
                order_id: i,
                price,
                quantity,
                side: side.as_str().to_string(),
            });
        }

        orders
    }

    /// Generate `n` records and convert them to orders
    pub fn gen_book_orders(&self, n: usize, seed: u64) -> Result<Vec<Order>, BookError> {
        self.gen_orders(n, seed).iter().map(Order::try_from).collect()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
