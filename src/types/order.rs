//! Order types for the limit order book.
//!
//! ## SSZ Serialization
//!
//! `Order` derives `SimpleSerialize` from ssz_rs so that the live contents of
//! a book can be encoded canonically and hashed into a state root.
//!
//! ## Side Encoding
//!
//! The side is stored as a raw `u8` (`0 = Bid`, `1 = Ask`). Any other code is
//! an invalid side; books reject such orders on insertion.

use std::fmt;
use std::str::FromStr;

use ssz_rs::prelude::*;

use crate::error::BookError;

/// Unique order identifier, supplied by the caller
pub type OrderId = u64;

// ============================================================================
// Side enum
// ============================================================================

/// Order side: Bid or Ask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Buy interest
    Bid,
    /// Sell interest
    Ask,
}

impl Side {
    /// Convert to the raw code stored in an order
    pub fn to_u8(self) -> u8 {
        match self {
            Side::Bid => 0,
            Side::Ask => 1,
        }
    }

    /// Decode a raw side code
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Side::Bid),
            1 => Some(Side::Ask),
            _ => None,
        }
    }

    /// Lowercase name, as used in workload records
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Bid => "bid",
            Side::Ask => "ask",
        }
    }
}

impl TryFrom<u8> for Side {
    type Error = BookError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Side::from_u8(value).ok_or_else(|| BookError::InvalidSide(format!("code {value}")))
    }
}

impl FromStr for Side {
    type Err = BookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bid" => Ok(Side::Bid),
            "ask" => Ok(Side::Ask),
            other => Err(BookError::InvalidSide(other.to_string())),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// A resting limit order.
///
/// Identity (`id`, `side_raw`, `price`) is fixed at creation; only
/// `quantity` changes, through `amend_order`.
///
/// ## Example
///
/// ```
/// use lazybook::types::{Order, Side};
///
/// // Bid for 10 at 100.00000000
/// let order = Order::new(1, Side::Bid, 10_000_000_000, 10);
/// assert_eq!(order.side(), Ok(Side::Bid));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct Order {
    /// Unique order identifier
    pub id: u64,

    /// Side as u8 (0=Bid, 1=Ask)
    pub side_raw: u8,

    /// Price in fixed-point (scaled by 10^8)
    pub price: u64,

    /// Open quantity
    pub quantity: u64,
}

impl Order {
    /// Create an order with a typed side
    pub fn new(id: OrderId, side: Side, price: u64, quantity: u64) -> Self {
        Self {
            id,
            side_raw: side.to_u8(),
            price,
            quantity,
        }
    }

    /// Create an order from a raw side code.
    ///
    /// The code is not validated here; `add_order` rejects unknown codes with
    /// [`BookError::InvalidSide`].
    pub fn from_raw(id: OrderId, side_raw: u8, price: u64, quantity: u64) -> Self {
        Self {
            id,
            side_raw,
            price,
            quantity,
        }
    }

    /// Decode the order side
    pub fn side(&self) -> Result<Side, BookError> {
        Side::try_from(self.side_raw)
    }

    /// Check the side of an order, treating invalid codes as neither side
    #[inline]
    pub fn is_side(&self, side: Side) -> bool {
        self.side_raw == side.to_u8()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
