//! Core data types for lazybook
//!
//! ## Types
//!
//! - [`Order`]: A resting limit order
//! - [`Side`]: Bid or Ask
//! - [`OrderId`]: Caller-supplied order identifier
//!
//! ## Fixed-Point Prices
//!
//! Prices are stored as `u64` scaled by 10^8.
//! Example: 105.5 is stored as 10_550_000_000u64

mod order;
pub mod price;

pub use order::{Order, OrderId, Side};
