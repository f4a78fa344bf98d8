//! # Lazybook
//!
//! Two-sided limit order book with two interchangeable implementations and a
//! harness that times them against each other.
//!
//! ## Architecture
//!
//! - **Types**: Order, Side, fixed-point price helpers
//! - **OrderBook**: One capability contract, a sorted-vector reference book
//!   and an indexed book with lazily-cleaned best-price heaps
//! - **Workload**: Seeded synthetic order generation
//! - **Harness**: Per-operation wall-clock timing with CSV output
//!
//! ## Design Principles
//!
//! 1. **Determinism**: Same seed, same workload, same book state
//! 2. **No Floating Point in the Book**: Prices are `u64` scaled by 10^8
//! 3. **Single-Threaded**: One book, one owner, no locks
//! 4. **Checkable**: Every optimized answer can be compared with the naive book

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the book and the harness
pub mod error;

/// Core data types: Order, Side, fixed-point prices
pub mod types;

/// Order books: contract, naive and optimized implementations, factory
pub mod orderbook;

/// Deterministic synthetic workloads
pub mod workload;

/// Benchmark harness and CSV output
pub mod harness;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use error::{BenchError, BookError};
pub use orderbook::{create_book, BookKind, NaiveOrderBook, OptimizedOrderBook, OrderBook};
pub use types::{Order, OrderId, Side};
