//! Error types for the order book core and the benchmark harness.
//!
//! "Not found" on amend/delete is never an error: those operations return
//! `bool`. Errors are surfaced synchronously and never retried internally.

use thiserror::Error;

use crate::types::OrderId;

/// Errors raised by order book operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    /// Side code or name is neither Bid nor Ask
    #[error("invalid side: {0}")]
    InvalidSide(String),

    /// The order id is already live in the book
    #[error("duplicate order id: {0}")]
    DuplicateId(OrderId),

    /// Price is negative, not finite, or out of fixed-point range
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// Factory mode string is not `naive` or `optimized`
    #[error("unknown book kind: {0} (expected `naive` or `optimized`)")]
    UnknownBookKind(String),

    /// SSZ encoding of a live order failed while computing a state root
    #[error("failed to encode order {id}: {reason}")]
    Encoding { id: OrderId, reason: String },
}

/// Errors raised while running or saving a benchmark.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error(transparent)]
    Book(#[from] BookError),

    #[error("workload holds {available} orders, {requested} requested")]
    WorkloadTooSmall { requested: usize, available: usize },

    #[error("csv output failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
