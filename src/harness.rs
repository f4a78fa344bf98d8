//! Wall-clock benchmark harness.
//!
//! Drives either book through identical, seeded operation sequences and
//! times each operation category. Every measurement starts from a fresh book
//! built through [`BookKind`], so the harness never knows which
//! implementation it holds.
//!
//! ## Result Records
//!
//! One [`BenchmarkRecord`] per (method, operation, n), serialized to CSV with
//! the header `method,operation,n,total_sec,avg_sec`.

use std::hint::black_box;
use std::io;
use std::path::Path;
use std::time::Instant;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::info;

use crate::error::BenchError;
use crate::orderbook::{BookKind, OrderBook};
use crate::types::{Order, OrderId, Side};

/// Default operation counts
pub const DEFAULT_SIZES: [usize; 6] = [10, 100, 1_000, 10_000, 100_000, 1_000_000];

/// Timed operation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Insert,
    Amend,
    Delete,
    LookupById,
    GetOrdersAtPrice,
    BestBid,
    BestAsk,
}

impl Operation {
    /// Mutating operations, always benchmarked
    pub const MUTATIONS: [Operation; 3] = [Operation::Insert, Operation::Amend, Operation::Delete];

    /// Read-only operations, benchmarked on request
    pub const QUERIES: [Operation; 4] = [
        Operation::LookupById,
        Operation::GetOrdersAtPrice,
        Operation::BestBid,
        Operation::BestAsk,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Insert => "insert",
            Operation::Amend => "amend",
            Operation::Delete => "delete",
            Operation::LookupById => "lookup_by_id",
            Operation::GetOrdersAtPrice => "get_orders_at_price",
            Operation::BestBid => "best_bid",
            Operation::BestAsk => "best_ask",
        }
    }

    /// Seed for the random choices made while timing this operation
    pub fn seed(self) -> u64 {
        match self {
            Operation::Amend => 123,
            Operation::Delete => 456,
            Operation::LookupById => 777,
            Operation::GetOrdersAtPrice => 888,
            Operation::Insert | Operation::BestBid | Operation::BestAsk => 0,
        }
    }
}

/// One timing result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkRecord {
    pub method: BookKind,
    pub operation: Operation,
    pub n: usize,
    pub total_sec: f64,
    pub avg_sec: f64,
}

impl BenchmarkRecord {
    fn new(method: BookKind, operation: Operation, n: usize, total_sec: f64) -> Self {
        let avg_sec = if n > 0 { total_sec / n as f64 } else { f64::NAN };
        Self {
            method,
            operation,
            n,
            total_sec,
            avg_sec,
        }
    }
}

/// Time a closure in seconds
fn time_secs<F: FnOnce()>(f: F) -> f64 {
    let start = Instant::now();
    f();
    start.elapsed().as_secs_f64()
}

/// Runs single operation benchmarks against one book kind.
#[derive(Debug)]
pub struct BenchmarkRunner<'a> {
    kind: BookKind,
    orders: &'a [Order],
}

impl<'a> BenchmarkRunner<'a> {
    pub fn new(kind: BookKind, orders: &'a [Order]) -> Self {
        Self { kind, orders }
    }

    /// First `n` workload orders
    fn workload(&self, n: usize) -> Result<&'a [Order], BenchError> {
        self.orders.get(..n).ok_or(BenchError::WorkloadTooSmall {
            requested: n,
            available: self.orders.len(),
        })
    }

    /// Fresh book holding the first `n` workload orders
    fn prefilled(&self, n: usize) -> Result<Box<dyn OrderBook>, BenchError> {
        let mut book = self.kind.with_capacity(n);
        for order in self.workload(n)? {
            book.add_order(order.clone())?;
        }
        Ok(book)
    }

    /// Time one operation category over `n` operations
    pub fn run(&self, operation: Operation, n: usize) -> Result<BenchmarkRecord, BenchError> {
        let total = match operation {
            Operation::Insert => self.bench_insert(n)?,
            Operation::Amend => self.bench_amend(n, operation.seed())?,
            Operation::Delete => self.bench_delete(n, operation.seed())?,
            Operation::LookupById => self.bench_lookup(n, operation.seed())?,
            Operation::GetOrdersAtPrice => self.bench_orders_at_price(n, operation.seed())?,
            Operation::BestBid => self.bench_best(n, Side::Bid)?,
            Operation::BestAsk => self.bench_best(n, Side::Ask)?,
        };
        Ok(BenchmarkRecord::new(self.kind, operation, n, total))
    }

    fn bench_insert(&self, n: usize) -> Result<f64, BenchError> {
        let orders = self.workload(n)?.to_vec();
        let mut book = self.kind.with_capacity(n);
        let mut result = Ok(());

        let total = time_secs(|| {
            result = orders.into_iter().try_for_each(|order| book.add_order(order));
        });

        result?;
        Ok(total)
    }

    fn bench_amend(&self, n: usize, seed: u64) -> Result<f64, BenchError> {
        let mut book = self.prefilled(n)?;
        let ids: Vec<OrderId> = self.workload(n)?.iter().map(|order| order.id).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        Ok(time_secs(|| {
            for _ in 0..n {
                if let Some(&id) = ids.choose(&mut rng) {
                    let quantity = rng.gen_range(1..=100i64);
                    black_box(book.amend_order(id, quantity));
                }
            }
        }))
    }

    fn bench_delete(&self, n: usize, seed: u64) -> Result<f64, BenchError> {
        let mut book = self.prefilled(n)?;
        let mut ids: Vec<OrderId> = self.workload(n)?.iter().map(|order| order.id).collect();
        ids.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));

        Ok(time_secs(|| {
            for id in ids {
                black_box(book.delete_order(id));
            }
        }))
    }

    fn bench_lookup(&self, n: usize, seed: u64) -> Result<f64, BenchError> {
        let book = self.prefilled(n)?;
        let ids: Vec<OrderId> = self.workload(n)?.iter().map(|order| order.id).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        Ok(time_secs(|| {
            for _ in 0..n {
                if let Some(&id) = ids.choose(&mut rng) {
                    black_box(book.lookup_by_id(id));
                }
            }
        }))
    }

    fn bench_orders_at_price(&self, n: usize, seed: u64) -> Result<f64, BenchError> {
        let book = self.prefilled(n)?;
        let prices: Vec<u64> = self.workload(n)?.iter().map(|order| order.price).collect();
        let sides = [None, Some(Side::Bid), Some(Side::Ask)];
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        Ok(time_secs(|| {
            for _ in 0..n {
                if let (Some(&price), Some(&side)) = (prices.choose(&mut rng), sides.choose(&mut rng)) {
                    black_box(book.get_orders_at_price(price, side).len());
                }
            }
        }))
    }

    fn bench_best(&self, n: usize, side: Side) -> Result<f64, BenchError> {
        let mut book = self.prefilled(n)?;

        Ok(time_secs(|| {
            for _ in 0..n {
                let best = match side {
                    Side::Bid => book.best_bid(),
                    Side::Ask => book.best_ask(),
                };
                black_box(best.map(|order| order.price));
            }
        }))
    }
}

/// A full benchmark run for one book kind across several sizes.
#[derive(Debug, Clone)]
pub struct Benchmark {
    pub kind: BookKind,
    pub include_queries: bool,
    pub sizes: Vec<usize>,
}

impl Benchmark {
    pub fn new(kind: BookKind, include_queries: bool, sizes: Vec<usize>) -> Self {
        Self {
            kind,
            include_queries,
            sizes,
        }
    }

    /// Operations measured at each size, in output order
    pub fn operations(&self) -> Vec<Operation> {
        let mut operations = Operation::MUTATIONS.to_vec();
        if self.include_queries {
            operations.extend(Operation::QUERIES);
        }
        operations
    }

    /// Run every operation at every size over `orders`.
    ///
    /// `orders` must hold at least as many orders as the largest size.
    pub fn run(&self, orders: &[Order]) -> Result<Vec<BenchmarkRecord>, BenchError> {
        let runner = BenchmarkRunner::new(self.kind, orders);
        let operations = self.operations();
        let mut records = Vec::with_capacity(self.sizes.len() * operations.len());

        for &n in &self.sizes {
            for &operation in &operations {
                let record = runner.run(operation, n)?;
                info!(
                    book = %self.kind,
                    n,
                    operation = operation.as_str(),
                    total_sec = record.total_sec,
                    "measured"
                );
                records.push(record);
            }
        }

        Ok(records)
    }
}

/// Write records as CSV
pub fn write_csv<W: io::Write>(records: &[BenchmarkRecord], writer: W) -> Result<(), BenchError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write records as CSV to a file
pub fn save_csv(records: &[BenchmarkRecord], path: &Path) -> Result<(), BenchError> {
    let file = std::fs::File::create(path)?;
    write_csv(records, io::BufWriter::new(file))
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workload::OrderGenerator;

    fn orders(n: usize) -> Vec<Order> {
        OrderGenerator::new().gen_book_orders(n, 42).unwrap()
    }

    #[test]
    fn test_record_average() {
        let record = BenchmarkRecord::new(BookKind::Naive, Operation::Insert, 4, 2.0);
        assert_eq!(record.avg_sec, 0.5);

        let empty = BenchmarkRecord::new(BookKind::Naive, Operation::Insert, 0, 0.0);
        assert!(empty.avg_sec.is_nan());
    }

    #[test]
    fn test_runner_every_operation() {
        let orders = orders(200);

        for kind in [BookKind::Naive, BookKind::Optimized] {
            let runner = BenchmarkRunner::new(kind, &orders);
            for operation in Operation::MUTATIONS.into_iter().chain(Operation::QUERIES) {
                let record = runner.run(operation, 200).unwrap();
                assert_eq!(record.method, kind);
                assert_eq!(record.operation, operation);
                assert_eq!(record.n, 200);
                assert!(record.total_sec >= 0.0);
            }
        }
    }

    #[test]
    fn test_runner_workload_too_small() {
        let orders = orders(10);
        let runner = BenchmarkRunner::new(BookKind::Optimized, &orders);

        let err = runner.run(Operation::Insert, 11).unwrap_err();
        assert!(matches!(
            err,
            BenchError::WorkloadTooSmall {
                requested: 11,
                available: 10
            }
        ));
    }

    #[test]
    fn test_benchmark_record_grid() {
        let orders = orders(100);

        let without = Benchmark::new(BookKind::Optimized, false, vec![10, 100]);
        assert_eq!(without.run(&orders).unwrap().len(), 2 * 3);

        let with = Benchmark::new(BookKind::Naive, true, vec![10, 100]);
        let records = with.run(&orders).unwrap();
        assert_eq!(records.len(), 2 * 7);
        assert_eq!(records[0].operation, Operation::Insert);
        assert_eq!(records[0].n, 10);
        assert_eq!(records[13].operation, Operation::BestAsk);
        assert_eq!(records[13].n, 100);
    }

    #[test]
    fn test_write_csv_schema() {
        let records = vec![
            BenchmarkRecord::new(BookKind::Optimized, Operation::GetOrdersAtPrice, 10, 0.5),
            BenchmarkRecord::new(BookKind::Naive, Operation::LookupById, 100, 1.0),
        ];
        let mut buffer = Vec::new();

        write_csv(&records, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "method,operation,n,total_sec,avg_sec");
        assert_eq!(lines[1], "optimized,get_orders_at_price,10,0.5,0.05");
        assert_eq!(lines[2], "naive,lookup_by_id,100,1.0,0.01");
    }
}
