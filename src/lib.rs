//! # Fold Chain
//!
//! A fixed-capacity hash table with separate chaining, driven by a digit-group
//! folding hash and instrumented to count collisions.
//!
//! This crate provides:
//!
//! - `FoldingHasher`: sums the 4-digit groups of a numeric key and reduces the sum
//!   modulo the table capacity
//! - `ChainedHashTable`: a table that never resizes, appends every key to its
//!   bucket's chain and counts insertions into occupied buckets
//! - `ExperimentRunner`: repeats batch insertions over several capacities and
//!   averages the collision counts, reporting through a `ReportSink`
//!
//! ## Basic Usage
//!
//! ```rust
//! use foldchain::{ChainedHashTable, FoldingHasher};
//!
//! // 0001 + 0101 + 0001 = 103, and 103 mod 100 = 3
//! assert_eq!(FoldingHasher::hash("000101010001", 100)?, 3);
//!
//! let mut table = ChainedHashTable::new(100)?;
//! table.insert("000101010001")?;
//! table.insert("000101010001")?;
//!
//! assert_eq!(table.collision_count(), 1);
//! assert_eq!(table.bucket_contents(3)?.len(), 2);
//! # Ok::<(), foldchain::FoldChainError>(())
//! ```
//!
//! ## Collision Experiments
//!
//! ```rust
//! use foldchain::{ExperimentRunner, IcNumberGenerator, KeyWidth, RecordingSink};
//!
//! // Seeded key source, so the run is reproducible
//! let mut keys = IcNumberGenerator::new(KeyWidth::Twelve, 7);
//! let mut runner = ExperimentRunner::new(RecordingSink::default());
//!
//! let results = runner.run(10, 1000, &[1009, 2003], &mut keys)?;
//!
//! assert_eq!(results.len(), 2);
//! assert_eq!(results[0].round_collisions().len(), 10);
//! # Ok::<(), foldchain::FoldChainError>(())
//! ```

/// Separate-chaining table and its buckets
mod chained_table;
/// Error type shared across the crate
mod error;
/// Repeated collision trials
mod experiment;
/// Digit-group folding hash function
mod folding_hasher;
/// Validated numeric keys
mod key;
/// Synthetic key sources
mod key_generator;
/// Global logger setup for binaries
pub mod logger;
/// Report sinks for experiment output
pub mod report;

pub use chained_table::{Bucket, Buckets, ChainedHashTable, InsertOutcome};
pub use error::{FoldChainError, KeyFormatIssue, Result};
pub use experiment::{ExperimentConfig, ExperimentRunner, RoundCount, TrialResult};
pub use folding_hasher::FoldingHasher;
pub use key::{GROUP_WIDTH, Key, KeyWidth};
pub use key_generator::{IcNumberGenerator, KeyGenerator};
pub use report::{ChartSink, ConsoleSink, LogSink, RecordingSink, ReportEvent, ReportSink};
