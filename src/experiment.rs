//! Repeated insertion trials comparing table capacities
//!
//! Every round draws one batch of keys and inserts that same batch into a
//! fresh table per capacity, so the per-round collision counts of different
//! capacities are directly comparable. After the last round each capacity gets
//! a [`TrialResult`] holding its round values and their mean.

use std::{num::NonZeroUsize, panic, thread};

use crate::{
    chained_table::ChainedHashTable,
    error::{FoldChainError, Result},
    key::Key,
    key_generator::KeyGenerator,
    report::ReportSink,
};

/// Parameters of one experiment run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentConfig {
    /// Number of rounds to average over
    pub rounds: usize,
    /// Keys drawn per round
    pub batch_size: usize,
    /// Table capacities compared in every round
    pub capacities: Vec<usize>,
    /// Build each round's tables on scoped worker threads
    pub parallel: bool,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self { rounds: 10, batch_size: 1000, capacities: vec![1009, 2003], parallel: false }
    }
}

impl ExperimentConfig {
    /// Checks the parameters and returns the capacities as non-zero values
    ///
    /// # Errors
    ///
    /// [`FoldChainError::InvalidRoundCount`] for zero rounds,
    /// [`FoldChainError::NoCapacities`] for an empty capacity list and
    /// [`FoldChainError::InvalidCapacity`] for a zero capacity.
    pub fn validate(&self) -> Result<Vec<NonZeroUsize>> {
        if self.rounds == 0 {
            return Err(FoldChainError::InvalidRoundCount { rounds: self.rounds });
        }
        if self.capacities.is_empty() {
            return Err(FoldChainError::NoCapacities);
        }
        self.capacities
            .iter()
            .map(|&capacity| {
                NonZeroUsize::new(capacity).ok_or(FoldChainError::InvalidCapacity { capacity })
            })
            .collect()
    }
}

/// Collision count of one capacity in one round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundCount {
    /// Table capacity
    pub capacity: usize,
    /// Collisions seen while inserting the round's batch
    pub collisions: usize,
}

/// Per-round collision counts of one capacity and their average
#[derive(Debug, Clone, PartialEq)]
pub struct TrialResult {
    /// Table capacity
    capacity: usize,
    /// Collision count of every round, in round order
    round_collisions: Vec<usize>,
    /// Arithmetic mean of `round_collisions`
    average: f64,
}

impl TrialResult {
    /// Builds a result from the collision counts of each round
    ///
    /// # Errors
    ///
    /// Returns [`FoldChainError::InvalidRoundCount`] if `round_collisions` is empty.
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn new(capacity: usize, round_collisions: Vec<usize>) -> Result<Self> {
        if round_collisions.is_empty() {
            return Err(FoldChainError::InvalidRoundCount { rounds: 0 });
        }
        let total = round_collisions.iter().fold(0usize, |acc, &c| acc.saturating_add(c));
        let average = total as f64 / round_collisions.len() as f64;
        Ok(Self { capacity, round_collisions, average })
    }

    /// Table capacity
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Collision count of every round, in round order
    #[must_use]
    pub fn round_collisions(&self) -> &[usize] {
        &self.round_collisions
    }

    /// Number of rounds
    #[must_use]
    pub fn rounds(&self) -> usize {
        self.round_collisions.len()
    }

    /// Mean collisions per round
    #[must_use]
    pub fn average(&self) -> f64 {
        self.average
    }
}

/// Drives collision trials and feeds their numbers to a [`ReportSink`]
#[derive(Debug)]
pub struct ExperimentRunner<S> {
    /// Receiver of per-round and summary data
    sink: S,
}

impl<S: ReportSink> ExperimentRunner<S> {
    /// Creates a runner reporting to `sink`
    #[must_use]
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Runs `rounds` sequential rounds of `batch_size` keys against every capacity
    ///
    /// Returns one [`TrialResult`] per capacity, in the order given.
    ///
    /// # Errors
    ///
    /// Fails on invalid parameters (see [`ExperimentConfig::validate`]) before
    /// drawing any key, on a generator returning the wrong number of keys, and
    /// on sink failures.
    pub fn run<G: KeyGenerator + ?Sized>(
        &mut self,
        rounds: usize,
        batch_size: usize,
        capacities: &[usize],
        key_source: &mut G,
    ) -> Result<Vec<TrialResult>> {
        let config = ExperimentConfig {
            rounds,
            batch_size,
            capacities: capacities.to_vec(),
            parallel: false,
        };
        self.run_config(&config, key_source)
    }

    /// Runs the experiment described by `config`
    ///
    /// # Errors
    ///
    /// Same as [`ExperimentRunner::run`].
    pub fn run_config<G: KeyGenerator + ?Sized>(
        &mut self,
        config: &ExperimentConfig,
        key_source: &mut G,
    ) -> Result<Vec<TrialResult>> {
        let capacities = config.validate()?;
        log::debug!(
            "starting {} rounds of {} keys over capacities {:?}",
            config.rounds,
            config.batch_size,
            config.capacities
        );

        let mut per_capacity: Vec<Vec<usize>> =
            vec![Vec::with_capacity(config.rounds); capacities.len()];

        for round in 1..=config.rounds {
            let batch = key_source.next_batch(config.batch_size);
            if batch.len() != config.batch_size {
                return Err(FoldChainError::BatchSizeMismatch {
                    expected: config.batch_size,
                    actual: batch.len(),
                });
            }

            let tables = if config.parallel {
                fill_tables_scoped(&batch, &capacities)
            } else {
                capacities.iter().map(|&capacity| fill_table(&batch, capacity)).collect()
            };

            let mut counts = Vec::with_capacity(tables.len());
            for (table, collisions) in tables.iter().zip(per_capacity.iter_mut()) {
                self.sink.table_built(round, table)?;
                collisions.push(table.collision_count());
                counts.push(RoundCount {
                    capacity: table.capacity(),
                    collisions: table.collision_count(),
                });
            }

            self.sink.round_finished(round, &counts)?;
        }

        let results = capacities
            .iter()
            .zip(per_capacity)
            .map(|(capacity, rounds)| TrialResult::new(capacity.get(), rounds))
            .collect::<Result<Vec<_>>>()?;

        self.sink.summary(&results)?;
        Ok(results)
    }

    /// Gives the sink back, e.g. to inspect what it recorded
    #[must_use]
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Borrows the sink
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }
}

/// Fills a fresh table with the whole batch
fn fill_table(batch: &[Key], capacity: NonZeroUsize) -> ChainedHashTable {
    let mut table = ChainedHashTable::with_capacity(capacity);
    table.extend(batch.iter().cloned());
    table
}

/// Fills one table per capacity, each on its own scoped thread
///
/// Tables come back in capacity order once every worker has joined.
fn fill_tables_scoped(batch: &[Key], capacities: &[NonZeroUsize]) -> Vec<ChainedHashTable> {
    thread::scope(|scope| {
        let workers: Vec<_> = capacities
            .iter()
            .map(|&capacity| scope.spawn(move || fill_table(batch, capacity)))
            .collect();

        workers
            .into_iter()
            .map(|worker| worker.join().unwrap_or_else(|payload| panic::resume_unwind(payload)))
            .collect()
    })
}
