//! Where experiment numbers go
//!
//! The runner hands every sink the same structured data: each table after it is
//! filled, the collision counts of each round, and the final averages. How that
//! is rendered is entirely up to the sink.

mod chart;
mod console;

pub use chart::ChartSink;
pub use console::{ConsoleSink, write_preview};

use crate::{
    chained_table::ChainedHashTable,
    error::Result,
    experiment::{RoundCount, TrialResult},
};

/// Receiver of per-round and summary experiment data
pub trait ReportSink {
    /// Called for every filled table before it is dropped
    ///
    /// # Errors
    ///
    /// Implementations fail when their output cannot be written.
    fn table_built(&mut self, _round: usize, _table: &ChainedHashTable) -> Result<()> {
        Ok(())
    }

    /// Called once per round with one count per capacity, in capacity order
    ///
    /// # Errors
    ///
    /// Implementations fail when their output cannot be written.
    fn round_finished(&mut self, round: usize, counts: &[RoundCount]) -> Result<()>;

    /// Called once after the last round
    ///
    /// # Errors
    ///
    /// Implementations fail when their output cannot be written.
    fn summary(&mut self, results: &[TrialResult]) -> Result<()>;
}

impl<S: ReportSink + ?Sized> ReportSink for &mut S {
    fn table_built(&mut self, round: usize, table: &ChainedHashTable) -> Result<()> {
        (**self).table_built(round, table)
    }

    fn round_finished(&mut self, round: usize, counts: &[RoundCount]) -> Result<()> {
        (**self).round_finished(round, counts)
    }

    fn summary(&mut self, results: &[TrialResult]) -> Result<()> {
        (**self).summary(results)
    }
}

impl<S: ReportSink> ReportSink for Option<S> {
    fn table_built(&mut self, round: usize, table: &ChainedHashTable) -> Result<()> {
        self.as_mut().map_or(Ok(()), |sink| sink.table_built(round, table))
    }

    fn round_finished(&mut self, round: usize, counts: &[RoundCount]) -> Result<()> {
        self.as_mut().map_or(Ok(()), |sink| sink.round_finished(round, counts))
    }

    fn summary(&mut self, results: &[TrialResult]) -> Result<()> {
        self.as_mut().map_or(Ok(()), |sink| sink.summary(results))
    }
}

impl<A: ReportSink, B: ReportSink> ReportSink for (A, B) {
    fn table_built(&mut self, round: usize, table: &ChainedHashTable) -> Result<()> {
        self.0.table_built(round, table)?;
        self.1.table_built(round, table)
    }

    fn round_finished(&mut self, round: usize, counts: &[RoundCount]) -> Result<()> {
        self.0.round_finished(round, counts)?;
        self.1.round_finished(round, counts)
    }

    fn summary(&mut self, results: &[TrialResult]) -> Result<()> {
        self.0.summary(results)?;
        self.1.summary(results)
    }
}

/// Writes experiment progress through the `log` facade
#[derive(Debug, Clone, Default)]
pub struct LogSink {
    /// Prefix identifying the run, e.g. the key width
    label: String,
}

impl LogSink {
    /// Creates a sink tagging every record with `label`
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }
}

impl ReportSink for LogSink {
    fn table_built(&mut self, round: usize, table: &ChainedHashTable) -> Result<()> {
        log::debug!(
            "[{}] round {round}: capacity {}, {} keys over {} buckets, longest chain {}, load factor {:.3}",
            self.label,
            table.capacity(),
            table.len(),
            table.occupied_buckets(),
            table.longest_chain(),
            table.load_factor()
        );
        Ok(())
    }

    fn round_finished(&mut self, round: usize, counts: &[RoundCount]) -> Result<()> {
        for count in counts {
            log::info!(
                "[{}] round {round}: capacity {} -> {} collisions",
                self.label,
                count.capacity,
                count.collisions
            );
        }
        Ok(())
    }

    fn summary(&mut self, results: &[TrialResult]) -> Result<()> {
        for result in results {
            log::info!(
                "[{}] capacity {} -> average {:.2} collisions over {} rounds",
                self.label,
                result.capacity(),
                result.average(),
                result.rounds()
            );
        }
        Ok(())
    }
}

/// One call received by a [`RecordingSink`]
#[derive(Debug, Clone, PartialEq)]
pub enum ReportEvent {
    /// A filled table was inspected
    Table {
        /// Round number, starting at 1
        round: usize,
        /// Table capacity
        capacity: usize,
        /// Keys stored
        keys: usize,
        /// Collisions counted while filling
        collisions: usize,
    },
    /// A round finished
    Round {
        /// Round number, starting at 1
        round: usize,
        /// Collisions per capacity
        counts: Vec<RoundCount>,
    },
    /// The run finished
    Summary(Vec<TrialResult>),
}

/// Keeps every report in memory, in arrival order
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    /// Received calls
    events: Vec<ReportEvent>,
}

impl RecordingSink {
    /// Everything received so far
    #[must_use]
    pub fn events(&self) -> &[ReportEvent] {
        &self.events
    }

    /// Consumes the sink, returning what it received
    #[must_use]
    pub fn into_events(self) -> Vec<ReportEvent> {
        self.events
    }

    /// Round events only
    #[must_use]
    pub fn rounds(&self) -> impl Iterator<Item = &ReportEvent> {
        self.events.iter().filter(|e| matches!(e, ReportEvent::Round { .. }))
    }

    /// Table events only
    #[must_use]
    pub fn tables(&self) -> impl Iterator<Item = &ReportEvent> {
        self.events.iter().filter(|e| matches!(e, ReportEvent::Table { .. }))
    }

    /// Summary events only
    #[must_use]
    pub fn summaries(&self) -> impl Iterator<Item = &[TrialResult]> {
        self.events.iter().filter_map(|e| match e {
            ReportEvent::Summary(results) => Some(results.as_slice()),
            _ => None,
        })
    }
}

impl ReportSink for RecordingSink {
    fn table_built(&mut self, round: usize, table: &ChainedHashTable) -> Result<()> {
        self.events.push(ReportEvent::Table {
            round,
            capacity: table.capacity(),
            keys: table.len(),
            collisions: table.collision_count(),
        });
        Ok(())
    }

    fn round_finished(&mut self, round: usize, counts: &[RoundCount]) -> Result<()> {
        self.events.push(ReportEvent::Round { round, counts: counts.to_vec() });
        Ok(())
    }

    fn summary(&mut self, results: &[TrialResult]) -> Result<()> {
        self.events.push(ReportEvent::Summary(results.to_vec()));
        Ok(())
    }
}
