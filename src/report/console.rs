use std::io::{self, Write};

use super::ReportSink;
use crate::{
    chained_table::ChainedHashTable,
    error::Result,
    experiment::{RoundCount, TrialResult},
};

/// Slots shown from the start of a table preview
const PREVIEW_HEAD: usize = 11;
/// Slots shown from the end of a table preview
const PREVIEW_TAIL: usize = 4;
/// Width of the closing rule under the averages
const RULE_WIDTH: usize = 57;

/// Writes the first `head` and last `tail` slots of `table`
///
/// Each slot is printed as `table[i]`, followed by its chain joined with
/// ` --> ` when the slot is occupied. Skipped slots are marked with `...`.
///
/// # Errors
///
/// Propagates write failures of `out`.
pub fn write_preview<W: Write + ?Sized>(
    out: &mut W,
    table: &ChainedHashTable,
    head: usize,
    tail: usize,
) -> io::Result<()> {
    let capacity = table.capacity();
    let tail_start = capacity.saturating_sub(tail).max(head);

    for (index, bucket) in table.buckets() {
        if index == head && head < tail_start {
            writeln!(out, "...")?;
        }
        if index >= head && index < tail_start {
            continue;
        }

        write!(out, "table[{index}]")?;
        for key in bucket {
            write!(out, " --> {key}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Plain-text report in the layout of the classic collision experiment
///
/// Tables of the first round are previewed, every round lists its collisions
/// per capacity and the run closes with the averages.
#[derive(Debug)]
pub struct ConsoleSink<W> {
    /// Destination of the report
    out: W,
    /// Run description, e.g. `IC Length 12`
    label: String,
    /// Set once the run header has been written
    started: bool,
}

impl<W: Write> ConsoleSink<W> {
    /// Creates a sink writing to `out`, headed with `label`
    #[must_use]
    pub fn new(out: W, label: impl Into<String>) -> Self {
        Self { out, label: label.into(), started: false }
    }

    /// Returns the underlying writer
    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Writes the run header before the first output
    fn start(&mut self) -> io::Result<()> {
        if !self.started {
            self.started = true;
            writeln!(self.out, "\n===== Running Simulation for {} =====\n", self.label)?;
        }
        Ok(())
    }
}

impl ConsoleSink<io::Stdout> {
    /// Creates a sink writing to standard output
    #[must_use]
    pub fn stdout(label: impl Into<String>) -> Self {
        Self::new(io::stdout(), label)
    }
}

impl<W: Write> ReportSink for ConsoleSink<W> {
    fn table_built(&mut self, round: usize, table: &ChainedHashTable) -> Result<()> {
        self.start()?;
        if round == 1 {
            writeln!(self.out, "Hash Table with size {}:", table.capacity())?;
            write_preview(&mut self.out, table, PREVIEW_HEAD, PREVIEW_TAIL)?;
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn round_finished(&mut self, round: usize, counts: &[RoundCount]) -> Result<()> {
        self.start()?;
        writeln!(self.out, "Round {round}:")?;
        for count in counts {
            writeln!(
                self.out,
                "  Hash Table Size {} → Collisions: {}",
                count.capacity, count.collisions
            )?;
        }
        Ok(())
    }

    fn summary(&mut self, results: &[TrialResult]) -> Result<()> {
        self.start()?;
        writeln!(self.out, "\n----- Average Collisions for {} -----", self.label)?;
        for result in results {
            writeln!(
                self.out,
                "  Hash Table Size {} → Average Collisions: {:.2}",
                result.capacity(),
                result.average()
            )?;
        }
        writeln!(self.out, "{}", "=".repeat(RULE_WIDTH))?;
        self.out.flush()?;
        Ok(())
    }
}
