//! Error type shared by the table, the hasher and the experiment runner

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T, E = FoldChainError> = std::result::Result<T, E>;

/// Everything that can go wrong while hashing, inserting or running an experiment
#[derive(Error, Debug)]
pub enum FoldChainError {
    /// Table capacity must be a positive number of buckets
    #[error("Invalid capacity {capacity}, a table needs at least one bucket")]
    InvalidCapacity {
        /// The rejected capacity
        capacity: usize,
    },
    /// Key is not a run of 4-digit groups
    #[error("Invalid key {key:?}: {reason}")]
    InvalidKeyFormat {
        /// The rejected key text
        key: String,
        /// What is wrong with it
        reason: KeyFormatIssue,
    },
    /// Bucket lookup outside of `0..capacity`
    #[error("Bucket index {index} out of range, valid range: 0..{capacity}")]
    IndexOutOfRange {
        /// Requested bucket index
        index: usize,
        /// Number of buckets in the table
        capacity: usize,
    },
    /// An experiment needs at least one round to average over
    #[error("Invalid round count {rounds}, at least one round is required")]
    InvalidRoundCount {
        /// The rejected round count
        rounds: usize,
    },
    /// An experiment was started without any table capacity to compare
    #[error("No table capacities given")]
    NoCapacities,
    /// The key generator produced a batch of the wrong size
    #[error("Key generator returned {actual} keys, expected: {expected}")]
    BatchSizeMismatch {
        /// Requested batch size
        expected: usize,
        /// Number of keys actually produced
        actual: usize,
    },
    /// A report sink failed to write its output
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Chart rendering failed
    #[error("Could not render chart: {0}")]
    Chart(String),
}

/// Reason a key was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFormatIssue {
    /// Zero-length key
    Empty,
    /// Length is not a multiple of the digit group width
    Length(usize),
    /// A character other than `0-9` at the given byte offset
    NonDigit(usize),
}

impl std::fmt::Display for KeyFormatIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "key is empty"),
            Self::Length(len) => {
                write!(f, "length {len} is not a multiple of {}", crate::key::GROUP_WIDTH)
            }
            Self::NonDigit(pos) => write!(f, "non-digit character at position {pos}"),
        }
    }
}
