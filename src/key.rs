//! Fixed-length numeric keys
//!
//! A [`Key`] is a string of ASCII digits whose length is a positive multiple of
//! [`GROUP_WIDTH`], so it always splits into whole digit groups for folding.

use std::{fmt, str::FromStr};

use crate::error::{FoldChainError, KeyFormatIssue, Result};

/// Number of digits folded together as one group
pub const GROUP_WIDTH: usize = 4;

/// Checks the key invariant without allocating
pub(crate) fn validate(text: &str) -> std::result::Result<(), KeyFormatIssue> {
    if text.is_empty() {
        return Err(KeyFormatIssue::Empty);
    }
    if let Some(pos) = text.bytes().position(|b| !b.is_ascii_digit()) {
        return Err(KeyFormatIssue::NonDigit(pos));
    }
    if text.len() % GROUP_WIDTH != 0 {
        return Err(KeyFormatIssue::Length(text.len()));
    }
    Ok(())
}

/// An immutable digit string made of whole 4-digit groups
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key(String);

impl Key {
    /// Validates `text` and wraps it as a key
    ///
    /// # Errors
    ///
    /// Returns [`FoldChainError::InvalidKeyFormat`] if `text` is empty, contains a
    /// non-digit, or its length is not a multiple of [`GROUP_WIDTH`].
    pub fn parse(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        match validate(&text) {
            Ok(()) => Ok(Self(text)),
            Err(reason) => Err(FoldChainError::InvalidKeyFormat { key: text, reason }),
        }
    }

    /// Wraps digits produced by a generator that already upholds the invariant
    pub(crate) fn from_digits(digits: String) -> Self {
        debug_assert!(validate(&digits).is_ok(), "generated key {digits:?} is malformed");
        Self(digits)
    }

    /// The key text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of digits in the key
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false, a key has at least one digit group
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the key's digit groups, each exactly [`GROUP_WIDTH`] bytes
    #[must_use]
    pub fn groups(&self) -> impl Iterator<Item = &[u8]> {
        self.0.as_bytes().chunks_exact(GROUP_WIDTH)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Key {
    type Err = FoldChainError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Key {
    type Error = FoldChainError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for Key {
    type Error = FoldChainError;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

/// Key encodings compared by the collision experiment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyWidth {
    /// `YYMMDDSSNNNN` identity card number
    Twelve,
    /// Identity card number followed by a 4-digit extension
    Sixteen,
}

impl KeyWidth {
    /// Number of digits in keys of this width
    #[must_use]
    pub const fn digits(self) -> usize {
        match self {
            Self::Twelve => 12,
            Self::Sixteen => 16,
        }
    }
}

impl fmt::Display for KeyWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.digits())
    }
}

impl FromStr for KeyWidth {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "12" => Ok(Self::Twelve),
            "16" => Ok(Self::Sixteen),
            other => Err(format!("unsupported key width {other:?}, expected 12 or 16")),
        }
    }
}
