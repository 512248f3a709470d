//! Digit-group folding hash
//!
//! A key is cut into consecutive 4-digit groups, each group is read as a
//! base-10 number, the numbers are summed and the sum is reduced modulo the
//! table capacity. `"000101010001"` folds to `1 + 101 + 1 = 103`.

use std::num::NonZeroUsize;

use crate::{
    error::{FoldChainError, Result},
    key::{self, Key},
};

/// Stateless folding hash function
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FoldingHasher;

impl FoldingHasher {
    /// Maps `key` to a bucket index in `0..capacity`
    ///
    /// # Errors
    ///
    /// Returns [`FoldChainError::InvalidCapacity`] when `capacity` is zero and
    /// [`FoldChainError::InvalidKeyFormat`] when `key` is not made of whole
    /// digit groups.
    pub fn hash(key: &str, capacity: usize) -> Result<usize> {
        let capacity =
            NonZeroUsize::new(capacity).ok_or(FoldChainError::InvalidCapacity { capacity })?;
        key::validate(key).map_err(|reason| FoldChainError::InvalidKeyFormat {
            key: key.to_string(),
            reason,
        })?;
        Ok(Self::reduce(Self::fold_digits(key.as_bytes()), capacity))
    }

    /// Sum of the key's digit groups, before reduction
    #[must_use]
    pub fn fold(key: &Key) -> usize {
        Self::fold_digits(key.as_str().as_bytes())
    }

    /// Bucket index of an already validated key
    #[must_use]
    pub fn index_for(key: &Key, capacity: NonZeroUsize) -> usize {
        Self::reduce(Self::fold(key), capacity)
    }

    /// Folds validated ASCII digits group by group
    fn fold_digits(digits: &[u8]) -> usize {
        digits
            .chunks_exact(key::GROUP_WIDTH)
            .map(Self::group_value)
            .fold(0, usize::saturating_add)
    }

    /// Value of one group of ASCII digits
    fn group_value(group: &[u8]) -> usize {
        group.iter().fold(0usize, |acc, digit| {
            acc.saturating_mul(10).saturating_add(usize::from(digit.saturating_sub(b'0')))
        })
    }

    /// Reduces a folded sum into `0..capacity`
    #[allow(clippy::arithmetic_side_effects)]
    fn reduce(sum: usize, capacity: NonZeroUsize) -> usize {
        sum % capacity
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_concrete_fold() {
        assert_eq!(FoldingHasher::hash("000101010001", 100).unwrap(), 3);
        assert_eq!(FoldingHasher::fold(&Key::parse("000101010001").unwrap()), 103);
        assert_eq!(FoldingHasher::hash("999999999999", 1_000_000).unwrap(), 29_997);
    }

    #[test]
    fn test_sixteen_digit_key() {
        // 8501 + 1514 + 0042 + 1234
        assert_eq!(FoldingHasher::hash("8501151400421234", 1009).unwrap(), 11_291 % 1009);
    }

    #[test]
    fn test_capacity_one() {
        assert_eq!(FoldingHasher::hash("12345678", 1).unwrap(), 0);
    }

    #[test]
    fn test_zero_capacity() {
        assert!(matches!(
            FoldingHasher::hash("000101010001", 0),
            Err(FoldChainError::InvalidCapacity { capacity: 0 })
        ));
    }

    #[test]
    fn test_malformed_keys() {
        for bad in ["", "123", "1234567890123", "12ab", "1234 678"] {
            assert!(
                matches!(FoldingHasher::hash(bad, 100), Err(FoldChainError::InvalidKeyFormat { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_index_for_matches_hash() {
        let key = Key::parse("900101141234").unwrap();
        let capacity = NonZeroUsize::new(2003).unwrap();
        assert_eq!(
            FoldingHasher::index_for(&key, capacity),
            FoldingHasher::hash(key.as_str(), 2003).unwrap()
        );
    }

    proptest! {
        /// Property: index is in range and stable across calls
        #[test]
        fn prop_index_in_range_and_stable(
            key in "([0-9]{4}){1,6}",
            capacity in 1usize..5000,
        ) {
            let first = FoldingHasher::hash(&key, capacity).unwrap();
            let second = FoldingHasher::hash(&key, capacity).unwrap();
            prop_assert!(first < capacity);
            prop_assert_eq!(first, second);
        }

        /// Property: folding equals the sum of the parsed groups
        #[test]
        fn prop_fold_is_group_sum(groups in prop::collection::vec(0u32..10_000, 1..6)) {
            let text: String = groups.iter().map(|g| format!("{g:04}")).collect();
            let expected: u32 = groups.iter().sum();
            let key = Key::parse(text).unwrap();
            prop_assert_eq!(FoldingHasher::fold(&key), usize::try_from(expected).unwrap());
        }
    }
}
