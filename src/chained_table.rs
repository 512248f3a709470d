use std::{iter::Enumerate, num::NonZeroUsize, slice};

use crate::{
    error::{FoldChainError, Result},
    folding_hasher::FoldingHasher,
    key::Key,
};

/// Keys that hashed to the same slot, in insertion order
///
/// Duplicates are kept, every insertion appends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bucket {
    /// The chained keys
    keys: Vec<Key>,
}

impl Bucket {
    /// Appends a key to the end of the chain
    fn push(&mut self, key: Key) {
        self.keys.push(key);
    }

    /// Number of keys in the chain
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if no key was ever placed here
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The chain as a slice, oldest key first
    #[must_use]
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Iterates the chain, oldest key first
    #[must_use]
    pub fn iter(&self) -> slice::Iter<'_, Key> {
        self.keys.iter()
    }
}

impl<'a> IntoIterator for &'a Bucket {
    type Item = &'a Key;
    type IntoIter = slice::Iter<'a, Key>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

/// Result of a single insertion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertOutcome {
    /// Bucket the key was appended to
    pub index: usize,
    /// Whether the bucket already held a key
    pub collided: bool,
}

/// A fixed-capacity hash table resolving collisions by separate chaining.
///
/// Keys are placed with [`FoldingHasher`], so the same key always lands in the
/// same bucket of tables with equal capacity. The table never resizes and
/// never removes keys; it exists to count how often an insertion finds its
/// bucket already occupied.
///
/// ```rust
/// use foldchain::ChainedHashTable;
///
/// let mut table = ChainedHashTable::new(100)?;
/// assert!(!table.insert("000101010001")?.collided);
/// assert!(table.insert("000101010001")?.collided);
/// assert_eq!(table.collision_count(), 1);
/// assert_eq!(table.bucket_contents(3)?.len(), 2);
/// # Ok::<(), foldchain::FoldChainError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ChainedHashTable {
    /// One chain per slot, `capacity` of them
    buckets: Box<[Bucket]>,
    /// Number of buckets, fixed at construction
    capacity: NonZeroUsize,
    /// Total number of stored keys
    size: usize,
    /// Insertions that landed in a non-empty bucket
    collisions: usize,
}

impl ChainedHashTable {
    /// Creates a table with `capacity` empty buckets
    ///
    /// # Errors
    ///
    /// Returns [`FoldChainError::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        let capacity =
            NonZeroUsize::new(capacity).ok_or(FoldChainError::InvalidCapacity { capacity })?;
        Ok(Self::with_capacity(capacity))
    }

    /// Creates a table with a capacity that is known to be non-zero
    #[must_use]
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        let mut buckets = Vec::with_capacity(capacity.get());
        buckets.resize_with(capacity.get(), Bucket::default);

        Self { buckets: buckets.into_boxed_slice(), capacity, size: 0, collisions: 0 }
    }

    /// Validates `key` and inserts it
    ///
    /// # Errors
    ///
    /// Returns [`FoldChainError::InvalidKeyFormat`] for a malformed key, in
    /// which case the table is left untouched.
    pub fn insert(&mut self, key: &str) -> Result<InsertOutcome> {
        let key = Key::parse(key)?;
        Ok(self.insert_key(key))
    }

    /// Appends `key` to its bucket and reports whether that was a collision
    pub fn insert_key(&mut self, key: Key) -> InsertOutcome {
        let index = FoldingHasher::index_for(&key, self.capacity);
        // index_for reduces modulo capacity, so the slot always exists
        let Some(bucket) = self.buckets.get_mut(index) else {
            return InsertOutcome { index, collided: false };
        };

        let collided = !bucket.is_empty();
        bucket.push(key);
        self.size = self.size.saturating_add(1);
        if collided {
            self.collisions = self.collisions.saturating_add(1);
        }

        log::trace!("key placed in bucket {index}, collided: {collided}");
        InsertOutcome { index, collided }
    }

    /// Keys stored in bucket `index`, in insertion order
    ///
    /// # Errors
    ///
    /// Returns [`FoldChainError::IndexOutOfRange`] if `index >= capacity`.
    pub fn bucket_contents(&self, index: usize) -> Result<&[Key]> {
        self.buckets
            .get(index)
            .map(Bucket::keys)
            .ok_or(FoldChainError::IndexOutOfRange { index, capacity: self.capacity.get() })
    }

    /// Number of insertions that found their bucket already occupied
    #[must_use]
    pub fn collision_count(&self) -> usize {
        self.collisions
    }

    /// Returns the number of buckets
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Returns the number of stored keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if nothing was inserted yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Stored keys per bucket
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.size as f64 / self.capacity.get() as f64
    }

    /// Length of the longest chain
    #[must_use]
    pub fn longest_chain(&self) -> usize {
        self.buckets.iter().map(Bucket::len).max().unwrap_or(0)
    }

    /// Number of buckets holding at least one key
    #[must_use]
    pub fn occupied_buckets(&self) -> usize {
        self.buckets.iter().filter(|b| !b.is_empty()).count()
    }

    /// Iterates `(index, bucket)` pairs over every slot, empty ones included
    #[must_use]
    pub fn buckets(&self) -> Buckets<'_> {
        Buckets { inner: self.buckets.iter().enumerate() }
    }
}

impl Extend<Key> for ChainedHashTable {
    fn extend<T: IntoIterator<Item = Key>>(&mut self, iter: T) {
        for key in iter {
            self.insert_key(key);
        }
    }
}

/// Iterator over the slots of a [`ChainedHashTable`]
#[derive(Debug, Clone)]
pub struct Buckets<'a> {
    /// Enumerated bucket slice
    inner: Enumerate<slice::Iter<'a, Bucket>>,
}

impl<'a> Iterator for Buckets<'a> {
    type Item = (usize, &'a Bucket);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Buckets<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for Buckets<'_> {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn keys(texts: &[&str]) -> Vec<Key> {
        texts.iter().map(|t| Key::parse(*t).unwrap()).collect()
    }

    #[test]
    fn test_new_is_empty() {
        let table = ChainedHashTable::new(1009).unwrap();
        assert_eq!(table.capacity(), 1009);
        assert!(table.is_empty());
        assert_eq!(table.collision_count(), 0);
        assert_eq!(table.occupied_buckets(), 0);
        assert_eq!(table.longest_chain(), 0);
        assert!(table.buckets().all(|(_, b)| b.is_empty()));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            ChainedHashTable::new(0),
            Err(FoldChainError::InvalidCapacity { capacity: 0 })
        ));
    }

    #[test]
    fn test_duplicate_key_collides() {
        let mut table = ChainedHashTable::new(100).unwrap();

        let first = table.insert("000101010001").unwrap();
        assert_eq!(first, InsertOutcome { index: 3, collided: false });
        let second = table.insert("000101010001").unwrap();
        assert_eq!(second, InsertOutcome { index: 3, collided: true });

        assert_eq!(table.collision_count(), 1);
        assert_eq!(table.bucket_contents(3).unwrap(), keys(&["000101010001", "000101010001"]));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_chain_keeps_insertion_order() {
        let mut table = ChainedHashTable::new(10).unwrap();
        // 0001 + 0002 = 3, 0003 + 0000 = 3, 0000 + 0013 = 13
        table.insert("00010002").unwrap();
        table.insert("00030000").unwrap();
        table.insert("00000013").unwrap();

        assert_eq!(
            table.bucket_contents(3).unwrap(),
            keys(&["00010002", "00030000", "00000013"])
        );
        assert_eq!(table.collision_count(), 2);
        assert_eq!(table.longest_chain(), 3);
        assert_eq!(table.occupied_buckets(), 1);
    }

    #[test]
    fn test_capacity_one_collides_after_first() {
        let mut table = ChainedHashTable::new(1).unwrap();
        for i in 0..50 {
            table.insert(&format!("{i:08}")).unwrap();
        }
        assert_eq!(table.collision_count(), 49);
        assert_eq!(table.bucket_contents(0).unwrap().len(), 50);
    }

    #[test]
    fn test_bucket_contents_out_of_range() {
        let table = ChainedHashTable::new(5).unwrap();
        assert!(table.bucket_contents(4).unwrap().is_empty());
        assert!(matches!(
            table.bucket_contents(5),
            Err(FoldChainError::IndexOutOfRange { index: 5, capacity: 5 })
        ));
    }

    #[test]
    fn test_malformed_key_leaves_table_untouched() {
        let mut table = ChainedHashTable::new(100).unwrap();
        table.insert("000101010001").unwrap();

        let err = table.insert("0001010100011").unwrap_err();
        assert!(matches!(err, FoldChainError::InvalidKeyFormat { .. }));

        assert_eq!(table.len(), 1);
        assert_eq!(table.collision_count(), 0);
        let sizes: Vec<usize> = table.buckets().map(|(_, b)| b.len()).collect();
        assert_eq!(sizes.iter().sum::<usize>(), 1);
        assert_eq!(table.bucket_contents(3).unwrap().len(), 1);
    }

    #[test]
    fn test_same_placement_in_fresh_tables() {
        let mut a = ChainedHashTable::new(2003).unwrap();
        let mut b = ChainedHashTable::new(2003).unwrap();
        let key = Key::parse("850115140042").unwrap();
        assert_eq!(a.insert_key(key.clone()).index, b.insert_key(key).index);
    }

    #[test]
    fn test_extend_and_load_factor() {
        let mut table = ChainedHashTable::new(4).unwrap();
        table.extend(keys(&["0000", "0001", "0002", "0003", "0004", "0005"]));
        assert_eq!(table.len(), 6);
        assert_eq!(table.collision_count(), 2);
        assert!((table.load_factor() - 1.5).abs() < f64::EPSILON);
        assert_eq!(table.buckets().len(), 4);
        assert_eq!(table.buckets().next_back().map(|(i, _)| i), Some(3));
    }

    proptest! {
        /// Property: no key is lost and every key sits in its hash bucket
        #[test]
        fn prop_batch_is_conserved(
            batch in prop::collection::vec("[0-9]{12}", 1..300),
            capacity in 1usize..200,
        ) {
            let mut table = ChainedHashTable::new(capacity).unwrap();
            for key in &batch {
                table.insert(key).unwrap();
            }

            let stored: usize = table.buckets().map(|(_, b)| b.len()).sum();
            prop_assert_eq!(stored, batch.len());
            prop_assert_eq!(table.len(), batch.len());

            for (index, bucket) in table.buckets() {
                for key in bucket {
                    prop_assert_eq!(FoldingHasher::hash(key.as_str(), capacity).unwrap(), index);
                }
            }
        }

        /// Property: the running collision counter matches a replay of the batch
        #[test]
        fn prop_collisions_match_replay(
            batch in prop::collection::vec("[0-9]{16}", 1..300),
            capacity in 1usize..400,
        ) {
            let mut table = ChainedHashTable::new(capacity).unwrap();
            let mut seen = vec![false; capacity];
            let mut expected = 0usize;

            for key in &batch {
                let index = FoldingHasher::hash(key, capacity).unwrap();
                let occupied = seen[index];
                if occupied {
                    expected += 1;
                }
                seen[index] = true;

                let outcome = table.insert(key).unwrap();
                prop_assert_eq!(outcome, InsertOutcome { index, collided: occupied });
            }

            prop_assert_eq!(table.collision_count(), expected);
        }
    }
}
