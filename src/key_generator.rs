//! Sources of synthetic keys for collision experiments

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::key::{Key, KeyWidth};

/// Produces batches of well-formed keys
///
/// The runner only relies on the shape of what comes back: `n` keys, each a
/// valid [`Key`]. How the keys are distributed is up to the implementation.
pub trait KeyGenerator {
    /// Returns the next `n` keys
    fn next_batch(&mut self, n: usize) -> Vec<Key>;
}

impl<G: KeyGenerator + ?Sized> KeyGenerator for &mut G {
    fn next_batch(&mut self, n: usize) -> Vec<Key> {
        (**self).next_batch(n)
    }
}

/// Generates Malaysian identity card style numbers from a seeded RNG
///
/// Twelve digit keys follow `YYMMDDSSNNNN`: birth year 1980-2005, month, a day
/// capped at 28, one of 21 state codes and a 4-digit serial. Sixteen digit keys
/// append an extension in `1000..=9999`.
#[derive(Debug, Clone)]
pub struct IcNumberGenerator {
    /// Encoding of the produced keys
    width: KeyWidth,
    /// Private random state, never shared with other generators
    rng: StdRng,
}

impl IcNumberGenerator {
    /// First birth year drawn
    const YEAR_MIN: u32 = 1980;
    /// Last birth year drawn
    const YEAR_MAX: u32 = 2005;
    /// Highest day of month drawn, keeps every date valid
    const DAY_MAX: u32 = 28;
    /// Number of state codes
    const STATES: u32 = 21;

    /// Creates a generator whose output is fully determined by `seed`
    #[must_use]
    pub fn new(width: KeyWidth, seed: u64) -> Self {
        Self { width, rng: StdRng::seed_from_u64(seed) }
    }

    /// Creates a generator seeded from the operating system
    #[must_use]
    pub fn from_entropy(width: KeyWidth) -> Self {
        Self { width, rng: StdRng::from_os_rng() }
    }

    /// Encoding of the produced keys
    #[must_use]
    pub fn width(&self) -> KeyWidth {
        self.width
    }

    /// Draws one key
    pub fn next_key(&mut self) -> Key {
        let year = self.rng.random_range(Self::YEAR_MIN..=Self::YEAR_MAX) % 100;
        let month = self.rng.random_range(1..=12u32);
        let day = self.rng.random_range(1..=Self::DAY_MAX);
        let state = self.rng.random_range(1..=Self::STATES);
        let serial = self.rng.random_range(0..=9999u32);

        let mut digits = format!("{year:02}{month:02}{day:02}{state:02}{serial:04}");
        if self.width == KeyWidth::Sixteen {
            let extension = self.rng.random_range(1000..=9999u32);
            digits.push_str(&extension.to_string());
        }
        Key::from_digits(digits)
    }
}

impl KeyGenerator for IcNumberGenerator {
    fn next_batch(&mut self, n: usize) -> Vec<Key> {
        (0..n).map(|_| self.next_key()).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::key::GROUP_WIDTH;

    fn field(key: &Key, start: usize) -> u32 {
        key.as_str().get(start..start + 2).unwrap().parse().unwrap()
    }

    #[test]
    fn test_twelve_digit_layout() {
        let mut generator = IcNumberGenerator::new(KeyWidth::Twelve, 7);
        for key in generator.next_batch(500) {
            assert_eq!(key.len(), 12);
            assert!(key.as_str().bytes().all(|b| b.is_ascii_digit()));

            let year = field(&key, 0);
            assert!(year >= 80 || year <= 5, "year {year} out of range in {key}");
            assert!((1..=12).contains(&field(&key, 2)));
            assert!((1..=28).contains(&field(&key, 4)));
            assert!((1..=21).contains(&field(&key, 6)));
        }
    }

    #[test]
    fn test_sixteen_digit_layout() {
        let mut generator = IcNumberGenerator::new(KeyWidth::Sixteen, 7);
        assert_eq!(generator.width(), KeyWidth::Sixteen);
        for key in generator.next_batch(500) {
            assert_eq!(key.len(), 16);
            assert_eq!(key.len() % GROUP_WIDTH, 0);
            let extension: u32 = key.as_str().get(12..).unwrap().parse().unwrap();
            assert!((1000..=9999).contains(&extension));
        }
    }

    #[test]
    fn test_same_seed_same_keys() {
        let a = IcNumberGenerator::new(KeyWidth::Twelve, 42).next_batch(100);
        let b = IcNumberGenerator::new(KeyWidth::Twelve, 42).next_batch(100);
        let c = IcNumberGenerator::new(KeyWidth::Twelve, 43).next_batch(100);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    fn draw<G: KeyGenerator>(mut source: G, n: usize) -> usize {
        source.next_batch(n).len()
    }

    #[test]
    fn test_batch_size_and_mut_ref() {
        let mut generator = IcNumberGenerator::from_entropy(KeyWidth::Twelve);
        assert_eq!(draw(&mut generator, 0), 0);
        assert_eq!(draw(&mut generator, 1000), 1000);
    }
}
