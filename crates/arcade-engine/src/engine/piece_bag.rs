use std::{collections::VecDeque, fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

/// Piece generator using the 7-bag randomization algorithm.
///
/// # 7-Bag System
///
/// 1. Fill the bag with all 7 piece types
/// 2. Shuffle it (Fisher–Yates)
/// 3. Draw pieces in order until the bag is empty, then go back to 1
///
/// Every 7 draws starting at a refill boundary contain each type exactly once.
///
/// # Example
///
/// ```
/// use arcade_engine::{PieceBag, PieceKind};
///
/// let mut bag = PieceBag::new();
/// let mut drawn: Vec<PieceKind> = (0..7).map(|_| bag.draw()).collect();
/// drawn.sort();
/// assert_eq!(drawn, [
///     PieceKind::I, PieceKind::O, PieceKind::S, PieceKind::Z,
///     PieceKind::J, PieceKind::L, PieceKind::T,
/// ]);
/// ```
#[derive(Debug, Clone)]
pub struct PieceBag {
    rng: Pcg32,
    bag: VecDeque<PieceKind>,
}

impl Default for PieceBag {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceBag {
    /// Creates a new bag with a random seed.
    ///
    /// For deterministic piece generation, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic piece generation.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
            bag: VecDeque::with_capacity(PieceKind::LEN),
        }
    }

    /// Draws the next piece, refilling and reshuffling the bag when it is empty.
    pub fn draw(&mut self) -> PieceKind {
        if let Some(kind) = self.bag.pop_front() {
            return kind;
        }
        let mut new_bag = PieceKind::ALL;
        new_bag.shuffle(&mut self.rng);
        let [first, rest @ ..] = new_bag;
        self.bag.extend(rest);
        first
    }

    /// Returns the piece types left in the current shuffle cycle.
    pub fn remaining(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.bag.iter().copied()
    }

    /// Discards the current bag. The random stream is not re-seeded.
    pub fn reset(&mut self) {
        self.bag.clear();
    }
}

/// Seed for deterministic piece generation.
///
/// A 128-bit (16-byte) seed for the bag's random number generator. Using the
/// same seed produces the same sequence of pieces, which makes games
/// reproducible for debugging, headless simulation, and tests.
///
/// Seeds are written as 32 hexadecimal digits (big-endian), both by
/// [`Display`](fmt::Display) and by serde.
///
/// # Example
///
/// ```
/// use arcade_engine::{GameSession, PieceSeed};
/// use rand::Rng as _;
///
/// // Generate a random seed
/// let seed: PieceSeed = rand::rng().random();
///
/// // Both sessions will have the same piece sequence
/// let session1 = GameSession::with_seed(seed);
/// let session2 = GameSession::with_seed(seed);
/// assert_eq!(session1.snapshot().next, session2.snapshot().next);
///
/// // Seeds round-trip through their hex form
/// let parsed: PieceSeed = seed.to_string().parse().unwrap();
/// assert_eq!(parsed, seed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSeed([u8; 16]);

/// Error returned when parsing a [`PieceSeed`] from hex.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParsePieceSeedError {
    #[display("invalid hex seed: expected 32 characters, got {len}")]
    InvalidLength { len: usize },
    #[display("invalid hex seed: '{input}' contains non-hex characters")]
    InvalidDigit { input: String },
}

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for PieceSeed {
    type Err = ParsePieceSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParsePieceSeedError::InvalidLength { len: s.len() });
        }
        // `from_str_radix` accepts a leading sign, so check the digits first
        if !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParsePieceSeedError::InvalidDigit {
                input: s.to_owned(),
            });
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| ParsePieceSeedError::InvalidDigit {
            input: s.to_owned(),
        })?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `PieceSeed` values using the standard random distribution.
///
/// This implementation enables idiomatic seed generation with `rng.random()`.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: PieceSeed = PieceSeed([
        0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77,
        0x88,
    ]);

    #[test]
    fn test_every_bag_contains_each_kind_once() {
        let mut bag = PieceBag::with_seed(SEED);
        for _ in 0..10 {
            let mut drawn: Vec<_> = (0..PieceKind::LEN).map(|_| bag.draw()).collect();
            assert_eq!(bag.remaining().count(), 0);
            drawn.sort();
            let mut all = PieceKind::ALL.to_vec();
            all.sort();
            assert_eq!(drawn, all);
        }
    }

    #[test]
    fn test_remaining_shrinks_until_refill() {
        let mut bag = PieceBag::with_seed(SEED);
        assert_eq!(bag.remaining().count(), 0);

        let first = bag.draw();
        let remaining: Vec<_> = bag.remaining().collect();
        assert_eq!(remaining.len(), 6);
        assert!(!remaining.contains(&first));

        let second = bag.draw();
        assert_eq!(second, remaining[0]);
        assert_eq!(bag.remaining().count(), 5);
    }

    #[test]
    fn test_reset_discards_bag_and_continues_stream() {
        let mut bag = PieceBag::with_seed(SEED);
        let mut fresh = PieceBag::with_seed(SEED);
        bag.draw();
        bag.reset();
        assert_eq!(bag.remaining().count(), 0);

        // The next draw starts a new cycle; it comes from the second shuffle
        // of the stream rather than repeating the first.
        let after_reset: Vec<_> = (0..PieceKind::LEN).map(|_| bag.draw()).collect();
        let _first_cycle: Vec<_> = (0..PieceKind::LEN).map(|_| fresh.draw()).collect();
        let second_cycle: Vec<_> = (0..PieceKind::LEN).map(|_| fresh.draw()).collect();
        assert_eq!(after_reset, second_cycle);
    }

    #[test]
    fn test_deterministic_piece_generation() {
        let mut bag1 = PieceBag::with_seed(SEED);
        let mut bag2 = PieceBag::with_seed(SEED);

        for _ in 0..50 {
            assert_eq!(bag1.draw(), bag2.draw());
        }
    }

    mod piece_seed_serialization {
        use super::*;

        #[test]
        fn test_format_is_32_char_hex_string() {
            let seed: PieceSeed = rand::rng().random();
            let serialized = serde_json::to_string(&seed).unwrap();
            let hex_str = serialized.trim_matches('"');

            assert_eq!(hex_str.len(), 32);
            assert!(hex_str.chars().all(|c| c.is_ascii_hexdigit()));
        }

        #[test]
        fn test_known_value_all_zeros() {
            let seed = PieceSeed([0u8; 16]);
            let serialized = serde_json::to_string(&seed).unwrap();
            assert_eq!(serialized, "\"00000000000000000000000000000000\"");

            let deserialized: PieceSeed = serde_json::from_str(&serialized).unwrap();
            assert_eq!(deserialized, seed);
        }

        #[test]
        fn test_known_value_sequential_bytes() {
            // Big-endian: bytes appear in order as hex pairs
            let seed = PieceSeed([
                0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
                0x32, 0x10,
            ]);
            assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");

            let deserialized: PieceSeed =
                serde_json::from_str("\"0123456789ABCDEFFEDCBA9876543210\"").unwrap();
            assert_eq!(deserialized, seed);
        }

        #[test]
        fn test_error_invalid_hex_characters() {
            let err = "ghijklmnopqrstuvwxyzghijklmnopqr"
                .parse::<PieceSeed>()
                .unwrap_err();
            assert!(matches!(err, ParsePieceSeedError::InvalidDigit { .. }));
            assert!(err.to_string().contains("invalid hex"));

            // Signs are not hex digits
            assert!("+123456789abcdef0123456789abcdef".parse::<PieceSeed>().is_err());
        }

        #[test]
        fn test_error_wrong_length() {
            for input in ["", "0123456789abcdef0123456789abcde", "0123456789abcdef0123456789abcdef0"] {
                let err = input.parse::<PieceSeed>().unwrap_err();
                assert_eq!(err, ParsePieceSeedError::InvalidLength { len: input.len() });
            }

            let result: Result<PieceSeed, _> = serde_json::from_str("\"abc\"");
            assert!(result.unwrap_err().to_string().contains("invalid hex"));
        }

        #[test]
        fn test_serialize_deserialize_preserves_piece_generation() {
            let original_seed: PieceSeed = rand::rng().random();
            let serialized = serde_json::to_string(&original_seed).unwrap();
            let deserialized_seed: PieceSeed = serde_json::from_str(&serialized).unwrap();

            let mut bag1 = PieceBag::with_seed(original_seed);
            let mut bag2 = PieceBag::with_seed(deserialized_seed);
            for _ in 0..20 {
                assert_eq!(bag1.draw(), bag2.draw());
            }
        }
    }
}
