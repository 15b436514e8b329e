//! A six-sided die.

use rand::Rng;
use std::fmt;

/// Number of faces on the die.
pub const FACES: u8 = 6;

/// The outcome of one roll. Always in `1..=FACES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Roll(u8);

impl Roll {
    /// Validate a face value.
    pub fn new(value: u8) -> Option<Self> {
        (1..=FACES).contains(&value).then_some(Self(value))
    }

    /// Roll with the thread-local RNG.
    pub fn random() -> Self {
        Self::from_rng(&mut rand::thread_rng())
    }

    /// Roll with a caller-supplied RNG.
    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(1..=FACES))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Zero-based face index, for per-face tables.
    pub(crate) fn index(self) -> usize {
        usize::from(self.0 - 1)
    }

    /// Every face in ascending order.
    pub fn faces() -> impl Iterator<Item = Roll> {
        (1..=FACES).map(Roll)
    }
}

impl fmt::Display for Roll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
