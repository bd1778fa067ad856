//! Dice definitions, parsing & sampling
//!
//! This module provides the basic building blocks of the distribution
//! engine: a single [`Die`] (parsed from tokens such as `d6`), an ordered
//! [`DiceSet`], and the [`Outcome`]s obtained by rolling a set.
use std::num::NonZeroU32;
use std::str::FromStr;

use itertools::Itertools;
use rand::Rng;

/// User input errors
#[derive(Clone, PartialEq, Eq, Debug)]
#[derive(thiserror::Error)]
pub enum DiceError {
    /// Die token not matching `d<faces>`
    #[error("Invalid die format: {0}")]
    InvalidDieFormat(String),

    /// Unknown command-line flag
    #[error("Invalid flag: {0}")]
    InvalidFlag(String),

    /// Flags given, but no dice
    #[error("No dice specified.")]
    NoDiceSpecified,

    /// Nothing given at all
    #[error("No arguments given")]
    NoArguments,

    /// The outcome space is too large to be counted
    #[error("Too many combinations to count")]
    TooManyCombinations,
}

/// A uniform die with faces `1..=F`
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Die(NonZeroU32);

impl Die {
    /// The number of faces on this die
    pub fn faces(&self) -> u32 {
        self.0.get()
    }

    /// All face values of this die, in ascending order
    pub fn face_values(&self) -> std::ops::RangeInclusive<u32> {
        1..=self.faces()
    }

    /// Roll this die once, uniformly
    pub fn roll<R: Rng>(&self, rng: &mut R) -> u32 {
        rng.random_range(self.face_values())
    }
}

impl TryFrom<&str> for Die {
    type Error = <Self as FromStr>::Err;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_str(value)
    }
}

impl FromStr for Die {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use lazy_regex::regex_captures;
        regex_captures!(r"^d([0-9]+)$"i, s)
            .and_then(|(_, faces)| faces.parse::<u32>().ok())
            .and_then(NonZeroU32::new)
            .map(Self)
            .ok_or_else(|| DiceError::InvalidDieFormat(s.to_owned()))
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.0)
    }
}

/// A non-empty, ordered set of dice
///
/// The order of the dice has no effect on the distribution of sums; it
/// only determines the order in which outcomes are enumerated.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct DiceSet(Vec<Die>);

impl DiceSet {
    /// Build a dice set, rejecting an empty one
    pub fn new(dice: Vec<Die>) -> Result<Self, DiceError> {
        match dice.is_empty() {
            true => Err(DiceError::NoDiceSpecified),
            false => Ok(Self(dice)),
        }
    }

    /// The dice in this set
    pub fn dice(&self) -> &[Die] {
        &self.0
    }

    /// The number of possible outcomes, i.e. the product of all face counts
    pub fn total_combinations(&self) -> Result<u64, DiceError> {
        self.0
            .iter()
            .try_fold(1u64, |total, die| total.checked_mul(die.faces().into()))
            .ok_or(DiceError::TooManyCombinations)
    }

    /// The largest achievable sum
    pub fn max_sum(&self) -> u64 {
        self.0.iter().map(|die| u64::from(die.faces())).sum()
    }

    /// Enumerate every possible outcome
    ///
    /// Outcomes are produced lazily in lexicographic order, with the last
    /// die varying fastest. Note that the number of outcomes is the product
    /// of all face counts, which grows very quickly.
    pub fn outcomes(&self) -> impl Iterator<Item = Outcome> + '_ {
        self.0
            .iter()
            .map(Die::face_values)
            .multi_cartesian_product()
            .map(Outcome)
    }

    /// Roll every die once
    ///
    /// Each die is drawn independently, which is equivalent to picking one
    /// outcome uniformly from the full outcome space.
    pub fn roll<R: Rng>(&self, rng: &mut R) -> Outcome {
        let outcome = Outcome(self.0.iter().map(|die| die.roll(rng)).collect());
        log::trace!("Rolled {:?}", outcome.faces());
        outcome
    }
}

impl std::fmt::Display for DiceSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join(" "))
    }
}

/// One joint realization of all dice in a set
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Outcome(Vec<u32>);

impl Outcome {
    /// Per-die face values, in dice set order
    pub fn faces(&self) -> &[u32] {
        &self.0
    }

    /// The total of all face values
    pub fn sum(&self) -> u64 {
        self.0.iter().copied().map(u64::from).sum()
    }
}
