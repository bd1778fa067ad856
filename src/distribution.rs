//! Sum distribution of a set of dice
use itertools::Itertools;

use crate::dice::{DiceError, DiceSet, Outcome};

/// Glyph used to draw graph bars
pub const GRAPH_GLYPH: char = '=';

/// Largest count drawn at one glyph per occurrence
pub const GRAPH_SCALE_THRESHOLD: u64 = 50;

/// Bar width (before the `+ 1`) for the most frequent sum once scaled
pub const GRAPH_WIDTH: f64 = 50.0;

/// Largest outcome space which is counted by plain enumeration
pub const ENUMERATION_LIMIT: u64 = 1 << 12;

/// Frequency information for a single achievable sum
#[derive(Clone, PartialEq, Debug)]
pub struct SumEntry {
    pub sum: u64,
    pub count: u64,
    pub probability: f64,
    pub graph: String,
}

/// Sum → frequency table for a set of dice
///
/// Entries are sorted by ascending sum, and only sums which can actually
/// be rolled are present; the counts of all entries add up to the total
/// number of combinations.
#[derive(Clone, PartialEq, Debug)]
pub struct FrequencyTable {
    entries: Vec<SumEntry>,
    total: u64,
}

impl FrequencyTable {
    /// Build the table for a set of dice
    ///
    /// Small outcome spaces are enumerated outright, larger ones are
    /// convolved; both produce the same table.
    pub fn new(dice: &DiceSet) -> Result<Self, DiceError> {
        match dice.total_combinations()? {
            total if total <= ENUMERATION_LIMIT => Ok(Self::from_outcomes(dice.outcomes())),
            _ => Self::from_dice(dice),
        }
    }

    /// Build the table by convolving the distribution of each die
    ///
    /// This never materializes the outcome space; memory use is bounded by
    /// the largest achievable sum rather than the number of combinations.
    pub fn from_dice(dice: &DiceSet) -> Result<Self, DiceError> {
        let total = dice.total_combinations()?;
        log::debug!(
            "Convolving {dice} ({total} combinations, sums up to {})",
            dice.max_sum()
        );
        // counts[s] is the number of ways to roll a sum of `s`
        let counts = dice.dice().iter().fold(vec![1u64], |counts, die| {
            let faces = die.faces() as usize;
            let mut next = vec![0u64; counts.len() + faces];
            for (sum, &count) in counts.iter().enumerate().filter(|&(_, &count)| count > 0) {
                for slot in &mut next[sum + 1..=sum + faces] {
                    *slot += count;
                }
            }
            next
        });
        Ok(Self::from_counts(
            counts
                .into_iter()
                .enumerate()
                .map(|(sum, count)| (sum as u64, count)),
            total,
        ))
    }

    /// Build the table by counting every enumerated outcome
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = Outcome>,
    {
        let sums = outcomes.into_iter().map(|outcome| outcome.sum()).collect_vec();
        let total = sums.len() as u64;
        log::debug!("Counted {total} outcomes");
        Self::from_counts(
            sums.into_iter()
                .counts()
                .into_iter()
                .map(|(sum, count)| (sum, count as u64))
                .sorted(),
            total,
        )
    }

    /// Turn ascending `(sum, count)` pairs into table entries
    fn from_counts<I>(counts: I, total: u64) -> Self
    where
        I: IntoIterator<Item = (u64, u64)>,
    {
        let counts = counts
            .into_iter()
            .filter(|&(_, count)| count > 0)
            .collect_vec();
        let max_count = counts.iter().map(|&(_, count)| count).max().unwrap_or_default();
        let entries = counts
            .into_iter()
            .map(|(sum, count)| SumEntry {
                sum,
                count,
                probability: count as f64 / total as f64,
                graph: graph_token(count, max_count),
            })
            .collect_vec();
        log::trace!("Built frequency table with {} entries", entries.len());
        Self { entries, total }
    }

    /// All entries, by ascending sum
    pub fn entries(&self) -> &[SumEntry] {
        &self.entries
    }

    /// The total number of combinations
    pub fn total(&self) -> u64 {
        self.total
    }

    /// The largest sum in the table
    pub fn max_sum(&self) -> u64 {
        self.entries.last().map(|e| e.sum).unwrap_or_default()
    }
}

/// Draw a bar representing `count` relative to `max_count`
///
/// Counts are drawn one glyph each as long as no count exceeds the scaling
/// threshold, otherwise bars are scaled linearly to keep the width bounded.
pub fn graph_token(count: u64, max_count: u64) -> String {
    let width = match max_count {
        max if max > GRAPH_SCALE_THRESHOLD => {
            (count as f64 / max as f64 * GRAPH_WIDTH).round() as usize + 1
        }
        _ => count as usize,
    };
    std::iter::repeat_n(GRAPH_GLYPH, width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::Die;
    use itertools::assert_equal;
    use pretty_assertions::assert_eq;

    fn dice(tokens: &[&str]) -> DiceSet {
        DiceSet::new(
            tokens
                .iter()
                .map(|&t| Die::try_from(t).unwrap())
                .collect(),
        )
        .unwrap()
    }

    const DICE_SETS: [&[&str]; 7] = [
        &["d1"],
        &["d6"],
        &["d6", "d6"],
        &["d6", "d8"],
        &["d20", "d4", "d2"],
        &["d3", "d3", "d3", "d3"],
        &["d100", "d100"],
    ];

    #[test]
    fn single_die() {
        let table = FrequencyTable::from_dice(&dice(&["d6"])).unwrap();
        assert_eq!(table.total(), 6);
        assert_equal(table.entries().iter().map(|e| e.sum), 1..=6);
        assert!(table.entries().iter().all(|e| e.count == 1));
        assert!(table
            .entries()
            .iter()
            .all(|e| (e.probability - 1.0 / 6.0).abs() < 1e-12));
        assert!(table.entries().iter().all(|e| e.graph == "="));
    }

    #[test]
    fn two_d6() {
        let table = FrequencyTable::from_dice(&dice(&["d6", "d6"])).unwrap();
        assert_eq!(table.total(), 36);
        assert_eq!(table.entries().len(), 11);
        assert_equal(table.entries().iter().map(|e| e.sum), 2..=12);
        assert_equal(
            table.entries().iter().map(|e| e.count),
            [1, 2, 3, 4, 5, 6, 5, 4, 3, 2, 1],
        );
        assert_eq!(table.entries().iter().map(|e| e.count).max(), Some(6));
        assert_eq!(table.max_sum(), 12);
        let most_likely = table.entries().iter().max_by_key(|e| e.count).unwrap();
        assert_eq!(most_likely.sum, 7);
        assert_eq!(most_likely.graph, "======");
    }

    #[test]
    fn counts_add_up_to_total() {
        for tokens in DICE_SETS {
            let set = dice(tokens);
            let table = FrequencyTable::from_dice(&set).unwrap();
            assert_eq!(table.total(), set.total_combinations().unwrap());
            assert_eq!(
                table.entries().iter().map(|e| e.count).sum::<u64>(),
                table.total(),
                "counts of {set} should add up to the total"
            );
        }
    }

    #[test]
    fn probabilities_add_up_to_one() {
        for tokens in DICE_SETS {
            let table = FrequencyTable::from_dice(&dice(tokens)).unwrap();
            let sum: f64 = table.entries().iter().map(|e| e.probability).sum();
            assert!((sum - 1.0).abs() < 1e-9, "{sum} should be close to 1");
        }
    }

    #[test]
    fn sums_cover_full_range() {
        for tokens in DICE_SETS {
            let set = dice(tokens);
            let table = FrequencyTable::from_dice(&set).unwrap();
            assert_equal(
                table.entries().iter().map(|e| e.sum),
                set.dice().len() as u64..=set.max_sum(),
            );
        }
    }

    #[test]
    fn convolution_matches_enumeration() {
        for tokens in DICE_SETS {
            let set = dice(tokens);
            assert_eq!(
                FrequencyTable::from_dice(&set).unwrap(),
                FrequencyTable::from_outcomes(set.outcomes())
            );
        }
    }

    #[test]
    fn new_matches_convolution() {
        for tokens in DICE_SETS.iter().copied().chain([&["d100", "d100", "d2"][..]]) {
            let set = dice(tokens);
            assert_eq!(
                FrequencyTable::new(&set).unwrap(),
                FrequencyTable::from_dice(&set).unwrap(),
                "tables of {set} should match"
            );
        }
    }

    #[test]
    fn too_many_combinations() {
        let set = dice(&["d4294967295", "d4294967295", "d4294967295"]);
        assert_eq!(
            FrequencyTable::from_dice(&set),
            Err(DiceError::TooManyCombinations)
        );
        assert_eq!(
            FrequencyTable::new(&set),
            Err(DiceError::TooManyCombinations)
        );
    }

    #[test]
    fn graph_token_unscaled() {
        assert_eq!(graph_token(0, 6), "");
        assert_eq!(graph_token(3, 6), "===");
        assert_eq!(graph_token(50, 50), "=".repeat(50));
    }

    #[test]
    fn graph_token_scaled() {
        assert_eq!(graph_token(100, 100), "=".repeat(51));
        assert_eq!(graph_token(50, 100), "=".repeat(26));
        assert_eq!(graph_token(1, 1000), "=");
        assert_eq!(graph_token(3, 200), "==");
        assert_eq!(graph_token(1, 51), "==");
    }

    #[test]
    fn scaled_table_width_is_bounded() {
        let table = FrequencyTable::from_dice(&dice(&["d100", "d100"])).unwrap();
        assert_eq!(table.entries().iter().map(|e| e.count).max(), Some(100));
        assert!(table.entries().iter().all(|e| (1..=51).contains(&e.graph.len())));
    }
}
