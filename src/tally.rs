use std::fmt;
use std::ops::Index;

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::hand_evaluator::{CategorySet, HandCategory, ALL_CATEGORIES, CATEGORY_COUNT};
use crate::simulation::Accumulator;

/// Per-category occurrence counts plus the number of trials behind them.
///
/// Categories are not exclusive, so the counts can sum to more than
/// `iterations`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    counts: [u64; CATEGORY_COUNT],
    iterations: u64,
}

impl Tally {
    pub fn new() -> Tally {
        Tally::default()
    }

    pub fn from_counts(counts: [u64; CATEGORY_COUNT], iterations: u64) -> Tally {
        Tally { counts, iterations }
    }

    /// Counts one trial and every category it achieved.
    #[inline]
    pub fn record(&mut self, categories: CategorySet) {
        for (i, count) in self.counts.iter_mut().enumerate() {
            *count += categories.contains(ALL_CATEGORIES[i]) as u64;
        }
        self.iterations += 1;
    }

    pub fn count(&self, category: HandCategory) -> u64 {
        self.counts[category.index()]
    }

    pub fn counts(&self) -> &[u64; CATEGORY_COUNT] {
        &self.counts
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Share of trials that achieved `category`, 0 when nothing ran.
    pub fn fraction(&self, category: HandCategory) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            self.count(category) as f64 / self.iterations as f64
        }
    }

    pub fn percentage(&self, category: HandCategory) -> f64 {
        self.fraction(category) * 100.0
    }

    pub fn merge(&mut self, other: &Tally) {
        for (mine, theirs) in self.counts.iter_mut().zip(other.counts.iter()) {
            *mine += theirs;
        }
        self.iterations += other.iterations;
    }

    pub fn iter(&self) -> impl Iterator<Item = (HandCategory, u64)> + '_ {
        ALL_CATEGORIES.iter().map(move |&c| (c, self.count(c)))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl Accumulator for Tally {
    fn merge(&mut self, other: &Self) {
        Tally::merge(self, other);
    }

    fn iterations(&self) -> u64 {
        self.iterations
    }
}

impl Index<HandCategory> for Tally {
    type Output = u64;

    fn index(&self, category: HandCategory) -> &u64 {
        &self.counts[category.index()]
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} iterations", self.iterations)?;
        for (category, count) in self.iter() {
            writeln!(
                f,
                "{:<16} {:>12} {:>7.3}%",
                category.to_string(),
                count,
                self.percentage(category)
            )?;
        }
        Ok(())
    }
}

struct CategoryCounts<'a>(&'a Tally);

impl Serialize for CategoryCounts<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(CATEGORY_COUNT))?;
        for (category, count) in self.0.iter() {
            map.serialize_entry(category.key(), &count)?;
        }
        map.end()
    }
}

impl Serialize for Tally {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Tally", 2)?;
        state.serialize_field("iterations", &self.iterations)?;
        state.serialize_field("counts", &CategoryCounts(self))?;
        state.end()
    }
}
