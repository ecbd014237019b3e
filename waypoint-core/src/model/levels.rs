//! Sorted index of the distinct floor levels of a building
//!
//! Levels are not evenly spaced (a mezzanine may sit at `0.5`), so
//! "the next floor up" is a question about positions in this index rather
//! than about numeric differences.

use serde::Serialize;

use crate::Level;

/// Hashable key for a level, `-0.0` and `0.0` map to the same key
pub fn level_key(level: Level) -> u64 {
    (level + 0.0).to_bits()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LevelIndex {
    levels: Vec<Level>,
}

impl LevelIndex {
    pub fn new<I: IntoIterator<Item = Level>>(levels: I) -> Self {
        let mut levels: Vec<Level> = levels
            .into_iter()
            .filter(|level| level.is_finite())
            .map(|level| level + 0.0)
            .collect();
        levels.sort_by(f64::total_cmp);
        levels.dedup();
        Self { levels }
    }

    /// New index containing the levels of `self` and `other`
    pub fn merged<I: IntoIterator<Item = Level>>(&self, other: I) -> Self {
        Self::new(self.levels.iter().copied().chain(other))
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn as_slice(&self) -> &[Level] {
        &self.levels
    }

    pub fn iter(&self) -> impl Iterator<Item = Level> + '_ {
        self.levels.iter().copied()
    }

    pub fn get(&self, position: usize) -> Option<Level> {
        self.levels.get(position).copied()
    }

    pub fn contains(&self, level: Level) -> bool {
        self.position(level).is_some()
    }

    /// Position of `level` in ascending order
    pub fn position(&self, level: Level) -> Option<usize> {
        let level = level + 0.0;
        self.levels
            .binary_search_by(|probe| probe.total_cmp(&level))
            .ok()
    }

    /// Levels between two positions, both ends inclusive
    pub fn span(&self, lower: usize, upper: usize) -> Option<&[Level]> {
        if lower <= upper && upper < self.levels.len() {
            Some(&self.levels[lower..=upper])
        } else {
            None
        }
    }

    /// True when the two levels are direct neighbours in the index
    pub fn are_adjacent(&self, a: Level, b: Level) -> bool {
        match (self.position(a), self.position(b)) {
            (Some(a), Some(b)) => a.abs_diff(b) == 1,
            _ => false,
        }
    }
}

impl FromIterator<Level> for LevelIndex {
    fn from_iter<I: IntoIterator<Item = Level>>(iter: I) -> Self {
        Self::new(iter)
    }
}
