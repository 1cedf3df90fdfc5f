//! Dictionary positions a level has already decided.
//!
//! Two kinds of entries, both keyed by dictionary line:
//!
//! - a *settled* window comes from a good source of an accepted pattern;
//!   every gap it spans is resolved for the rest of the level;
//! - a *contained* window comes from any other decided source; it only
//!   blocks candidates that sit on the same gap and whose window encloses
//!   it, since those would be decided the same way.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::trie::{Source, Verdict};

#[derive(Debug, Default)]
pub struct Knockouts {
    settled: FxHashMap<usize, FxHashSet<usize>>,
    contained: FxHashMap<(usize, usize), Vec<(usize, usize)>>,
}

impl Knockouts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a decided source. `accepted` tells whether its pattern made it
    /// into the final trie.
    pub fn knock_out(&mut self, source: &Source, accepted: bool) {
        if accepted && source.verdict == Verdict::Good {
            self.settled
                .entry(source.line)
                .or_default()
                .extend(source.column..=source.column + source.length);
        } else {
            self.contained
                .entry((source.line, source.column + source.dot))
                .or_default()
                .push((source.column, source.column + source.length));
        }
    }

    /// Whether a candidate at `column` with its digit at `dot` is already
    /// decided.
    #[must_use]
    pub fn is_blocked(&self, line: usize, column: usize, dot: usize, length: usize) -> bool {
        let gap = column + dot;
        if self
            .settled
            .get(&line)
            .is_some_and(|gaps| gaps.contains(&gap))
        {
            return true;
        }
        let end = column + length;
        self.contained.get(&(line, gap)).is_some_and(|windows| {
            windows
                .iter()
                .any(|&(start, stop)| column <= start && stop <= end)
        })
    }
}
