#![forbid(unsafe_code)]

//! The pattern trie.
//!
//! Nodes live in an arena and point back to their parent by index. Edges are
//! letters, plus the [`SENTINEL`] for word boundaries: an initial-anchored
//! pattern hangs under the root's sentinel child, a final-anchored pattern
//! ends in a sentinel edge.
//!
//! ```text
//! Patterns ["ba1", "ba2r", ".ab1"]
//!
//! root ─ '.' ─ 'a' ─ 'b'   head [0,0,1]
//!      └ 'b' ─ 'a'         head [0,0,1]
//!              └ 'r'       head [0,0,2,0]
//! ```

use std::collections::BTreeMap;
use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::error::{HydraError, Result};
use crate::pattern::{Digits, Pattern, SENTINEL, fold};

/// Default left hyphenation margin (TeX `\lefthyphenmin`).
pub const LEFT_HYPHEN_MIN: usize = 2;
/// Default right hyphenation margin (TeX `\righthyphenmin`).
pub const RIGHT_HYPHEN_MIN: usize = 3;

// ---------------------------------------------------------------------------
// Configuration and bookkeeping types
// ---------------------------------------------------------------------------

/// Index of a node in a [`Hydra`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub const ROOT: Self = Self(0);

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// What to do when an inserted pattern disagrees with a stored head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictMode {
    /// Merge by pointwise max and remember the pair.
    #[default]
    Lax,
    /// Fail with [`HydraError::ConflictingPattern`].
    Strict,
}

/// Minimum letters kept on each side of a break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HyphenMins {
    pub left: usize,
    pub right: usize,
}

impl HyphenMins {
    /// No margins at all.
    pub const NONE: Self = Self { left: 0, right: 0 };

    #[must_use]
    pub const fn new(left: usize, right: usize) -> Self {
        Self { left, right }
    }

    /// Whether gap `gap` of a word of `len` letters lies inside the margins.
    #[must_use]
    pub fn allows(self, gap: usize, len: usize) -> bool {
        gap >= self.left && gap + self.right <= len
    }
}

impl Default for HyphenMins {
    fn default() -> Self {
        Self::new(LEFT_HYPHEN_MIN, RIGHT_HYPHEN_MIN)
    }
}

/// How a training candidate relates to the level being trained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Good,
    Bad,
    Neutral,
}

/// Where a counted candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Source {
    /// Dictionary line index.
    pub line: usize,
    /// Letter offset of the candidate in the word.
    pub column: usize,
    /// Gap inside the candidate that carries the digit.
    pub dot: usize,
    pub length: usize,
    pub verdict: Verdict,
}

/// A lax-mode disagreement, recorded as (stored, inserted) pattern strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub existing: String,
    pub incoming: String,
}

#[derive(Debug, Clone, Default)]
struct Node {
    children: BTreeMap<char, NodeId>,
    head: Option<Digits>,
    parent: Option<NodeId>,
    edge: Option<char>,
    good: u32,
    bad: u32,
    sources: Vec<Source>,
}

impl Node {
    fn is_bare(&self) -> bool {
        self.head.is_none() && self.children.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Trie
// ---------------------------------------------------------------------------

/// A trie of Liang patterns.
#[derive(Debug, Clone)]
pub struct Hydra {
    nodes: Vec<Node>,
    vacant: Vec<NodeId>,
    mode: ConflictMode,
    margins: HyphenMins,
    conflicts: Vec<Conflict>,
}

impl Default for Hydra {
    fn default() -> Self {
        Self::new()
    }
}

impl Hydra {
    /// An empty lax trie with no margins.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
            vacant: Vec::new(),
            mode: ConflictMode::Lax,
            margins: HyphenMins::NONE,
            conflicts: Vec::new(),
        }
    }

    /// An empty trie that rejects conflicting insertions.
    #[must_use]
    pub fn strict() -> Self {
        Self::new().with_mode(ConflictMode::Strict)
    }

    /// Build a lax trie from pattern strings.
    pub fn from_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut hydra = Self::new();
        hydra.insert_many(words)?;
        Ok(hydra)
    }

    #[must_use]
    pub fn with_mode(mut self, mode: ConflictMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the margins applied by [`Hydra::prehyphenate`].
    #[must_use]
    pub fn with_margins(mut self, margins: HyphenMins) -> Self {
        self.margins = margins;
        self
    }

    #[must_use]
    pub fn mode(&self) -> ConflictMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ConflictMode) {
        self.mode = mode;
    }

    #[must_use]
    pub fn margins(&self) -> HyphenMins {
        self.margins
    }

    pub fn set_margins(&mut self, margins: HyphenMins) {
        self.margins = margins;
    }

    /// Lax-mode disagreements seen so far, oldest first.
    #[must_use]
    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    // -- Arena --

    #[inline]
    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    fn alloc(&mut self, parent: NodeId, edge: char) -> NodeId {
        let node = Node {
            parent: Some(parent),
            edge: Some(edge),
            ..Node::default()
        };
        if let Some(id) = self.vacant.pop() {
            self.nodes[id.index()] = node;
            id
        } else {
            let id = NodeId(self.nodes.len() as u32);
            self.nodes.push(node);
            id
        }
    }

    fn release(&mut self, id: NodeId) {
        self.nodes[id.index()] = Node::default();
        self.vacant.push(id);
    }

    /// Whether `id` names a node currently linked into the trie.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        id == NodeId::ROOT || self.nodes.get(id.index()).is_some_and(|n| n.parent.is_some())
    }

    // -- Navigation --

    #[must_use]
    pub fn child(&self, node: NodeId, letter: char) -> Option<NodeId> {
        self.node(node).children.get(&letter).copied()
    }

    /// The child of `node` under `letter`, created if missing.
    pub fn ensure_child(&mut self, node: NodeId, letter: char) -> NodeId {
        if let Some(child) = self.child(node, letter) {
            return child;
        }
        let child = self.alloc(node, letter);
        self.node_mut(node).children.insert(letter, child);
        child
    }

    /// Follow `text` edge by edge without creating anything. Digits are
    /// skipped and a `.` follows the sentinel edge, so `".ab1"` reads the
    /// node holding that pattern.
    #[must_use]
    pub fn read(&self, text: &str) -> Option<NodeId> {
        text.chars()
            .filter(|ch| !ch.is_ascii_digit())
            .flat_map(char::to_lowercase)
            .try_fold(NodeId::ROOT, |node, edge| self.child(node, edge))
    }

    fn path_of(pattern: &Pattern) -> impl Iterator<Item = char> + '_ {
        let head = pattern.is_initial().then_some(SENTINEL);
        let tail = pattern.is_final().then_some(SENTINEL);
        head.into_iter()
            .chain(pattern.word().iter().copied())
            .chain(tail)
    }

    /// Children in serialization order: the sentinel first under the root,
    /// last everywhere else.
    fn ordered_children(&self, id: NodeId) -> Vec<NodeId> {
        let node = self.node(id);
        let mut ids: Vec<NodeId> = node
            .children
            .iter()
            .filter(|&(&edge, _)| edge != SENTINEL)
            .map(|(_, &child)| child)
            .collect();
        if let Some(&anchor) = node.children.get(&SENTINEL) {
            if id == NodeId::ROOT {
                ids.insert(0, anchor);
            } else {
                ids.push(anchor);
            }
        }
        ids
    }

    // -- Insertion --

    /// Store `pattern`, applying the conflict policy when a head already
    /// exists. Returns the node that holds it.
    pub fn insert_pattern(&mut self, pattern: &Pattern) -> Result<NodeId> {
        if pattern.is_empty() {
            return Err(HydraError::bad_pattern(pattern.to_string(), "no letters"));
        }
        if pattern.word().contains(&SENTINEL) {
            return Err(HydraError::bad_pattern(
                pattern.to_string(),
                "dot inside the word",
            ));
        }

        let mut node = NodeId::ROOT;
        for edge in Self::path_of(pattern) {
            node = self.ensure_child(node, edge);
        }

        let incoming = pattern.digits();
        let Some(stored) = self.node(node).head.clone() else {
            self.node_mut(node).head = Some(Digits::from_slice(incoming));
            return Ok(node);
        };
        if stored.as_slice() == incoming {
            return Ok(node);
        }

        let existing = self.render(node, &stored);
        match self.mode {
            ConflictMode::Strict => Err(HydraError::ConflictingPattern {
                existing,
                incoming: pattern.to_string(),
            }),
            ConflictMode::Lax => {
                let merged: Digits = stored
                    .iter()
                    .zip(incoming)
                    .map(|(&a, &b)| a.max(b))
                    .collect();
                tracing::debug!(
                    message = "hydra.conflict",
                    existing = %existing,
                    incoming = %pattern,
                );
                self.conflicts.push(Conflict {
                    existing,
                    incoming: pattern.to_string(),
                });
                self.node_mut(node).head = Some(merged);
                Ok(node)
            }
        }
    }

    /// Parse and store one pattern string.
    pub fn insert_word(&mut self, text: &str) -> Result<NodeId> {
        self.insert_pattern(&Pattern::parse(text)?)
    }

    /// Parse and store pattern strings in order; returns how many were read.
    pub fn insert_many<I, S>(&mut self, words: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut inserted = 0;
        for word in words {
            self.insert_word(word.as_ref())?;
            inserted += 1;
        }
        Ok(inserted)
    }

    /// Move the head of `node` in `donor` into this trie, then clear it in
    /// `donor`. Descendants stay where they are.
    pub fn transplant(&mut self, donor: &mut Hydra, node: NodeId) -> Result<()> {
        let Some(pattern) = donor.pattern_at(node) else {
            return Ok(());
        };
        self.insert_pattern(&pattern)?;
        donor.chophead(node);
        Ok(())
    }

    // -- Reconstruction --

    fn edges_to(&self, id: NodeId) -> Vec<char> {
        let mut edges = Vec::new();
        let mut current = id;
        loop {
            let node = self.node(current);
            let (Some(parent), Some(edge)) = (node.parent, node.edge) else {
                break;
            };
            edges.push(edge);
            current = parent;
        }
        edges.reverse();
        edges
    }

    fn build(&self, id: NodeId, digits: &Digits) -> Pattern {
        let edges = self.edges_to(id);
        let initial = edges.first() == Some(&SENTINEL);
        let terminal = edges.len() > 1 && edges.last() == Some(&SENTINEL);
        let word: Vec<char> = edges.into_iter().filter(|&e| e != SENTINEL).collect();
        Pattern::from_parts(word, digits.clone(), initial, terminal)
    }

    fn render(&self, id: NodeId, digits: &Digits) -> String {
        self.build(id, digits).to_string()
    }

    /// The pattern stored at `node`, if it has a head.
    #[must_use]
    pub fn pattern_at(&self, node: NodeId) -> Option<Pattern> {
        let digits = self.node(node).head.as_ref()?;
        Some(self.build(node, digits))
    }

    // -- Serialization --

    /// Every node with a head, in serialization order.
    #[must_use]
    pub fn heads(&self) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            if self.node(id).head.is_some() {
                found.push(id);
            }
            stack.extend(self.ordered_children(id).into_iter().rev());
        }
        found
    }

    /// All stored patterns as strings, depth first.
    #[must_use]
    pub fn digest(&self) -> Vec<String> {
        self.heads()
            .into_iter()
            .filter_map(|id| self.pattern_at(id))
            .map(|pattern| pattern.to_string())
            .collect()
    }

    /// Number of stored patterns.
    #[must_use]
    pub fn count(&self) -> usize {
        self.heads().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.node(NodeId::ROOT).children.is_empty()
    }

    /// Write one pattern per line; returns the number written.
    pub fn write_patterns<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<usize> {
        let digest = self.digest();
        for line in &digest {
            writeln!(out, "{line}")?;
        }
        Ok(digest.len())
    }

    /// Write the tree shape, one edge per line, with heads and their
    /// counters. Returns the number of heads.
    pub fn dump<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<usize> {
        let mut heads = 0;
        let mut stack: Vec<(NodeId, usize)> = self
            .ordered_children(NodeId::ROOT)
            .into_iter()
            .rev()
            .map(|id| (id, 0))
            .collect();
        while let Some((id, depth)) = stack.pop() {
            let node = self.node(id);
            let edge = node.edge.unwrap_or(SENTINEL);
            write!(out, "{:indent$}{edge}", "", indent = depth * 2)?;
            if let Some(digits) = &node.head {
                heads += 1;
                write!(
                    out,
                    "  {} [{}/{}]",
                    self.render(id, digits),
                    node.good,
                    node.bad
                )?;
            }
            writeln!(out)?;
            stack.extend(
                self.ordered_children(id)
                    .into_iter()
                    .rev()
                    .map(|child| (child, depth + 1)),
            );
        }
        Ok(heads)
    }

    // -- Lookup --

    fn locate(&self, pattern: &Pattern) -> Option<NodeId> {
        Self::path_of(pattern).try_fold(NodeId::ROOT, |node, edge| self.child(node, edge))
    }

    fn regest(&mut self, text: &str, remove: bool) -> Result<Option<String>> {
        let pattern = Pattern::parse(text)?;
        let Some(node) = self.locate(&pattern) else {
            return Ok(None);
        };
        let Some(stored) = self.node(node).head.clone() else {
            return Ok(None);
        };
        let existing = self.render(node, &stored);
        if self.mode == ConflictMode::Strict && stored.as_slice() != pattern.digits() {
            return Err(HydraError::ConflictingPattern {
                existing,
                incoming: pattern.to_string(),
            });
        }
        if remove {
            self.chophead(node);
        }
        Ok(Some(existing))
    }

    /// The stored pattern with the same letters and anchoring as `text`.
    pub fn search(&mut self, text: &str) -> Result<Option<String>> {
        self.regest(text, false)
    }

    /// As [`Hydra::search`], then remove the head and prune.
    pub fn delete(&mut self, text: &str) -> Result<Option<String>> {
        self.regest(text, true)
    }

    // -- Removal --

    /// Clear the head and counters of `node`, then prune.
    pub fn chophead(&mut self, node: NodeId) {
        let target = self.node_mut(node);
        target.head = None;
        target.good = 0;
        target.bad = 0;
        target.sources.clear();
        self.propagate_chop(node);
    }

    /// Cut the subtree under `letter` off `node`. Returns whether there was
    /// one.
    pub fn chopneck(&mut self, node: NodeId, letter: char) -> bool {
        let Some(child) = self.node_mut(node).children.remove(&letter) else {
            return false;
        };
        let mut stack = vec![child];
        while let Some(id) = stack.pop() {
            stack.extend(self.node(id).children.values().copied());
            self.release(id);
        }
        self.propagate_chop(node);
        true
    }

    /// Unlink `node` and its ancestors while they are headless and
    /// childless.
    pub fn propagate_chop(&mut self, node: NodeId) {
        let mut current = node;
        while current != NodeId::ROOT && self.node(current).is_bare() {
            let (Some(parent), Some(edge)) = (self.node(current).parent, self.node(current).edge)
            else {
                break;
            };
            self.node_mut(parent).children.remove(&edge);
            self.release(current);
            current = parent;
        }
    }

    // -- Matching --

    fn walk(&self, from: NodeId, letters: &[char], offset: usize, found: &mut Vec<(NodeId, usize)>) {
        let mut node = from;
        for &letter in letters {
            let Some(next) = self.child(node, letter) else {
                return;
            };
            node = next;
            if self.node(node).head.is_some() {
                found.push((node, offset));
            }
        }
        if node != NodeId::ROOT
            && let Some(end) = self.child(node, SENTINEL)
            && self.node(end).head.is_some()
        {
            found.push((end, offset));
        }
    }

    fn hydrae_letters(&self, letters: &[char]) -> Vec<(NodeId, usize)> {
        let mut found = Vec::new();
        if letters.is_empty() || letters.contains(&SENTINEL) {
            return found;
        }
        if let Some(start) = self.child(NodeId::ROOT, SENTINEL) {
            self.walk(start, letters, 0, &mut found);
        }
        for offset in 0..letters.len() {
            self.walk(NodeId::ROOT, &letters[offset..], offset, &mut found);
        }
        found
    }

    /// Live nodes of every pattern occurring in `word`, with their offsets.
    /// A word with a `.` in it matches nothing.
    #[must_use]
    pub fn hydrae(&self, word: &str) -> Vec<(NodeId, usize)> {
        self.hydrae_letters(&fold(word))
    }

    /// Copies of every pattern occurring in `word`, each anchored at its
    /// offset, in pattern order.
    #[must_use]
    pub fn matches(&self, word: &str) -> Vec<Pattern> {
        let mut found: Vec<Pattern> = self
            .hydrae(word)
            .into_iter()
            .filter_map(|(id, offset)| {
                let mut pattern = self.pattern_at(id)?;
                pattern.set_anchor(offset);
                Some(pattern)
            })
            .collect();
        found.sort();
        found
    }

    /// Overwrite the digits of `target` with this trie's hyphenation of its
    /// word.
    pub fn prehyphenate_into(&self, target: &mut Pattern) -> Result<()> {
        if target.word().contains(&SENTINEL) {
            return Err(HydraError::bad_pattern(
                target.word_string(),
                "dot inside the word",
            ));
        }
        target.clear_digits();
        for (id, offset) in self.hydrae_letters(target.word()) {
            if let Some(digits) = &self.node(id).head {
                target.mask_digits_at(digits, offset)?;
            }
        }
        let len = target.len();
        let margins = self.margins;
        for (gap, digit) in target.digits_mut().iter_mut().enumerate() {
            if !margins.allows(gap, len) {
                *digit = 0;
            }
        }
        Ok(())
    }

    /// The hyphenation of `word`: the max of all matching patterns, with the
    /// margins zeroed.
    pub fn prehyphenate(&self, word: &str) -> Result<Pattern> {
        let mut pattern = Pattern::dummy(word);
        self.prehyphenate_into(&mut pattern)?;
        Ok(pattern)
    }

    // -- Training counters --

    /// `(good, bad)` of `node`.
    #[must_use]
    pub fn counts(&self, node: NodeId) -> (u32, u32) {
        let node = self.node(node);
        (node.good, node.bad)
    }

    pub fn tally(&mut self, node: NodeId, verdict: Verdict) {
        let node = self.node_mut(node);
        match verdict {
            Verdict::Good => node.good += 1,
            Verdict::Bad => node.bad += 1,
            Verdict::Neutral => {}
        }
    }

    pub fn record_source(&mut self, node: NodeId, source: Source) {
        self.node_mut(node).sources.push(source);
    }

    #[must_use]
    pub fn sources(&self, node: NodeId) -> &[Source] {
        &self.node(node).sources
    }

    /// Zero the counters and drop the sources, keeping the head.
    pub fn clear_counts(&mut self, node: NodeId) {
        let node = self.node_mut(node);
        node.good = 0;
        node.bad = 0;
        node.sources.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn hydra(words: &[&str]) -> Hydra {
        Hydra::from_words(words).unwrap()
    }

    // -- Insertion --

    #[test]
    fn count_after_inserts() {
        let mut h = Hydra::new();
        assert!(h.is_empty());
        h.insert_word("a").unwrap();
        h.insert_many(["b", "c"]).unwrap();
        assert_eq!(h.count(), 3);
        assert!(!h.is_empty());
    }

    #[test]
    fn insert_returns_holding_node() {
        let mut h = Hydra::new();
        let id = h.insert_word("ab1c").unwrap();
        assert_eq!(h.read("abc"), Some(id));
        assert_eq!(h.pattern_at(id).unwrap().to_string(), "ab1c");
    }

    #[test]
    fn ensure_child_is_idempotent() {
        let mut h = Hydra::new();
        let a = h.ensure_child(NodeId::ROOT, 'a');
        assert_eq!(h.ensure_child(NodeId::ROOT, 'a'), a);
        assert_eq!(h.child(NodeId::ROOT, 'a'), Some(a));
        assert!(h.contains(a));
    }

    #[test]
    fn round_trip_single_pattern() {
        for text in ["hy3p", ".ex5am", "4ism.", "a1b2c3", ".ab."] {
            assert_eq!(hydra(&[text]).digest(), vec![text.to_string()]);
        }
    }

    #[test]
    fn insert_rejects_empty_word() {
        let empty = Pattern::with_digits("", &[1]).unwrap();
        assert!(matches!(
            Hydra::new().insert_pattern(&empty),
            Err(HydraError::BadPattern { .. })
        ));
    }

    #[test]
    fn insert_many_stops_at_bad_pattern() {
        let mut h = Hydra::new();
        assert!(h.insert_many(["ab", "a11b", "cd"]).is_err());
        assert_eq!(h.digest(), vec!["ab"]);
    }

    // -- Conflicts --

    #[test]
    fn idempotent_insertion() {
        let mut h = hydra(&["a1b", "b2c"]);
        let before = h.digest();
        h.insert_word("a1b").unwrap();
        assert_eq!(h.digest(), before);
        assert!(h.conflicts().is_empty());
    }

    #[test]
    fn lax_merge_takes_max() {
        let mut h = hydra(&["a1bc"]);
        h.insert_word("ab2c").unwrap();
        assert_eq!(h.digest(), vec!["a1b2c"]);
        assert_eq!(
            h.conflicts(),
            &[Conflict {
                existing: "a1bc".into(),
                incoming: "ab2c".into(),
            }]
        );
    }

    #[test]
    fn lax_merge_is_monotone() {
        let mut h = hydra(&["a3b2c"]);
        h.insert_word("a1bc").unwrap();
        h.insert_word("ab2c").unwrap();
        assert_eq!(h.digest(), vec!["a3b2c"]);
    }

    #[test]
    fn strict_conflict_names_both_patterns() {
        let mut h = Hydra::strict();
        h.insert_word("a1b").unwrap();
        let err = h.insert_word("a2b").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("a1b"), "{message}");
        assert!(message.contains("a2b"), "{message}");
        assert_eq!(h.digest(), vec!["a1b"]);
    }

    // -- Serialization --

    #[test]
    fn digest_is_sorted_depth_first() {
        assert_eq!(
            hydra(&["orange", "yellow", "red"]).digest(),
            vec!["orange", "red", "yellow"]
        );
    }

    #[test]
    fn prefix_patterns_coexist() {
        assert_eq!(hydra(&["ba1", "ba2r"]).digest(), vec!["ba1", "ba2r"]);
    }

    #[test]
    fn sentinel_first_at_root_last_below() {
        assert_eq!(
            hydra(&["ab.", "abc", "ab", ".ab"]).digest(),
            vec![".ab", "ab", "abc", "ab."]
        );
    }

    #[test]
    fn write_patterns_one_per_line() {
        let h = hydra(&["b1c", "1de"]);
        let mut out = Vec::new();
        assert_eq!(h.write_patterns(&mut out).unwrap(), 2);
        assert_eq!(String::from_utf8(out).unwrap(), "b1c\n1de\n");
    }

    #[test]
    fn dump_shows_tree_and_counts() {
        let mut h = hydra(&["ab1", "a1c"]);
        let id = h.read("ab").unwrap();
        h.tally(id, Verdict::Good);
        let mut out = Vec::new();
        assert_eq!(h.dump(&mut out).unwrap(), 2);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "a\n  b  ab1 [1/0]\n  c  a1c [0/0]\n");
    }

    // -- Search and delete --

    #[test]
    fn search_ignores_digits_when_lax() {
        let mut h = hydra(&["a1b", ".c2d"]);
        assert_eq!(h.search("ab").unwrap().as_deref(), Some("a1b"));
        assert_eq!(h.search("a3b").unwrap().as_deref(), Some("a1b"));
        assert_eq!(h.search(".cd").unwrap().as_deref(), Some(".c2d"));
        assert_eq!(h.search("cd").unwrap(), None);
        assert_eq!(h.search("xyz").unwrap(), None);
    }

    #[test]
    fn strict_search_compares_digits() {
        let mut h = Hydra::strict();
        h.insert_word("a1b").unwrap();
        assert_eq!(h.search("a1b").unwrap().as_deref(), Some("a1b"));
        assert!(matches!(
            h.search("ab"),
            Err(HydraError::ConflictingPattern { .. })
        ));
        assert!(h.delete("a2b").is_err());
        assert_eq!(h.count(), 1);
    }

    #[test]
    fn delete_prunes_empty_branch() {
        let mut h = hydra(&["abc", "abcd", "def", "ghi"]);
        assert_eq!(h.delete("def").unwrap().as_deref(), Some("def"));
        assert_eq!(h.child(NodeId::ROOT, 'd'), None);
        assert_eq!(h.read("d"), None);
        assert_eq!(h.digest(), vec!["abc", "abcd", "ghi"]);
    }

    #[test]
    fn delete_keeps_nodes_with_children() {
        let mut h = hydra(&["abc", "abcd"]);
        h.delete("abc").unwrap();
        assert!(h.read("abc").is_some());
        assert_eq!(h.digest(), vec!["abcd"]);
    }

    #[test]
    fn delete_missing_is_none() {
        let mut h = hydra(&["abc"]);
        assert_eq!(h.delete("abd").unwrap(), None);
        assert_eq!(h.delete("ab").unwrap(), None);
        assert_eq!(h.count(), 1);
    }

    // -- Removal primitives --

    #[test]
    fn chophead_clears_counters() {
        let mut h = hydra(&["ab", "abc"]);
        let id = h.read("ab").unwrap();
        h.tally(id, Verdict::Bad);
        h.chophead(id);
        assert_eq!(h.counts(id), (0, 0));
        assert_eq!(h.pattern_at(id), None);
        assert_eq!(h.digest(), vec!["abc"]);
    }

    #[test]
    fn chopneck_removes_subtree() {
        let mut h = hydra(&["ab", "abc", "abd", "x"]);
        let a = h.read("a").unwrap();
        assert!(h.chopneck(a, 'b'));
        assert!(!h.chopneck(a, 'b'));
        assert_eq!(h.digest(), vec!["x"]);
        assert_eq!(h.read("a"), None);
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut h = hydra(&["abc"]);
        let slots = h.nodes.len();
        h.delete("abc").unwrap();
        h.insert_word("xyz").unwrap();
        assert_eq!(h.nodes.len(), slots);
        assert_eq!(h.digest(), vec!["xyz"]);
    }

    #[test]
    fn transplant_moves_head_only() {
        let mut donor = hydra(&["b1c", "b1cd"]);
        let mut target = Hydra::new();
        let node = donor.read("bc").unwrap();
        target.transplant(&mut donor, node).unwrap();
        assert_eq!(target.digest(), vec!["b1c"]);
        assert_eq!(donor.digest(), vec!["b1cd"]);
    }

    #[test]
    fn transplant_uses_conflict_policy() {
        let mut donor = hydra(&["b3c"]);
        let mut target = Hydra::strict();
        target.insert_word("b1c").unwrap();
        let node = donor.read("bc").unwrap();
        assert!(target.transplant(&mut donor, node).is_err());
        assert_eq!(donor.digest(), vec!["b3c"]);
    }

    // -- Matching --

    #[test]
    fn matches_anchored_and_plain() {
        let h = hydra(&[".ab1", "b1c", "c1.", "ab"]);
        let found: Vec<(String, usize)> = h
            .matches("abc")
            .into_iter()
            .map(|p| (p.to_string(), p.anchor()))
            .collect();
        assert_eq!(
            found,
            vec![
                ("ab".to_string(), 0),
                (".ab1".to_string(), 0),
                ("b1c".to_string(), 1),
                ("c1.".to_string(), 2),
            ]
        );
    }

    #[test]
    fn anchors_only_match_at_word_ends() {
        let h = hydra(&[".ab1", "c1."]);
        assert!(h.matches("xabcx").is_empty());
        assert!(h.matches("abcx").iter().all(|p| p.is_initial()));
        assert_eq!(h.matches("abc").len(), 2);
    }

    #[test]
    fn whole_word_anchored_match() {
        let h = hydra(&[".a1b."]);
        assert_eq!(h.matches("ab").len(), 1);
        assert!(h.matches("abc").is_empty());
    }

    #[test]
    fn hydrae_returns_live_nodes() {
        let mut h = hydra(&["b1c", "bc2d"]);
        let found = h.hydrae("abcd");
        assert_eq!(found.len(), 2);
        for (id, offset) in found {
            assert_eq!(offset, 1);
            h.tally(id, Verdict::Good);
        }
        assert_eq!(h.counts(h.read("bc").unwrap()), (1, 0));
        assert_eq!(h.counts(h.read("bcd").unwrap()), (1, 0));
    }

    #[test]
    fn empty_word_matches_nothing() {
        let h = hydra(&["a", ".b"]);
        assert!(h.hydrae("").is_empty());
        assert_eq!(h.prehyphenate("").unwrap().digits(), &[0]);
    }

    #[test]
    fn dotted_word_matches_nothing() {
        let h = hydra(&[".b1"]);
        assert!(h.hydrae("a.bc").is_empty());
        assert!(h.matches("a.bc").is_empty());
        assert!(matches!(
            h.prehyphenate("a.bc"),
            Err(HydraError::BadPattern { .. })
        ));
        assert_eq!(h.prehyphenate("bc").unwrap().to_string(), "b1c");
    }

    // -- Prehyphenation --

    #[test]
    fn prehyphenate_foobar() {
        let h = hydra(&["fo1", "fo2o3", "ba1", "ba2r"]);
        assert_eq!(h.prehyphenate("foobar").unwrap().to_string(), "fo2o3ba2r");
    }

    #[test]
    fn prehyphenate_applies_margins() {
        let h = hydra(&["1a1b1c1d1e1"]).with_margins(HyphenMins::new(2, 3));
        let digits = h.prehyphenate("abcde").unwrap();
        assert_eq!(digits.digits(), &[0, 0, 1, 0, 0, 0]);
    }

    #[test]
    fn prehyphenate_into_resets_digits() {
        let h = hydra(&["b1c"]);
        let mut pattern = Pattern::dummy("abcd");
        pattern.digits_mut()[3] = 7;
        h.prehyphenate_into(&mut pattern).unwrap();
        assert_eq!(pattern.digits(), &[0, 0, 1, 0, 0]);
        assert_eq!(pattern.hyphenated('-'), "ab-cd");
    }

    #[test]
    fn prehyphenate_uses_boundary_patterns() {
        let h = hydra(&[".a1", "1c.", "a2"]);
        assert_eq!(h.prehyphenate("abc").unwrap().to_string(), "a2b1c");
        assert_eq!(h.prehyphenate("bac").unwrap().to_string(), "ba2c");
    }

    #[test]
    fn hyphen_mins_allows() {
        let m = HyphenMins::default();
        assert_eq!(m, HyphenMins::new(2, 3));
        assert!(!m.allows(1, 8));
        assert!(m.allows(2, 8));
        assert!(m.allows(5, 8));
        assert!(!m.allows(6, 8));
        assert!(HyphenMins::NONE.allows(0, 0));
    }
}
