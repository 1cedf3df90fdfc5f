#![forbid(unsafe_code)]

//! Liang hyphenation patterns.
//!
//! A pattern is a short run of letters with one digit per inter-letter gap,
//! including the gap before the first letter and the gap after the last:
//!
//! ```text
//! "fo2o3"  → word = ['f','o','o'], digits = [0, 0, 2, 3]
//! ".ab1"   → word = ['a','b'],     digits = [0, 0, 1], initial
//! "ab1."   → word = ['a','b'],     digits = [0, 0, 1], final
//! ```
//!
//! Odd digits allow a break at that gap, even digits forbid it, and the
//! highest digit among all matching patterns wins.

use std::cmp::Ordering;
use std::fmt;

use smallvec::SmallVec;

use crate::error::{HydraError, Result};

/// Boundary marker written around anchored patterns and used as the trie
/// edge label for word boundaries.
pub const SENTINEL: char = '.';

/// One weight per inter-letter gap.
pub type Digits = SmallVec<[u8; 16]>;

// ---------------------------------------------------------------------------
// Core type
// ---------------------------------------------------------------------------

/// A (word, digits) pair with a read cursor.
///
/// Equality and ordering only look at the word, the digits and the anchoring
/// flags; the cursor and the match anchor are scratch state.
#[derive(Debug, Clone)]
pub struct Pattern {
    word: Vec<char>,
    digits: Digits,
    initial: bool,
    terminal: bool,
    cursor: usize,
    anchor: usize,
    frozen: bool,
}

impl Default for Pattern {
    fn default() -> Self {
        Self::new()
    }
}

impl Pattern {
    /// An empty, growable pattern.
    #[must_use]
    pub fn new() -> Self {
        Self {
            word: Vec::new(),
            digits: smallvec::smallvec![0],
            initial: false,
            terminal: false,
            cursor: 0,
            anchor: 0,
            frozen: false,
        }
    }

    /// Parse TeX pattern notation such as `"hy3p"`, `".ex5am"` or `"4ism."`.
    ///
    /// A digit written outside an anchoring dot (`"1.ab"`, `"ab.1"`) occupies
    /// the boundary slot and is dropped.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let mut word = Vec::new();
        let mut digits = Digits::new();
        let mut pending: Option<u8> = None;
        let mut initial = false;
        let mut terminal = false;
        let mut leading_slot = false;
        let mut trailing_slot = false;

        for ch in text.chars() {
            if let Some(value) = ch.to_digit(10) {
                if terminal {
                    if trailing_slot {
                        return Err(HydraError::bad_pattern(text, "two digits after the final dot"));
                    }
                    trailing_slot = true;
                    digits.push(value as u8);
                } else if pending.is_some() {
                    return Err(HydraError::bad_pattern(text, "two digits in one gap"));
                } else {
                    pending = Some(value as u8);
                }
            } else if ch == SENTINEL {
                if word.is_empty() {
                    if initial {
                        return Err(HydraError::bad_pattern(text, "repeated leading dot"));
                    }
                    initial = true;
                    if let Some(slot) = pending.take() {
                        digits.push(slot);
                        leading_slot = true;
                    }
                } else if terminal {
                    return Err(HydraError::bad_pattern(text, "repeated final dot"));
                } else {
                    terminal = true;
                    digits.push(pending.take().unwrap_or(0));
                }
            } else if ch.is_alphabetic() {
                if terminal {
                    return Err(HydraError::bad_pattern(text, "letter after the final dot"));
                }
                for (i, lower) in ch.to_lowercase().enumerate() {
                    digits.push(if i == 0 { pending.take().unwrap_or(0) } else { 0 });
                    word.push(lower);
                }
            } else {
                return Err(HydraError::bad_pattern(
                    text,
                    format!("unexpected character {ch:?}"),
                ));
            }
        }
        if !terminal {
            digits.push(pending.unwrap_or(0));
        }
        if word.is_empty() {
            return Err(HydraError::bad_pattern(text, "no letters"));
        }

        let mut pattern = Self {
            word,
            digits,
            ..Self::new()
        };
        if initial && leading_slot {
            pattern.initial_mark();
        }
        if terminal {
            pattern.final_mark();
        }
        if initial {
            pattern.initial_mark();
        }
        pattern.validate(text)?;
        pattern.frozen = true;
        Ok(pattern)
    }

    /// Build a pattern from an explicit word and digit vector.
    pub fn with_digits(word: &str, digits: &[u8]) -> Result<Self> {
        Self::anchored(word, digits, false, false)
    }

    /// Build an anchored pattern; a digit vector carrying the boundary slot
    /// (one entry too many) is trimmed on the anchored side.
    pub fn anchored(word: &str, digits: &[u8], initial: bool, terminal: bool) -> Result<Self> {
        let mut pattern = Self {
            word: fold(word),
            digits: Digits::from_slice(digits),
            ..Self::new()
        };
        if initial {
            pattern.initial_mark();
        }
        if terminal {
            pattern.final_mark();
        }
        pattern.validate(word)?;
        pattern.frozen = true;
        Ok(pattern)
    }

    /// All-zero digits; used as a scratch accumulator for masking.
    #[must_use]
    pub fn dummy(word: &str) -> Self {
        let word = fold(word);
        let digits = smallvec::smallvec![0; word.len() + 1];
        Self {
            word,
            digits,
            ..Self::new()
        }
    }

    /// A single training candidate: `value` at gap `position`, zero elsewhere.
    pub fn simple(word: &[char], position: usize, value: u8) -> Result<Self> {
        if position > word.len() {
            return Err(HydraError::out_of_bounds(position, word.len() + 1));
        }
        let mut digits: Digits = smallvec::smallvec![0; word.len() + 1];
        digits[position] = value;
        Ok(Self {
            word: word.to_vec(),
            digits,
            frozen: true,
            ..Self::new()
        })
    }

    pub(crate) fn from_parts(word: Vec<char>, digits: Digits, initial: bool, terminal: bool) -> Self {
        debug_assert_eq!(digits.len(), word.len() + 1);
        Self {
            word,
            digits,
            initial,
            terminal,
            frozen: true,
            ..Self::new()
        }
    }

    fn validate(&self, source: &str) -> Result<()> {
        if self.word.contains(&SENTINEL) {
            return Err(HydraError::bad_pattern(source, "dot inside the word"));
        }
        if self.digits.len() == self.word.len() + 1 {
            Ok(())
        } else {
            Err(HydraError::bad_pattern(
                source,
                format!(
                    "{} digits for {} letters",
                    self.digits.len(),
                    self.word.len()
                ),
            ))
        }
    }

    // -- Anchoring --

    /// Anchor to the start of a word, dropping the boundary slot if present.
    pub fn initial_mark(&mut self) {
        self.initial = true;
        if self.digits.len() > self.word.len() + 1 {
            self.digits.remove(0);
        }
    }

    /// Anchor to the end of a word, dropping the boundary slot if present.
    pub fn final_mark(&mut self) {
        self.terminal = true;
        if self.digits.len() > self.word.len() + 1 {
            self.digits.pop();
        }
    }

    // -- Growth --

    /// Append a letter with a zero digit after it.
    pub fn grow(&mut self, letter: char) -> Result<()> {
        if self.frozen {
            return Err(HydraError::FrozenPattern {
                pattern: self.to_string(),
            });
        }
        for lower in letter.to_lowercase() {
            self.word.push(lower);
            self.digits.push(0);
        }
        Ok(())
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    // -- Masking --

    /// Pointwise max of `other`'s digits onto ours, aligned at the cursor.
    pub fn mask(&mut self, other: &Pattern) -> Result<()> {
        self.mask_at(other, self.cursor)
    }

    /// Pointwise max of `other`'s digits onto ours, aligned at `anchor`.
    pub fn mask_at(&mut self, other: &Pattern, anchor: usize) -> Result<()> {
        self.mask_digits_at(&other.digits, anchor)
    }

    pub(crate) fn mask_digits_at(&mut self, digits: &[u8], anchor: usize) -> Result<()> {
        let end = anchor + digits.len();
        if end > self.digits.len() {
            return Err(HydraError::out_of_bounds(end - 1, self.digits.len()));
        }
        for (slot, &digit) in self.digits[anchor..end].iter_mut().zip(digits) {
            *slot = (*slot).max(digit);
        }
        Ok(())
    }

    pub(crate) fn clear_digits(&mut self) {
        self.digits.iter_mut().for_each(|digit| *digit = 0);
    }

    pub(crate) fn digits_mut(&mut self) -> &mut [u8] {
        &mut self.digits
    }

    // -- Cursor --

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the cursor to gap `position`.
    pub fn seek(&mut self, position: usize) -> Result<()> {
        if position > self.word.len() {
            return Err(HydraError::out_of_bounds(position, self.digits.len()));
        }
        self.cursor = position;
        Ok(())
    }

    pub fn advance(&mut self) -> Result<()> {
        self.seek(self.cursor + 1)
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Digit at `cursor + offset`.
    pub fn digit_at(&self, offset: usize) -> Result<u8> {
        let index = self.cursor + offset;
        self.digits
            .get(index)
            .copied()
            .ok_or(HydraError::out_of_bounds(index, self.digits.len()))
    }

    /// Letter at `cursor + offset`, if any.
    #[must_use]
    pub fn letter_at(&self, offset: usize) -> Option<char> {
        self.word.get(self.cursor + offset).copied()
    }

    // -- Accessors --

    #[must_use]
    pub fn word(&self) -> &[char] {
        &self.word
    }

    #[must_use]
    pub fn word_string(&self) -> String {
        self.word.iter().collect()
    }

    #[must_use]
    pub fn digits(&self) -> &[u8] {
        &self.digits
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.word.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.word.is_empty()
    }

    #[must_use]
    pub fn is_initial(&self) -> bool {
        self.initial
    }

    #[must_use]
    pub fn is_final(&self) -> bool {
        self.terminal
    }

    /// Offset in the host word where this match began.
    #[must_use]
    pub fn anchor(&self) -> usize {
        self.anchor
    }

    pub fn set_anchor(&mut self, anchor: usize) {
        self.anchor = anchor;
    }

    /// Gaps strictly inside the word whose digit is odd.
    #[must_use]
    pub fn break_points(&self) -> Vec<usize> {
        (1..self.word.len())
            .filter(|&gap| self.digits[gap] % 2 == 1)
            .collect()
    }

    /// The bare word with `mark` inserted at every break point.
    #[must_use]
    pub fn hyphenated(&self, mark: char) -> String {
        let mut out = String::with_capacity(self.word.len() * 2);
        for (i, &letter) in self.word.iter().enumerate() {
            if i > 0 && self.digits[i] % 2 == 1 {
                out.push(mark);
            }
            out.push(letter);
        }
        out
    }
}

pub(crate) fn fold(word: &str) -> Vec<char> {
    word.chars().flat_map(char::to_lowercase).collect()
}

// ---------------------------------------------------------------------------
// Serialization and ordering
// ---------------------------------------------------------------------------

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;

        if self.initial {
            f.write_char(SENTINEL)?;
        }
        for (letter, &digit) in self.word.iter().zip(&self.digits) {
            if digit > 0 {
                write!(f, "{digit}")?;
            }
            f.write_char(*letter)?;
        }
        if let Some(&last) = self.digits.last()
            && last > 0
        {
            write!(f, "{last}")?;
        }
        if self.terminal {
            f.write_char(SENTINEL)?;
        }
        Ok(())
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pattern {}

impl PartialOrd for Pattern {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pattern {
    fn cmp(&self, other: &Self) -> Ordering {
        self.word
            .cmp(&other.word)
            .then_with(|| self.digits.as_slice().cmp(other.digits.as_slice()))
            .then_with(|| self.initial.cmp(&other.initial))
            .then_with(|| self.terminal.cmp(&other.terminal))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
