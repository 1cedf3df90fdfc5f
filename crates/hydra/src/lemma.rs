//! Dictionary entries with their true break points.
//!
//! Dictionary lines use patgen's marks: `-` for a break, `*` for a break the
//! patterns already find, `.` for a break the patterns produce wrongly. `%`
//! starts a comment.

use crate::error::{HydraError, Result};
use crate::pattern::Pattern;

/// Classification of one gap of a lemma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Break {
    /// Not a break, and not predicted as one.
    NoBreak,
    /// A true break the patterns miss.
    TrueBreak,
    /// A true break the patterns find.
    Confirmed,
    /// Predicted by the patterns but not a true break.
    Wrong,
}

impl Break {
    #[must_use]
    pub fn is_true(self) -> bool {
        matches!(self, Self::TrueBreak | Self::Confirmed)
    }

    /// Reclassify against a prediction (an odd digit).
    #[must_use]
    pub fn with_prediction(self, predicted: bool) -> Self {
        match (self.is_true(), predicted) {
            (true, true) => Self::Confirmed,
            (true, false) => Self::TrueBreak,
            (false, true) => Self::Wrong,
            (false, false) => Self::NoBreak,
        }
    }

    fn from_mark(mark: char) -> Option<Self> {
        match mark {
            '-' => Some(Self::TrueBreak),
            '*' => Some(Self::Confirmed),
            '.' => Some(Self::Wrong),
            _ => None,
        }
    }
}

/// A dictionary word: a pattern whose digits hold the current prediction,
/// plus the true break markers.
#[derive(Debug, Clone)]
pub struct Lemma {
    pattern: Pattern,
    breakpoints: Vec<Break>,
}

impl Lemma {
    /// Parse one dictionary line. Blank lines and comment-only lines yield
    /// `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let text = line.split('%').next().unwrap_or_default().trim();
        if text.is_empty() {
            return Ok(None);
        }

        let mut pattern = Pattern::new();
        let mut breakpoints = vec![Break::NoBreak];
        for ch in text.chars() {
            if let Some(mark) = Break::from_mark(ch) {
                let gap = pattern.len();
                breakpoints[gap] = mark;
            } else if ch.is_alphabetic() {
                let before = pattern.len();
                pattern.grow(ch)?;
                breakpoints.resize(breakpoints.len() + pattern.len() - before, Break::NoBreak);
            } else {
                return Err(HydraError::bad_pattern(
                    text,
                    format!("unexpected character {ch:?} in dictionary entry"),
                ));
            }
        }
        if pattern.is_empty() {
            return Err(HydraError::bad_pattern(text, "no letters"));
        }
        pattern.freeze();
        Ok(Some(Self {
            pattern,
            breakpoints,
        }))
    }

    #[must_use]
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn pattern_mut(&mut self) -> &mut Pattern {
        &mut self.pattern
    }

    #[must_use]
    pub fn word(&self) -> &[char] {
        self.pattern.word()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pattern.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    /// Marks as read from the dictionary, one per gap.
    #[must_use]
    pub fn breakpoints(&self) -> &[Break] {
        &self.breakpoints
    }

    pub fn seek(&mut self, position: usize) -> Result<()> {
        self.pattern.seek(position)
    }

    /// Tag of gap `cursor + offset`, reclassified against the current digits.
    pub fn break_at(&self, offset: usize) -> Result<Break> {
        let digit = self.pattern.digit_at(offset)?;
        let index = self.pattern.cursor() + offset;
        Ok(self.breakpoints[index].with_prediction(digit % 2 == 1))
    }

    /// The word with patgen's marks for the current prediction: `*` found,
    /// `-` missed, `.` wrong.
    #[must_use]
    pub fn annotate(&self) -> String {
        let word = self.pattern.word();
        let digits = self.pattern.digits();
        let mut out = String::with_capacity(word.len() * 2);
        for gap in 0..=word.len() {
            let mark = match self.breakpoints[gap].with_prediction(digits[gap] % 2 == 1) {
                Break::Confirmed => Some('*'),
                Break::TrueBreak => Some('-'),
                Break::Wrong => Some('.'),
                Break::NoBreak => None,
            };
            if let Some(mark) = mark {
                out.push(mark);
            }
            if let Some(&letter) = word.get(gap) {
                out.push(letter);
            }
        }
        out
    }
}
