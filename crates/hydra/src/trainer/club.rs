//! One hyphenation level of training.
//!
//! For each candidate length and each dot position, the club scans the whole
//! dictionary into a scratch counting trie and then triages every counted
//! candidate against the level's weights.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::lemma::{Break, Lemma};
use crate::pattern::Pattern;
use crate::trie::{HyphenMins, Hydra, Source, Verdict};

use super::config::{LevelParams, Triage, organ_pipe};
use super::knockout::Knockouts;

/// Counts for one (length, dot) pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PassSummary {
    pub level: u8,
    pub length: usize,
    pub dot: usize,
    /// Distinct candidate patterns counted.
    pub candidates: usize,
    pub good: u32,
    pub bad: u32,
    pub accepted: usize,
    pub unsure: usize,
    pub hopeless: usize,
}

/// Training state for a single level.
#[derive(Debug)]
pub struct Club {
    params: LevelParams,
    margins: HyphenMins,
    knockouts: Knockouts,
    more: Vec<bool>,
}

impl Club {
    #[must_use]
    pub fn new(params: LevelParams, margins: HyphenMins) -> Self {
        Self {
            params,
            margins,
            knockouts: Knockouts::new(),
            more: vec![true; params.length_end + 1],
        }
    }

    #[must_use]
    pub fn params(&self) -> &LevelParams {
        &self.params
    }

    /// Run every (length, dot) pass of the level, growing `hydra`.
    pub fn train(&mut self, hydra: &mut Hydra, lemmas: &mut [Lemma]) -> Result<Vec<PassSummary>> {
        let mut passes = Vec::new();
        for length in self.params.lengths() {
            for dot in organ_pipe(length) {
                if !self.more[dot] {
                    tracing::trace!(message = "club.skip", level = self.params.level, length, dot);
                    continue;
                }
                let summary = self.pass(hydra, lemmas, length, dot)?;
                self.more[dot] = summary.accepted > 0 || summary.unsure > 0;
                passes.push(summary);
            }
        }
        Ok(passes)
    }

    /// Scan and triage one (length, dot) combination.
    pub fn pass(
        &mut self,
        hydra: &mut Hydra,
        lemmas: &mut [Lemma],
        length: usize,
        dot: usize,
    ) -> Result<PassSummary> {
        let mut counting = self.scan(hydra, lemmas, length, dot)?;
        let summary = self.triage(&mut counting, hydra, length, dot)?;
        tracing::info!(
            message = "club.pass",
            level = summary.level,
            length,
            dot,
            candidates = summary.candidates,
            good = summary.good,
            bad = summary.bad,
            accepted = summary.accepted,
            unsure = summary.unsure,
            hopeless = summary.hopeless,
        );
        Ok(summary)
    }

    fn verdict(&self, tag: Break) -> Verdict {
        match (self.params.is_odd(), tag) {
            (true, Break::TrueBreak) | (false, Break::Wrong) => Verdict::Good,
            (true, Break::NoBreak) | (false, Break::Confirmed) => Verdict::Bad,
            _ => Verdict::Neutral,
        }
    }

    /// Count every candidate of shape (length, dot) the dictionary offers.
    fn scan(
        &self,
        hydra: &Hydra,
        lemmas: &mut [Lemma],
        length: usize,
        dot: usize,
    ) -> Result<Hydra> {
        let mut counting = Hydra::new();
        let low = dot.max(self.margins.left);
        let reach = (length - dot).max(self.margins.right);

        for (line, lemma) in lemmas.iter_mut().enumerate() {
            hydra.prehyphenate_into(lemma.pattern_mut())?;
            let Some(high) = lemma.len().checked_sub(reach) else {
                continue;
            };
            for gap in low..=high {
                let column = gap - dot;
                if self.knockouts.is_blocked(line, column, dot, length) {
                    continue;
                }
                let letters = &lemma.word()[column..column + length];
                let candidate = Pattern::simple(letters, dot, self.params.level)?;
                let node = counting.insert_pattern(&candidate)?;

                lemma.seek(column)?;
                let verdict = self.verdict(lemma.break_at(dot)?);
                counting.tally(node, verdict);
                counting.record_source(
                    node,
                    Source {
                        line,
                        column,
                        dot,
                        length,
                        verdict,
                    },
                );
            }
        }
        Ok(counting)
    }

    /// Decide every counted candidate, moving the accepted ones into `hydra`.
    fn triage(
        &mut self,
        counting: &mut Hydra,
        hydra: &mut Hydra,
        length: usize,
        dot: usize,
    ) -> Result<PassSummary> {
        let mut summary = PassSummary {
            level: self.params.level,
            length,
            dot,
            ..PassSummary::default()
        };

        for node in counting.heads() {
            let (good, bad) = counting.counts(node);
            summary.candidates += 1;
            summary.good += good;
            summary.bad += bad;

            match self.params.triage(good, bad) {
                Triage::Hopeless => {
                    for source in counting.sources(node) {
                        self.knockouts.knock_out(source, false);
                    }
                    counting.chophead(node);
                    summary.hopeless += 1;
                }
                Triage::Accepted => {
                    for source in counting.sources(node) {
                        self.knockouts.knock_out(source, true);
                    }
                    if let Some(pattern) = counting.pattern_at(node) {
                        tracing::debug!(message = "club.accept", pattern = %pattern, good, bad);
                    }
                    hydra.transplant(counting, node)?;
                    summary.accepted += 1;
                }
                Triage::Unsure => {
                    counting.chophead(node);
                    summary.unsure += 1;
                }
            }
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trainer::config::TrainingPlan;

    fn lemmas(lines: &[&str]) -> Vec<Lemma> {
        lines
            .iter()
            .filter_map(|line| Lemma::parse(line).unwrap())
            .collect()
    }

    fn level_one() -> LevelParams {
        TrainingPlan::from_params(&[1, 1, 2, 5, 1, 1, 1])
            .unwrap()
            .levels()[0]
    }

    #[test]
    fn verdicts_follow_level_parity() {
        let mut params = level_one();
        let odd = Club::new(params, HyphenMins::default());
        assert_eq!(odd.verdict(Break::TrueBreak), Verdict::Good);
        assert_eq!(odd.verdict(Break::NoBreak), Verdict::Bad);
        assert_eq!(odd.verdict(Break::Wrong), Verdict::Neutral);
        assert_eq!(odd.verdict(Break::Confirmed), Verdict::Neutral);

        params.level = 2;
        let even = Club::new(params, HyphenMins::default());
        assert_eq!(even.verdict(Break::Wrong), Verdict::Good);
        assert_eq!(even.verdict(Break::Confirmed), Verdict::Bad);
        assert_eq!(even.verdict(Break::TrueBreak), Verdict::Neutral);
        assert_eq!(even.verdict(Break::NoBreak), Verdict::Neutral);
    }

    #[test]
    fn scan_counts_candidates_inside_margins() {
        let club = Club::new(level_one(), HyphenMins::default());
        let mut dictionary = lemmas(&["xxa-b-cxxx"]);
        let counting = club.scan(&Hydra::new(), &mut dictionary, 2, 1).unwrap();
        assert_eq!(counting.digest(), vec!["a1b", "b1c", "c1x", "x1a"]);

        let bc = counting.read("bc").unwrap();
        assert_eq!(counting.counts(bc), (1, 0));
        assert_eq!(
            counting.sources(bc),
            &[Source {
                line: 0,
                column: 3,
                dot: 1,
                length: 2,
                verdict: Verdict::Good,
            }]
        );
        assert_eq!(counting.counts(counting.read("xa").unwrap()), (0, 1));
    }

    #[test]
    fn scan_skips_words_shorter_than_margins() {
        let club = Club::new(level_one(), HyphenMins::default());
        let mut dictionary = lemmas(&["a-b", "ab-c"]);
        let counting = club.scan(&Hydra::new(), &mut dictionary, 2, 1).unwrap();
        assert!(counting.is_empty());
    }

    #[test]
    fn first_pass_accepts_and_knocks_out() {
        let mut club = Club::new(level_one(), HyphenMins::default());
        let mut dictionary = lemmas(&["xxa-b-cxxx", "xxabc-defxxx", "xxab-cd-fg-hixxx"]);
        let mut hydra = Hydra::new().with_margins(HyphenMins::default());

        let summary = club.pass(&mut hydra, &mut dictionary, 2, 1).unwrap();
        assert_eq!(hydra.digest(), vec!["b1c", "d1f", "g1h"]);
        assert_eq!(summary.accepted, 3);
        assert_eq!(summary.unsure, 2);
        assert_eq!(summary.candidates, 13);

        // Line 0 gaps 3..=5 are settled by "b1c".
        assert!(club.knockouts.is_blocked(0, 3, 0, 2));
        assert!(club.knockouts.is_blocked(0, 4, 1, 3));
        assert!(!club.knockouts.is_blocked(0, 2, 0, 2));
    }

    #[test]
    fn train_level_one() {
        let mut club = Club::new(level_one(), HyphenMins::default());
        let mut dictionary = lemmas(&["xxa-b-cxxx", "xxabc-defxxx", "xxab-cd-fg-hixxx"]);
        let mut hydra = Hydra::new().with_margins(HyphenMins::default());
        let passes = club.train(&mut hydra, &mut dictionary).unwrap();

        assert_eq!(hydra.digest(), vec!["b1c", "1de", "d1f", "g1h"]);
        let order: Vec<(usize, usize)> = passes.iter().map(|p| (p.length, p.dot)).collect();
        assert_eq!(&order[..3], &[(2, 1), (2, 0), (2, 2)]);
        // Dot 2 went quiet at length 2 and is never scanned again.
        assert!(!order[3..].iter().any(|&(_, dot)| dot == 2));
    }
}
