//! Pattern training in the manner of patgen.
//!
//! [`Heracles`] drives one [`Club`] per hyphenation level over a dictionary
//! of hyphenated words, growing a final [`Hydra`] level by level. Odd levels
//! learn breaks the current patterns miss; even levels learn to inhibit the
//! wrong ones.
//!
//! ```text
//! for level:
//!   for length:
//!     for dot in organ_pipe(length):
//!       scan dictionary  -> counting trie (good/bad per candidate)
//!       triage           -> accepted candidates move into the final trie
//! ```

mod club;
mod config;
mod knockout;

pub use club::{Club, PassSummary};
pub use config::{LevelParams, MAX_LEVEL, TrainingPlan, Triage, organ_pipe};
pub use knockout::Knockouts;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::lemma::Lemma;
use crate::trie::{ConflictMode, HyphenMins, Hydra};

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// How well a trie hyphenates a dictionary, counted over gaps inside the
/// margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Evaluation {
    /// True breaks the patterns find.
    pub found: usize,
    /// True breaks the patterns miss.
    pub missed: usize,
    /// Breaks the patterns produce that are not true breaks.
    pub wrong: usize,
}

impl Evaluation {
    /// Prehyphenate every lemma with `hydra` and tally the result.
    pub fn of(hydra: &Hydra, lemmas: &mut [Lemma]) -> Result<Self> {
        let margins = hydra.margins();
        let mut evaluation = Self::default();
        for lemma in lemmas.iter_mut() {
            hydra.prehyphenate_into(lemma.pattern_mut())?;
            let len = lemma.len();
            let digits = lemma.pattern().digits();
            for gap in (1..len).filter(|&gap| margins.allows(gap, len)) {
                let predicted = digits[gap] % 2 == 1;
                match (lemma.breakpoints()[gap].is_true(), predicted) {
                    (true, true) => evaluation.found += 1,
                    (true, false) => evaluation.missed += 1,
                    (false, true) => evaluation.wrong += 1,
                    (false, false) => {}
                }
            }
        }
        Ok(evaluation)
    }
}

/// What happened at one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSummary {
    pub level: u8,
    /// Skipped because the two levels before it learned nothing.
    pub skipped: bool,
    pub accepted: usize,
    /// Patterns in the final trie after the level.
    pub patterns: usize,
    pub evaluation: Evaluation,
    pub passes: Vec<PassSummary>,
}

/// Summary of a whole training run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub margins: HyphenMins,
    pub lemmas: usize,
    pub levels: Vec<LevelSummary>,
    pub patterns: usize,
}

/// The trained trie together with its report.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub hydra: Hydra,
    pub report: TrainingReport,
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Parse dictionary lines, skipping blanks and comments.
pub fn parse_dictionary<I, S>(lines: I) -> Result<Vec<Lemma>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut lemmas = Vec::new();
    for line in lines {
        if let Some(lemma) = Lemma::parse(line.as_ref())? {
            lemmas.push(lemma);
        }
    }
    Ok(lemmas)
}

/// Runs a [`TrainingPlan`] over a dictionary.
#[derive(Debug, Clone)]
pub struct Heracles {
    plan: TrainingPlan,
    margins: HyphenMins,
    seed: Option<Hydra>,
}

impl Heracles {
    #[must_use]
    pub fn new(plan: TrainingPlan, margins: HyphenMins) -> Self {
        Self {
            plan,
            margins,
            seed: None,
        }
    }

    /// Build from patgen's flat parameter list.
    pub fn from_params(params: &[usize], margins: HyphenMins) -> Result<Self> {
        Ok(Self::new(TrainingPlan::from_params(params)?, margins))
    }

    /// Continue training from existing patterns instead of an empty trie.
    #[must_use]
    pub fn with_seed(mut self, hydra: Hydra) -> Self {
        self.seed = Some(hydra);
        self
    }

    #[must_use]
    pub fn plan(&self) -> &TrainingPlan {
        &self.plan
    }

    #[must_use]
    pub fn margins(&self) -> HyphenMins {
        self.margins
    }

    /// Train on raw dictionary lines.
    pub fn run<I, S>(self, dictionary: I) -> Result<TrainingOutcome>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lemmas = parse_dictionary(dictionary)?;
        self.run_lemmas(lemmas)
    }

    /// Train on parsed lemmas.
    pub fn run_lemmas(self, mut lemmas: Vec<Lemma>) -> Result<TrainingOutcome> {
        let mut hydra = self
            .seed
            .unwrap_or_default()
            .with_margins(self.margins)
            .with_mode(ConflictMode::Lax);
        let mut levels = Vec::with_capacity(self.plan.levels().len());
        let mut idle = 0usize;

        for &params in self.plan.levels() {
            let span = tracing::info_span!("heracles.level", level = params.level);
            let _guard = span.enter();

            if idle >= 2 {
                tracing::info!(message = "heracles.skip", level = params.level, idle);
                levels.push(LevelSummary {
                    level: params.level,
                    skipped: true,
                    accepted: 0,
                    patterns: hydra.count(),
                    evaluation: Evaluation::of(&hydra, &mut lemmas)?,
                    passes: Vec::new(),
                });
                continue;
            }

            let mut club = Club::new(params, self.margins);
            let passes = club.train(&mut hydra, &mut lemmas)?;
            let accepted: usize = passes.iter().map(|pass| pass.accepted).sum();
            let evaluation = Evaluation::of(&hydra, &mut lemmas)?;
            let patterns = hydra.count();
            tracing::info!(
                message = "heracles.level",
                level = params.level,
                accepted,
                patterns,
                found = evaluation.found,
                missed = evaluation.missed,
                wrong = evaluation.wrong,
            );

            idle = if accepted == 0 { idle + 1 } else { 0 };
            levels.push(LevelSummary {
                level: params.level,
                skipped: false,
                accepted,
                patterns,
                evaluation,
                passes,
            });
        }

        let report = TrainingReport {
            margins: self.margins,
            lemmas: lemmas.len(),
            levels,
            patterns: hydra.count(),
        };
        Ok(TrainingOutcome { hydra, report })
    }
}

/// Train a fresh trie: `params` is patgen's flat parameter list, `margins`
/// the left/right hyphenation minimums.
pub fn train<I, S>(dictionary: I, params: &[usize], margins: HyphenMins) -> Result<Hydra>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Ok(Heracles::from_params(params, margins)?
        .run(dictionary)?
        .hydra)
}
