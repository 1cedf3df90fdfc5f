//! `heracles train`: learn patterns from a hyphenated word list.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use hydra::{Heracles, TrainingOutcome, TrainingPlan};

use crate::error::Result;
use crate::labour::{
    ensure_input, ensure_output, margins_or_default, read_dictionary, read_patterns,
    write_patterns, write_report,
};

#[derive(Debug, Clone, Args)]
pub struct TrainArgs {
    /// Hyphenated word list, one word per line.
    #[arg(long, short = 'd')]
    pub dictionary: PathBuf,

    /// Level range, then length range, good weight, bad weight and
    /// threshold for each level, e.g. `1,1,2,5,1,1,1`.
    #[arg(long, value_delimiter = ',', num_args = 1.., required = true)]
    pub params: Vec<usize>,

    /// Translate file whose first line holds the hyphenation margins.
    #[arg(long, short = 't')]
    pub translate: Option<PathBuf>,

    /// Existing patterns to continue training from.
    #[arg(long, short = 'p')]
    pub patterns: Option<PathBuf>,

    /// Where to write the patterns (stdout when absent).
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Where to write a JSON training report.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

pub fn run_train(args: TrainArgs, out: &mut dyn Write) -> Result<()> {
    ensure_input(&args.dictionary)?;
    for input in [args.translate.as_deref(), args.patterns.as_deref()]
        .into_iter()
        .flatten()
    {
        ensure_input(input)?;
    }
    for output in [args.output.as_deref(), args.report.as_deref()]
        .into_iter()
        .flatten()
    {
        ensure_output(output)?;
    }

    let plan = TrainingPlan::from_params(&args.params)?;
    let margins = margins_or_default(args.translate.as_deref())?;
    let lemmas = read_dictionary(&args.dictionary)?;

    let mut heracles = Heracles::new(plan, margins);
    if let Some(path) = &args.patterns {
        heracles = heracles.with_seed(read_patterns(path)?);
    }
    let TrainingOutcome { hydra, report } = heracles.run_lemmas(lemmas)?;

    let written = match &args.output {
        Some(path) => write_patterns(&hydra, path)?,
        None => hydra.write_patterns(out)?,
    };
    if let Some(path) = &args.report {
        write_report(&report, path)?;
    }

    let last = report.levels.last();
    tracing::info!(
        message = "train.done",
        patterns = written,
        levels = report.levels.len(),
        found = last.map_or(0, |level| level.evaluation.found),
        missed = last.map_or(0, |level| level.evaluation.missed),
        wrong = last.map_or(0, |level| level.evaluation.wrong),
    );
    Ok(())
}
