//! `heracles check`: annotate a dictionary with what a pattern file finds.
//!
//! Output is itself a dictionary: `*` marks a found break, `-` a missed one
//! and `.` a wrong one, followed by a `%` summary line.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use hydra::Evaluation;

use crate::error::Result;
use crate::labour::{
    ensure_input, ensure_output, margins_or_default, read_dictionary, read_patterns, write_json,
};

#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Pattern file, one pattern per line.
    #[arg(long, short = 'p')]
    pub patterns: PathBuf,

    /// Hyphenated word list, one word per line.
    #[arg(long, short = 'd')]
    pub dictionary: PathBuf,

    /// Translate file whose first line holds the hyphenation margins.
    #[arg(long, short = 't')]
    pub translate: Option<PathBuf>,

    /// Where to write the counts as JSON.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

pub fn run_check(args: CheckArgs, out: &mut dyn Write) -> Result<()> {
    ensure_input(&args.patterns)?;
    ensure_input(&args.dictionary)?;
    if let Some(path) = &args.translate {
        ensure_input(path)?;
    }
    if let Some(path) = &args.report {
        ensure_output(path)?;
    }

    let margins = margins_or_default(args.translate.as_deref())?;
    let hydra = read_patterns(&args.patterns)?.with_margins(margins);
    let mut lemmas = read_dictionary(&args.dictionary)?;

    let evaluation = Evaluation::of(&hydra, &mut lemmas)?;
    for lemma in &lemmas {
        writeln!(out, "{}", lemma.annotate())?;
    }
    writeln!(
        out,
        "% found {}, missed {}, wrong {}",
        evaluation.found, evaluation.missed, evaluation.wrong
    )?;

    if let Some(path) = &args.report {
        write_json(&evaluation, path)?;
    }
    tracing::info!(
        message = "check.done",
        lemmas = lemmas.len(),
        found = evaluation.found,
        missed = evaluation.missed,
        wrong = evaluation.wrong,
    );
    Ok(())
}
