//! `heracles hyphenate`: apply a pattern file to words.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Args;
use hydra::Hydra;

use crate::error::Result;
use crate::labour::{ensure_input, margins_or_default, read_patterns};

#[derive(Debug, Clone, Args)]
pub struct HyphenateArgs {
    /// Pattern file, one pattern per line.
    #[arg(long, short = 'p')]
    pub patterns: PathBuf,

    /// Translate file whose first line holds the hyphenation margins.
    #[arg(long, short = 't')]
    pub translate: Option<PathBuf>,

    /// Character inserted at each break.
    #[arg(long, default_value_t = '-')]
    pub mark: char,

    /// Words to hyphenate; read from stdin when none are given.
    pub words: Vec<String>,
}

/// `word` with `mark` at every break the patterns allow.
pub fn hyphenate_word(hydra: &Hydra, word: &str, mark: char) -> Result<String> {
    Ok(hydra.prehyphenate(word)?.hyphenated(mark))
}

pub fn run_hyphenate(args: HyphenateArgs, out: &mut dyn Write) -> Result<()> {
    ensure_input(&args.patterns)?;
    if let Some(path) = &args.translate {
        ensure_input(path)?;
    }
    let margins = margins_or_default(args.translate.as_deref())?;
    let hydra = read_patterns(&args.patterns)?.with_margins(margins);

    if args.words.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line?;
            let word = line.trim();
            if !word.is_empty() {
                writeln!(out, "{}", hyphenate_word(&hydra, word, args.mark)?)?;
            }
        }
    } else {
        for word in &args.words {
            writeln!(out, "{}", hyphenate_word(&hydra, word, args.mark)?)?;
        }
    }
    Ok(())
}
