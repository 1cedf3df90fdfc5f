//! File handling around the trie and the trainer: dictionaries, pattern
//! files, the translate file that carries the hyphenation margins, and the
//! JSON report.
//!
//! Every path is checked before any parsing starts, so a typo in the last
//! argument does not cost a training run.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use hydra::{Hydra, HyphenMins, Lemma, TrainingReport};
use serde::Serialize;

use crate::error::{HeraclesError, Result};

// ---------------------------------------------------------------------------
// Path checks
// ---------------------------------------------------------------------------

/// An input file must exist.
pub fn ensure_input(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(HeraclesError::invalid(format!(
            "input file does not exist: {}",
            path.display()
        )))
    }
}

/// The directory an output file goes into must exist.
pub fn ensure_output(path: &Path) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => return Ok(()),
    };
    if parent.is_dir() {
        Ok(())
    } else {
        Err(HeraclesError::invalid(format!(
            "output directory does not exist: {}",
            parent.display()
        )))
    }
}

// ---------------------------------------------------------------------------
// Translate file
// ---------------------------------------------------------------------------

/// Margins from the first line of a translate file: left in columns 1–2,
/// right in columns 3–4, so single digits sit at offsets 1 and 3 (` 2 3`).
/// Anything after column 4 is ignored. A blank field keeps the TeX default.
///
/// A field holding anything other than digits and blanks is an error, not a
/// fallback: in `ne2.3cm` columns 1–2 read `ne`, and guessing a default there
/// would train with margins the file never stated.
pub fn parse_margins(first_line: &str) -> Result<HyphenMins> {
    let columns: Vec<char> = first_line.chars().collect();
    let defaults = HyphenMins::default();
    let left = margin_field(&columns, 0, defaults.left)?;
    let right = margin_field(&columns, 2, defaults.right)?;
    Ok(HyphenMins::new(left, right))
}

fn margin_field(columns: &[char], start: usize, default: usize) -> Result<usize> {
    let field: String = columns.iter().skip(start).take(2).collect();
    let field = field.trim();
    if field.is_empty() {
        return Ok(default);
    }
    field.parse().map_err(|_| {
        HeraclesError::invalid(format!(
            "hyphenation margin {field:?} in columns {}-{} is not a number",
            start + 1,
            start + 2
        ))
    })
}

pub fn read_margins(path: &Path) -> Result<HyphenMins> {
    ensure_input(path)?;
    let text = fs::read_to_string(path)?;
    let margins = parse_margins(text.lines().next().unwrap_or_default())?;
    tracing::debug!(
        message = "labour.margins",
        path = %path.display(),
        left = margins.left,
        right = margins.right,
    );
    Ok(margins)
}

/// Margins from an optional translate file, defaulting to 2/3.
pub fn margins_or_default(path: Option<&Path>) -> Result<HyphenMins> {
    path.map_or_else(|| Ok(HyphenMins::default()), read_margins)
}

// ---------------------------------------------------------------------------
// Dictionaries and pattern files
// ---------------------------------------------------------------------------

pub fn read_dictionary(path: &Path) -> Result<Vec<Lemma>> {
    ensure_input(path)?;
    let text = fs::read_to_string(path)?;
    let mut lemmas = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let lemma = Lemma::parse(line).map_err(|source| HeraclesError::AtLine {
            path: path.to_path_buf(),
            line: index + 1,
            source,
        })?;
        lemmas.extend(lemma);
    }
    tracing::info!(message = "labour.dictionary", path = %path.display(), lemmas = lemmas.len());
    Ok(lemmas)
}

/// Load a pattern file: one pattern per line, `%` comments and blank lines
/// ignored.
pub fn read_patterns(path: &Path) -> Result<Hydra> {
    ensure_input(path)?;
    let text = fs::read_to_string(path)?;
    let mut hydra = Hydra::new();
    for (index, line) in text.lines().enumerate() {
        let entry = line.split('%').next().unwrap_or_default().trim();
        if entry.is_empty() {
            continue;
        }
        hydra
            .insert_word(entry)
            .map_err(|source| HeraclesError::AtLine {
                path: path.to_path_buf(),
                line: index + 1,
                source,
            })?;
    }
    if !hydra.conflicts().is_empty() {
        tracing::warn!(
            message = "labour.conflicts",
            path = %path.display(),
            conflicts = hydra.conflicts().len(),
        );
    }
    tracing::info!(message = "labour.patterns", path = %path.display(), patterns = hydra.count());
    Ok(hydra)
}

pub fn write_patterns(hydra: &Hydra, path: &Path) -> Result<usize> {
    ensure_output(path)?;
    let mut out = BufWriter::new(File::create(path)?);
    let written = hydra.write_patterns(&mut out)?;
    out.flush()?;
    Ok(written)
}

pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    ensure_output(path)?;
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

pub fn write_report(report: &TrainingReport, path: &Path) -> Result<()> {
    write_json(report, path)
}
