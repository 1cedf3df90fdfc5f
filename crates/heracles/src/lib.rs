#![forbid(unsafe_code)]

//! Command-line front end for the `hydra` pattern trie: train patterns from a
//! hyphenated word list, hyphenate words with a pattern file, and check a
//! pattern file against a dictionary.

pub mod check;
pub mod cli;
pub mod error;
pub mod hyphenate;
pub mod labour;
pub mod train;

pub use cli::{Cli, Commands, run, run_from_env};
pub use error::{HeraclesError, Result};
