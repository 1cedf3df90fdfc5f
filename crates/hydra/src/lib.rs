#![forbid(unsafe_code)]

//! Liang hyphenation patterns: storage, matching and training.
//!
//! # Role
//! `hydra` keeps a trie of TeX hyphenation patterns ([`Hydra`]) and learns
//! new ones from a hyphenated word list the way Knuth and Liang's patgen
//! does ([`Heracles`]).
//!
//! # Example
//! ```
//! use hydra::{Hydra, HyphenMins};
//!
//! let hydra = Hydra::from_words(["fo1", "fo2o3", "ba1", "ba2r"]).unwrap();
//! assert_eq!(hydra.prehyphenate("foobar").unwrap().to_string(), "fo2o3ba2r");
//!
//! let trained = hydra::train(
//!     ["xxa-b-cxxx", "xxabc-defxxx", "xxab-cd-fg-hixxx"],
//!     &[1, 1, 2, 5, 1, 1, 1],
//!     HyphenMins::default(),
//! )
//! .unwrap();
//! assert_eq!(trained.digest(), ["b1c", "1de", "d1f", "g1h"]);
//! ```

pub mod error;
pub mod lemma;
pub mod pattern;
pub mod trainer;
pub mod trie;

pub use error::{HydraError, Result};
pub use lemma::{Break, Lemma};
pub use pattern::{Digits, Pattern, SENTINEL};
pub use trainer::{
    Club, Evaluation, Heracles, LevelParams, LevelSummary, PassSummary, TrainingOutcome,
    TrainingPlan, TrainingReport, organ_pipe, parse_dictionary, train,
};
pub use trie::{
    Conflict, ConflictMode, HyphenMins, Hydra, LEFT_HYPHEN_MIN, NodeId, RIGHT_HYPHEN_MIN, Source,
    Verdict,
};
