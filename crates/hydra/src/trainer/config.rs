//! Training parameters.
//!
//! patgen reads its schedule as a flat list of integers:
//!
//! ```text
//! [level_start, level_end,
//!  length_start, length_end, good_weight, bad_weight, threshold,   // level_start
//!  ...                                                             // one group per level
//! ]
//! ```

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{HydraError, Result};

/// Highest hyphenation level; digits are single decimal characters.
pub const MAX_LEVEL: u8 = 9;

const GROUP: usize = 5;

/// Outcome of weighing a candidate's counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Triage {
    Hopeless,
    Accepted,
    Unsure,
}

/// Schedule for one hyphenation level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelParams {
    pub level: u8,
    pub length_start: usize,
    pub length_end: usize,
    pub good_weight: usize,
    pub bad_weight: usize,
    pub threshold: usize,
}

impl LevelParams {
    /// Candidate lengths, shortest first.
    #[must_use]
    pub fn lengths(&self) -> RangeInclusive<usize> {
        self.length_start..=self.length_end
    }

    /// Odd levels insert breaks, even levels inhibit them.
    #[must_use]
    pub fn is_odd(&self) -> bool {
        self.level % 2 == 1
    }

    #[must_use]
    pub fn triage(&self, good: u32, bad: u32) -> Triage {
        let gain = (good as usize).saturating_mul(self.good_weight);
        let loss = (bad as usize).saturating_mul(self.bad_weight);
        if gain < self.threshold {
            Triage::Hopeless
        } else if gain >= loss.saturating_add(self.threshold) {
            Triage::Accepted
        } else {
            Triage::Unsure
        }
    }

    fn validate(&self) -> Result<()> {
        if self.length_start == 0 || self.length_start > self.length_end {
            return Err(HydraError::invalid(format!(
                "level {}: bad pattern length range {}..={}",
                self.level, self.length_start, self.length_end
            )));
        }
        if self.threshold == 0 {
            return Err(HydraError::invalid(format!(
                "level {}: threshold must be positive",
                self.level
            )));
        }
        Ok(())
    }
}

/// The full level schedule of a training run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingPlan {
    levels: Vec<LevelParams>,
}

impl TrainingPlan {
    /// Build a plan from explicit per-level parameters.
    pub fn new(levels: Vec<LevelParams>) -> Result<Self> {
        if levels.is_empty() {
            return Err(HydraError::invalid("training plan has no levels"));
        }
        for params in &levels {
            if params.level == 0 || params.level > MAX_LEVEL {
                return Err(HydraError::invalid(format!(
                    "level {} outside 1..={MAX_LEVEL}",
                    params.level
                )));
            }
            params.validate()?;
        }
        Ok(Self { levels })
    }

    /// Parse patgen's flat parameter list.
    pub fn from_params(params: &[usize]) -> Result<Self> {
        let [start, end, rest @ ..] = params else {
            return Err(HydraError::invalid(
                "parameters must start with a level range",
            ));
        };
        let (start, end) = (*start, *end);
        if start == 0 || start > end || end > usize::from(MAX_LEVEL) {
            return Err(HydraError::invalid(format!(
                "level range {start}..={end} outside 1..={MAX_LEVEL}"
            )));
        }

        let count = end - start + 1;
        if rest.len() != count * GROUP {
            return Err(HydraError::invalid(format!(
                "levels {start}..={end} need {} parameters, got {}",
                count * GROUP,
                rest.len()
            )));
        }

        let levels = (start..=end)
            .zip(rest.chunks_exact(GROUP))
            .map(|(level, group)| LevelParams {
                // Bounded by MAX_LEVEL above.
                level: level as u8,
                length_start: group[0],
                length_end: group[1],
                good_weight: group[2],
                bad_weight: group[3],
                threshold: group[4],
            })
            .collect();
        Self::new(levels)
    }

    #[must_use]
    pub fn levels(&self) -> &[LevelParams] {
        &self.levels
    }

    /// Longest candidate any level asks for.
    #[must_use]
    pub fn max_length(&self) -> usize {
        self.levels.iter().map(|p| p.length_end).max().unwrap_or(0)
    }
}

/// Dot positions for patterns of `length` letters, middle first and then
/// alternating outwards: `3` gives `[1, 2, 0, 3]`.
#[must_use]
pub fn organ_pipe(length: usize) -> Vec<usize> {
    let len = length as isize;
    let mut dot = len / 2;
    let mut next = dot * 2;
    let mut order = Vec::with_capacity(length + 1);
    loop {
        dot = next - dot;
        next = len * 2 - next - 1;
        order.push(dot as usize);
        if dot == len {
            break;
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Organ pipe --

    #[test]
    fn organ_pipe_sequences() {
        assert_eq!(organ_pipe(1), vec![0, 1]);
        assert_eq!(organ_pipe(2), vec![1, 0, 2]);
        assert_eq!(organ_pipe(3), vec![1, 2, 0, 3]);
        assert_eq!(organ_pipe(4), vec![2, 1, 3, 0, 4]);
        assert_eq!(organ_pipe(5), vec![2, 3, 1, 4, 0, 5]);
    }

    #[test]
    fn organ_pipe_is_a_permutation() {
        for length in 1..=12 {
            let mut order = organ_pipe(length);
            order.sort_unstable();
            assert_eq!(order, (0..=length).collect::<Vec<_>>(), "length {length}");
        }
    }

    // -- Parameter parsing --

    #[test]
    fn parse_single_level() {
        let plan = TrainingPlan::from_params(&[1, 1, 2, 5, 1, 1, 1]).unwrap();
        assert_eq!(
            plan.levels(),
            &[LevelParams {
                level: 1,
                length_start: 2,
                length_end: 5,
                good_weight: 1,
                bad_weight: 1,
                threshold: 1,
            }]
        );
        assert_eq!(plan.max_length(), 5);
    }

    #[test]
    fn parse_several_levels() {
        let plan =
            TrainingPlan::from_params(&[1, 3, 2, 4, 1, 1, 1, 2, 5, 1, 2, 1, 3, 6, 1, 1, 4])
                .unwrap();
        let levels: Vec<u8> = plan.levels().iter().map(|p| p.level).collect();
        assert_eq!(levels, vec![1, 2, 3]);
        assert_eq!(plan.levels()[2].threshold, 4);
        assert_eq!(plan.max_length(), 6);
    }

    #[test]
    fn parse_rejects_short_sequences() {
        assert!(TrainingPlan::from_params(&[]).is_err());
        assert!(TrainingPlan::from_params(&[1]).is_err());
        assert!(matches!(
            TrainingPlan::from_params(&[1, 2, 2, 5, 1, 1, 1]),
            Err(HydraError::InvalidInput { .. })
        ));
    }

    #[test]
    fn parse_rejects_bad_ranges() {
        assert!(TrainingPlan::from_params(&[0, 1, 2, 5, 1, 1, 1]).is_err());
        assert!(TrainingPlan::from_params(&[2, 1, 2, 5, 1, 1, 1]).is_err());
        assert!(TrainingPlan::from_params(&[10, 10, 2, 5, 1, 1, 1]).is_err());
        assert!(TrainingPlan::from_params(&[1, 1, 0, 5, 1, 1, 1]).is_err());
        assert!(TrainingPlan::from_params(&[1, 1, 5, 2, 1, 1, 1]).is_err());
        assert!(TrainingPlan::from_params(&[1, 1, 2, 5, 1, 1, 0]).is_err());
    }

    #[test]
    fn parse_rejects_trailing_values() {
        assert!(TrainingPlan::from_params(&[1, 1, 2, 5, 1, 1, 1, 7]).is_err());
    }

    // -- Triage --

    #[test]
    fn triage_thresholds() {
        let params = LevelParams {
            level: 1,
            length_start: 2,
            length_end: 5,
            good_weight: 1,
            bad_weight: 2,
            threshold: 3,
        };
        assert_eq!(params.triage(2, 0), Triage::Hopeless);
        assert_eq!(params.triage(3, 0), Triage::Accepted);
        assert_eq!(params.triage(5, 1), Triage::Accepted);
        assert_eq!(params.triage(5, 2), Triage::Unsure);
        assert_eq!(params.triage(4, 9), Triage::Unsure);
    }

    #[test]
    fn parity() {
        let mut params = TrainingPlan::from_params(&[1, 1, 2, 5, 1, 1, 1])
            .unwrap()
            .levels()[0];
        assert!(params.is_odd());
        params.level = 2;
        assert!(!params.is_odd());
    }
}
