use std::cmp::Ordering;

use log::info;

use super::criteria::CriteriaMask;
use super::grid::RangeGrid;
use super::transform::BetTrial;
use crate::config::Objective;
use crate::error::{BetError, Result};

/// The single surface area reported for an isotherm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SsaAnswer {
    pub trial: BetTrial,
    pub objective: Objective,
}

impl SsaAnswer {
    /// Specific surface area, m²/g.
    pub fn ssa(&self) -> f64 {
        self.trial.ssa
    }
}

/// Pick one valid range according to `objective`.
///
/// Ties prefer the range with more points, then the lowest start index.
/// Degenerate fits (non-finite C, nm, SSA or error) are never selected.
pub fn ssa_answer(trials: &RangeGrid<BetTrial>, mask: &CriteriaMask, objective: Objective) -> Result<SsaAnswer> {
    let best = trials
        .iter()
        .filter(|(range, _)| mask.is_valid(*range))
        .map(|(_, trial)| trial)
        .filter(|trial| trial.is_finite() && !trial.error.is_nan())
        .min_by(|a, b| rank(a, b, objective))
        .copied()
        .ok_or(BetError::NoValidRange)?;

    info!(
        "the specific surface area value, based on {objective}, is {:.2} m2/g (points {} to {})",
        best.ssa, best.range.start, best.range.end
    );
    Ok(SsaAnswer {
        trial: best,
        objective,
    })
}

/// `Less` when `a` is the better answer.
fn rank(a: &BetTrial, b: &BetTrial, objective: Objective) -> Ordering {
    let primary = match objective {
        // Two-point fits are exact by construction, so their zero error
        // says nothing about the data.
        Objective::Error => (a.points < 3)
            .cmp(&(b.points < 3))
            .then(a.error.total_cmp(&b.error)),
        Objective::Points => Ordering::Equal,
        Objective::MaxArea => b.ssa.total_cmp(&a.ssa),
        Objective::MinArea => a.ssa.total_cmp(&b.ssa),
    };
    primary
        .then(b.points.cmp(&a.points))
        .then(a.range.start.cmp(&b.range.start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bet::criteria::rouquerol_mask;
    use crate::bet::grid::CandidateRange;
    use crate::bet::transform::bet_trials;
    use crate::config::CriteriaConfig;
    use crate::data::model::IsothermSample;

    fn reference() -> IsothermSample {
        IsothermSample::new(
            vec![0.1, 0.2, 0.21, 0.3, 0.4, 0.5],
            vec![0.001, 0.002, 0.004, 0.005, 0.0055, 0.006],
        )
        .unwrap()
    }

    fn open_mask(sample: &IsothermSample, trials: &RangeGrid<BetTrial>) -> CriteriaMask {
        rouquerol_mask(sample, trials, &CriteriaConfig::none())
    }

    #[test]
    fn nothing_valid_is_an_explicit_error() {
        let sample = reference();
        let trials = bet_trials(&sample, 11.11);
        let mask = rouquerol_mask(&sample, &trials, &CriteriaConfig::default());
        assert!(matches!(
            ssa_answer(&trials, &mask, Objective::Error),
            Err(BetError::NoValidRange)
        ));
    }

    #[test]
    fn error_objective_prefers_lowest_error() {
        let sample = reference();
        let trials = bet_trials(&sample, 11.11);
        let mask = open_mask(&sample, &trials);
        let answer = ssa_answer(&trials, &mask, Objective::Error).unwrap();
        // (3, 5) has the smallest error among ranges of three or more points.
        assert_eq!(answer.trial.range, CandidateRange::new(3, 5));
        assert_eq!(answer.objective, Objective::Error);
    }

    #[test]
    fn points_objective_prefers_longest_then_earliest() {
        let sample = reference();
        let trials = bet_trials(&sample, 11.11);
        let mask = open_mask(&sample, &trials);
        let answer = ssa_answer(&trials, &mask, Objective::Points).unwrap();
        assert_eq!(answer.trial.range, CandidateRange::new(0, 5));

        let only_points = CriteriaConfig {
            enough_points: true,
            min_points: 5,
            ..CriteriaConfig::none()
        };
        let mask = rouquerol_mask(&sample, &trials, &only_points);
        let answer = ssa_answer(&trials, &mask, Objective::Points).unwrap();
        assert_eq!(answer.trial.points, 6);
    }

    #[test]
    fn area_objectives() {
        let sample = reference();
        let trials = bet_trials(&sample, 11.11);
        let mask = open_mask(&sample, &trials);
        let max = ssa_answer(&trials, &mask, Objective::MaxArea).unwrap();
        let min = ssa_answer(&trials, &mask, Objective::MinArea).unwrap();
        for trial in trials.values() {
            assert!(trial.ssa <= max.ssa());
            assert!(trial.ssa >= min.ssa());
        }
        assert_eq!(max.trial.range, CandidateRange::new(0, 4));
        assert_eq!(min.trial.range, CandidateRange::new(0, 3));
    }

    #[test]
    fn ties_prefer_more_points_then_lowest_start() {
        // Exact BET data: every range has the same area.
        let relp: Vec<f64> = (1..=6).map(|i| 0.05 * i as f64).collect();
        let n = relp
            .iter()
            .map(|&p| 0.001 * 80.0 * p / ((1.0 - p) * (1.0 - p + 80.0 * p)))
            .collect();
        let sample = IsothermSample::new(relp, n).unwrap();
        let trials = bet_trials(&sample, 16.2);
        let mask = open_mask(&sample, &trials);

        let answer = ssa_answer(&trials, &mask, Objective::Points).unwrap();
        assert_eq!(answer.trial.range, CandidateRange::new(0, 5));
    }

    #[test]
    fn degenerate_fits_are_never_selected() {
        // Equal pressures leave the BET line undefined.
        let sample = IsothermSample::new(vec![0.2, 0.2], vec![0.001, 0.002]).unwrap();
        let trials = bet_trials(&sample, 16.2);
        let mask = open_mask(&sample, &trials);
        assert!(mask.any_valid());
        for objective in [Objective::Error, Objective::Points, Objective::MaxArea, Objective::MinArea] {
            assert!(matches!(
                ssa_answer(&trials, &mask, objective),
                Err(BetError::NoValidRange)
            ));
        }
    }

    #[test]
    fn two_point_ranges_rank_last_for_error() {
        let sample = reference();
        let trials = bet_trials(&sample, 11.11);
        let two_points_only = RangeGrid::from_fn(sample.len(), |r| r.points() == 2);
        let mask = CriteriaMask {
            valid: two_points_only.clone(),
            positive_intercept: two_points_only.clone(),
            increasing: two_points_only.clone(),
            monolayer_in_range: two_points_only.clone(),
            pressure_consistency: two_points_only.clone(),
            enough_points: two_points_only,
        };
        let answer = ssa_answer(&trials, &mask, Objective::Error).unwrap();
        assert_eq!(answer.trial.range, CandidateRange::new(0, 1));
    }
}
