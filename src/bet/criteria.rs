use log::{debug, warn};

use super::grid::{CandidateRange, RangeGrid};
use super::transform::BetTrial;
use crate::config::{CriteriaConfig, PRESSURE_TOLERANCE};
use crate::data::model::IsothermSample;

// ---------------------------------------------------------------------------
// CriteriaMask – per-criterion flags and their combination
// ---------------------------------------------------------------------------

/// Outcome of the Rouquerol consistency checks for every candidate range.
///
/// Each per-criterion grid is all-true when that criterion is disabled.
/// `valid` is true only where every criterion passes.
#[derive(Debug, Clone, PartialEq)]
pub struct CriteriaMask {
    pub positive_intercept: RangeGrid<bool>,
    pub increasing: RangeGrid<bool>,
    pub monolayer_in_range: RangeGrid<bool>,
    pub pressure_consistency: RangeGrid<bool>,
    pub enough_points: RangeGrid<bool>,
    pub valid: RangeGrid<bool>,
}

impl CriteriaMask {
    pub fn is_valid(&self, range: CandidateRange) -> bool {
        self.valid.get(range).copied().unwrap_or(false)
    }

    /// Ranges passing every enabled criterion, ordered by start then end.
    pub fn passing_ranges(&self) -> Vec<CandidateRange> {
        self.valid
            .iter()
            .filter(|(_, &ok)| ok)
            .map(|(range, _)| range)
            .collect()
    }

    pub fn any_valid(&self) -> bool {
        self.valid.values().any(|&ok| ok)
    }
}

/// Evaluate the enabled criteria and combine them into one mask.
pub fn rouquerol_mask(
    sample: &IsothermSample,
    trials: &RangeGrid<BetTrial>,
    config: &CriteriaConfig,
) -> CriteriaMask {
    let size = sample.len();
    let positive_intercept = evaluate(size, config.positive_intercept, "positive intercept", || {
        check_positive_intercept(trials)
    });
    let increasing = evaluate(size, config.increasing, "increasing n(1-p)", || check_increasing(sample));
    let monolayer_in_range = evaluate(size, config.monolayer_in_range, "monolayer in range", || {
        check_monolayer_in_range(sample, trials)
    });
    let pressure_consistency = evaluate(size, config.pressure_consistency, "pressure consistency", || {
        check_pressure_consistency(sample, trials)
    });
    let enough_points = evaluate(size, config.enough_points, "minimum points", || {
        check_enough_points(size, config.min_points)
    });

    let valid = RangeGrid::from_fn(size, |range| {
        positive_intercept[range]
            && increasing[range]
            && monolayer_in_range[range]
            && pressure_consistency[range]
            && enough_points[range]
    });

    let passing = valid.values().filter(|&&ok| ok).count();
    if passing == 0 {
        warn!("all relative pressure ranges fail the selected checks");
    } else {
        debug!("{passing} of {} ranges pass the selected checks", valid.len());
    }

    CriteriaMask {
        positive_intercept,
        increasing,
        monolayer_in_range,
        pressure_consistency,
        enough_points,
        valid,
    }
}

/// Run one criterion, or pass every range when it is disabled.
fn evaluate(
    size: usize,
    enabled: bool,
    name: &str,
    check: impl FnOnce() -> RangeGrid<bool>,
) -> RangeGrid<bool> {
    if !enabled {
        return RangeGrid::from_fn(size, |_| true);
    }
    let grid = check();
    if !grid.is_empty() && !grid.values().any(|&ok| ok) {
        warn!("all relative pressure ranges fail the {name} check");
    }
    grid
}

// ---------------------------------------------------------------------------
// Individual criteria
// ---------------------------------------------------------------------------

/// The BET plot trendline has a positive y-intercept (so C > 0).
pub fn check_positive_intercept(trials: &RangeGrid<BetTrial>) -> RangeGrid<bool> {
    RangeGrid::from_fn(trials.size(), |range| trials[range].intercept > 0.0)
}

/// Per-point flags: false exactly where the pressure fails to rise or
/// `n(1 - p)` decreases relative to the previous point.
pub fn increasing_points(sample: &IsothermSample) -> Vec<bool> {
    let relp = sample.relp();
    let rouq = sample.rouquerol();
    (0..sample.len())
        .map(|k| k == 0 || (relp[k] > relp[k - 1] && rouq[k] >= rouq[k - 1]))
        .collect()
}

/// `n(1 - p)` keeps increasing with relative pressure across the range.
pub fn check_increasing(sample: &IsothermSample) -> RangeGrid<bool> {
    let points = increasing_points(sample);
    RangeGrid::from_fn(sample.len(), |range| {
        points[range.start + 1..=range.end].iter().all(|&ok| ok)
    })
}

/// The monolayer amount lies between the first and last amounts adsorbed
/// in the range.
pub fn check_monolayer_in_range(sample: &IsothermSample, trials: &RangeGrid<BetTrial>) -> RangeGrid<bool> {
    let n = sample.n();
    RangeGrid::from_fn(sample.len(), |range| {
        let nm = trials[range].nm;
        n[range.start] <= nm && nm <= n[range.end]
    })
}

/// The relative pressure at monolayer coverage read off the experimental
/// isotherm agrees within 10% with the one predicted by the BET equation.
///
/// Ranges starting at the first point are evaluated like any other; they
/// are not failed outright.
pub fn check_pressure_consistency(sample: &IsothermSample, trials: &RangeGrid<BetTrial>) -> RangeGrid<bool> {
    RangeGrid::from_fn(sample.len(), |range| {
        let trial = &trials[range];
        if !trial.nm.is_finite() || trial.nm == 0.0 {
            return false;
        }
        let measured = sample.relp_at(trial.nm);
        if measured == 0.0 || !measured.is_finite() {
            return false;
        }
        match monolayer_pressures(trial) {
            Some((a, b)) => {
                let diff = ((a - measured) / measured)
                    .abs()
                    .min(((b - measured) / measured).abs());
                diff < PRESSURE_TOLERANCE
            }
            None => false,
        }
    })
}

/// The range contains at least `min_points` points.
pub fn check_enough_points(size: usize, min_points: usize) -> RangeGrid<bool> {
    RangeGrid::from_fn(size, |range| range.points() >= min_points)
}

/// Real roots of the BET equation solved for relative pressure at n = n_m:
///
/// ```text
/// -s·nm·x² + (s·nm − 1 − i·nm)·x + i·nm = 0
/// ```
///
/// `None` when the roots are complex or the coefficients are not finite.
pub fn monolayer_pressures(trial: &BetTrial) -> Option<(f64, f64)> {
    let a = -trial.slope * trial.nm;
    let b = trial.slope * trial.nm - 1.0 - trial.intercept * trial.nm;
    let c = trial.intercept * trial.nm;
    if !(a.is_finite() && b.is_finite() && c.is_finite()) {
        return None;
    }
    if a == 0.0 {
        if b == 0.0 {
            return None;
        }
        let root = -c / b;
        return Some((root, root));
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    Some(((-b + sq) / (2.0 * a), (-b - sq) / (2.0 * a)))
}
