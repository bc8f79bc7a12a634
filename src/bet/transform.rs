use log::debug;

use super::grid::{CandidateRange, RangeGrid};
use super::regression::linear_regression;
use crate::data::model::IsothermSample;

/// Avogadro constant, 1/mol.
pub const AVOGADRO: f64 = 6.022e23;

/// Square angstrom to square metre.
const ANGSTROM2_TO_M2: f64 = 1e-20;

/// Specific surface area (m²/g) covered by `nm` mol/g of adsorbate with
/// cross-sectional area `a_o` square angstrom.
pub fn surface_area(nm: f64, a_o: f64) -> f64 {
    nm * AVOGADRO * a_o * ANGSTROM2_TO_M2
}

// ---------------------------------------------------------------------------
// BetTrial – the BET fit of one candidate range
// ---------------------------------------------------------------------------

/// Result of applying BET theory to one candidate range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BetTrial {
    pub range: CandidateRange,
    pub slope: f64,
    pub intercept: f64,
    /// Correlation coefficient of the BET plot trendline.
    pub r: f64,
    /// BET constant.
    pub c: f64,
    /// Monolayer amount adsorbed, mol/g.
    pub nm: f64,
    /// Specific surface area, m²/g.
    pub ssa: f64,
    /// Mean relative deviation (%) of the range's points from the fitted
    /// theoretical isotherm.
    pub error: f64,
    pub points: usize,
}

impl BetTrial {
    /// Fit one candidate range of `sample`.
    pub fn fit(sample: &IsothermSample, a_o: f64, range: CandidateRange) -> Self {
        let x = &sample.relp()[range.indices()];
        let y = &sample.bet()[range.indices()];
        let fit = linear_regression(x, y);

        let (c, nm) = if fit.intercept != 0.0 {
            let c = fit.slope / fit.intercept + 1.0;
            (c, 1.0 / (fit.intercept * c))
        } else {
            (f64::NAN, f64::NAN)
        };

        let points = range.points();
        let error = if !fit.slope.is_finite() || !fit.intercept.is_finite() {
            f64::NAN
        } else if points == 2 {
            // Two points always sit on their own line.
            0.0
        } else {
            let total: f64 = x
                .iter()
                .zip(y)
                .map(|(&p, &b)| {
                    let theory = fit.predict(p);
                    ((theory - b) / theory).abs()
                })
                .sum();
            100.0 * total / points as f64
        };

        BetTrial {
            range,
            slope: fit.slope,
            intercept: fit.intercept,
            r: fit.r,
            c,
            nm,
            ssa: surface_area(nm, a_o),
            error,
            points,
        }
    }

    /// Whether the fit produced finite BET parameters.
    pub fn is_finite(&self) -> bool {
        self.c.is_finite() && self.nm.is_finite() && self.ssa.is_finite()
    }
}

/// BET analysis of every candidate range of the isotherm.
pub fn bet_trials(sample: &IsothermSample, a_o: f64) -> RangeGrid<BetTrial> {
    let grid = RangeGrid::from_fn(sample.len(), |range| BetTrial::fit(sample, a_o, range));
    let degenerate = grid.values().filter(|t| !t.is_finite()).count();
    debug!(
        "fitted {} candidate ranges ({} degenerate)",
        grid.len(),
        degenerate
    );
    grid
}

// ---------------------------------------------------------------------------
// Single-point BET
// ---------------------------------------------------------------------------

/// Single-point BET estimate for one candidate range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SinglePointTrial {
    /// Monolayer amount, mol/g.
    pub nm: f64,
    /// Specific surface area, m²/g.
    pub ssa: f64,
}

/// Single-point BET over every candidate range, using the median pressure
/// and amount adsorbed of each window. Useful as a cross-check on the
/// multi-point results.
pub fn single_point_bet(sample: &IsothermSample, a_o: f64) -> RangeGrid<SinglePointTrial> {
    RangeGrid::from_fn(sample.len(), |range| {
        let n = median(&sample.n()[range.indices()]);
        let p = median(&sample.relp()[range.indices()]);
        let nm = n * (1.0 - p);
        SinglePointTrial {
            nm,
            ssa: surface_area(nm, a_o),
        }
    })
}

/// Median of a non-empty slice; NaN when empty.
pub(crate) fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
