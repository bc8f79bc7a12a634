use std::fmt;

use crate::bet::transform::median;
use crate::bet::{BetTrial, CandidateRange, CriteriaMask, RangeGrid};
use crate::data::model::IsothermSample;

// ---------------------------------------------------------------------------
// Statistics over the valid ranges
// ---------------------------------------------------------------------------

/// Extremes, centre and spread of one quantity over the valid ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub min: f64,
    pub min_range: CandidateRange,
    pub max: f64,
    pub max_range: CandidateRange,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
}

impl Stats {
    fn from_values(values: &[(CandidateRange, f64)]) -> Option<Self> {
        let (first_range, first) = *values.first()?;
        let mut min = (first_range, first);
        let mut max = (first_range, first);
        for &(range, v) in &values[1..] {
            if v < min.1 {
                min = (range, v);
            }
            if v > max.1 {
                max = (range, v);
            }
        }

        let count = values.len() as f64;
        let mean = values.iter().map(|(_, v)| v).sum::<f64>() / count;
        let variance = values.iter().map(|(_, v)| (v - mean).powi(2)).sum::<f64>() / count;
        let raw: Vec<f64> = values.iter().map(|(_, v)| *v).collect();

        Some(Stats {
            min: min.1,
            min_range: min.0,
            max: max.1,
            max_range: max.0,
            mean,
            median: median(&raw),
            std_dev: variance.sqrt(),
        })
    }
}

/// Summary of the surface area, BET constant and fit error across every
/// range passing the enabled criteria. Statistics cover the valid ranges
/// whose fit is finite, the same set the answer is selected from.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub valid_ranges: usize,
    /// Valid ranges with finite C, nm, SSA and error.
    pub finite_ranges: usize,
    pub ssa: Stats,
    pub c: Stats,
    pub error: Stats,
    /// Relative pressure of each point, for range labels.
    relp: Vec<f64>,
    trials: Vec<BetTrial>,
}

impl Summary {
    /// `None` when no valid range has a finite fit.
    pub fn new(sample: &IsothermSample, trials: &RangeGrid<BetTrial>, mask: &CriteriaMask) -> Option<Self> {
        let valid_ranges = mask.passing_ranges().len();
        let finite: Vec<BetTrial> = trials
            .iter()
            .filter(|(range, t)| mask.is_valid(*range) && t.is_finite() && t.error.is_finite())
            .map(|(_, t)| *t)
            .collect();
        if finite.is_empty() {
            return None;
        }

        let column = |f: fn(&BetTrial) -> f64| -> Vec<(CandidateRange, f64)> {
            finite.iter().map(|t| (t.range, f(t))).collect()
        };

        Some(Summary {
            valid_ranges,
            finite_ranges: finite.len(),
            ssa: Stats::from_values(&column(|t| t.ssa))?,
            c: Stats::from_values(&column(|t| t.c))?,
            error: Stats::from_values(&column(|t| t.error))?,
            relp: sample.relp().to_vec(),
            trials: finite,
        })
    }

    fn trial(&self, range: CandidateRange) -> Option<&BetTrial> {
        self.trials.iter().find(|t| t.range == range)
    }

    fn write_row(&self, f: &mut fmt::Formatter<'_>, label: &str, range: CandidateRange) -> fmt::Result {
        let Some(t) = self.trial(range) else {
            return Ok(());
        };
        writeln!(
            f,
            "  {label:<12} {:>12.3} {:>12.3} {:>9.3} {:>9.3} {:>9.3}",
            t.ssa, t.c, t.error, self.relp[range.start], self.relp[range.end]
        )
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} valid relative pressure ranges", self.valid_ranges)?;
        if self.finite_ranges < self.valid_ranges {
            writeln!(f, "  {} with a degenerate fit left out", self.valid_ranges - self.finite_ranges)?;
        }
        writeln!(
            f,
            "  {:<12} {:>12} {:>12} {:>9} {:>9} {:>9}",
            "", "SSA (m2/g)", "C", "error %", "start P", "end P"
        )?;
        self.write_row(f, "min SSA", self.ssa.min_range)?;
        self.write_row(f, "max SSA", self.ssa.max_range)?;
        self.write_row(f, "min C", self.c.min_range)?;
        self.write_row(f, "max C", self.c.max_range)?;
        self.write_row(f, "min error", self.error.min_range)?;
        self.write_row(f, "max error", self.error.max_range)?;
        writeln!(f)?;
        writeln!(f, "  {:<12} {:>12} {:>12}", "", "SSA (m2/g)", "C")?;
        writeln!(f, "  {:<12} {:>12.3} {:>12.3}", "mean", self.ssa.mean, self.c.mean)?;
        writeln!(f, "  {:<12} {:>12.3} {:>12.3}", "median", self.ssa.median, self.c.median)?;
        write!(f, "  {:<12} {:>12.3} {:>12.3}", "std dev", self.ssa.std_dev, self.c.std_dev)
    }
}
