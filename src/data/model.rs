use std::fmt;
use std::path::PathBuf;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{BetError, Result};

// ---------------------------------------------------------------------------
// IsothermSample – the experimental points and their BET transforms
// ---------------------------------------------------------------------------

/// An adsorption isotherm: relative pressure against specific amount
/// adsorbed (mol/g), in measurement order.
///
/// Derived columns are computed once at construction:
/// * `bet`       – `p / (n (1 - p))`, the linearized BET ordinate
/// * `rouquerol` – `n (1 - p)`, the Rouquerol transform
///
/// Ascending pressure is checked rather than assumed; see
/// [`IsothermSample::pressure_is_increasing`].
#[derive(Debug, Clone, PartialEq)]
pub struct IsothermSample {
    relp: Vec<f64>,
    n: Vec<f64>,
    bet: Vec<f64>,
    rouquerol: Vec<f64>,
}

impl IsothermSample {
    /// Validate the columns and compute the derived transforms.
    pub fn new(relp: Vec<f64>, n: Vec<f64>) -> Result<Self> {
        if relp.len() != n.len() {
            return Err(BetError::InputFormat(format!(
                "relative pressure has {} values but amount adsorbed has {}",
                relp.len(),
                n.len()
            )));
        }
        if relp.len() < 2 {
            return Err(BetError::InputFormat(format!(
                "an isotherm needs at least 2 points, got {}",
                relp.len()
            )));
        }
        for (i, (&p, &q)) in relp.iter().zip(&n).enumerate() {
            if !p.is_finite() || !(0.0..1.0).contains(&p) {
                return Err(BetError::InputFormat(format!(
                    "point {i}: relative pressure {p} is outside [0, 1)"
                )));
            }
            if !q.is_finite() || q <= 0.0 {
                return Err(BetError::InputFormat(format!(
                    "point {i}: amount adsorbed {q} must be positive"
                )));
            }
        }

        let bet = relp
            .iter()
            .zip(&n)
            .map(|(&p, &q)| p / (q * (1.0 - p)))
            .collect();
        let rouquerol = relp.iter().zip(&n).map(|(&p, &q)| q * (1.0 - p)).collect();

        Ok(IsothermSample {
            relp,
            n,
            bet,
            rouquerol,
        })
    }

    /// Number of experimental points.
    pub fn len(&self) -> usize {
        self.relp.len()
    }

    /// Always false for a constructed sample; kept for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.relp.is_empty()
    }

    pub fn relp(&self) -> &[f64] {
        &self.relp
    }

    pub fn n(&self) -> &[f64] {
        &self.n
    }

    pub fn bet(&self) -> &[f64] {
        &self.bet
    }

    pub fn rouquerol(&self) -> &[f64] {
        &self.rouquerol
    }

    /// Whether every pressure is strictly greater than the one before it.
    pub fn pressure_is_increasing(&self) -> bool {
        self.relp.windows(2).all(|w| w[1] > w[0])
    }

    /// Whether the amount adsorbed never decreases as pressure rises.
    pub fn adsorbed_amount_increasing(&self) -> bool {
        self.n.windows(2).all(|w| w[1] >= w[0])
    }

    /// Relative pressure at which the experimental isotherm reaches
    /// `amount`, by linear interpolation between the bracketing points.
    ///
    /// Above the data the last segment is extrapolated; below the first
    /// point the first pressure is returned.
    pub fn relp_at(&self, amount: f64) -> f64 {
        let len = self.len();
        let mut hi = self.n.iter().filter(|&&q| q <= amount).count();
        if hi == len {
            hi = len - 1;
        }
        let slope = if hi == 0 {
            0.0
        } else {
            let lo = hi - 1;
            (self.relp[hi] - self.relp[lo]) / (self.n[hi] - self.n[lo])
        };
        let intercept = self.relp[hi] - self.n[hi] * slope;
        slope * amount + intercept
    }

    /// Classify the isotherm shape (IUPAC types I–VI) from the sign pattern
    /// of its discrete second derivative. `None` for fewer than 3 points.
    pub fn isotherm_type(&self) -> Option<IsothermType> {
        if self.len() < 3 {
            return None;
        }
        let signs: Vec<f64> = (1..self.len() - 1)
            .filter_map(|k| {
                let (p0, p1, p2) = (self.relp[k - 1], self.relp[k], self.relp[k + 1]);
                let (n0, n1, n2) = (self.n[k - 1], self.n[k], self.n[k + 1]);
                let d2 = 2.0 * ((n2 - n1) / (p2 - p1) - (n1 - n0) / (p1 - p0)) / (p2 - p0);
                (d2.is_finite() && d2 != 0.0).then(|| d2.signum())
            })
            .collect();

        let first = *signs.first()?;
        let crossings = signs.windows(2).filter(|w| w[0] != w[1]).count();
        Some(match (crossings, first < 0.0) {
            (0, true) => IsothermType::I,
            (0, false) => IsothermType::III,
            (1, true) => IsothermType::II,
            (1, false) => IsothermType::V,
            (2, true) => IsothermType::IV,
            _ => IsothermType::VI,
        })
    }
}

// ---------------------------------------------------------------------------
// IsothermType – IUPAC classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IsothermType {
    I,
    II,
    III,
    IV,
    V,
    VI,
}

impl fmt::Display for IsothermType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let roman = match self {
            IsothermType::I => "I",
            IsothermType::II => "II",
            IsothermType::III => "III",
            IsothermType::IV => "IV",
            IsothermType::V => "V",
            IsothermType::VI => "VI",
        };
        write!(f, "type {roman}")
    }
}

// ---------------------------------------------------------------------------
// IsothermData – a sample plus the adsorbate description
// ---------------------------------------------------------------------------

/// Everything the analysis needs about one measurement.
#[derive(Debug, Clone)]
pub struct IsothermData {
    pub sample: IsothermSample,
    /// Adsorbate cross-sectional area, square angstrom.
    pub a_o: f64,
    /// Free-text adsorbate/adsorbent description, used in export names.
    pub info: String,
    /// File the sample was read from, if any.
    pub source: Option<PathBuf>,
}

impl IsothermData {
    pub fn new(sample: IsothermSample, a_o: f64, info: impl Into<String>) -> Result<Self> {
        if !a_o.is_finite() || a_o <= 0.0 {
            return Err(BetError::CrossSection(a_o));
        }
        let data = IsothermData {
            sample,
            a_o,
            info: info.into(),
            source: None,
        };
        data.log_quality();
        Ok(data)
    }

    /// Build from two parallel lists of relative pressure and amount
    /// adsorbed (mol/g).
    pub fn from_lists(relp: &[f64], n: &[f64], a_o: f64, info: impl Into<String>) -> Result<Self> {
        let sample = IsothermSample::new(relp.to_vec(), n.to_vec())?;
        IsothermData::new(sample, a_o, info)
    }

    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    fn log_quality(&self) {
        info!(
            "adsorbate '{}' with cross-sectional area {:.2} sq. angstrom, {} points",
            self.info,
            self.a_o,
            self.sample.len()
        );
        if !self.sample.pressure_is_increasing() {
            warn!("relative pressure is not strictly increasing; affected ranges will fail the increasing check");
        }
        if self.sample.adsorbed_amount_increasing() {
            info!("isotherm data quality appears good: amount adsorbed increases with pressure");
        } else {
            warn!("isotherm data is suspect: amount adsorbed does not consistently increase with pressure");
        }
        if let Some(kind) = self.sample.isotherm_type() {
            info!("isotherm is {kind}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference() -> IsothermSample {
        IsothermSample::new(
            vec![0.1, 0.2, 0.21, 0.3, 0.4, 0.5],
            vec![0.001, 0.002, 0.004, 0.005, 0.0055, 0.006],
        )
        .unwrap()
    }

    #[test]
    fn derived_columns() {
        let s = reference();
        assert_relative_eq!(s.bet()[0], 111.111111, epsilon = 1e-5);
        assert_relative_eq!(s.bet()[2], 66.455696, epsilon = 1e-5);
        assert_relative_eq!(s.bet()[5], 166.666667, epsilon = 1e-5);
        assert_relative_eq!(s.rouquerol()[1], 0.0016, epsilon = 1e-15);
    }

    #[test]
    fn interpolates_inside_and_beyond_the_data() {
        let s = reference();
        assert_relative_eq!(s.relp_at(0.0015), 0.15, epsilon = 1e-12);
        assert_relative_eq!(s.relp_at(0.007), 0.7, epsilon = 1e-12);
        assert_relative_eq!(s.relp_at(0.0001), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn rejects_malformed_columns() {
        assert!(matches!(
            IsothermSample::new(vec![0.1, 0.2], vec![0.001]),
            Err(BetError::InputFormat(_))
        ));
        assert!(matches!(
            IsothermSample::new(vec![0.1], vec![0.001]),
            Err(BetError::InputFormat(_))
        ));
        assert!(matches!(
            IsothermSample::new(vec![0.1, 0.2], vec![0.0, 0.001]),
            Err(BetError::InputFormat(_))
        ));
        assert!(matches!(
            IsothermSample::new(vec![0.1, 1.0], vec![0.001, 0.002]),
            Err(BetError::InputFormat(_))
        ));
        assert!(matches!(
            IsothermSample::new(vec![0.1, f64::NAN], vec![0.001, 0.002]),
            Err(BetError::InputFormat(_))
        ));
    }

    #[test]
    fn monotonicity_is_checked() {
        assert!(reference().pressure_is_increasing());
        let s = IsothermSample::new(vec![0.1, 0.3, 0.2], vec![0.001, 0.002, 0.003]).unwrap();
        assert!(!s.pressure_is_increasing());
    }

    #[test]
    fn rejects_bad_cross_section() {
        for a_o in [0.0, -16.2, f64::NAN] {
            assert!(matches!(
                IsothermData::from_lists(&[0.1, 0.2], &[0.001, 0.002], a_o, "x"),
                Err(BetError::CrossSection(_))
            ));
        }
    }

    #[test]
    fn classifies_concave_isotherm_as_type_one() {
        // Langmuir-like: n = p / (0.05 + p), concave everywhere
        let relp: Vec<f64> = (1..10).map(|i| i as f64 * 0.1).collect();
        let n: Vec<f64> = relp.iter().map(|p| 0.01 * p / (0.05 + p)).collect();
        let s = IsothermSample::new(relp, n).unwrap();
        assert_eq!(s.isotherm_type(), Some(IsothermType::I));
    }

    #[test]
    fn classifies_bet_isotherm_as_type_two() {
        // BET with C = 100: concave knee then convex multilayer rise
        let relp: Vec<f64> = (1..19).map(|i| i as f64 * 0.05).collect();
        let n: Vec<f64> = relp
            .iter()
            .map(|&p| 0.001 * 100.0 * p / ((1.0 - p) * (1.0 - p + 100.0 * p)))
            .collect();
        let s = IsothermSample::new(relp, n).unwrap();
        assert_eq!(s.isotherm_type(), Some(IsothermType::II));
    }
}
