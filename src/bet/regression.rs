/// Ordinary least-squares line through a set of points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation coefficient.
    pub r: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fit `y = intercept + slope * x`.
///
/// A zero-variance `x` (or fewer than two points) gives NaN slope and
/// intercept; a zero-variance `y` gives `r = 0`.
pub fn linear_regression(x: &[f64], y: &[f64]) -> LinearFit {
    debug_assert_eq!(x.len(), y.len());
    let len = x.len() as f64;
    if x.len() < 2 {
        return LinearFit {
            slope: f64::NAN,
            intercept: f64::NAN,
            r: f64::NAN,
        };
    }

    let x_mean = x.iter().sum::<f64>() / len;
    let y_mean = y.iter().sum::<f64>() / len;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - x_mean;
        let dy = yi - y_mean;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    if sxx == 0.0 {
        return LinearFit {
            slope: f64::NAN,
            intercept: f64::NAN,
            r: f64::NAN,
        };
    }

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;
    let r = if syy == 0.0 {
        0.0
    } else {
        (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
    };

    LinearFit { slope, intercept, r }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn exact_line() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [1.0, 3.0, 5.0, 7.0];
        let fit = linear_regression(&x, &y);
        assert_relative_eq!(fit.slope, 2.0, epsilon = 1e-12);
        assert_relative_eq!(fit.intercept, 1.0, epsilon = 1e-12);
        assert_relative_eq!(fit.r, 1.0, epsilon = 1e-12);
        assert_relative_eq!(fit.predict(10.0), 21.0, epsilon = 1e-12);
    }

    #[test]
    fn noisy_line() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 5.0, 4.0, 5.0];
        let fit = linear_regression(&x, &y);
        assert_relative_eq!(fit.slope, 0.6, epsilon = 1e-12);
        assert_relative_eq!(fit.intercept, 2.2, epsilon = 1e-12);
        assert_relative_eq!(fit.r, 0.7745966692414834, epsilon = 1e-12);
    }

    #[test]
    fn two_points_anticorrelated() {
        let fit = linear_regression(&[0.2, 0.21], &[125.0, 66.0]);
        assert!(fit.slope < 0.0);
        assert_relative_eq!(fit.r, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_x_is_nan() {
        let fit = linear_regression(&[0.3, 0.3, 0.3], &[1.0, 2.0, 3.0]);
        assert!(fit.slope.is_nan());
        assert!(fit.intercept.is_nan());
        let fit = linear_regression(&[0.3], &[1.0]);
        assert!(fit.slope.is_nan());
    }

    #[test]
    fn flat_y_has_zero_correlation() {
        let fit = linear_regression(&[0.1, 0.2, 0.3], &[4.0, 4.0, 4.0]);
        assert_relative_eq!(fit.slope, 0.0, epsilon = 1e-12);
        assert_eq!(fit.r, 0.0);
    }
}
