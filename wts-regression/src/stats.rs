//! Numerical kernels: moments, OLS, MOVE.2, error statistics and the slope
//! t test.

use statrs::distribution::{ContinuousCDF, StudentsT};

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance (n - 1 denominator); zero for fewer than two values.
pub(crate) fn sample_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

/// Sum of squared deviations from the mean.
pub(crate) fn sum_squares(values: &[f64]) -> f64 {
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LineFit {
    pub a: f64,
    pub b: f64,
    pub r: f64,
}

/// Least squares line through the pairs. `None` when there is no data or the
/// independent values have no spread.
pub(crate) fn ols(x: &[f64], y: &[f64], forced_intercept: Option<f64>) -> Option<LineFit> {
    if x.is_empty() || x.len() != y.len() {
        return None;
    }
    let mean_x = mean(x);
    let mean_y = mean(y);
    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    if sxx == 0.0 {
        return None;
    }
    let r = if syy == 0.0 { 0.0 } else { sxy / (sxx * syy).sqrt() };

    match forced_intercept {
        Some(a) => {
            let sum_x2: f64 = x.iter().map(|xi| xi * xi).sum();
            let sum_xy: f64 = x.iter().zip(y).map(|(xi, yi)| xi * (yi - a)).sum();
            Some(LineFit {
                a,
                b: sum_xy / sum_x2,
                r,
            })
        }
        None => {
            let b = sxy / sxx;
            Some(LineFit {
                a: mean_y - b * mean_x,
                b,
                r,
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Move2Fit {
    pub line: LineFit,
    pub mean_x2: f64,
    pub sd_x2: f64,
}

/// MOVE.2 (Hirsch, 1982). The variance extension is reproduced term for term
/// with no guard for N1 < 4, where the third term divides by zero or turns
/// negative and the slope can come out NaN or infinite.
pub(crate) fn move2(x1: &[f64], y1: &[f64], x2: &[f64]) -> Option<Move2Fit> {
    let ols_fit = ols(x1, y1, None)?;
    let b_ols = ols_fit.b;
    let r = ols_fit.r;

    let n1 = x1.len() as f64;
    let n2 = x2.len() as f64;
    let mean_x1 = mean(x1);
    let mean_y1 = mean(y1);
    let var_x1 = sample_variance(x1);
    let var_y1 = sample_variance(y1);
    let mean_x2 = if x2.is_empty() { mean_x1 } else { mean(x2) };
    let var_x2 = sample_variance(x2);
    let dx = mean_x2 - mean_x1;

    let var_y = 1.0 / (n1 + n2 - 1.0)
        * ((n1 - 1.0) * var_y1
            + (n2 - 1.0) * b_ols * b_ols * var_x2
            + n2 * (n1 - 4.0) * (n1 - 1.0) * (1.0 - r * r) * var_y1
                / ((n1 - 3.0) * (n1 - 2.0))
            + n1 * n2 / (n1 + n2) * b_ols * b_ols * dx * dx);

    let mean_x = (n1 * mean_x1 + n2 * mean_x2) / (n1 + n2);
    let var_x = ((n1 - 1.0) * var_x1 + (n2 - 1.0) * var_x2 + n1 * n2 / (n1 + n2) * dx * dx)
        / (n1 + n2 - 1.0);
    let mean_y = mean_y1 + n2 * b_ols * dx / (n1 + n2);

    let b = var_y.sqrt() / var_x.sqrt();
    let a = mean_y - b * mean_x;
    Some(Move2Fit {
        line: LineFit { a, b, r },
        mean_x2,
        sd_x2: var_x2.sqrt(),
    })
}

/// Root mean square and standard error of residuals.
pub(crate) struct ErrorStats {
    pub rmse: f64,
    pub see: f64,
}

pub(crate) fn error_stats(residuals: impl Iterator<Item = f64>) -> ErrorStats {
    let (mut sse, mut n) = (0.0, 0usize);
    for residual in residuals {
        sse += residual * residual;
        n += 1;
    }
    let n = n as f64;
    ErrorStats {
        rmse: if n > 0.0 { (sse / n).sqrt() } else { f64::NAN },
        see: if n > 2.0 { (sse / (n - 2.0)).sqrt() } else { f64::NAN },
    }
}

/// Two-tailed t test of the slope against zero. Returns
/// `(t_statistic, t_quantile)`; the quantile is NaN when there are fewer
/// than three pairs.
pub(crate) fn slope_t_test(b: f64, see: f64, sxx: f64, n1: usize, percent: f64) -> (f64, f64) {
    let t_statistic = b / (see / sxx.sqrt());
    if n1 < 3 {
        return (t_statistic, f64::NAN);
    }
    let df = (n1 - 2) as f64;
    let t_quantile = match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => dist.inverse_cdf(1.0 - (1.0 - percent / 100.0) / 2.0),
        Err(e) => {
            log::warn!("Failed to create t-distribution with {df} degrees of freedom: {e}");
            f64::NAN
        }
    };
    (t_statistic, t_quantile)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_moments() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&values) - 5.0).abs() < EPS);
        assert!((sample_variance(&values) - 32.0 / 7.0).abs() < EPS);
        assert!((sum_squares(&values) - 32.0).abs() < EPS);
        assert_eq!(sample_variance(&[3.0]), 0.0);
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn test_ols_exact_line() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y: Vec<f64> = x.iter().map(|v| 2.0 + 3.0 * v).collect();
        let fit = ols(&x, &y, None).unwrap();
        assert!((fit.a - 2.0).abs() < EPS);
        assert!((fit.b - 3.0).abs() < EPS);
        assert!((fit.r - 1.0).abs() < EPS);
    }

    #[test]
    fn test_ols_forced_zero_intercept() {
        let x = [1.0, 2.0, 3.0];
        let y = [2.0, 4.0, 7.0];
        let fit = ols(&x, &y, Some(0.0)).unwrap();
        assert_eq!(fit.a, 0.0);
        // sum(xy) / sum(x^2) = (2 + 8 + 21) / 14
        assert!((fit.b - 31.0 / 14.0).abs() < EPS);
    }

    #[test]
    fn test_ols_singular() {
        assert!(ols(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0], None).is_none());
        assert!(ols(&[], &[], None).is_none());
    }

    #[test]
    fn test_move2_without_extension_preserves_variance() {
        // with no N2 values MOVE.2 reduces to b = SY1 / SX1
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y = [2.0, 3.0, 7.0, 8.0, 9.0, 14.0];
        let fit = move2(&x, &y, &[]).unwrap();
        let expected_b = (sample_variance(&y) / sample_variance(&x)).sqrt();
        assert!((fit.line.b - expected_b).abs() < EPS);
        assert!((fit.line.a - (mean(&y) - expected_b * mean(&x))).abs() < EPS);
        assert_eq!(fit.mean_x2, mean(&x));
    }

    #[test]
    fn test_move2_shifts_mean_with_extension() {
        let x1 = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y1: Vec<f64> = x1.iter().map(|v| 10.0 + 2.0 * v).collect();
        let x2 = [6.0, 7.0, 8.0, 9.0, 10.0];
        let fit = move2(&x1, &y1, &x2).unwrap();
        // a perfect relationship is extended without distortion
        assert!((fit.line.b - 2.0).abs() < 1e-6);
        assert!((fit.line.a - 10.0).abs() < 1e-6);
        assert!((fit.mean_x2 - 8.0).abs() < EPS);
    }

    #[test]
    fn test_move2_three_pairs_is_degenerate() {
        // n1 = 3 divides the third variance term by zero; with an imperfect
        // fit and N2 > 0 the variance goes to -inf and the slope to NaN
        let fit = move2(&[1.0, 2.0, 3.0], &[1.0, 3.0, 2.0], &[4.0, 5.0]).unwrap();
        assert!(fit.line.b.is_nan());
        assert!(fit.line.a.is_nan());
    }

    #[test]
    fn test_move2_two_pairs_is_degenerate() {
        // n1 = 2 always fits perfectly, so the third term is 0 / 0
        let fit = move2(&[1.0, 2.0], &[3.0, 5.0], &[4.0]).unwrap();
        assert!(fit.line.b.is_nan());
    }

    #[test]
    fn test_error_stats() {
        let stats = error_stats([1.0, -1.0, 1.0, -1.0].into_iter());
        assert!((stats.rmse - 1.0).abs() < EPS);
        assert!((stats.see - 2f64.sqrt()).abs() < EPS);
        assert!(error_stats([0.0, 0.0].into_iter()).see.is_nan());
    }

    #[test]
    fn test_slope_t_test_quantile() {
        // t(0.975, df=10) = 2.228
        let (_, quantile) = slope_t_test(1.0, 1.0, 1.0, 12, 95.0);
        assert!((quantile - 2.228).abs() < 1e-3);
        let (t, quantile) = slope_t_test(2.0, 1.0, 4.0, 2, 95.0);
        assert!((t - 4.0).abs() < EPS);
        assert!(quantile.is_nan());
    }
}
