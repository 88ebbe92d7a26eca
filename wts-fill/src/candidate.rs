use crate::{
    config::{FillConfig, RankBy},
    error::{FillError, Result},
};
use chrono::{Datelike, NaiveDate};
use std::f64::consts::LN_10;
use wts_regression::{Equation, FitStatistics, RegressionResults, Transformation};
use wts_series::TimeSeries;

/// An independent series together with the relationships fit against it.
pub struct FillCandidate<'a> {
    pub independent: &'a dyn TimeSeries,
    pub results: RegressionResults,
}

/// What one candidate offers for one date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub value: f64,
    pub score: f64,
    pub month: u32,
}

impl<'a> FillCandidate<'a> {
    pub fn new(independent: &'a dyn TimeSeries, results: RegressionResults) -> Self {
        FillCandidate {
            independent,
            results,
        }
    }

    pub fn name(&self) -> &str {
        &self.results.independent
    }

    /// Estimate the dependent value at `date`.
    ///
    /// `Ok(None)` means the candidate does not qualify: the independent value
    /// is missing (or zero when zeros are excluded), the month is not filled,
    /// or the month's equation is absent or fails validation.
    pub fn estimate(&self, date: NaiveDate, config: &FillConfig) -> Result<Option<Estimate>> {
        let x = self.independent.value(date);
        if self.independent.is_missing(x) || (config.exclude_zero_independent && x == 0.0) {
            return Ok(None);
        }
        let month = date.month();
        if !config.includes_month(month) {
            return Ok(None);
        }
        let Some(Equation::Analyzed(fit)) = self.results.for_month(month) else {
            return Ok(None);
        };
        if !config.validation.accepts(fit) {
            return Ok(None);
        }

        let regression = &self.results.config;
        let transform = regression.transformation;
        let xt = transform.apply(x, regression.le_zero_log_value);
        let value = transform.invert(fit.a + fit.b * xt);
        if !value.is_finite() {
            return Err(FillError::NonFiniteEstimate {
                date,
                candidate: self.name().to_string(),
            });
        }
        let score = match config.rank_by {
            RankBy::Sep => sep_percent(fit, xt, value, transform),
            RankBy::R => fit.r,
        };
        if !score.is_finite() {
            return Ok(None);
        }
        Ok(Some(Estimate {
            value,
            score,
            month,
        }))
    }
}

/// Standard error of prediction at `xt` (transformed units).
fn standard_error_of_prediction(fit: &FitStatistics, xt: f64) -> f64 {
    let n1 = fit.n1 as f64;
    let dx = xt - fit.mean_x1;
    fit.see * (1.0 + 1.0 / n1 + dx * dx / (n1 * fit.variance_x1())).sqrt()
}

/// SEP expressed as a coefficient of variation, in percent, so candidates
/// with and without a log transform compare on the same scale.
fn sep_percent(fit: &FitStatistics, xt: f64, estimate: f64, transform: Transformation) -> f64 {
    let sep = standard_error_of_prediction(fit, xt);
    match transform {
        Transformation::None => 100.0 * sep / estimate.abs(),
        Transformation::Log10 => 100.0 * ((sep * LN_10).powi(2).exp() - 1.0).sqrt(),
    }
}
