use crate::{
    config::{ErrorMode, NumberOfEquations, RegressionConfig, RegressionMethod},
    error::{RegressionError, Result},
    result::{ConfidenceTest, Equation, FitStatistics, NotAnalyzedReason, RegressionResults},
    samples::{self, SampleSet},
    stats::{self, ErrorStats, LineFit},
};
use log::{debug, info};
use rayon::prelude::*;
use wts_series::TimeSeries;

/// Fits the relationship between a dependent and an independent series
/// under one configuration.
#[derive(Debug, Clone, Default)]
pub struct RegressionAnalyzer {
    config: RegressionConfig,
}

impl RegressionAnalyzer {
    pub fn new(config: RegressionConfig) -> Self {
        RegressionAnalyzer { config }
    }

    pub fn config(&self) -> &RegressionConfig {
        &self.config
    }

    /// Analyze `dependent` against `independent`.
    ///
    /// With a single equation, failing to fit it fails the whole analysis.
    /// With monthly equations each month is fit independently (in parallel)
    /// and a month that cannot be fit is reported as not analyzed without
    /// affecting the others.
    pub fn analyze(
        &self,
        dependent: &dyn TimeSeries,
        independent: &dyn TimeSeries,
    ) -> Result<RegressionResults> {
        self.config.validate()?;
        if dependent.interval() != independent.interval() {
            return Err(RegressionError::IntervalMismatch {
                dependent: dependent.interval().to_string(),
                independent: independent.interval().to_string(),
            });
        }
        for series in [dependent, independent] {
            if series.period().is_none() {
                return Err(RegressionError::NotAllocated(series.ident().name()));
            }
        }
        let dependent_name = dependent.ident().name();
        let independent_name = independent.ident().name();

        let equations = match self.config.equations {
            NumberOfEquations::Single => {
                let equation = self.analyze_equation(dependent, independent, None);
                if let Equation::NotAnalyzed(reason) = equation {
                    return Err(RegressionError::EquationFailed {
                        dependent: dependent_name,
                        independent: independent_name,
                        reason,
                    });
                }
                vec![equation]
            }
            NumberOfEquations::Monthly => (1..=12u32)
                .into_par_iter()
                .map(|month| {
                    if self.config.includes_month(month) {
                        self.analyze_equation(dependent, independent, Some(month))
                    } else {
                        Equation::NotAnalyzed(NotAnalyzedReason::MonthExcluded)
                    }
                })
                .collect(),
        };

        let analyzed = equations.iter().filter(|e| e.is_analyzed()).count();
        info!(
            "Analyzed {} on {} ({}): {}/{} equations fit",
            dependent_name,
            independent_name,
            self.config.describe(),
            analyzed,
            equations.len()
        );
        Ok(RegressionResults::new(
            dependent_name,
            independent_name,
            self.config.clone(),
            equations,
        ))
    }

    fn analyze_equation(
        &self,
        dependent: &dyn TimeSeries,
        independent: &dyn TimeSeries,
        month: Option<u32>,
    ) -> Equation {
        let samples = samples::extract(dependent, independent, &self.config, month);
        let equation = self.fit(&samples);
        let index = month.unwrap_or(1);
        match &equation {
            Equation::Analyzed(fit) => debug!(
                "Equation {}: a={:.6} b={:.6} r={:.4} n1={} n2={} see={:.6}",
                index, fit.a, fit.b, fit.r, fit.n1, fit.n2, fit.see
            ),
            Equation::NotAnalyzed(reason) => {
                debug!("Equation {} not analyzed: {}", index, reason)
            }
        }
        equation
    }

    fn fit(&self, samples: &SampleSet) -> Equation {
        if samples.n1() == 0 {
            return Equation::NotAnalyzed(NotAnalyzedReason::NoData);
        }
        let fitted = match self.config.method {
            RegressionMethod::Ols => stats::ols(&samples.x1, &samples.y1, self.config.forced_intercept)
                .map(|line| (line, None, None)),
            RegressionMethod::Move2 => stats::move2(&samples.x1, &samples.y1, &samples.x2).map(|fit| {
                if samples.x2.is_empty() {
                    (fit.line, None, None)
                } else {
                    (fit.line, Some(fit.mean_x2), Some(fit.sd_x2))
                }
            }),
        };
        let Some((line, mean_x2, sd_x2)) = fitted else {
            return Equation::NotAnalyzed(NotAnalyzedReason::Singular);
        };

        let (transformed, back_transformed) = self.error_stats(samples, line);
        let n1 = samples.n1();
        let confidence = self.config.confidence_percent.map(|percent| {
            let (t_statistic, t_quantile) = stats::slope_t_test(
                line.b,
                transformed.see,
                stats::sum_squares(&samples.x1),
                n1,
                percent,
            );
            ConfidenceTest {
                percent,
                t_statistic,
                t_quantile,
                met: t_statistic.abs() >= t_quantile,
            }
        });

        Equation::Analyzed(FitStatistics {
            a: line.a,
            b: line.b,
            r: line.r,
            n1,
            n2: samples.x2.len(),
            mean_x1: stats::mean(&samples.x1),
            mean_x2,
            mean_y1: stats::mean(&samples.y1),
            sd_x1: stats::sample_variance(&samples.x1).sqrt(),
            sd_x2,
            sd_y1: stats::sample_variance(&samples.y1).sqrt(),
            rmse: back_transformed.rmse,
            rmse_transformed: transformed.rmse,
            see: transformed.see,
            confidence,
        })
    }

    /// Error statistics in transformed and in data units.
    fn error_stats(&self, samples: &SampleSet, line: LineFit) -> (ErrorStats, ErrorStats) {
        let transform = self.config.transformation;
        match self.config.error_mode {
            ErrorMode::Estimate => (
                stats::error_stats(
                    samples
                        .x1
                        .iter()
                        .zip(&samples.y1)
                        .map(|(x, y)| line.a + line.b * x - y),
                ),
                stats::error_stats(
                    samples
                        .x1
                        .iter()
                        .zip(&samples.y1_raw)
                        .map(|(x, y)| transform.invert(line.a + line.b * x) - y),
                ),
            ),
            ErrorMode::Compare => (
                stats::error_stats(samples.y1.iter().zip(&samples.x1).map(|(y, x)| y - x)),
                stats::error_stats(
                    samples
                        .y1_raw
                        .iter()
                        .zip(&samples.x1_raw)
                        .map(|(y, x)| y - x),
                ),
            ),
        }
    }
}

/// Analyze the dependent series against every (independent, config)
/// combination in parallel. Results come back independent-major, in input
/// order: `independents[0]` with each config, then `independents[1]`, ...
pub fn analyze_candidates(
    dependent: &dyn TimeSeries,
    independents: &[&dyn TimeSeries],
    configs: &[RegressionConfig],
) -> Vec<Result<RegressionResults>> {
    let jobs: Vec<(usize, usize)> = (0..independents.len())
        .flat_map(|i| (0..configs.len()).map(move |c| (i, c)))
        .collect();
    jobs.par_iter()
        .map(|&(i, c)| RegressionAnalyzer::new(configs[c].clone()).analyze(dependent, independents[i]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Transformation;
    use chrono::NaiveDate;
    use wts_series::{DayTs, MonthTs, TimeInterval, TsIdent};

    const EPS: f64 = 1e-9;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()
    }

    fn series(name: &str, values: &[f64]) -> MonthTs {
        let ident = TsIdent::new(name, "FLOW", TimeInterval::MONTH);
        let end = TimeInterval::MONTH.add(start(), values.len() as i64 - 1).unwrap();
        let mut ts = MonthTs::with_period(ident, "CFS", start(), end).unwrap();
        for (i, value) in values.iter().enumerate() {
            ts.set_value(TimeInterval::MONTH.add(start(), i as i64).unwrap(), *value);
        }
        ts
    }

    fn fit_of(results: &RegressionResults, index: usize) -> &FitStatistics {
        results.equation(index).and_then(Equation::fit).unwrap()
    }

    #[test]
    fn test_ols_exact_line() {
        let x = series("X", &[1.0, 2.0, 3.0, 4.0, 5.0]);
        let y = series("Y", &[5.0, 8.0, 11.0, 14.0, 17.0]);
        let results = RegressionAnalyzer::default().analyze(&y, &x).unwrap();
        assert!(results.analyzed(1));
        assert_eq!(results.equations().len(), 1);
        let fit = fit_of(&results, 1);
        assert!((fit.a - 2.0).abs() < EPS);
        assert!((fit.b - 3.0).abs() < EPS);
        assert!((fit.r - 1.0).abs() < EPS);
        assert_eq!(fit.n1, 5);
        assert_eq!(fit.n2, 0);
        assert!(fit.rmse.abs() < EPS);
        assert_eq!(results.dependent, "Y..FLOW.Month");
    }

    #[test]
    fn test_monthly_equations_are_independent() {
        let x: Vec<f64> = (0..36).map(|i| 10.0 + i as f64).collect();
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, v)| if i % 12 == 0 { f64::NAN } else { 3.0 + 0.5 * v })
            .collect();
        let config = RegressionConfig {
            equations: NumberOfEquations::Monthly,
            ..Default::default()
        };
        let results = RegressionAnalyzer::new(config)
            .analyze(&series("Y", &y), &series("X", &x))
            .unwrap();
        assert_eq!(results.equations().len(), 12);
        assert_eq!(
            results.equation(1),
            Some(&Equation::NotAnalyzed(NotAnalyzedReason::NoData))
        );
        for month in 2..=12 {
            assert!(results.analyzed(month), "month {month}");
            let fit = fit_of(&results, month);
            assert_eq!(fit.n1, 3);
            assert!((fit.b - 0.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_single_equation_failure_fails_analysis() {
        let x = series("X", &[1.0, 2.0, 3.0]);
        let y = series("Y", &[f64::NAN, f64::NAN, f64::NAN]);
        let err = RegressionAnalyzer::default().analyze(&y, &x).unwrap_err();
        assert!(matches!(
            err,
            RegressionError::EquationFailed {
                reason: NotAnalyzedReason::NoData,
                ..
            }
        ));

        let x = series("X", &[4.0, 4.0, 4.0]);
        let y = series("Y", &[1.0, 2.0, 3.0]);
        let err = RegressionAnalyzer::default().analyze(&y, &x).unwrap_err();
        assert!(matches!(
            err,
            RegressionError::EquationFailed {
                reason: NotAnalyzedReason::Singular,
                ..
            }
        ));
    }

    #[test]
    fn test_excluded_months_are_not_analyzed() {
        let x: Vec<f64> = (0..24).map(|i| 1.0 + i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v).collect();
        let config = RegressionConfig {
            equations: NumberOfEquations::Monthly,
            analysis_months: Some(vec![6, 7, 8]),
            ..Default::default()
        };
        let results = RegressionAnalyzer::new(config)
            .analyze(&series("Y", &y), &series("X", &x))
            .unwrap();
        assert!(results.analyzed(7));
        assert_eq!(
            results.equation(1),
            Some(&Equation::NotAnalyzed(NotAnalyzedReason::MonthExcluded))
        );
    }

    #[test]
    fn test_interval_mismatch() {
        let x = DayTs::with_period(
            TsIdent::new("X", "FLOW", TimeInterval::DAY),
            "CFS",
            start(),
            NaiveDate::from_ymd_opt(1990, 12, 31).unwrap(),
        )
        .unwrap();
        let y = series("Y", &[1.0]);
        assert!(matches!(
            RegressionAnalyzer::default().analyze(&y, &x),
            Err(RegressionError::IntervalMismatch { .. })
        ));
    }

    #[test]
    fn test_log10_fit_and_back_transformed_rmse() {
        // Y = 10 * X^2  =>  log Y = 1 + 2 log X
        let xs = [1.0, 2.0, 5.0, 10.0, 20.0, 50.0];
        let ys: Vec<f64> = xs.iter().map(|x| 10.0 * x * x).collect();
        let config = RegressionConfig {
            transformation: Transformation::Log10,
            ..Default::default()
        };
        let results = RegressionAnalyzer::new(config)
            .analyze(&series("Y", &ys), &series("X", &xs))
            .unwrap();
        let fit = fit_of(&results, 1);
        assert!((fit.a - 1.0).abs() < 1e-9);
        assert!((fit.b - 2.0).abs() < 1e-9);
        assert!(fit.rmse_transformed < 1e-9);
        assert!(fit.rmse < 1e-6);
    }

    #[test]
    fn test_log10_rmse_is_reported_in_data_units() {
        let xs = [1.0, 10.0, 100.0, 1000.0];
        let ys = [10.0, 50.0, 1000.0, 5000.0];
        let config = RegressionConfig {
            transformation: Transformation::Log10,
            ..Default::default()
        };
        let results = RegressionAnalyzer::new(config)
            .analyze(&series("Y", &ys), &series("X", &xs))
            .unwrap();
        let fit = fit_of(&results, 1);
        assert!(fit.rmse > 1.0);
        assert!(fit.rmse_transformed < 1.0);
    }

    #[test]
    fn test_confidence_failures_are_kept() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let weak = [3.0, 1.0, 4.0, 1.0, 5.0, 2.0];
        let strong = [2.1, 3.9, 6.2, 7.8, 10.1, 12.0];
        let config = RegressionConfig {
            confidence_percent: Some(95.0),
            ..Default::default()
        };
        let analyzer = RegressionAnalyzer::new(config);

        let results = analyzer.analyze(&series("Y", &weak), &series("X", &x)).unwrap();
        let fit = fit_of(&results, 1);
        let test = fit.confidence.unwrap();
        assert!(!test.met);
        assert!(!fit.confidence_met());
        // t(0.975, df=4)
        assert!((test.t_quantile - 2.776).abs() < 1e-3);

        let results = analyzer.analyze(&series("Y", &strong), &series("X", &x)).unwrap();
        assert!(fit_of(&results, 1).confidence_met());
    }

    #[test]
    fn test_compare_mode_measures_series_difference() {
        let x = series("X", &[1.0, 2.0, 4.0, 8.0]);
        let y = series("Y", &[2.0, 3.0, 5.0, 9.0]);
        let config = RegressionConfig {
            error_mode: ErrorMode::Compare,
            ..Default::default()
        };
        let results = RegressionAnalyzer::new(config).analyze(&y, &x).unwrap();
        let fit = fit_of(&results, 1);
        assert!((fit.rmse - 1.0).abs() < EPS);
        assert!((fit.see - 2f64.sqrt()).abs() < EPS);
    }

    #[test]
    fn test_forced_intercept() {
        let x = series("X", &[1.0, 2.0, 3.0, 4.0]);
        let y = series("Y", &[2.0, 4.0, 6.0, 8.0]);
        let config = RegressionConfig {
            forced_intercept: Some(0.0),
            ..Default::default()
        };
        let results = RegressionAnalyzer::new(config).analyze(&y, &x).unwrap();
        let fit = fit_of(&results, 1);
        assert_eq!(fit.a, 0.0);
        assert!((fit.b - 2.0).abs() < EPS);
    }

    #[test]
    fn test_move2_reports_extension_sample() {
        let x = series("X", &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
        let y = series(
            "Y",
            &[12.0, 14.0, 16.0, 18.0, 20.0, f64::NAN, f64::NAN, f64::NAN, f64::NAN, f64::NAN],
        );
        let config = RegressionConfig {
            method: RegressionMethod::Move2,
            ..Default::default()
        };
        let results = RegressionAnalyzer::new(config).analyze(&y, &x).unwrap();
        let fit = fit_of(&results, 1);
        assert_eq!(fit.n1, 5);
        assert_eq!(fit.n2, 5);
        assert_eq!(fit.mean_x2, Some(8.0));
        assert!((fit.b - 2.0).abs() < 1e-6);
        assert!((fit.a - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_move2_small_sample_is_reported_not_guarded() {
        let x = series("X", &[1.0, 2.0, 3.0, 4.0, 5.0]);
        let y = series("Y", &[1.0, 3.0, 2.0, f64::NAN, f64::NAN]);
        let config = RegressionConfig {
            method: RegressionMethod::Move2,
            ..Default::default()
        };
        let results = RegressionAnalyzer::new(config).analyze(&y, &x).unwrap();
        let fit = fit_of(&results, 1);
        assert_eq!(fit.n1, 3);
        assert!(fit.b.is_nan());
    }

    #[test]
    fn test_analyze_candidates_keeps_input_order() {
        let y = series("Y", &[5.0, 8.0, 11.0, 14.0, 17.0]);
        let good = series("GOOD", &[1.0, 2.0, 3.0, 4.0, 5.0]);
        let empty = series("EMPTY", &[f64::NAN; 5]);
        let configs = vec![
            RegressionConfig::default(),
            RegressionConfig::new(
                RegressionMethod::Move2,
                NumberOfEquations::Single,
                Transformation::None,
            ),
        ];
        let results = analyze_candidates(&y, &[&good, &empty], &configs);
        assert_eq!(results.len(), 4);
        assert_eq!(results[0].as_ref().unwrap().config.method, RegressionMethod::Ols);
        assert_eq!(results[1].as_ref().unwrap().config.method, RegressionMethod::Move2);
        assert!(results[0].as_ref().unwrap().independent.starts_with("GOOD"));
        assert!(results[2].is_err());
        assert!(results[3].is_err());
    }
}
