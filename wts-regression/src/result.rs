use crate::config::{NumberOfEquations, RegressionConfig};
use serde::Serialize;
use std::fmt;

/// Why an equation has no fitted relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NotAnalyzedReason {
    /// No overlapping non-missing (independent, dependent) pairs
    NoData,
    /// The independent sample has no variance
    Singular,
    /// The month is outside the configured analysis months
    MonthExcluded,
}

impl fmt::Display for NotAnalyzedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotAnalyzedReason::NoData => write!(f, "no overlapping data"),
            NotAnalyzedReason::Singular => write!(f, "independent values have no variance"),
            NotAnalyzedReason::MonthExcluded => write!(f, "month not analyzed"),
        }
    }
}

/// Outcome of the two-tailed Student's t test on the slope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceTest {
    pub percent: f64,
    pub t_statistic: f64,
    pub t_quantile: f64,
    pub met: bool,
}

/// Statistics of one fitted equation. Means, standard deviations, `see` and
/// `rmse_transformed` are in transformed units; `rmse` is in data units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitStatistics {
    pub a: f64,
    pub b: f64,
    pub r: f64,
    pub n1: usize,
    pub n2: usize,
    pub mean_x1: f64,
    /// `None` when there are no independent-only (N2) values
    pub mean_x2: Option<f64>,
    pub mean_y1: f64,
    pub sd_x1: f64,
    pub sd_x2: Option<f64>,
    pub sd_y1: f64,
    pub rmse: f64,
    pub rmse_transformed: f64,
    pub see: f64,
    pub confidence: Option<ConfidenceTest>,
}

impl FitStatistics {
    /// True when no confidence test was requested or the test passed.
    pub fn confidence_met(&self) -> bool {
        self.confidence.map_or(true, |test| test.met)
    }

    /// Population variance of the N1 independent sample.
    pub fn variance_x1(&self) -> f64 {
        if self.n1 == 0 {
            return f64::NAN;
        }
        let n1 = self.n1 as f64;
        self.sd_x1 * self.sd_x1 * (n1 - 1.0) / n1
    }
}

/// One equation of an analysis: either fitted or not, never a sentinel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Equation {
    Analyzed(FitStatistics),
    NotAnalyzed(NotAnalyzedReason),
}

impl Equation {
    pub fn is_analyzed(&self) -> bool {
        matches!(self, Equation::Analyzed(_))
    }

    pub fn fit(&self) -> Option<&FitStatistics> {
        match self {
            Equation::Analyzed(fit) => Some(fit),
            Equation::NotAnalyzed(_) => None,
        }
    }
}

/// All equations of one dependent/independent analysis. Immutable once
/// built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionResults {
    pub dependent: String,
    pub independent: String,
    pub config: RegressionConfig,
    equations: Vec<Equation>,
}

impl RegressionResults {
    pub fn new(
        dependent: String,
        independent: String,
        config: RegressionConfig,
        equations: Vec<Equation>,
    ) -> Self {
        RegressionResults {
            dependent,
            independent,
            config,
            equations,
        }
    }

    pub fn equations(&self) -> &[Equation] {
        &self.equations
    }

    /// Equation by 1-based index (1 for a single equation, 1-12 for months).
    pub fn equation(&self, index: usize) -> Option<&Equation> {
        index.checked_sub(1).and_then(|i| self.equations.get(i))
    }

    pub fn analyzed(&self, index: usize) -> bool {
        self.equation(index).is_some_and(Equation::is_analyzed)
    }

    /// The equation that applies to values in the given calendar month.
    pub fn for_month(&self, month: u32) -> Option<&Equation> {
        match self.config.equations {
            NumberOfEquations::Single => self.equation(1),
            NumberOfEquations::Monthly => self.equation(month as usize),
        }
    }
}
