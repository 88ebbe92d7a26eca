use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use wts_regression::FitStatistics;

/// How competing candidates are ranked for one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RankBy {
    /// Standard error of prediction as a coefficient of variation; lower wins
    #[default]
    Sep,
    /// Correlation coefficient of the equation; higher wins
    R,
}

impl RankBy {
    /// True when `score` beats `best`. Ties keep the incumbent.
    pub fn is_better(self, score: f64, best: f64) -> bool {
        match self {
            RankBy::Sep => score < best,
            RankBy::R => score > best,
        }
    }
}

/// Flag written alongside each filled value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FillFlag {
    /// Values are written without a flag
    #[default]
    None,
    /// The given string
    Explicit(String),
    /// Month and 1-based candidate position, e.g. `M03R2`
    MonthAndRank,
    /// Name of the independent series used
    IndependentName,
}

/// Minimum quality an equation must show before it is used to fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationCriteria {
    pub min_sample_size: usize,
    pub min_r: Option<f64>,
    /// Reject equations whose slope t test failed (when a test was run)
    pub require_confidence: bool,
}

impl Default for ValidationCriteria {
    fn default() -> Self {
        ValidationCriteria {
            min_sample_size: 3,
            min_r: None,
            require_confidence: true,
        }
    }
}

impl ValidationCriteria {
    /// Equations with non-finite coefficients (MOVE.2 on too few pairs)
    /// are never accepted.
    pub fn accepts(&self, fit: &FitStatistics) -> bool {
        if !fit.a.is_finite() || !fit.b.is_finite() {
            return false;
        }
        if fit.n1 < self.min_sample_size {
            return false;
        }
        if let Some(min_r) = self.min_r {
            if !(fit.r >= min_r) {
                return false;
            }
        }
        !self.require_confidence || fit.confidence_met()
    }
}

/// Settings for one fill pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FillConfig {
    pub rank_by: RankBy,
    /// Defaults to the full target period
    pub fill_period: Option<(NaiveDate, NaiveDate)>,
    /// Calendar months (1-12) that may be filled; all when `None`
    pub analysis_months: Option<Vec<u32>>,
    pub validation: ValidationCriteria,
    pub flag: FillFlag,
    /// Treat independent values of exactly zero as unusable
    pub exclude_zero_independent: bool,
}

impl FillConfig {
    pub fn includes_month(&self, month: u32) -> bool {
        self.analysis_months
            .as_ref()
            .map_or(true, |months| months.contains(&month))
    }
}
