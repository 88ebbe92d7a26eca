use crate::error::{RegressionError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value substituted for data <= 0 before taking log10.
pub const DEFAULT_LE_ZERO_LOG_VALUE: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RegressionMethod {
    #[default]
    Ols,
    Move2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NumberOfEquations {
    /// One relationship for the whole analysis period
    #[default]
    Single,
    /// Twelve independent relationships, one per calendar month
    Monthly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Transformation {
    #[default]
    None,
    Log10,
}

/// What the error statistics (RMSE, SEE) measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ErrorMode {
    /// Estimated minus observed dependent values (used when filling)
    #[default]
    Estimate,
    /// Dependent minus independent values, comparing two series directly
    Compare,
}

impl fmt::Display for RegressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegressionMethod::Ols => write!(f, "OLS"),
            RegressionMethod::Move2 => write!(f, "MOVE2"),
        }
    }
}

impl fmt::Display for NumberOfEquations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberOfEquations::Single => write!(f, "OneEquation"),
            NumberOfEquations::Monthly => write!(f, "MonthlyEquations"),
        }
    }
}

impl fmt::Display for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transformation::None => write!(f, "None"),
            Transformation::Log10 => write!(f, "Log10"),
        }
    }
}

impl Transformation {
    /// Apply the transform; under log10, values <= 0 become `le_zero_value`
    /// first.
    pub fn apply(self, value: f64, le_zero_value: f64) -> f64 {
        match self {
            Transformation::None => value,
            Transformation::Log10 if value <= 0.0 => le_zero_value.log10(),
            Transformation::Log10 => value.log10(),
        }
    }

    pub fn invert(self, value: f64) -> f64 {
        match self {
            Transformation::None => value,
            Transformation::Log10 => 10f64.powf(value),
        }
    }
}

/// Settings for one regression analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegressionConfig {
    pub method: RegressionMethod,
    pub equations: NumberOfEquations,
    pub transformation: Transformation,
    pub le_zero_log_value: f64,
    /// Only `Some(0.0)` is meaningful, and only with OLS
    pub forced_intercept: Option<f64>,
    /// Two-tailed slope significance level, e.g. 95
    pub confidence_percent: Option<f64>,
    /// Window for the paired (N1) samples; defaults to the dependent period
    pub dependent_period: Option<(NaiveDate, NaiveDate)>,
    /// Window for independent-only (N2) samples; defaults to the
    /// independent series period
    pub independent_period: Option<(NaiveDate, NaiveDate)>,
    /// Calendar months (1-12) to include; all when `None`
    pub analysis_months: Option<Vec<u32>>,
    pub error_mode: ErrorMode,
}

impl Default for RegressionConfig {
    fn default() -> Self {
        RegressionConfig {
            method: RegressionMethod::Ols,
            equations: NumberOfEquations::Single,
            transformation: Transformation::None,
            le_zero_log_value: DEFAULT_LE_ZERO_LOG_VALUE,
            forced_intercept: None,
            confidence_percent: None,
            dependent_period: None,
            independent_period: None,
            analysis_months: None,
            error_mode: ErrorMode::Estimate,
        }
    }
}

impl RegressionConfig {
    pub fn new(
        method: RegressionMethod,
        equations: NumberOfEquations,
        transformation: Transformation,
    ) -> Self {
        RegressionConfig {
            method,
            equations,
            transformation,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(intercept) = self.forced_intercept {
            if intercept != 0.0 {
                return Err(RegressionError::InvalidConfig(format!(
                    "forced intercept must be 0 (got {intercept})"
                )));
            }
            if self.method != RegressionMethod::Ols {
                return Err(RegressionError::InvalidConfig(
                    "a forced intercept can only be used with OLS".to_string(),
                ));
            }
            if self.transformation != Transformation::None {
                return Err(RegressionError::InvalidConfig(
                    "a forced intercept cannot be combined with a log transform".to_string(),
                ));
            }
        }
        if let Some(percent) = self.confidence_percent {
            if !(percent > 0.0 && percent < 100.0) {
                return Err(RegressionError::InvalidConfig(format!(
                    "confidence percent must be between 0 and 100 (got {percent})"
                )));
            }
        }
        if self.transformation == Transformation::Log10 && self.le_zero_log_value <= 0.0 {
            return Err(RegressionError::InvalidConfig(format!(
                "log substitution value must be positive (got {})",
                self.le_zero_log_value
            )));
        }
        if let Some(months) = &self.analysis_months {
            if let Some(bad) = months.iter().find(|m| !(1..=12).contains(*m)) {
                return Err(RegressionError::InvalidConfig(format!(
                    "analysis month {bad} is not between 1 and 12"
                )));
            }
        }
        for (start, end) in [self.dependent_period, self.independent_period]
            .into_iter()
            .flatten()
        {
            if start > end {
                return Err(RegressionError::InvalidConfig(format!(
                    "analysis period start {start} is after end {end}"
                )));
            }
        }
        Ok(())
    }

    pub fn includes_month(&self, month: u32) -> bool {
        self.analysis_months
            .as_ref()
            .map_or(true, |months| months.contains(&month))
    }

    /// Short description used in logs and genesis entries.
    pub fn describe(&self) -> String {
        format!("{} {} transform={}", self.method, self.equations, self.transformation)
    }
}
