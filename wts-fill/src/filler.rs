use crate::{
    candidate::{Estimate, FillCandidate},
    config::{FillConfig, FillFlag},
    error::{FillError, Result},
};
use chrono::NaiveDate;
use log::{info, warn};
use serde::Serialize;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use wts_series::{DateRange, MissingDomain, TimeSeries};

/// Cooperative cancellation, checked once per date. Cloning shares the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Outcome of one fill pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FillReport {
    pub filled: usize,
    /// Missing dates no candidate qualified for
    pub unfilled: usize,
    /// Dates skipped because a candidate failed unexpectedly
    pub errors: usize,
    /// Values filled from each candidate, in candidate order
    pub candidate_usage: Vec<usize>,
    pub cancelled: bool,
    /// Entries appended to the target genesis by this pass
    pub genesis: Vec<String>,
}

struct Choice {
    index: usize,
    estimate: Estimate,
}

/// Fills missing values of a target series from ranked regression
/// candidates.
#[derive(Debug, Clone, Default)]
pub struct GapFiller {
    config: FillConfig,
}

impl GapFiller {
    pub fn new(config: FillConfig) -> Self {
        GapFiller { config }
    }

    pub fn config(&self) -> &FillConfig {
        &self.config
    }

    /// Fill every missing value of `target` within the fill period, in
    /// ascending date order.
    ///
    /// For each date all candidates are considered in list order and the
    /// best-scoring qualifying estimate is written. Dates no candidate
    /// qualifies for stay missing. A candidate error skips the date, is
    /// counted in the report and logged, and the pass continues.
    pub fn fill<T: TimeSeries + ?Sized>(
        &self,
        target: &mut T,
        candidates: &[FillCandidate<'_>],
        cancel: Option<&CancelToken>,
    ) -> Result<FillReport> {
        let target_name = target.ident().name();
        let Some(period) = target.period() else {
            return Err(FillError::NotAllocated(target_name));
        };
        let interval = target.interval();
        for candidate in candidates {
            if candidate.independent.interval() != interval {
                return Err(FillError::IntervalMismatch {
                    target: interval.to_string(),
                    candidate: candidate.name().to_string(),
                    interval: candidate.independent.interval().to_string(),
                });
            }
        }
        let (start, end) = self.config.fill_period.unwrap_or(period);
        let (start, end) = (interval.normalize(start), interval.normalize(end));
        if start > end {
            return Err(FillError::InvalidPeriod { start, end });
        }

        let missing = *target.missing();
        let mut report = FillReport {
            candidate_usage: vec![0; candidates.len()],
            ..Default::default()
        };
        for date in DateRange::new(start.max(period.0), end.min(period.1), interval) {
            if cancel.is_some_and(CancelToken::is_cancelled) {
                warn!("Fill of {} cancelled before {}", target_name, date);
                report.cancelled = true;
                break;
            }
            if !target.is_missing(target.value(date)) {
                continue;
            }
            match self.best_candidate(date, candidates, &missing) {
                Ok(Some(choice)) => {
                    let candidate = &candidates[choice.index];
                    let value = choice.estimate.value;
                    match self.flag_for(&choice, candidate) {
                        Some(flag) => target.set_value_with_flag(date, value, &flag, 0),
                        None => target.set_value(date, value),
                    }
                    report.filled += 1;
                    report.candidate_usage[choice.index] += 1;
                    report.genesis.push(format!(
                        "Filled {} with {:.4} from {} ({}, {:?} score {:.4})",
                        date,
                        value,
                        candidate.name(),
                        candidate.results.config.describe(),
                        self.config.rank_by,
                        choice.estimate.score
                    ));
                }
                Ok(None) => report.unfilled += 1,
                Err(e) => {
                    report.errors += 1;
                    warn!("Not filling {} on {}: {}", target_name, date, e);
                }
            }
        }

        if report.filled > 0 {
            report.genesis.push(format!(
                "Filled {} missing values of {} by regression from {} candidate(s), ranked by {:?}",
                report.filled,
                target_name,
                candidates.len(),
                self.config.rank_by
            ));
            target.genesis_mut().extend(report.genesis.iter().cloned());
        }
        info!(
            "Fill of {}: {} filled, {} left missing, {} errors",
            target_name, report.filled, report.unfilled, report.errors
        );
        Ok(report)
    }

    fn best_candidate(
        &self,
        date: NaiveDate,
        candidates: &[FillCandidate<'_>],
        missing: &MissingDomain,
    ) -> Result<Option<Choice>> {
        let mut best: Option<Choice> = None;
        for (index, candidate) in candidates.iter().enumerate() {
            let Some(estimate) = candidate.estimate(date, &self.config)? else {
                continue;
            };
            // would read back as missing
            if missing.contains(estimate.value) {
                continue;
            }
            let better = match &best {
                Some(current) => self
                    .config
                    .rank_by
                    .is_better(estimate.score, current.estimate.score),
                None => true,
            };
            if better {
                best = Some(Choice { index, estimate });
            }
        }
        Ok(best)
    }

    fn flag_for(&self, choice: &Choice, candidate: &FillCandidate<'_>) -> Option<String> {
        match &self.config.flag {
            FillFlag::None => None,
            FillFlag::Explicit(flag) => Some(flag.clone()),
            FillFlag::MonthAndRank => Some(format!(
                "M{:02}R{}",
                choice.estimate.month,
                choice.index + 1
            )),
            FillFlag::IndependentName => Some(candidate.name().to_string()),
        }
    }
}
