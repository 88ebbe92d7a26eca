//! `fill`: regression gap filling of one station from its references.

use crate::{load_json, loader, YearRange};
use anyhow::bail;
use clap::Args;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use wts_fill::{
    build_candidates, fill_interpolate, FillConfig, FillFlag, FillReport, GapFiller,
    MixedStationPlan, RankBy,
};
use wts_series::{MonthTs, TimeSeries};

/// Flag written on values filled by interpolation
pub const INTERPOLATED_FLAG: &str = "I";

#[derive(Args, Debug, Clone)]
pub struct FillArgs {
    /// Monthly observations CSV (station_id,duration,date,value)
    #[arg(short = 'i', long)]
    pub input: String,

    /// Station to fill
    #[arg(short = 't', long)]
    pub target: String,

    /// Reference stations, in order of preference for ties
    #[arg(short = 'x', long, num_args = 1.., required = true)]
    pub independent: Vec<String>,

    /// JSON settings: {"fill": {...}, "plan": {...}}
    #[arg(short = 'c', long)]
    pub config: Option<String>,

    /// sep or r
    #[arg(long, value_parser = parse_rank_by)]
    pub rank_by: Option<RankBy>,

    /// Flag written on every filled value
    #[arg(long)]
    pub flag: Option<String>,

    /// Afterwards interpolate remaining gaps of at most this many months (0 for any length)
    #[arg(long)]
    pub interpolate: Option<usize>,

    #[command(flatten)]
    pub years: YearRange,

    /// Output CSV for the filled station
    #[arg(short = 'o', long)]
    pub output: String,
}

/// Everything a fill run needs besides the data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillJob {
    pub fill: FillConfig,
    pub plan: MixedStationPlan,
}

pub fn parse_rank_by(s: &str) -> Result<RankBy, String> {
    match s.to_ascii_lowercase().as_str() {
        "sep" => Ok(RankBy::Sep),
        "r" => Ok(RankBy::R),
        other => Err(format!("unknown ranking: {}", other)),
    }
}

pub fn build_job(args: &FillArgs) -> anyhow::Result<FillJob> {
    let mut job: FillJob = match &args.config {
        Some(path) => load_json(path)?,
        None => FillJob::default(),
    };
    if let Some(rank_by) = args.rank_by {
        job.fill.rank_by = rank_by;
    }
    if let Some(flag) = &args.flag {
        job.fill.flag = FillFlag::Explicit(flag.clone());
    }
    if let Some(period) = args.years.period()? {
        job.fill.fill_period = Some(period);
    }
    job.plan.base.validate()?;
    Ok(job)
}

/// Outcome of filling one station.
#[derive(Debug)]
pub struct StationFill {
    pub series: MonthTs,
    pub report: FillReport,
    pub interpolated: usize,
}

/// Fill `target` from the listed references. The loaded target is taken
/// out of `series`; the filled copy is returned.
pub fn fill_station(
    series: &mut HashMap<String, MonthTs>,
    target: &str,
    independents: &[String],
    job: &FillJob,
    interpolate: Option<usize>,
) -> anyhow::Result<StationFill> {
    if independents.iter().any(|station| station == target) {
        bail!("Station {} cannot be used to fill itself", target);
    }
    let Some(mut filled) = series.remove(target) else {
        bail!("Station {} not found in input", target);
    };
    let references: Vec<&dyn TimeSeries> = loader::select(series, independents)?
        .into_iter()
        .map(|ts| ts as &dyn TimeSeries)
        .collect();

    let candidates = build_candidates(&filled, &references, &job.plan);
    info!(
        "{} candidate relationships for {} from {} references",
        candidates.len(),
        target,
        references.len()
    );
    let report = GapFiller::new(job.fill.clone()).fill(&mut filled, &candidates, None)?;

    let interpolated = match interpolate {
        Some(max_gap) => fill_interpolate(&mut filled, max_gap, Some(INTERPOLATED_FLAG))?,
        None => 0,
    };
    Ok(StationFill {
        series: filled,
        report,
        interpolated,
    })
}

pub fn run_fill(args: &FillArgs) -> anyhow::Result<()> {
    let job = build_job(args)?;
    let mut series = loader::load_monthly(&args.input)?;
    let result = fill_station(&mut series, &args.target, &args.independent, &job, args.interpolate)?;

    let file = std::fs::File::create(&args.output)?;
    loader::write_monthly(file, &[&result.series])?;
    let report = &result.report;
    println!(
        "{}: filled {} by regression, {} by interpolation, {} left missing, {} errors",
        args.target, report.filled, result.interpolated, report.unfilled, report.errors
    );
    for entry in result.series.genesis() {
        println!("  {}", entry);
    }
    info!("Wrote {} to {}", args.target, args.output);
    Ok(())
}
