//! `analyze`: fit a dependent station against one or more references.

use crate::{load_json, loader, YearRange};
use clap::Args;
use log::{info, warn};
use std::collections::HashMap;
use wts_regression::{
    analyze_candidates, Equation, NumberOfEquations, RegressionConfig, RegressionMethod,
    RegressionResults, Transformation,
};
use wts_series::{MonthTs, TimeSeries};

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Monthly observations CSV (station_id,duration,date,value)
    #[arg(short = 'i', long)]
    pub input: String,

    /// Station whose values are estimated
    #[arg(short = 'd', long)]
    pub dependent: String,

    /// Reference stations
    #[arg(short = 'x', long, num_args = 1.., required = true)]
    pub independent: Vec<String>,

    /// JSON regression settings; flags below override it
    #[arg(short = 'c', long)]
    pub config: Option<String>,

    /// ols or move2
    #[arg(long, value_parser = parse_method)]
    pub method: Option<RegressionMethod>,

    /// Fit one equation per calendar month
    #[arg(long)]
    pub monthly: bool,

    /// Fit log10 of the data
    #[arg(long)]
    pub log10: bool,

    /// Confidence level for the slope t test, in percent
    #[arg(long)]
    pub confidence: Option<f64>,

    #[command(flatten)]
    pub years: YearRange,

    /// Write the full results as JSON
    #[arg(short = 'o', long)]
    pub output: Option<String>,
}

pub fn parse_method(s: &str) -> Result<RegressionMethod, String> {
    match s.to_ascii_lowercase().as_str() {
        "ols" => Ok(RegressionMethod::Ols),
        "move2" | "move.2" => Ok(RegressionMethod::Move2),
        other => Err(format!("unknown regression method: {}", other)),
    }
}

/// Combine the optional config file with command line overrides.
pub fn build_config(args: &AnalyzeArgs) -> anyhow::Result<RegressionConfig> {
    let mut config: RegressionConfig = match &args.config {
        Some(path) => load_json(path)?,
        None => RegressionConfig::default(),
    };
    if let Some(method) = args.method {
        config.method = method;
    }
    if args.monthly {
        config.equations = NumberOfEquations::Monthly;
    }
    if args.log10 {
        config.transformation = Transformation::Log10;
    }
    if args.confidence.is_some() {
        config.confidence_percent = args.confidence;
    }
    if let Some(period) = args.years.period()? {
        config.dependent_period = Some(period);
    }
    config.validate()?;
    Ok(config)
}

/// Analyze the dependent station against each reference, in argument order.
pub fn analyze_stations(
    series: &HashMap<String, MonthTs>,
    dependent: &str,
    independents: &[String],
    config: &RegressionConfig,
) -> anyhow::Result<Vec<RegressionResults>> {
    let dependent = loader::select(series, &[dependent.to_string()])?[0];
    let references: Vec<&dyn TimeSeries> = loader::select(series, independents)?
        .into_iter()
        .map(|ts| ts as &dyn TimeSeries)
        .collect();

    let mut analyzed = Vec::new();
    for (station, result) in independents
        .iter()
        .zip(analyze_candidates(dependent, &references, std::slice::from_ref(config)))
    {
        match result {
            Ok(results) => analyzed.push(results),
            Err(e) => warn!("No relationship with {}: {}", station, e),
        }
    }
    info!(
        "Analyzed {} against {} of {} references",
        dependent.ident().location,
        analyzed.len(),
        independents.len()
    );
    Ok(analyzed)
}

/// One line per equation.
pub fn summarize(results: &RegressionResults) -> Vec<String> {
    results
        .equations()
        .iter()
        .enumerate()
        .map(|(i, equation)| {
            let label = match results.config.equations {
                NumberOfEquations::Single => "all".to_string(),
                NumberOfEquations::Monthly => format!("month {:02}", i + 1),
            };
            match equation {
                Equation::Analyzed(fit) => format!(
                    "{} ~ {} [{}] {}: a={:.4} b={:.4} r={:.4} n1={} n2={} see={:.4}{}",
                    results.dependent,
                    results.independent,
                    results.config.describe(),
                    label,
                    fit.a,
                    fit.b,
                    fit.r,
                    fit.n1,
                    fit.n2,
                    fit.see,
                    if fit.confidence_met() { "" } else { " (fails t test)" }
                ),
                Equation::NotAnalyzed(reason) => format!(
                    "{} ~ {} [{}] {}: not analyzed ({})",
                    results.dependent,
                    results.independent,
                    results.config.describe(),
                    label,
                    reason
                ),
            }
        })
        .collect()
}

pub fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<()> {
    let config = build_config(args)?;
    let series = loader::load_monthly(&args.input)?;
    let results = analyze_stations(&series, &args.dependent, &args.independent, &config)?;
    if results.is_empty() {
        anyhow::bail!("No reference station could be related to {}", args.dependent);
    }
    for line in results.iter().flat_map(summarize) {
        println!("{}", line);
    }
    if let Some(path) = &args.output {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, &results)?;
        info!("Wrote results to {}", path);
    }
    Ok(())
}
