use crate::candidate::FillCandidate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use wts_regression::{analyze_candidates, RegressionConfig, RegressionMethod, Transformation};
use wts_series::TimeSeries;

/// Every method and transformation to try against every reference station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixedStationPlan {
    pub methods: Vec<RegressionMethod>,
    pub transformations: Vec<Transformation>,
    /// Settings shared by every combination
    pub base: RegressionConfig,
}

impl Default for MixedStationPlan {
    fn default() -> Self {
        MixedStationPlan {
            methods: vec![RegressionMethod::Ols, RegressionMethod::Move2],
            transformations: vec![Transformation::None, Transformation::Log10],
            base: RegressionConfig::default(),
        }
    }
}

impl MixedStationPlan {
    /// Method-major list of configurations.
    pub fn configs(&self) -> Vec<RegressionConfig> {
        self.methods
            .iter()
            .flat_map(|&method| {
                self.transformations.iter().map(move |&transformation| RegressionConfig {
                    method,
                    transformation,
                    ..self.base.clone()
                })
            })
            .collect()
    }
}

/// Analyze `dependent` against each independent with each planned
/// configuration and keep the combinations that produced results, in
/// independent-major order. Failed combinations are logged and dropped.
pub fn build_candidates<'a>(
    dependent: &dyn TimeSeries,
    independents: &[&'a dyn TimeSeries],
    plan: &MixedStationPlan,
) -> Vec<FillCandidate<'a>> {
    let configs = plan.configs();
    if configs.is_empty() {
        return Vec::new();
    }
    let dependent_name = dependent.ident().name();
    analyze_candidates(dependent, independents, &configs)
        .into_iter()
        .enumerate()
        .filter_map(|(k, result)| {
            let independent = independents[k / configs.len()];
            match result {
                Ok(results) => {
                    debug!(
                        "Candidate {} for {}: {}",
                        results.independent,
                        dependent_name,
                        results.config.describe()
                    );
                    Some(FillCandidate::new(independent, results))
                }
                Err(e) => {
                    warn!(
                        "Dropping {} as a candidate for {} ({}): {}",
                        independent.ident().name(),
                        dependent_name,
                        configs[k % configs.len()].describe(),
                        e
                    );
                    None
                }
            }
        })
        .collect()
}
