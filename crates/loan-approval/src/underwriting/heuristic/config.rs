use serde::{Deserialize, Serialize};

/// Additive weights and cut-offs used when synthesizing approval labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeuristicWeights {
    pub base_score: f64,
    pub good_credit: f64,
    pub bad_credit: f64,
    pub comfortable_ratio_ceiling: f64,
    pub stretched_ratio_ceiling: f64,
    pub comfortable_ratio: f64,
    pub stretched_ratio: f64,
    pub excessive_ratio: f64,
    pub higher_education: f64,
    pub employed: f64,
    pub self_employed: f64,
    pub middle_or_upper_income: f64,
    pub lower_middle_income: f64,
    pub noise_std_dev: f64,
    pub decision_boundary: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            base_score: 0.5,
            good_credit: 0.4,
            bad_credit: -0.4,
            comfortable_ratio_ceiling: 2.0,
            stretched_ratio_ceiling: 3.0,
            comfortable_ratio: 0.3,
            stretched_ratio: 0.1,
            excessive_ratio: -0.2,
            higher_education: 0.1,
            employed: 0.1,
            self_employed: -0.05,
            middle_or_upper_income: 0.1,
            lower_middle_income: 0.05,
            noise_std_dev: 0.1,
            decision_boundary: 0.5,
        }
    }
}
