//! Offline label synthesis for training sets that have no recorded outcomes.
//!
//! Every record starts from a base score, collects fixed additive weights for credit
//! history, loan-to-income, education, employment, and income bracket, then receives
//! Gaussian noise. Scores strictly above the decision boundary are labelled approved.
//! A single RNG seeded once per pass makes a labelled dataset reproducible.
//! Nothing here runs while serving predictions.

mod config;
mod rules;

pub use config::HeuristicWeights;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::LoanApplication;
use super::features;

/// Seed used for label synthesis unless the caller picks another.
pub const DEFAULT_LABEL_SEED: u64 = 42;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeuristicFactor {
    CreditHistory,
    LoanToIncome,
    Education,
    Employment,
    IncomeBracket,
}

/// One rule's contribution, kept for audits of the synthetic labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: HeuristicFactor,
    pub weight: f64,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeuristicOutcome {
    pub rule_score: f64,
    pub noise: f64,
    pub score: f64,
    pub approved: bool,
    pub components: Vec<ScoreComponent>,
}

pub struct ApprovalHeuristicScorer {
    weights: HeuristicWeights,
}

impl Default for ApprovalHeuristicScorer {
    fn default() -> Self {
        Self::new(HeuristicWeights::default())
    }
}

impl ApprovalHeuristicScorer {
    pub fn new(mut weights: HeuristicWeights) -> Self {
        if !weights.noise_std_dev.is_finite() || weights.noise_std_dev < 0.0 {
            let fallback = HeuristicWeights::default().noise_std_dev;
            warn!(
                configured = weights.noise_std_dev,
                fallback, "unusable noise standard deviation, using default"
            );
            weights.noise_std_dev = fallback;
        }
        Self { weights }
    }

    pub fn weights(&self) -> &HeuristicWeights {
        &self.weights
    }

    /// Rule contributions and their sum, without noise.
    pub fn rule_score(&self, application: &LoanApplication) -> (Vec<ScoreComponent>, f64) {
        let derived = features::derive(application);
        rules::score_application(application, &derived, &self.weights)
    }

    /// Scores one record, drawing exactly one noise sample from `rng`.
    pub fn score<R: Rng>(
        &self,
        application: &LoanApplication,
        rng: &mut R,
    ) -> HeuristicOutcome {
        let (components, rule_score) = self.rule_score(application);
        let standard: f64 = rng.sample(StandardNormal);
        let noise = standard * self.weights.noise_std_dev;
        let score = rule_score + noise;

        HeuristicOutcome {
            rule_score,
            noise,
            score,
            approved: score > self.weights.decision_boundary,
            components,
        }
    }

    /// Labels a whole dataset with one RNG seeded before the first record.
    pub fn label_all(&self, applications: &[LoanApplication], seed: u64) -> Vec<HeuristicOutcome> {
        let mut rng = StdRng::seed_from_u64(seed);
        applications
            .iter()
            .map(|application| self.score(application, &mut rng))
            .collect()
    }
}
