use super::super::domain::LoanApplication;
use super::super::features::{DerivedFeatures, IncomeBracket};
use super::config::HeuristicWeights;
use super::{HeuristicFactor, ScoreComponent};

/// Deterministic part of the heuristic: every rule before noise is added.
pub(crate) fn score_application(
    application: &LoanApplication,
    derived: &DerivedFeatures,
    weights: &HeuristicWeights,
) -> (Vec<ScoreComponent>, f64) {
    let mut components = Vec::with_capacity(5);
    let mut total = weights.base_score;

    let mut add = |factor: HeuristicFactor, weight: f64, notes: String| {
        total += weight;
        components.push(ScoreComponent {
            factor,
            weight,
            notes,
        });
    };

    if application.has_good_credit() {
        add(
            HeuristicFactor::CreditHistory,
            weights.good_credit,
            "good credit history".to_string(),
        );
    } else {
        add(
            HeuristicFactor::CreditHistory,
            weights.bad_credit,
            "bad credit history".to_string(),
        );
    }

    let ratio = derived.loan_to_income_ratio;
    if ratio <= weights.comfortable_ratio_ceiling {
        add(
            HeuristicFactor::LoanToIncome,
            weights.comfortable_ratio,
            format!(
                "loan-to-income {ratio:.2} within {:.1}",
                weights.comfortable_ratio_ceiling
            ),
        );
    } else if ratio <= weights.stretched_ratio_ceiling {
        add(
            HeuristicFactor::LoanToIncome,
            weights.stretched_ratio,
            format!(
                "loan-to-income {ratio:.2} within {:.1}",
                weights.stretched_ratio_ceiling
            ),
        );
    } else {
        add(
            HeuristicFactor::LoanToIncome,
            weights.excessive_ratio,
            format!(
                "loan-to-income {ratio:.2} exceeds {:.1}",
                weights.stretched_ratio_ceiling
            ),
        );
    }

    if application.education.is_higher_tier() {
        add(
            HeuristicFactor::Education,
            weights.higher_education,
            application.education.label().to_string(),
        );
    }

    if application.self_employed.is_employed() {
        add(
            HeuristicFactor::Employment,
            weights.employed,
            "employed".to_string(),
        );
    } else {
        add(
            HeuristicFactor::Employment,
            weights.self_employed,
            format!("self-employed answer {:?}", application.self_employed.label()),
        );
    }

    let bracket_weight = match derived.income_bracket {
        IncomeBracket::UpperMiddle | IncomeBracket::MiddleClass => weights.middle_or_upper_income,
        IncomeBracket::LowerMiddle => weights.lower_middle_income,
    };
    add(
        HeuristicFactor::IncomeBracket,
        bracket_weight,
        derived.income_bracket.short_label().to_string(),
    );

    (components, total)
}
