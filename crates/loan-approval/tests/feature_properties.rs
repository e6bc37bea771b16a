use loan_approval::underwriting::{
    features, normalize_dependents, Education, Gender, IncomeBracket, LoanApplication,
    LoanCategory, MaritalStatus, PropertyArea, RecommendationEngine, RiskTier, SelfEmployment,
};
use proptest::prelude::*;

const CATEGORIES: [&str; 9] = [
    "House Purchase",
    "Home Improvement",
    "Car",
    "Motorcycle",
    "Personal Loan",
    "Educational Loan",
    "Medical Loan",
    "Business Loan",
    "Travel Loan",
];

prop_compose! {
    fn arbitrary_application()
        (applicant in 0.0f64..5_000_000.0,
         coapplicant in prop_oneof![Just(0.0f64), 0.0f64..2_000_000.0],
         amount in 1.0f64..20_000_000.0,
         good_credit in any::<bool>(),
         married in any::<bool>(),
         graduate in any::<bool>(),
         self_employed in any::<bool>(),
         dependents in prop::sample::select(vec!["0", "1", "2", "3+"]),
         category in prop::sample::select(CATEGORIES.to_vec()))
        -> LoanApplication
    {
        LoanApplication {
            gender: Gender::Female,
            marital_status: if married { MaritalStatus::Married } else { MaritalStatus::Single },
            dependents: dependents.to_string(),
            education: if graduate { Education::CollegeGraduate } else { Education::HighSchoolVocational },
            self_employed: if self_employed { SelfEmployment::SelfEmployed } else { SelfEmployment::Employed },
            applicant_income_php: applicant,
            coapplicant_income_php: coapplicant,
            loan_amount_php: amount,
            loan_term_days: 360.0,
            credit_history: if good_credit { 1.0 } else { 0.0 },
            property_area: PropertyArea::ProvincialCities,
            loan_category: LoanCategory::from(category),
        }
    }
}

proptest! {
    #[test]
    fn prop_derived_features_are_consistent(app in arbitrary_application()) {
        let derived = features::derive(&app);
        let total = app.applicant_income_php + app.coapplicant_income_php;

        prop_assert_eq!(derived.total_household_income, total);
        if total > 0.0 {
            prop_assert_eq!(derived.loan_to_income_ratio, app.loan_amount_php / total);
        } else {
            prop_assert_eq!(derived.loan_to_income_ratio, 0.0);
        }
        prop_assert_eq!(derived.income_bracket, IncomeBracket::from_total_income(total));
    }

    #[test]
    fn prop_income_brackets_are_monotonic(a in 0.0f64..3_000_000.0, b in 0.0f64..3_000_000.0) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(IncomeBracket::from_total_income(low) <= IncomeBracket::from_total_income(high));
    }

    #[test]
    fn prop_risk_tier_is_monotonic(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        // Low < Medium < High in declaration order, so a higher probability never ranks riskier.
        prop_assert!(RiskTier::from_probability(high) <= RiskTier::from_probability(low));
    }

    #[test]
    fn prop_recommendations_are_never_empty(
        app in arbitrary_application(),
        probability in 0.0f64..=1.0
    ) {
        let messages = RecommendationEngine::new().recommend(&app, probability);
        prop_assert!(!messages.is_empty());
    }

    #[test]
    fn prop_dependents_reject_anything_outside_buckets(raw in "\\PC{0,4}") {
        let trimmed = raw.trim();
        let valid = matches!(trimmed, "0" | "1" | "2" | "3+");
        prop_assert_eq!(normalize_dependents(&raw).is_ok(), valid);
    }
}
