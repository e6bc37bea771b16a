use super::common::{application, struggling_application};
use crate::underwriting::domain::{
    Education, LoanCategory, MaritalStatus, SelfEmployment,
};
use crate::underwriting::recommendations::{
    RecommendationEngine, ADD_COAPPLICANT, DOCUMENT_INCOME, IMPROVE_CREDIT, LOOKS_GOOD,
    REDUCE_LOAN, UPGRADE_EDUCATION,
};

const ALL_CATEGORIES: [&str; 9] = [
    "House Purchase",
    "Home Improvement",
    "Car",
    "Motorcycle",
    "Personal Loan",
    "Educational Loan",
    "Medical Loan",
    "Business Loan",
    "Wedding Loan",
];

#[test]
fn strong_house_purchase_gets_only_the_preapproval_tip() {
    let messages = RecommendationEngine::new().recommend(&application(), 0.85);

    assert_eq!(
        messages,
        vec!["Great! Consider getting pre-approved for faster processing".to_string()]
    );
}

#[test]
fn floor_probability_counts_as_strong() {
    let mut app = application();
    app.loan_category = LoanCategory::HomeImprovement;

    let messages = RecommendationEngine::new().recommend(&app, 0.7);

    assert_eq!(
        messages,
        vec!["Good choice! Home improvements can increase your property value".to_string()]
    );
}

#[test]
fn weak_application_lists_rules_in_order_then_category_hint() {
    let messages = RecommendationEngine::new().recommend(&struggling_application(), 0.3);

    assert_eq!(
        messages,
        vec![
            IMPROVE_CREDIT.to_string(),
            REDUCE_LOAN.to_string(),
            UPGRADE_EDUCATION.to_string(),
            DOCUMENT_INCOME.to_string(),
            "Look into dealer financing options which may offer competitive rates".to_string(),
        ]
    );
}

#[test]
fn married_applicant_without_coapplicant_is_told_to_add_one() {
    let mut app = application();
    app.coapplicant_income_php = 0.0;
    app.marital_status = MaritalStatus::Married;

    let messages = RecommendationEngine::new().recommend(&app, 0.5);

    assert!(messages.contains(&ADD_COAPPLICANT.to_string()));
    assert!(!messages.contains(&IMPROVE_CREDIT.to_string()));
}

#[test]
fn weak_profile_with_no_triggered_rule_gets_fallback() {
    let mut app = application();
    app.marital_status = MaritalStatus::Single;
    app.education = Education::CollegeGraduate;
    app.self_employed = SelfEmployment::Employed;
    app.loan_category = LoanCategory::PersonalLoan;

    let messages = RecommendationEngine::new().recommend(&app, 0.4);

    assert_eq!(messages, vec![LOOKS_GOOD.to_string()]);
}

#[test]
fn strong_category_without_message_gets_fallback() {
    let mut app = application();
    app.loan_category = LoanCategory::Car;

    let messages = RecommendationEngine::new().recommend(&app, 0.95);

    assert_eq!(messages, vec![LOOKS_GOOD.to_string()]);
}

#[test]
fn at_most_one_category_message_and_never_empty() {
    let engine = RecommendationEngine::new();
    let generic = [
        IMPROVE_CREDIT,
        REDUCE_LOAN,
        ADD_COAPPLICANT,
        UPGRADE_EDUCATION,
        DOCUMENT_INCOME,
        LOOKS_GOOD,
    ];

    for category in ALL_CATEGORIES {
        for probability in [0.1, 0.69, 0.7, 0.99] {
            for base in [application(), struggling_application()] {
                let mut app = base;
                app.loan_category = LoanCategory::from(category);

                let messages = engine.recommend(&app, probability);

                assert!(!messages.is_empty(), "{category} at {probability}");
                let category_specific = messages
                    .iter()
                    .filter(|message| !generic.contains(&message.as_str()))
                    .count();
                assert!(category_specific <= 1, "{category} at {probability}: {messages:?}");
            }
        }
    }
}

#[test]
fn unrecognised_answers_trigger_no_profile_rules() {
    let mut app = struggling_application();
    app.education = Education::from("Postgraduate");
    app.self_employed = SelfEmployment::from("Contractual");
    app.marital_status = MaritalStatus::from("Widowed");

    let messages = RecommendationEngine::new().recommend(&app, 0.3);

    assert!(!messages.contains(&UPGRADE_EDUCATION.to_string()));
    assert!(!messages.contains(&DOCUMENT_INCOME.to_string()));
    assert!(!messages.contains(&ADD_COAPPLICANT.to_string()));
    assert_eq!(messages[0], IMPROVE_CREDIT);
}
