use super::domain::{Education, LoanApplication, LoanCategory};
use super::features;

/// Probability below which an application gets improvement guidance.
pub const STRONG_APPLICATION_FLOOR: f64 = 0.7;
/// Loan-to-income ratio above which a smaller loan is suggested.
pub const HIGH_LOAN_TO_INCOME: f64 = 3.0;

pub const IMPROVE_CREDIT: &str = "Improve your credit history by paying bills on time";
pub const REDUCE_LOAN: &str = "Consider reducing the loan amount or increasing your income";
pub const ADD_COAPPLICANT: &str = "Consider adding a co-applicant to strengthen your application";
pub const UPGRADE_EDUCATION: &str = "Consider educational upgrades to improve your profile";
pub const DOCUMENT_INCOME: &str = "Provide additional documentation to verify stable income";
pub const LOOKS_GOOD: &str = "Your application looks good! You have a high chance of approval.";

/// Turns an application and its approval probability into ordered, user-facing guidance.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationEngine;

impl RecommendationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Always returns at least one message.
    pub fn recommend(&self, application: &LoanApplication, probability: f64) -> Vec<String> {
        let mut recommendations = Vec::new();

        if probability < STRONG_APPLICATION_FLOOR {
            let loan_to_income = features::derive(application).loan_to_income_ratio;

            if !application.has_good_credit() {
                recommendations.push(IMPROVE_CREDIT);
            }
            if loan_to_income > HIGH_LOAN_TO_INCOME {
                recommendations.push(REDUCE_LOAN);
            }
            if application.coapplicant_income_php == 0.0 && application.is_married() {
                recommendations.push(ADD_COAPPLICANT);
            }
            if application.education == Education::HighSchoolVocational {
                recommendations.push(UPGRADE_EDUCATION);
            }
            if application.self_employed.is_self_employed() {
                recommendations.push(DOCUMENT_INCOME);
            }
            recommendations.extend(improvement_hint(&application.loan_category));
        } else {
            recommendations.extend(encouragement(&application.loan_category));
        }

        if recommendations.is_empty() {
            recommendations.push(LOOKS_GOOD);
        }

        recommendations.into_iter().map(str::to_string).collect()
    }
}

/// At most one category tip for applications that need work.
fn improvement_hint(category: &LoanCategory) -> Option<&'static str> {
    match category {
        LoanCategory::EducationalLoan => {
            Some("Consider government scholarship programs or school payment plans")
        }
        LoanCategory::MedicalLoan => {
            Some("Check if your health insurance covers part of the expenses")
        }
        LoanCategory::BusinessLoan => {
            Some("Prepare a detailed business plan and financial projections")
        }
        LoanCategory::Car => Some("Consider certified pre-owned vehicles for better loan terms"),
        LoanCategory::Motorcycle => {
            Some("Look into dealer financing options which may offer competitive rates")
        }
        LoanCategory::HousePurchase
        | LoanCategory::HomeImprovement
        | LoanCategory::PersonalLoan
        | LoanCategory::Other(_) => None,
    }
}

/// At most one category message for strong applications.
fn encouragement(category: &LoanCategory) -> Option<&'static str> {
    match category {
        LoanCategory::HousePurchase => {
            Some("Great! Consider getting pre-approved for faster processing")
        }
        LoanCategory::BusinessLoan => {
            Some("Excellent! Prepare your business plan and financial projections")
        }
        LoanCategory::EducationalLoan => {
            Some("Perfect! Education is a great investment for your future")
        }
        LoanCategory::HomeImprovement => {
            Some("Good choice! Home improvements can increase your property value")
        }
        LoanCategory::Car
        | LoanCategory::Motorcycle
        | LoanCategory::PersonalLoan
        | LoanCategory::MedicalLoan
        | LoanCategory::Other(_) => None,
    }
}
