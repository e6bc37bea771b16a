use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::LoanApplication;
use super::features::{self, DerivedFeatures};

/// Index returned for category values missing from the training vocabulary.
pub const FALLBACK_INDEX: u32 = 0;

/// Counter incremented every time a value degrades to [`FALLBACK_INDEX`].
pub const FALLBACK_COUNTER: &str = "loan_encoder_fallback_total";

/// Categorical fields encoded before classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CategoryField {
    #[serde(rename = "Gender")]
    Gender,
    #[serde(rename = "Marital_Status")]
    MaritalStatus,
    #[serde(rename = "Education")]
    Education,
    #[serde(rename = "Self_Employed")]
    SelfEmployed,
    #[serde(rename = "Property_Area")]
    PropertyArea,
    #[serde(rename = "Income_Category")]
    IncomeCategory,
    #[serde(rename = "Loan_Category")]
    LoanCategory,
}

impl CategoryField {
    pub const ALL: [CategoryField; 7] = [
        CategoryField::Gender,
        CategoryField::MaritalStatus,
        CategoryField::Education,
        CategoryField::SelfEmployed,
        CategoryField::PropertyArea,
        CategoryField::IncomeCategory,
        CategoryField::LoanCategory,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            CategoryField::Gender => "Gender",
            CategoryField::MaritalStatus => "Marital_Status",
            CategoryField::Education => "Education",
            CategoryField::SelfEmployed => "Self_Employed",
            CategoryField::PropertyArea => "Property_Area",
            CategoryField::IncomeCategory => "Income_Category",
            CategoryField::LoanCategory => "Loan_Category",
        }
    }

    /// Raw string this field takes for the given application.
    pub fn value_of<'a>(self, application: &'a LoanApplication, derived: &DerivedFeatures) -> &'a str {
        match self {
            CategoryField::Gender => application.gender.label(),
            CategoryField::MaritalStatus => application.marital_status.label(),
            CategoryField::Education => application.education.label(),
            CategoryField::SelfEmployed => application.self_employed.label(),
            CategoryField::PropertyArea => application.property_area.label(),
            CategoryField::IncomeCategory => derived.income_bracket.label(),
            CategoryField::LoanCategory => application.loan_category.label(),
        }
    }
}

/// Result of a vocabulary lookup that never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedValue {
    pub index: u32,
    pub fell_back: bool,
}

/// Ordered class list for one field, fixed at training time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    classes: Vec<String>,
    index: HashMap<String, u32>,
}

impl Vocabulary {
    /// Builds the induced string-to-index mapping. A repeated class keeps its first position.
    pub fn new(classes: Vec<String>) -> Self {
        let mut index = HashMap::with_capacity(classes.len());
        for (position, class) in classes.iter().enumerate() {
            index.entry(class.clone()).or_insert(position as u32);
        }
        Self { classes, index }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn lookup(&self, value: &str) -> Option<u32> {
        self.index.get(value).copied()
    }

    pub fn lookup_or_fallback(&self, value: &str) -> EncodedValue {
        match self.lookup(value) {
            Some(index) => EncodedValue {
                index,
                fell_back: false,
            },
            None => EncodedValue {
                index: FALLBACK_INDEX,
                fell_back: true,
            },
        }
    }
}

impl From<Vec<String>> for Vocabulary {
    fn from(classes: Vec<String>) -> Self {
        Self::new(classes)
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocabulary: Vocabulary) -> Self {
        vocabulary.classes
    }
}

/// Per-field vocabularies shared read-only by every request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncoderRegistry {
    vocabularies: BTreeMap<CategoryField, Vocabulary>,
}

impl EncoderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vocabulary<I, S>(mut self, field: CategoryField, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(field, classes);
        self
    }

    pub fn insert<I, S>(&mut self, field: CategoryField, classes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let classes = classes.into_iter().map(Into::into).collect();
        self.vocabularies.insert(field, Vocabulary::new(classes));
    }

    /// Fits one sorted, de-duplicated vocabulary per field over a training set.
    pub fn fit<'a, I>(applications: I) -> Self
    where
        I: IntoIterator<Item = &'a LoanApplication>,
    {
        let mut seen: BTreeMap<CategoryField, BTreeSet<String>> = BTreeMap::new();

        for application in applications {
            let derived = features::derive(application);
            for field in CategoryField::ALL {
                seen.entry(field)
                    .or_default()
                    .insert(field.value_of(application, &derived).to_string());
            }
        }

        let vocabularies = seen
            .into_iter()
            .map(|(field, classes)| (field, Vocabulary::new(classes.into_iter().collect())))
            .collect();

        Self { vocabularies }
    }

    pub fn vocabulary(&self, field: CategoryField) -> Option<&Vocabulary> {
        self.vocabularies.get(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = CategoryField> + '_ {
        self.vocabularies.keys().copied()
    }

    /// Looks a value up without side effects. A field with no vocabulary falls back too.
    pub fn lookup_or_fallback(&self, field: CategoryField, value: &str) -> EncodedValue {
        match self.vocabulary(field) {
            Some(vocabulary) => vocabulary.lookup_or_fallback(value),
            None => EncodedValue {
                index: FALLBACK_INDEX,
                fell_back: true,
            },
        }
    }

    /// Encodes a value, reporting every fallback as a warning and a counter increment.
    pub fn encode(&self, field: CategoryField, value: &str) -> u32 {
        let encoded = self.lookup_or_fallback(field, value);
        if encoded.fell_back {
            warn!(
                field = field.name(),
                value,
                "unseen category value, using fallback index"
            );
            metrics::counter!(FALLBACK_COUNTER, "field" => field.name()).increment(1);
        }
        encoded.index
    }
}
