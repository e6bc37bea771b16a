use clap::Args;
use loan_approval::config::AppConfig;
use loan_approval::error::AppError;
use loan_approval::underwriting::{
    load_context, write_labeled, ApprovalHeuristicScorer, LoanApplication, LoanDataset,
    PredictionService, DEFAULT_LABEL_SEED,
};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct LabelsArgs {
    /// Historical applications CSV without outcomes
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Destination for the labelled CSV
    #[arg(long)]
    pub(crate) output: PathBuf,
    /// Seed for the label noise generator
    #[arg(long, default_value_t = DEFAULT_LABEL_SEED)]
    pub(crate) seed: u64,
    /// Also write the fitted category vocabularies as JSON
    #[arg(long)]
    pub(crate) encoders: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    /// JSON file holding one loan application
    #[arg(long)]
    pub(crate) application: PathBuf,
    /// Model artifact to score with (defaults to LOAN_MODEL_ARTIFACT)
    #[arg(long)]
    pub(crate) artifact: Option<PathBuf>,
}

/// Summary of a labelling pass, printed once the CSV is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LabelSummary {
    pub(crate) records: usize,
    pub(crate) approved: usize,
}

pub(crate) fn run_labels(args: LabelsArgs) -> Result<(), AppError> {
    let summary = write_labels(&args)?;

    println!("Labelled {} applications", summary.records);
    println!(
        "  Approved: {} / Rejected: {}",
        summary.approved,
        summary.records - summary.approved
    );
    println!("  Seed: {}", args.seed);
    println!("  Output: {}", args.output.display());
    if let Some(path) = &args.encoders {
        println!("  Encoders: {}", path.display());
    }
    Ok(())
}

fn write_labels(args: &LabelsArgs) -> Result<LabelSummary, AppError> {
    let dataset = LoanDataset::from_path(&args.input)?;
    let labeled = dataset.synthesize_labels(&ApprovalHeuristicScorer::default(), args.seed);

    write_labeled(BufWriter::new(File::create(&args.output)?), &labeled)?;

    if let Some(path) = &args.encoders {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &dataset.fit_encoders())?;
    }

    Ok(LabelSummary {
        records: labeled.len(),
        approved: labeled.iter().filter(|record| record.outcome.approved).count(),
    })
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let artifact_path = match args.artifact {
        Some(path) => path,
        None => AppConfig::load()?.model.artifact_path,
    };

    let service = PredictionService::new(Arc::new(load_context(&artifact_path)?));
    let application: LoanApplication =
        serde_json::from_reader(BufReader::new(File::open(&args.application)?))?;
    let result = service.predict(&application)?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CSV: &str = "\
Gender,Marital_Status,Dependents,Education,Self_Employed,Applicant_Income_PHP,Coapplicant_Income_PHP,Loan_Amount_PHP,Loan_Term_Days,Credit_History,Property_Area,Loan_Category
Lalaki,Kasal,2,College Graduate,No,800000,300000,1500000,360,1,Metro Manila,House Purchase
Babae,Single,0,High School/Vocational,Yes,250000,0,800000,360,0,Rural Provinces,Motorcycle
";

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("loan-approval-{}-{name}", std::process::id()))
    }

    #[test]
    fn labels_and_encoders_are_written() {
        let input = scratch("input.csv");
        let output = scratch("labelled.csv");
        let encoders = scratch("encoders.json");
        fs::write(&input, CSV).expect("input written");

        let summary = write_labels(&LabelsArgs {
            input: input.clone(),
            output: output.clone(),
            seed: DEFAULT_LABEL_SEED,
            encoders: Some(encoders.clone()),
        })
        .expect("labels written");

        assert_eq!(summary.records, 2);
        let labelled = fs::read_to_string(&output).expect("output readable");
        assert!(labelled.lines().next().is_some_and(|header| header.ends_with("Loan_Status")));
        let vocabularies: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&encoders).expect("encoders readable"))
                .expect("encoders json");
        assert_eq!(vocabularies["Gender"], serde_json::json!(["Babae", "Lalaki"]));

        for path in [input, output, encoders] {
            let _ = fs::remove_file(path);
        }
    }

    #[test]
    fn missing_input_is_reported() {
        let error = write_labels(&LabelsArgs {
            input: scratch("absent.csv"),
            output: scratch("never.csv"),
            seed: DEFAULT_LABEL_SEED,
            encoders: None,
        })
        .expect_err("missing input rejected");

        assert!(matches!(error, AppError::Dataset(_)));
    }
}
