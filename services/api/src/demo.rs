use crate::infra::{
    seed_demo_marketplace, InMemoryProfileRepository, InMemoryReviewRepository,
    InMemoryScoreRecordRepository,
};
use clap::Args;
use provider_trust::config::AppConfig;
use provider_trust::error::AppError;
use provider_trust::trust::{
    FactorKind, Lexicon, ProfileId, ProviderProfile, Review, ReviewId, ScoreCalculator,
    ScoreResult, SentimentClassifier, TrustScoreService, TrustServiceError, VerificationStatus,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ClassifyArgs {
    /// Review comment to classify
    pub(crate) text: String,
    /// AFINN-format lexicon to use instead of the configured one
    #[arg(long)]
    pub(crate) lexicon: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON snapshot with a `profile` object and its `reviews`
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// AFINN-format lexicon to use instead of the configured one
    #[arg(long)]
    pub(crate) lexicon: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// AFINN-format lexicon to use instead of the configured one
    #[arg(long)]
    pub(crate) lexicon: Option<PathBuf>,
    /// Print the stored score record of every provider as JSON after the table
    #[arg(long)]
    pub(crate) records: bool,
}

/// Input accepted by `score --input`.
#[derive(Debug, Deserialize)]
pub(crate) struct ProfileSnapshot {
    pub(crate) profile: ProviderProfile,
    #[serde(default)]
    pub(crate) reviews: Vec<Review>,
}

type DemoService = TrustScoreService<
    InMemoryProfileRepository,
    InMemoryReviewRepository,
    InMemoryScoreRecordRepository,
>;

fn load_lexicon(override_path: Option<PathBuf>) -> Result<Arc<Lexicon>, AppError> {
    let lexicon = match override_path {
        Some(path) => Lexicon::from_path(path)?,
        None => AppConfig::load()?.sentiment.lexicon()?,
    };
    Ok(Arc::new(lexicon))
}

pub(crate) fn run_classify(args: ClassifyArgs) -> Result<(), AppError> {
    let classifier = SentimentClassifier::new(load_lexicon(args.lexicon)?);
    let analysis = classifier.classify(&args.text);
    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let calculator = ScoreCalculator::new(SentimentClassifier::new(load_lexicon(args.lexicon)?));
    let result = score_snapshot_file(&calculator, &args.input)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub(crate) fn score_snapshot_file(
    calculator: &ScoreCalculator,
    path: &Path,
) -> Result<ScoreResult, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let snapshot: ProfileSnapshot = serde_json::from_str(&raw)?;
    Ok(calculator.compute(&snapshot.profile, &snapshot.reviews))
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { lexicon, records } = args;

    let profiles = Arc::new(InMemoryProfileRepository::default());
    let reviews = Arc::new(InMemoryReviewRepository::default());
    let score_records = Arc::new(InMemoryScoreRecordRepository::default());
    let service: DemoService = TrustScoreService::new(
        profiles.clone(),
        reviews.clone(),
        score_records.clone(),
        load_lexicon(lexicon)?,
    );

    println!("Provider trust demo");
    let ids = seed_demo_marketplace(profiles.as_ref(), reviews.as_ref())
        .map_err(TrustServiceError::from)?;
    println!("Seeded {} providers with unlabelled reviews", ids.len());

    println!("\nInitial sentiment pass");
    for id in &ids {
        let report = service.reanalyze_reviews(id)?;
        println!(
            "- {}: {} commented reviews, {} labels written -> {} ({})",
            id, report.analyzed, report.relabeled, report.result.score, report.result.status
        );
    }

    let ravi = ProfileId("cook-ravi".to_string());
    println!("\nNew review for {ravi}");
    let after_review = service.submit_review(Review {
        id: ReviewId("rev-100".to_string()),
        profile_id: ravi.clone(),
        comment: Some("Wonderful meals, thorough and careful with allergies.".to_string()),
        rating: 5,
        sentiment: None,
    })?;
    println!("- score {} ({})", after_review.score, after_review.status);

    println!("\nAdmin verification for {ravi}");
    let after_verification =
        service.set_verification_status(&ravi, VerificationStatus::Verified)?;
    println!(
        "- score {} ({})",
        after_verification.score, after_verification.status
    );

    println!("\nCurrent trust scores");
    print_table_header();
    for id in &ids {
        let record = service.score_record(id)?;
        print_table_row(id, &record.result());
    }

    if records {
        println!("\nStored score records");
        for id in &ids {
            let record = service.score_record(id)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }

    Ok(())
}

fn print_table_header() {
    let columns: Vec<String> = FactorKind::ALL
        .iter()
        .map(|kind| format!("{:>20}", kind.key()))
        .collect();
    println!(
        "{:<14} {:>5} {:<13}{}",
        "profile",
        "score",
        "status",
        columns.join("")
    );
}

fn print_table_row(id: &ProfileId, result: &ScoreResult) {
    let columns: Vec<String> = result
        .factors
        .entries()
        .iter()
        .map(|(kind, points)| {
            let cell = format!("{:.2}/{:.0}", points, kind.max_points());
            format!("{cell:>20}")
        })
        .collect();
    println!(
        "{:<14} {:>5} {:<13}{}",
        id.to_string(),
        result.score,
        result.status.label(),
        columns.join("")
    );
}
