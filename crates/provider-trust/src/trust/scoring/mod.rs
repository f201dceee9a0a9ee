mod policy;
mod rules;

pub use policy::{apply_verification_floor, derive_status, TRUSTED_THRESHOLD, VERIFIED_THRESHOLD};

use serde::{Deserialize, Serialize};

use super::domain::{ProviderProfile, Review, TrustStatus};
use super::sentiment::SentimentClassifier;

/// Stateless calculator that turns a profile snapshot and its reviews into a trust score.
#[derive(Debug, Clone)]
pub struct ScoreCalculator {
    classifier: SentimentClassifier,
}

impl ScoreCalculator {
    pub fn new(classifier: SentimentClassifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &SentimentClassifier {
        &self.classifier
    }

    /// Factor points only, before rounding, flooring and clamping.
    pub fn factors(&self, profile: &ProviderProfile, reviews: &[Review]) -> FactorBreakdown {
        rules::score_factors(profile, reviews, &self.classifier)
    }

    pub fn compute(&self, profile: &ProviderProfile, reviews: &[Review]) -> ScoreResult {
        let factors = self.factors(profile, reviews);
        let (score, status) = policy::finalize(factors.total(), profile.verification_status);

        ScoreResult {
            score,
            status,
            factors,
        }
    }
}

/// Named contributors to the trust score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FactorKind {
    DocumentVerification,
    ReviewSentiment,
    RatingAverage,
    Experience,
    ResponseRate,
}

impl FactorKind {
    pub const ALL: [FactorKind; 5] = [
        FactorKind::DocumentVerification,
        FactorKind::ReviewSentiment,
        FactorKind::RatingAverage,
        FactorKind::Experience,
        FactorKind::ResponseRate,
    ];

    /// Upper bound of the points this factor can contribute.
    pub const fn max_points(self) -> f64 {
        match self {
            FactorKind::DocumentVerification => 40.0,
            FactorKind::ReviewSentiment => 25.0,
            FactorKind::RatingAverage => 25.0,
            FactorKind::Experience => 10.0,
            FactorKind::ResponseRate => 10.0,
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            FactorKind::DocumentVerification => "documentVerification",
            FactorKind::ReviewSentiment => "reviewSentiment",
            FactorKind::RatingAverage => "ratingAverage",
            FactorKind::Experience => "experience",
            FactorKind::ResponseRate => "responseRate",
        }
    }
}

/// Points awarded per factor, kept unrounded for audit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorBreakdown {
    pub document_verification: f64,
    pub review_sentiment: f64,
    pub rating_average: f64,
    pub experience: f64,
    pub response_rate: f64,
}

impl FactorBreakdown {
    pub fn get(&self, kind: FactorKind) -> f64 {
        match kind {
            FactorKind::DocumentVerification => self.document_verification,
            FactorKind::ReviewSentiment => self.review_sentiment,
            FactorKind::RatingAverage => self.rating_average,
            FactorKind::Experience => self.experience,
            FactorKind::ResponseRate => self.response_rate,
        }
    }

    pub fn entries(&self) -> [(FactorKind, f64); 5] {
        FactorKind::ALL.map(|kind| (kind, self.get(kind)))
    }

    /// Raw arithmetic sum of all factors.
    pub fn total(&self) -> f64 {
        self.entries().iter().map(|(_, points)| points).sum()
    }
}

/// Score, status and breakdown produced for one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: u8,
    pub status: TrustStatus,
    pub factors: FactorBreakdown,
}
