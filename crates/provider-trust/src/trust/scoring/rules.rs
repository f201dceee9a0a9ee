use super::super::domain::{ProviderProfile, Review, SentimentLabel};
use super::super::sentiment::SentimentClassifier;
use super::{FactorBreakdown, FactorKind};

struct DocumentRule {
    admin_verified: bool,
    verified_documents: u8,
    points: f64,
}

/// Document verification points by (admin verified, individually verified documents).
/// Admin verification floors the factor at 30 even when no document flag is set.
const DOCUMENT_RULES: [DocumentRule; 6] = [
    DocumentRule {
        admin_verified: true,
        verified_documents: 2,
        points: 40.0,
    },
    DocumentRule {
        admin_verified: true,
        verified_documents: 1,
        points: 30.0,
    },
    DocumentRule {
        admin_verified: true,
        verified_documents: 0,
        points: 30.0,
    },
    DocumentRule {
        admin_verified: false,
        verified_documents: 2,
        points: 30.0,
    },
    DocumentRule {
        admin_verified: false,
        verified_documents: 1,
        points: 15.0,
    },
    DocumentRule {
        admin_verified: false,
        verified_documents: 0,
        points: 0.0,
    },
];

const EXPERIENCE_SATURATION_YEARS: f64 = 10.0;
const MAX_RATING: f64 = 5.0;

pub(crate) fn score_factors(
    profile: &ProviderProfile,
    reviews: &[Review],
    classifier: &SentimentClassifier,
) -> FactorBreakdown {
    FactorBreakdown {
        document_verification: document_verification(profile),
        review_sentiment: review_sentiment(reviews, classifier),
        rating_average: rating_average(profile),
        experience: experience(profile),
        response_rate: response_rate(profile),
    }
}

pub(crate) fn document_verification(profile: &ProviderProfile) -> f64 {
    let admin_verified = profile.verification_status.is_verified();
    let verified_documents = profile.documents.verified_count();

    DOCUMENT_RULES
        .iter()
        .find(|rule| {
            rule.admin_verified == admin_verified && rule.verified_documents == verified_documents
        })
        .map(|rule| rule.points)
        .unwrap_or(0.0)
}

/// Share of reviews whose comment classifies as positive. Comment-less reviews only
/// count toward the denominator.
pub(crate) fn review_sentiment(reviews: &[Review], classifier: &SentimentClassifier) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }

    let positive = reviews
        .iter()
        .filter_map(Review::comment_text)
        .filter(|comment| classifier.classify(comment).label == SentimentLabel::Positive)
        .count();

    FactorKind::ReviewSentiment.max_points() * positive as f64 / reviews.len() as f64
}

pub(crate) fn rating_average(profile: &ProviderProfile) -> f64 {
    if profile.rating.count == 0 {
        return 0.0;
    }

    let average = finite_or_zero(profile.rating.average).clamp(0.0, MAX_RATING);
    FactorKind::RatingAverage.max_points() * average / MAX_RATING
}

pub(crate) fn experience(profile: &ProviderProfile) -> f64 {
    let years = finite_or_zero(profile.experience_years).max(0.0);
    let max = FactorKind::Experience.max_points();
    (max * years / EXPERIENCE_SATURATION_YEARS).min(max)
}

/// Stand-in for a measured responsiveness rate: active providers get full points.
pub(crate) fn response_rate(profile: &ProviderProfile) -> f64 {
    if profile.is_active {
        FactorKind::ResponseRate.max_points()
    } else {
        0.0
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
