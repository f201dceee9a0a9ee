//! Trust scoring core: sentiment classification, multi-factor scoring and the service that
//! keeps stored sentiment labels and scores consistent as reviews arrive.

pub mod domain;
mod locks;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod sentiment;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    CachedTrustScore, DocumentFlag, ProfileDocuments, ProfileId, ProviderProfile, RatingSummary,
    Review, ReviewId, SentimentLabel, TrustStatus, VerificationStatus,
};
pub use repository::{
    ProfileRepository, RepositoryError, ReviewRepository, ScoreRecord, ScoreRecordRepository,
};
pub use router::trust_router;
pub use scoring::{FactorBreakdown, FactorKind, ScoreCalculator, ScoreResult};
pub use sentiment::{Lexicon, LexiconError, SentimentAnalysis, SentimentClassifier};
pub use service::{ReanalysisReport, TrustScoreService, TrustServiceError};
