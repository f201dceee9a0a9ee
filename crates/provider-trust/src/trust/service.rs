use std::sync::Arc;

use chrono::Utc;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{
    CachedTrustScore, ProfileId, ProviderProfile, Review, ReviewId, VerificationStatus,
};
use super::locks::ProfileLocks;
use super::repository::{
    ProfileRepository, RepositoryError, ReviewRepository, ScoreRecord, ScoreRecordRepository,
};
use super::scoring::{ScoreCalculator, ScoreResult};
use super::sentiment::{Lexicon, SentimentClassifier};

/// Service keeping review sentiment, the cached profile score and the score record in step.
///
/// Every entry point runs under a per-profile lock, so two recomputations for the same
/// profile never interleave their reads and writes.
pub struct TrustScoreService<P, R, S> {
    profiles: Arc<P>,
    reviews: Arc<R>,
    records: Arc<S>,
    calculator: Arc<ScoreCalculator>,
    locks: ProfileLocks,
}

impl<P, R, S> TrustScoreService<P, R, S>
where
    P: ProfileRepository + 'static,
    R: ReviewRepository + 'static,
    S: ScoreRecordRepository + 'static,
{
    pub fn new(profiles: Arc<P>, reviews: Arc<R>, records: Arc<S>, lexicon: Arc<Lexicon>) -> Self {
        let calculator = ScoreCalculator::new(SentimentClassifier::new(lexicon));
        Self::with_calculator(profiles, reviews, records, Arc::new(calculator))
    }

    pub fn with_calculator(
        profiles: Arc<P>,
        reviews: Arc<R>,
        records: Arc<S>,
        calculator: Arc<ScoreCalculator>,
    ) -> Self {
        Self {
            profiles,
            reviews,
            records,
            calculator,
            locks: ProfileLocks::default(),
        }
    }

    pub fn calculator(&self) -> &ScoreCalculator {
        &self.calculator
    }

    pub fn classifier(&self) -> &SentimentClassifier {
        self.calculator.classifier()
    }

    /// Recompute the profile's score from its current reviews and persist it to both the
    /// profile cache and the score record.
    pub fn refresh_profile_score(
        &self,
        profile_id: &ProfileId,
    ) -> Result<ScoreResult, TrustServiceError> {
        self.locks.with_profile(profile_id, || {
            let profile = self.load_profile(profile_id)?;
            self.recompute(profile)
        })
    }

    /// Relabel every commented review and clear labels left on reviews without a comment,
    /// then refresh the score once the whole batch is stored.
    ///
    /// The first repository error aborts the batch before the refresh runs; labels already
    /// written stay in place and a retry converges on the same state.
    pub fn reanalyze_reviews(
        &self,
        profile_id: &ProfileId,
    ) -> Result<ReanalysisReport, TrustServiceError> {
        self.locks.with_profile(profile_id, || {
            let profile = self.load_profile(profile_id)?;
            let reviews = self.reviews.find_by_profile(profile_id)?;
            let analyzed = reviews
                .iter()
                .filter(|review| review.comment_text().is_some())
                .count();

            let classifier = self.calculator.classifier();
            let relabeled: Vec<Review> = reviews
                .into_par_iter()
                .filter_map(|mut review| {
                    let label = review
                        .comment_text()
                        .map(|comment| classifier.classify(comment).label);
                    if review.sentiment == label {
                        return None;
                    }
                    review.sentiment = label;
                    Some(review)
                })
                .collect();

            let changed = relabeled.len();
            for review in relabeled {
                self.reviews.save(review)?;
            }
            debug!(%profile_id, analyzed, changed, "review sentiment reanalyzed");

            let result = self.recompute(profile)?;
            Ok(ReanalysisReport {
                profile_id: profile_id.clone(),
                analyzed,
                relabeled: changed,
                result,
            })
        })
    }

    /// Store a newly created review with its sentiment label and refresh the profile score.
    ///
    /// A rating outside `Review::RATING_RANGE` is rejected before anything is stored.
    pub fn submit_review(&self, mut review: Review) -> Result<ScoreResult, TrustServiceError> {
        if !review.has_valid_rating() {
            warn!(review_id = %review.id, rating = review.rating, "review rating out of range");
            return Err(TrustServiceError::InvalidRating {
                review: review.id,
                rating: review.rating,
            });
        }

        let profile_id = review.profile_id.clone();
        self.locks.with_profile(&profile_id, || {
            let profile = self.load_profile(&profile_id)?;
            review.sentiment = review
                .comment_text()
                .map(|comment| self.calculator.classifier().classify(comment).label);
            debug!(%profile_id, review_id = %review.id, sentiment = ?review.sentiment, "review recorded");
            self.reviews.save(review)?;
            self.recompute(profile)
        })
    }

    /// Apply an admin verification decision and refresh the score in the same locked scope.
    pub fn set_verification_status(
        &self,
        profile_id: &ProfileId,
        status: VerificationStatus,
    ) -> Result<ScoreResult, TrustServiceError> {
        self.locks.with_profile(profile_id, || {
            let mut profile = self.load_profile(profile_id)?;
            if profile.verification_status != status {
                info!(
                    %profile_id,
                    from = profile.verification_status.label(),
                    to = status.label(),
                    "verification status changed"
                );
            }
            profile.verification_status = status;
            self.recompute(profile)
        })
    }

    /// The stored score record for a profile.
    pub fn score_record(&self, profile_id: &ProfileId) -> Result<ScoreRecord, TrustServiceError> {
        self.records
            .fetch_by_profile(profile_id)?
            .ok_or_else(|| TrustServiceError::ScoreNotRecorded(profile_id.clone()))
    }

    fn load_profile(&self, profile_id: &ProfileId) -> Result<ProviderProfile, TrustServiceError> {
        match self.profiles.fetch(profile_id) {
            Ok(Some(profile)) => Ok(profile),
            Ok(None) | Err(RepositoryError::NotFound) => {
                warn!(%profile_id, "profile not found");
                Err(TrustServiceError::ProfileNotFound(profile_id.clone()))
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Score the profile against its stored reviews and write both persisted copies.
    /// Callers must hold the profile's lock.
    fn recompute(&self, mut profile: ProviderProfile) -> Result<ScoreResult, TrustServiceError> {
        let profile_id = profile.id.clone();
        let reviews = self.reviews.find_by_profile(&profile_id)?;
        let result = self.calculator.compute(&profile, &reviews);
        debug!(
            %profile_id,
            reviews = reviews.len(),
            raw_total = result.factors.total(),
            "trust score computed"
        );

        let now = Utc::now();
        profile.trust_score = Some(CachedTrustScore {
            score: result.score,
            status: result.status,
            last_updated: now,
        });
        self.profiles.save(profile)?;
        self.records.upsert_by_profile(
            &profile_id,
            ScoreRecord::new(profile_id.clone(), &result, now),
        )?;

        info!(%profile_id, score = result.score, status = %result.status, "trust score refreshed");
        Ok(result)
    }
}

/// Outcome of a bulk sentiment pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReanalysisReport {
    pub profile_id: ProfileId,
    /// Reviews carrying a comment.
    pub analyzed: usize,
    /// Reviews whose stored label changed, or was cleared, and was written back.
    pub relabeled: usize,
    pub result: ScoreResult,
}

/// Error raised by the trust score service.
#[derive(Debug, thiserror::Error)]
pub enum TrustServiceError {
    #[error("profile {0} not found")]
    ProfileNotFound(ProfileId),
    #[error("no trust score recorded for profile {0}")]
    ScoreNotRecorded(ProfileId),
    #[error("review {review} has rating {rating}, expected 1 to 5")]
    InvalidRating { review: ReviewId, rating: u8 },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
