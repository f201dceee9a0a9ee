use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use axum::response::Response;
use serde_json::Value;

use crate::trust::domain::{
    ProfileDocuments, ProfileId, ProviderProfile, RatingSummary, Review, ReviewId,
    VerificationStatus,
};
use crate::trust::repository::{
    ProfileRepository, RepositoryError, ReviewRepository, ScoreRecord, ScoreRecordRepository,
};
use crate::trust::scoring::ScoreCalculator;
use crate::trust::sentiment::{Lexicon, SentimentClassifier};
use crate::trust::{trust_router, TrustScoreService};

use super::household::HOUSEHOLD_ENTRIES;

pub(super) const POSITIVE_RELIABLE: &str = "Excellent work, very reliable and punctual.";
pub(super) const POSITIVE_ON_TIME: &str = "Great service, always on time.";
pub(super) const POSITIVE_HONEST: &str = "She was kind and honest.";
pub(super) const NEGATIVE_CARELESS: &str = "Rude and careless with the furniture.";
pub(super) const NEUTRAL_SCHEDULE: &str = "Arrived on schedule.";

pub(super) fn lexicon() -> Arc<Lexicon> {
    Arc::new(Lexicon::from_entries(
        HOUSEHOLD_ENTRIES
            .iter()
            .map(|(word, weight)| ((*word).to_string(), *weight)),
    ))
}

pub(super) fn classifier() -> SentimentClassifier {
    SentimentClassifier::new(lexicon())
}

pub(super) fn calculator() -> ScoreCalculator {
    ScoreCalculator::new(classifier())
}

/// Unverified, inactive profile with no documents, ratings or experience.
pub(super) fn blank_profile(id: &str) -> ProviderProfile {
    ProviderProfile {
        id: ProfileId(id.to_string()),
        verification_status: VerificationStatus::Unverified,
        documents: ProfileDocuments::new(false, false),
        rating: RatingSummary {
            average: 0.0,
            count: 0,
        },
        experience_years: 0.0,
        is_active: false,
        trust_score: None,
    }
}

/// Verified, active profile with both documents and a strong rating.
pub(super) fn established_profile(id: &str) -> ProviderProfile {
    ProviderProfile {
        verification_status: VerificationStatus::Verified,
        documents: ProfileDocuments::new(true, true),
        rating: RatingSummary {
            average: 4.6,
            count: 38,
        },
        experience_years: 7.0,
        is_active: true,
        ..blank_profile(id)
    }
}

pub(super) fn review(profile_id: &str, seq: usize, comment: Option<&str>) -> Review {
    Review {
        id: ReviewId(format!("{profile_id}-r{seq}")),
        profile_id: ProfileId(profile_id.to_string()),
        comment: comment.map(str::to_string),
        rating: 4,
        sentiment: None,
    }
}

/// Three positive comments and one negative one.
pub(super) fn mixed_reviews(profile_id: &str) -> Vec<Review> {
    vec![
        review(profile_id, 1, Some(POSITIVE_RELIABLE)),
        review(profile_id, 2, Some(POSITIVE_ON_TIME)),
        review(profile_id, 3, Some(POSITIVE_HONEST)),
        review(profile_id, 4, Some(NEGATIVE_CARELESS)),
    ]
}

pub(super) type MemoryService = TrustScoreService<MemoryProfiles, MemoryReviews, MemoryRecords>;

pub(super) struct Harness {
    pub(super) service: MemoryService,
    pub(super) profiles: Arc<MemoryProfiles>,
    pub(super) reviews: Arc<MemoryReviews>,
    pub(super) records: Arc<MemoryRecords>,
}

pub(super) fn harness(profiles: Vec<ProviderProfile>, reviews: Vec<Review>) -> Harness {
    let profiles = Arc::new(MemoryProfiles::with(profiles));
    let reviews = Arc::new(MemoryReviews::with(reviews));
    let records = Arc::new(MemoryRecords::default());
    let service = TrustScoreService::new(
        profiles.clone(),
        reviews.clone(),
        records.clone(),
        lexicon(),
    );
    Harness {
        service,
        profiles,
        reviews,
        records,
    }
}

pub(super) fn router_with(harness: Harness) -> axum::Router {
    trust_router(Arc::new(harness.service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[derive(Default)]
pub(super) struct MemoryProfiles {
    profiles: Mutex<HashMap<ProfileId, ProviderProfile>>,
}

impl MemoryProfiles {
    pub(super) fn with(profiles: Vec<ProviderProfile>) -> Self {
        Self {
            profiles: Mutex::new(
                profiles
                    .into_iter()
                    .map(|profile| (profile.id.clone(), profile))
                    .collect(),
            ),
        }
    }

    pub(super) fn get(&self, id: &str) -> Option<ProviderProfile> {
        self.profiles
            .lock()
            .expect("profile mutex poisoned")
            .get(&ProfileId(id.to_string()))
            .cloned()
    }
}

impl ProfileRepository for MemoryProfiles {
    fn fetch(&self, id: &ProfileId) -> Result<Option<ProviderProfile>, RepositoryError> {
        Ok(self
            .profiles
            .lock()
            .expect("profile mutex poisoned")
            .get(id)
            .cloned())
    }

    fn save(&self, profile: ProviderProfile) -> Result<(), RepositoryError> {
        self.profiles
            .lock()
            .expect("profile mutex poisoned")
            .insert(profile.id.clone(), profile);
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct MemoryReviews {
    reviews: Mutex<Vec<Review>>,
    saves: AtomicUsize,
}

impl MemoryReviews {
    pub(super) fn with(reviews: Vec<Review>) -> Self {
        Self {
            reviews: Mutex::new(reviews),
            saves: AtomicUsize::new(0),
        }
    }

    pub(super) fn all(&self) -> Vec<Review> {
        self.reviews.lock().expect("review mutex poisoned").clone()
    }

    pub(super) fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl ReviewRepository for MemoryReviews {
    fn find_by_profile(&self, id: &ProfileId) -> Result<Vec<Review>, RepositoryError> {
        Ok(self
            .reviews
            .lock()
            .expect("review mutex poisoned")
            .iter()
            .filter(|review| &review.profile_id == id)
            .cloned()
            .collect())
    }

    fn save(&self, review: Review) -> Result<(), RepositoryError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        let mut reviews = self.reviews.lock().expect("review mutex poisoned");
        match reviews.iter_mut().find(|existing| existing.id == review.id) {
            Some(existing) => *existing = review,
            None => reviews.push(review),
        }
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct MemoryRecords {
    records: Mutex<HashMap<ProfileId, ScoreRecord>>,
    writes: AtomicUsize,
}

impl MemoryRecords {
    pub(super) fn get(&self, id: &str) -> Option<ScoreRecord> {
        self.records
            .lock()
            .expect("record mutex poisoned")
            .get(&ProfileId(id.to_string()))
            .cloned()
    }

    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("record mutex poisoned").len()
    }

    pub(super) fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl ScoreRecordRepository for MemoryRecords {
    fn upsert_by_profile(
        &self,
        id: &ProfileId,
        record: ScoreRecord,
    ) -> Result<(), RepositoryError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.records
            .lock()
            .expect("record mutex poisoned")
            .insert(id.clone(), record);
        Ok(())
    }

    fn fetch_by_profile(&self, id: &ProfileId) -> Result<Option<ScoreRecord>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("record mutex poisoned")
            .get(id)
            .cloned())
    }
}

/// Review store whose writes always fail.
pub(super) struct ReadOnlyReviews(pub(super) Vec<Review>);

impl ReviewRepository for ReadOnlyReviews {
    fn find_by_profile(&self, id: &ProfileId) -> Result<Vec<Review>, RepositoryError> {
        Ok(self
            .0
            .iter()
            .filter(|review| &review.profile_id == id)
            .cloned()
            .collect())
    }

    fn save(&self, _review: Review) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("review store read only".to_string()))
    }
}

/// Profile store that is offline.
pub(super) struct UnavailableProfiles;

impl ProfileRepository for UnavailableProfiles {
    fn fetch(&self, _id: &ProfileId) -> Result<Option<ProviderProfile>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn save(&self, _profile: ProviderProfile) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Profile store that records how many load → save pipelines overlap.
pub(super) struct OverlapTrackingProfiles {
    inner: MemoryProfiles,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl OverlapTrackingProfiles {
    pub(super) fn with(profiles: Vec<ProviderProfile>) -> Self {
        Self {
            inner: MemoryProfiles::with(profiles),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub(super) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl ProfileRepository for OverlapTrackingProfiles {
    fn fetch(&self, id: &ProfileId) -> Result<Option<ProviderProfile>, RepositoryError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(2));
        self.inner.fetch(id)
    }

    fn save(&self, profile: ProviderProfile) -> Result<(), RepositoryError> {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.inner.save(profile)
    }
}
