use metrics_exporter_prometheus::PrometheusHandle;
use provider_trust::trust::{
    ProfileDocuments, ProfileId, ProfileRepository, ProviderProfile, RatingSummary,
    RepositoryError, Review, ReviewId, ReviewRepository, ScoreRecord, ScoreRecordRepository,
    VerificationStatus,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn lock<'a, T>(
    mutex: &'a Mutex<T>,
    store: &'static str,
) -> Result<MutexGuard<'a, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable(format!("{store} store lock poisoned")))
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileRepository {
    profiles: Arc<Mutex<HashMap<ProfileId, ProviderProfile>>>,
}

impl ProfileRepository for InMemoryProfileRepository {
    fn fetch(&self, id: &ProfileId) -> Result<Option<ProviderProfile>, RepositoryError> {
        let guard = lock(&self.profiles, "profile")?;
        Ok(guard.get(id).cloned())
    }

    fn save(&self, profile: ProviderProfile) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.profiles, "profile")?;
        guard.insert(profile.id.clone(), profile);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryReviewRepository {
    reviews: Arc<Mutex<HashMap<ProfileId, Vec<Review>>>>,
}

impl ReviewRepository for InMemoryReviewRepository {
    fn find_by_profile(&self, id: &ProfileId) -> Result<Vec<Review>, RepositoryError> {
        let guard = lock(&self.reviews, "review")?;
        Ok(guard.get(id).cloned().unwrap_or_default())
    }

    fn save(&self, review: Review) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.reviews, "review")?;
        let reviews = guard.entry(review.profile_id.clone()).or_default();
        match reviews.iter_mut().find(|existing| existing.id == review.id) {
            Some(existing) => *existing = review,
            None => reviews.push(review),
        }
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryScoreRecordRepository {
    records: Arc<Mutex<HashMap<ProfileId, ScoreRecord>>>,
}

impl ScoreRecordRepository for InMemoryScoreRecordRepository {
    fn upsert_by_profile(
        &self,
        id: &ProfileId,
        record: ScoreRecord,
    ) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.records, "score record")?;
        guard.insert(id.clone(), record);
        Ok(())
    }

    fn fetch_by_profile(&self, id: &ProfileId) -> Result<Option<ScoreRecord>, RepositoryError> {
        let guard = lock(&self.records, "score record")?;
        Ok(guard.get(id).cloned())
    }
}

#[cfg(test)]
impl InMemoryScoreRecordRepository {
    pub(crate) fn len(&self) -> usize {
        self.records.lock().map(|guard| guard.len()).unwrap_or(0)
    }
}

/// Stores the demo marketplace: three providers at different stages of onboarding, with
/// reviews that have not been labelled yet.
pub(crate) fn seed_demo_marketplace<P, R>(
    profiles: &P,
    reviews: &R,
) -> Result<Vec<ProfileId>, RepositoryError>
where
    P: ProfileRepository,
    R: ReviewRepository,
{
    let mut ids = Vec::new();
    for profile in demo_profiles() {
        ids.push(profile.id.clone());
        profiles.save(profile)?;
    }
    for review in demo_reviews() {
        reviews.save(review)?;
    }
    Ok(ids)
}

pub(crate) fn demo_profiles() -> Vec<ProviderProfile> {
    vec![
        ProviderProfile {
            verification_status: VerificationStatus::Verified,
            documents: ProfileDocuments::new(true, true),
            rating: RatingSummary {
                average: 4.8,
                count: 52,
            },
            experience_years: 9.0,
            is_active: true,
            ..ProviderProfile::new(ProfileId("maid-anita".to_string()))
        },
        ProviderProfile {
            verification_status: VerificationStatus::Pending,
            documents: ProfileDocuments::new(true, false),
            rating: RatingSummary {
                average: 4.1,
                count: 12,
            },
            experience_years: 3.0,
            is_active: true,
            ..ProviderProfile::new(ProfileId("cook-ravi".to_string()))
        },
        ProviderProfile {
            verification_status: VerificationStatus::Unverified,
            documents: ProfileDocuments::default(),
            rating: RatingSummary {
                average: 2.9,
                count: 7,
            },
            experience_years: 1.0,
            is_active: false,
            ..ProviderProfile::new(ProfileId("driver-sunil".to_string()))
        },
    ]
}

pub(crate) fn demo_reviews() -> Vec<Review> {
    let entries: [(&str, Option<&str>, u8); 9] = [
        ("maid-anita", Some("Excellent work, very reliable and punctual."), 5),
        ("maid-anita", Some("Spotless kitchen every time, highly recommended."), 5),
        ("maid-anita", Some("Arrived on schedule."), 4),
        ("maid-anita", None, 5),
        ("cook-ravi", Some("Great food and always polite."), 5),
        ("cook-ravi", Some("Sometimes late and the kitchen was messy."), 3),
        ("cook-ravi", Some("Cooked dinner for six."), 4),
        ("driver-sunil", Some("Rude and careless, a complete waste of money."), 1),
        ("driver-sunil", Some(""), 3),
    ];

    entries
        .into_iter()
        .enumerate()
        .map(|(seq, (profile, comment, rating))| Review {
            id: ReviewId(format!("rev-{:03}", seq + 1)),
            profile_id: ProfileId(profile.to_string()),
            comment: comment.map(str::to_string),
            rating,
            sentiment: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_saves_replace_by_id() {
        let repository = InMemoryReviewRepository::default();
        let mut review = demo_reviews().remove(0);
        repository.save(review.clone()).expect("first save");
        review.comment = Some("Edited".to_string());
        repository.save(review.clone()).expect("second save");

        let stored = repository
            .find_by_profile(&review.profile_id)
            .expect("reviews load");
        assert_eq!(stored, vec![review]);
    }

    #[test]
    fn seeding_stores_every_demo_profile() {
        let profiles = InMemoryProfileRepository::default();
        let reviews = InMemoryReviewRepository::default();
        let ids = seed_demo_marketplace(&profiles, &reviews).expect("seed succeeds");

        assert_eq!(ids.len(), 3);
        for id in &ids {
            assert!(profiles.fetch(id).expect("fetch").is_some());
        }
        let ravi = reviews
            .find_by_profile(&ProfileId("cook-ravi".to_string()))
            .expect("reviews load");
        assert_eq!(ravi.len(), 3);
    }

    #[test]
    fn poisoned_store_reports_unavailable() {
        let profiles = InMemoryProfileRepository::default();
        let shared = profiles.profiles.clone();
        let _ = std::thread::spawn(move || {
            let _guard = shared.lock().expect("lock");
            panic!("poison the profile store");
        })
        .join();

        let result = profiles.fetch(&ProfileId("maid-anita".to_string()));
        assert!(matches!(result, Err(RepositoryError::Unavailable(_))));
    }
}
