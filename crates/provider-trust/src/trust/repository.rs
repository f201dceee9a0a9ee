use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ProfileId, ProviderProfile, Review, TrustStatus};
use super::scoring::{FactorBreakdown, ScoreResult};

/// Current trust score for a profile, one per profile id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub profile_id: ProfileId,
    pub score: u8,
    pub status: TrustStatus,
    pub factors: FactorBreakdown,
    pub last_updated: DateTime<Utc>,
}

impl ScoreRecord {
    pub fn new(profile_id: ProfileId, result: &ScoreResult, last_updated: DateTime<Utc>) -> Self {
        Self {
            profile_id,
            score: result.score,
            status: result.status,
            factors: result.factors,
            last_updated,
        }
    }

    pub fn result(&self) -> ScoreResult {
        ScoreResult {
            score: self.score,
            status: self.status,
            factors: self.factors,
        }
    }
}

/// Profile storage owned by the marketplace.
pub trait ProfileRepository: Send + Sync {
    fn fetch(&self, id: &ProfileId) -> Result<Option<ProviderProfile>, RepositoryError>;
    fn save(&self, profile: ProviderProfile) -> Result<(), RepositoryError>;
}

/// Review storage owned by the marketplace.
pub trait ReviewRepository: Send + Sync {
    fn find_by_profile(&self, id: &ProfileId) -> Result<Vec<Review>, RepositoryError>;
    fn save(&self, review: Review) -> Result<(), RepositoryError>;
}

/// Score record storage; writes replace the existing record for the profile.
pub trait ScoreRecordRepository: Send + Sync {
    fn upsert_by_profile(&self, id: &ProfileId, record: ScoreRecord)
        -> Result<(), RepositoryError>;
    fn fetch_by_profile(&self, id: &ProfileId) -> Result<Option<ScoreRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
