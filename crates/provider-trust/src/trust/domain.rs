use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for service-provider profiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(pub String);

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for reviews left against a profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewId(pub String);

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Administrative verification state, maintained by the admin workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    #[default]
    Unverified,
    Pending,
    Verified,
    Rejected,
}

impl VerificationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            VerificationStatus::Unverified => "unverified",
            VerificationStatus::Pending => "pending",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Rejected => "rejected",
        }
    }

    pub const fn is_verified(self) -> bool {
        matches!(self, VerificationStatus::Verified)
    }
}

/// Verification flag for a single uploaded document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFlag {
    pub verified: bool,
}

impl DocumentFlag {
    pub const fn verified() -> Self {
        Self { verified: true }
    }
}

/// Identity and secondary (tax) document flags.
///
/// Serialized under the marketplace's own document names: `aadhaar` is the identity card and
/// `pan` the tax registration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDocuments {
    #[serde(rename = "aadhaar", default)]
    pub identity: DocumentFlag,
    #[serde(rename = "pan", default)]
    pub secondary: DocumentFlag,
}

impl ProfileDocuments {
    pub const fn new(identity_verified: bool, secondary_verified: bool) -> Self {
        Self {
            identity: DocumentFlag {
                verified: identity_verified,
            },
            secondary: DocumentFlag {
                verified: secondary_verified,
            },
        }
    }

    /// Number of documents individually flagged as verified (0..=2).
    pub fn verified_count(&self) -> u8 {
        u8::from(self.identity.verified) + u8::from(self.secondary.verified)
    }
}

/// Externally maintained rating aggregate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingSummary {
    pub average: f64,
    pub count: u32,
}

/// Public trust label derived from the score and verification state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrustStatus {
    #[serde(rename = "Needs Review")]
    NeedsReview,
    Verified,
    Trusted,
}

impl TrustStatus {
    pub const fn label(self) -> &'static str {
        match self {
            TrustStatus::NeedsReview => "Needs Review",
            TrustStatus::Verified => "Verified",
            TrustStatus::Trusted => "Trusted",
        }
    }
}

impl fmt::Display for TrustStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Score fields cached on the profile for listing and search pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedTrustScore {
    pub score: u8,
    pub status: TrustStatus,
    pub last_updated: DateTime<Utc>,
}

/// Snapshot of a provider profile as stored by the marketplace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderProfile {
    pub id: ProfileId,
    #[serde(default)]
    pub verification_status: VerificationStatus,
    #[serde(default)]
    pub documents: ProfileDocuments,
    #[serde(default)]
    pub rating: RatingSummary,
    #[serde(default, rename = "experience")]
    pub experience_years: f64,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trust_score: Option<CachedTrustScore>,
}

impl ProviderProfile {
    /// Blank, unverified and inactive profile.
    pub fn new(id: ProfileId) -> Self {
        Self {
            id,
            verification_status: VerificationStatus::Unverified,
            documents: ProfileDocuments::default(),
            rating: RatingSummary::default(),
            experience_years: 0.0,
            is_active: false,
            trust_score: None,
        }
    }
}

/// Polarity label attached to a review comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub const fn label(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        }
    }
}

/// Customer review of a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    #[serde(rename = "profileRef")]
    pub profile_id: ProfileId,
    #[serde(default)]
    pub comment: Option<String>,
    /// Star rating in `Review::RATING_RANGE`.
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentLabel>,
}

impl Review {
    pub const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

    pub fn has_valid_rating(&self) -> bool {
        Self::RATING_RANGE.contains(&self.rating)
    }

    /// The comment text when one was left; an empty string counts as no comment.
    pub fn comment_text(&self) -> Option<&str> {
        self.comment.as_deref().filter(|comment| !comment.is_empty())
    }
}
