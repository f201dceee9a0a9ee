use super::super::domain::{TrustStatus, VerificationStatus};

pub const TRUSTED_THRESHOLD: u8 = 80;
pub const VERIFIED_THRESHOLD: u8 = 60;

const MAX_SCORE: f64 = 100.0;

/// Lift an admin-verified profile's score to the `Verified` threshold.
pub fn apply_verification_floor(score: u8, verification: VerificationStatus) -> u8 {
    if verification.is_verified() && score < VERIFIED_THRESHOLD {
        VERIFIED_THRESHOLD
    } else {
        score
    }
}

/// Status for a final score, evaluated in threshold order with the admin override last.
pub fn derive_status(score: u8, verification: VerificationStatus) -> TrustStatus {
    if score >= TRUSTED_THRESHOLD {
        TrustStatus::Trusted
    } else if score >= VERIFIED_THRESHOLD || verification.is_verified() {
        TrustStatus::Verified
    } else {
        TrustStatus::NeedsReview
    }
}

/// Round and clamp the raw factor sum, apply the verification floor, then derive the status
/// from the score that will actually be stored.
pub(crate) fn finalize(raw_total: f64, verification: VerificationStatus) -> (u8, TrustStatus) {
    let rounded = if raw_total.is_finite() {
        raw_total.round().clamp(0.0, MAX_SCORE) as u8
    } else {
        0
    };
    let score = apply_verification_floor(rounded, verification);
    (score, derive_status(score, verification))
}
