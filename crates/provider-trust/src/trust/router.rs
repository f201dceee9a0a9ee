use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::task::JoinError;
use tracing::error;

use super::domain::{ProfileId, Review, VerificationStatus};
use super::repository::{
    ProfileRepository, RepositoryError, ReviewRepository, ScoreRecordRepository,
};
use super::service::{TrustScoreService, TrustServiceError};

/// Body accepted by the verification endpoint.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct VerificationRequest {
    pub status: VerificationStatus,
}

/// Body accepted by the sentiment endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SentimentRequest {
    pub text: String,
}

/// Router builder exposing the trust score triggers over HTTP.
pub fn trust_router<P, R, S>(service: Arc<TrustScoreService<P, R, S>>) -> Router
where
    P: ProfileRepository + 'static,
    R: ReviewRepository + 'static,
    S: ScoreRecordRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/profiles/:profile_id/trust-score",
            get(record_handler::<P, R, S>),
        )
        .route(
            "/api/v1/profiles/:profile_id/trust-score/refresh",
            post(refresh_handler::<P, R, S>),
        )
        .route(
            "/api/v1/profiles/:profile_id/reviews/reanalyze",
            post(reanalyze_handler::<P, R, S>),
        )
        .route(
            "/api/v1/profiles/:profile_id/verification",
            post(verification_handler::<P, R, S>),
        )
        .route("/api/v1/reviews", post(review_handler::<P, R, S>))
        .route("/api/v1/sentiment", post(sentiment_handler::<P, R, S>))
        .with_state(service)
}

pub(crate) async fn record_handler<P, R, S>(
    State(service): State<Arc<TrustScoreService<P, R, S>>>,
    Path(profile_id): Path<String>,
) -> Response
where
    P: ProfileRepository + 'static,
    R: ReviewRepository + 'static,
    S: ScoreRecordRepository + 'static,
{
    let id = ProfileId(profile_id);
    let outcome = tokio::task::spawn_blocking(move || service.score_record(&id)).await;
    respond(outcome, StatusCode::OK)
}

pub(crate) async fn refresh_handler<P, R, S>(
    State(service): State<Arc<TrustScoreService<P, R, S>>>,
    Path(profile_id): Path<String>,
) -> Response
where
    P: ProfileRepository + 'static,
    R: ReviewRepository + 'static,
    S: ScoreRecordRepository + 'static,
{
    let id = ProfileId(profile_id);
    let outcome = tokio::task::spawn_blocking(move || service.refresh_profile_score(&id)).await;
    respond(outcome, StatusCode::OK)
}

pub(crate) async fn reanalyze_handler<P, R, S>(
    State(service): State<Arc<TrustScoreService<P, R, S>>>,
    Path(profile_id): Path<String>,
) -> Response
where
    P: ProfileRepository + 'static,
    R: ReviewRepository + 'static,
    S: ScoreRecordRepository + 'static,
{
    let id = ProfileId(profile_id);
    let outcome = tokio::task::spawn_blocking(move || service.reanalyze_reviews(&id)).await;
    respond(outcome, StatusCode::OK)
}

pub(crate) async fn verification_handler<P, R, S>(
    State(service): State<Arc<TrustScoreService<P, R, S>>>,
    Path(profile_id): Path<String>,
    axum::Json(request): axum::Json<VerificationRequest>,
) -> Response
where
    P: ProfileRepository + 'static,
    R: ReviewRepository + 'static,
    S: ScoreRecordRepository + 'static,
{
    let id = ProfileId(profile_id);
    let outcome = tokio::task::spawn_blocking(move || {
        service.set_verification_status(&id, request.status)
    })
    .await;
    respond(outcome, StatusCode::OK)
}

pub(crate) async fn review_handler<P, R, S>(
    State(service): State<Arc<TrustScoreService<P, R, S>>>,
    axum::Json(review): axum::Json<Review>,
) -> Response
where
    P: ProfileRepository + 'static,
    R: ReviewRepository + 'static,
    S: ScoreRecordRepository + 'static,
{
    let outcome = tokio::task::spawn_blocking(move || service.submit_review(review)).await;
    respond(outcome, StatusCode::ACCEPTED)
}

pub(crate) async fn sentiment_handler<P, R, S>(
    State(service): State<Arc<TrustScoreService<P, R, S>>>,
    axum::Json(request): axum::Json<SentimentRequest>,
) -> Response
where
    P: ProfileRepository + 'static,
    R: ReviewRepository + 'static,
    S: ScoreRecordRepository + 'static,
{
    let analysis = service.classifier().classify(&request.text);
    (StatusCode::OK, axum::Json(analysis)).into_response()
}

/// HTTP status for a service failure.
pub(crate) fn error_status(error: &TrustServiceError) -> StatusCode {
    match error {
        TrustServiceError::ProfileNotFound(_)
        | TrustServiceError::ScoreNotRecorded(_)
        | TrustServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        TrustServiceError::InvalidRating { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        TrustServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        TrustServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

fn respond<T: Serialize>(
    outcome: Result<Result<T, TrustServiceError>, JoinError>,
    success: StatusCode,
) -> Response {
    match outcome {
        Ok(Ok(value)) => (success, axum::Json(value)).into_response(),
        Ok(Err(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (error_status(&error), axum::Json(payload)).into_response()
        }
        Err(join_error) => {
            error!(%join_error, "trust score task failed");
            let payload = json!({
                "error": "trust score task failed",
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
