use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ContractorId, ReviewEdit, ReviewId, SubjectId};
use super::editing::ReviewEditError;
use super::identity::PreferencesPatch;
use super::repository::{RepositoryError, ReviewRepository};
use super::service::{ReviewPresentationService, ReviewServiceError};

/// Body accepted by the review edit endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewEditRequest {
    pub author_id: ContractorId,
    #[serde(flatten)]
    pub edit: ReviewEdit,
}

/// Router builder exposing review presentation, editing and preference endpoints.
pub fn review_router<R>(service: Arc<ReviewPresentationService<R>>) -> Router
where
    R: ReviewRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/subjects/:subject_id/reviews",
            get(review_details_handler::<R>),
        )
        .route(
            "/api/v1/contractors/:contractor_id/dashboard",
            get(dashboard_handler::<R>),
        )
        .route(
            "/api/v1/reviews/:review_id",
            axum::routing::put(edit_review_handler::<R>),
        )
        .route(
            "/api/v1/preferences/:user_id",
            get(preferences_handler::<R>).put(update_preferences_handler::<R>),
        )
        .route(
            "/api/v1/preferences/:user_id/provision",
            axum::routing::post(provision_preferences_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn review_details_handler<R>(
    State(service): State<Arc<ReviewPresentationService<R>>>,
    Path(subject_id): Path<String>,
) -> Response
where
    R: ReviewRepository + 'static,
{
    match service.review_details(&SubjectId(subject_id)) {
        Ok(page) => (StatusCode::OK, axum::Json(page)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn dashboard_handler<R>(
    State(service): State<Arc<ReviewPresentationService<R>>>,
    Path(contractor_id): Path<String>,
) -> Response
where
    R: ReviewRepository + 'static,
{
    match service.dashboard(&ContractorId(contractor_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn edit_review_handler<R>(
    State(service): State<Arc<ReviewPresentationService<R>>>,
    Path(review_id): Path<String>,
    axum::Json(request): axum::Json<ReviewEditRequest>,
) -> Response
where
    R: ReviewRepository + 'static,
{
    let ReviewEditRequest { author_id, edit } = request;
    match service.edit_review(&ReviewId(review_id), &author_id, edit) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn preferences_handler<R>(
    State(service): State<Arc<ReviewPresentationService<R>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: ReviewRepository + 'static,
{
    match service.preferences(&user_id) {
        Ok(preferences) => (StatusCode::OK, axum::Json(preferences)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_preferences_handler<R>(
    State(service): State<Arc<ReviewPresentationService<R>>>,
    Path(user_id): Path<String>,
    axum::Json(patch): axum::Json<PreferencesPatch>,
) -> Response
where
    R: ReviewRepository + 'static,
{
    match service.update_preferences(&user_id, patch) {
        Ok(preferences) => (StatusCode::OK, axum::Json(preferences)).into_response(),
        Err(err) => error_response(err),
    }
}

/// First sign-in hook: stores the default row unless one already exists.
pub(crate) async fn provision_preferences_handler<R>(
    State(service): State<Arc<ReviewPresentationService<R>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: ReviewRepository + 'static,
{
    match service.provision_preferences(&user_id) {
        Ok(preferences) => (StatusCode::OK, axum::Json(preferences)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: ReviewServiceError) -> Response {
    let status = match &err {
        ReviewServiceError::ReviewNotFound(_)
        | ReviewServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ReviewServiceError::Edit(ReviewEditError::NotAuthor { .. }) => StatusCode::FORBIDDEN,
        ReviewServiceError::Edit(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ReviewServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
