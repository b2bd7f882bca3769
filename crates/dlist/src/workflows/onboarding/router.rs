use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::password::PasswordStrength;
use super::profile::ProfileForm;
use super::registration::RegistrationForm;

#[derive(Debug, Deserialize)]
pub struct PasswordStrengthRequest {
    pub password: String,
}

/// Stateless form validation endpoints used by the sign-up and profile screens.
pub fn onboarding_router() -> Router {
    Router::new()
        .route(
            "/api/v1/onboarding/password-strength",
            post(password_strength_handler),
        )
        .route("/api/v1/onboarding/registration", post(registration_handler))
        .route("/api/v1/onboarding/profile", post(profile_handler))
}

pub(crate) async fn password_strength_handler(
    Json(request): Json<PasswordStrengthRequest>,
) -> Response {
    let strength = PasswordStrength::evaluate(&request.password);
    (StatusCode::OK, Json(strength)).into_response()
}

pub(crate) async fn registration_handler(Json(form): Json<RegistrationForm>) -> Response {
    match form.validate() {
        Ok(registration) => {
            info!("registration form accepted");
            (StatusCode::OK, Json(registration)).into_response()
        }
        Err(err) => rejection(err.to_string()),
    }
}

pub(crate) async fn profile_handler(Json(form): Json<ProfileForm>) -> Response {
    match form.validate() {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(err) => rejection(err.to_string()),
    }
}

fn rejection(message: String) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": message })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        let response = onboarding_router()
            .oneshot(
                Request::post(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(axum::body::Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 4096)
            .await
            .expect("read body");
        (status, serde_json::from_slice(&bytes).expect("json payload"))
    }

    #[tokio::test]
    async fn password_strength_reports_level() {
        let (status, body) = post_json(
            "/api/v1/onboarding/password-strength",
            json!({"password": "abcDEF123"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["score"], json!(3));
        assert_eq!(body["level"], json!("medium"));
        assert_eq!(body["percent"], json!(60.0));
    }

    #[tokio::test]
    async fn registration_rejects_with_user_message() {
        let (status, body) = post_json(
            "/api/v1/onboarding/registration",
            json!({
                "first_name": "Dana",
                "last_name": "Reyes",
                "email": "dana@reyesroofing.example",
                "password": "Roofline#2025x",
                "confirm_password": "Roofline#2025y",
                "accept_terms": true
            }),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], json!("Passwords do not match"));
    }

    #[tokio::test]
    async fn profile_returns_normalized_phone() {
        let (status, body) = post_json(
            "/api/v1/onboarding/profile",
            json!({
                "business_name": "Reyes Roofing",
                "trade": "Roofing",
                "city": "Des Moines",
                "state": "IA",
                "phone": "515 555 0142",
                "zip": "50309"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["phone"], json!("5155550142"));
        assert_eq!(body["phone_display"], json!("(515) 555-0142"));
    }
}
