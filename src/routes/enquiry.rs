//! Enquiry routes. Submission is public (the contact form posts here);
//! the listing is admin-only.

use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use crate::db::{
    models::{Enquiry, EnquiryPayload},
    store,
};
use crate::error::ApiError;
use crate::routes::verify_auth;

fn validate(payload: &EnquiryPayload) -> Result<(), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::Validation("Name is required".to_string()));
    }
    if payload.email.trim().is_empty() {
        return Err(ApiError::Validation("Email is required".to_string()));
    }
    if payload.message.trim().is_empty() {
        return Err(ApiError::Validation("Message is required".to_string()));
    }
    Ok(())
}

/// POST /api/enquiries - public contact form submission. Status and
/// received date are store-assigned, never client-supplied.
pub async fn create_enquiry(
    Json(payload): Json<EnquiryPayload>,
) -> Result<(StatusCode, Json<Enquiry>), ApiError> {
    validate(&payload)?;

    let enquiry = store::enquiries::create(&payload).await?;
    tracing::info!(enquiry_id = %enquiry.id, "enquiry received");
    Ok((StatusCode::CREATED, Json(enquiry)))
}

/// GET /api/enquiries - newest first (auth required).
pub async fn list_enquiries(headers: HeaderMap) -> Result<Json<Vec<Enquiry>>, ApiError> {
    verify_auth(&headers)?;

    let enquiries = store::enquiries::list().await?;
    Ok(Json(enquiries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    fn test_router() -> Router {
        Router::new().route("/api/enquiries", get(list_enquiries).post(create_enquiry))
    }

    #[test]
    fn test_validate_requires_name_email_message() {
        let payload: EnquiryPayload =
            serde_json::from_str(r#"{"name":"Ada","email":"ada@example.com","message":"Hi"}"#)
                .unwrap();
        assert!(validate(&payload).is_ok());

        let blank_message: EnquiryPayload =
            serde_json::from_str(r#"{"name":"Ada","email":"ada@example.com","message":"  "}"#)
                .unwrap();
        assert!(matches!(
            validate(&blank_message),
            Err(ApiError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_create_missing_email_returns_400() {
        let req = Request::post("/api/enquiries")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"name":"Ada","email":"","message":"Hi"}"#))
            .unwrap();
        let res = test_router().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_absent_message_key_returns_400() {
        let req = Request::post("/api/enquiries")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"name":"Ada","email":"ada@example.com"}"#))
            .unwrap();
        let res = test_router().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_without_database_returns_503() {
        let req = Request::post("/api/enquiries")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"name":"Ada","email":"ada@example.com","message":"Hi"}"#,
            ))
            .unwrap();
        let res = test_router().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_list_without_auth_returns_401() {
        let req = Request::get("/api/enquiries").body(Body::empty()).unwrap();
        let res = test_router().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
