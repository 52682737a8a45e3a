//! Portfolio routes: admin CRUD plus the public project views.

use axum::{
    extract::Path,
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::db::{
    models::{Portfolio, PortfolioPayload, PreviewMode},
    store,
};
use crate::error::ApiError;
use crate::routes::{verify_auth, SuccessResponse};

/// A visible project as the public listing renders it, annotated with the
/// click-through decision so the caller doesn't re-derive it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProject {
    #[serde(flatten)]
    pub item: Portfolio,
    pub preview: PreviewMode,
}

impl From<Portfolio> for PublicProject {
    fn from(item: Portfolio) -> Self {
        let preview = PreviewMode::for_complexity(&item.complexity);
        Self { item, preview }
    }
}

fn validate(payload: &PortfolioPayload) -> Result<(), ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::Validation("Title is required".to_string()));
    }
    Ok(())
}

/// An ownership reference is attached only when non-empty; an empty string
/// would be a malformed foreign key, not a cleared field.
fn non_empty_ref(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn visible_only(item: Option<Portfolio>) -> Option<Portfolio> {
    item.filter(|p| p.is_visible)
}

/// GET /api/portfolios - every item in display order. A list failure
/// degrades to an empty collection rather than blocking the page.
pub async fn list_portfolios() -> Json<Vec<Portfolio>> {
    match store::portfolios::list().await {
        Ok(items) => Json(items),
        Err(e) => {
            tracing::error!("Failed to list portfolios: {}", e);
            Json(Vec::new())
        }
    }
}

/// GET /api/projects - public listing. Visibility is filtered here, in
/// memory, after the unfiltered fetch; the store order is kept.
pub async fn list_projects() -> Json<Vec<PublicProject>> {
    match store::portfolios::list().await {
        Ok(items) => Json(
            items
                .into_iter()
                .filter(|p| p.is_visible)
                .map(PublicProject::from)
                .collect(),
        ),
        Err(e) => {
            tracing::error!("Failed to list projects: {}", e);
            Json(Vec::new())
        }
    }
}

/// GET /api/projects/{id} - public detail, visible items only.
pub async fn get_project(Path(id): Path<Uuid>) -> Result<Json<PublicProject>, ApiError> {
    let item = store::portfolios::find(id).await?;
    match visible_only(item) {
        Some(item) => Ok(Json(PublicProject::from(item))),
        None => Err(ApiError::NotFound),
    }
}

/// POST /api/portfolios - create (auth required).
pub async fn create_portfolio(
    headers: HeaderMap,
    Extension(config): Extension<Arc<AppConfig>>,
    Json(payload): Json<PortfolioPayload>,
) -> Result<(StatusCode, Json<Portfolio>), ApiError> {
    verify_auth(&headers)?;
    validate(&payload)?;

    let creator = non_empty_ref(payload.creator_id.as_deref())
        .or_else(|| non_empty_ref(config.default_actor_id.as_deref()));
    let team = non_empty_ref(payload.team_id.as_deref());

    let item = store::portfolios::create(&payload, creator, team).await?;
    tracing::info!(portfolio_id = %item.id, "portfolio item created");
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/portfolios/{id} - full field replace (auth required).
pub async fn update_portfolio(
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(payload): Json<PortfolioPayload>,
) -> Result<Json<Portfolio>, ApiError> {
    verify_auth(&headers)?;
    validate(&payload)?;

    let item = store::portfolios::update(id, &payload).await?;
    tracing::info!(portfolio_id = %item.id, "portfolio item updated");
    Ok(Json(item))
}

/// DELETE /api/portfolios/{id} (auth required).
pub async fn delete_portfolio(
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    verify_auth(&headers)?;

    store::portfolios::delete(id).await?;
    tracing::info!(portfolio_id = %id, "portfolio item deleted");
    Ok(Json(SuccessResponse { success: true }))
}
