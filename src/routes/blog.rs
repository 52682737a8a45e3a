//! Blog routes: admin CRUD plus the public article view.

use axum::{
    extract::Path,
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::db::{models::Blog, models::BlogPayload, store};
use crate::error::ApiError;
use crate::routes::{verify_auth, SuccessResponse};

/// Presence checks only; slug format and uniqueness surface from the store.
fn validate(payload: &BlogPayload) -> Result<(), ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::Validation("Title is required".to_string()));
    }
    if payload.slug.trim().is_empty() {
        return Err(ApiError::Validation("Slug is required".to_string()));
    }
    Ok(())
}

/// The actor attached to a record: the payload's author when non-empty,
/// otherwise the configured default. Empty strings are never forwarded.
fn resolve_author<'a>(payload: &'a BlogPayload, config: &'a AppConfig) -> Option<&'a str> {
    payload
        .author_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .or(config.default_actor_id.as_deref())
        .filter(|id| !id.is_empty())
}

/// Unpublished records are invisible to the public view: not-found, not error.
fn published_only(blog: Option<Blog>) -> Option<Blog> {
    blog.filter(|b| b.is_published)
}

/// GET /api/blogs - every post, newest first. The admin table searches and
/// paginates this collection client-side.
pub async fn list_blogs() -> Result<Json<Vec<Blog>>, ApiError> {
    let blogs = store::blogs::list().await?;
    Ok(Json(blogs))
}

/// GET /api/articles/{slug} - public detail, published posts only.
pub async fn get_article(Path(slug): Path<String>) -> Result<Json<Blog>, ApiError> {
    let blog = store::blogs::find_by_slug(&slug).await?;
    match published_only(blog) {
        Some(blog) => Ok(Json(blog)),
        None => Err(ApiError::NotFound),
    }
}

/// POST /api/blogs - create (auth required).
pub async fn create_blog(
    headers: HeaderMap,
    Extension(config): Extension<Arc<AppConfig>>,
    Json(payload): Json<BlogPayload>,
) -> Result<(StatusCode, Json<Blog>), ApiError> {
    verify_auth(&headers)?;
    validate(&payload)?;

    let author = resolve_author(&payload, &config);
    let blog = store::blogs::create(&payload, author).await?;
    tracing::info!(blog_id = %blog.id, slug = %blog.slug, "blog post created");
    Ok((StatusCode::CREATED, Json(blog)))
}

/// PUT /api/blogs/{id} - full field replace (auth required).
pub async fn update_blog(
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Extension(config): Extension<Arc<AppConfig>>,
    Json(payload): Json<BlogPayload>,
) -> Result<Json<Blog>, ApiError> {
    verify_auth(&headers)?;
    validate(&payload)?;

    let author = resolve_author(&payload, &config);
    let blog = store::blogs::update(id, &payload, author).await?;
    tracing::info!(blog_id = %blog.id, "blog post updated");
    Ok(Json(blog))
}

/// DELETE /api/blogs/{id} (auth required).
pub async fn delete_blog(
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    verify_auth(&headers)?;

    store::blogs::delete(id).await?;
    tracing::info!(blog_id = %id, "blog post deleted");
    Ok(Json(SuccessResponse { success: true }))
}
