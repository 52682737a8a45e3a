//! Entity store. One submodule per entity kind, each exposing the
//! list/create/update/delete operations the admin panel and public views
//! are built on. All reads return rows in store-defined order; callers
//! never re-sort.

use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use super::models::{Blog, BlogPayload, Enquiry, EnquiryPayload, Portfolio, PortfolioPayload};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,

    #[error("database not available")]
    Unavailable,

    #[error("{0}")]
    Database(#[from] sqlx::Error),
}

fn pool() -> Result<Arc<PgPool>, StoreError> {
    super::get_pool().ok_or(StoreError::Unavailable)
}

pub mod blogs {
    use super::*;

    const COLUMNS: &str = "id, title, slug, excerpt, content, cover_image, tags, \
                           is_published, author_id, created_at, updated_at";

    /// Newest first.
    pub async fn list() -> Result<Vec<Blog>, StoreError> {
        let pool = pool()?;
        let rows = sqlx::query_as::<_, Blog>(&format!(
            "SELECT {COLUMNS} FROM blogs ORDER BY created_at DESC"
        ))
        .fetch_all(pool.as_ref())
        .await?;
        Ok(rows)
    }

    pub async fn find_by_slug(slug: &str) -> Result<Option<Blog>, StoreError> {
        let pool = pool()?;
        let row = sqlx::query_as::<_, Blog>(&format!(
            "SELECT {COLUMNS} FROM blogs WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(pool.as_ref())
        .await?;
        Ok(row)
    }

    /// Slug uniqueness is enforced here by the unique index, not by the
    /// caller; a duplicate surfaces as `Database` with the constraint message.
    pub async fn create(
        payload: &BlogPayload,
        author_id: Option<&str>,
    ) -> Result<Blog, StoreError> {
        let pool = pool()?;
        let row = sqlx::query_as::<_, Blog>(&format!(
            "INSERT INTO blogs \
                 (title, slug, excerpt, content, cover_image, tags, is_published, author_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        ))
        .bind(&payload.title)
        .bind(&payload.slug)
        .bind(&payload.excerpt)
        .bind(&payload.content)
        .bind(&payload.cover_image)
        .bind(&payload.tags)
        .bind(payload.is_published)
        .bind(author_id)
        .fetch_one(pool.as_ref())
        .await?;
        Ok(row)
    }

    pub async fn update(
        id: Uuid,
        payload: &BlogPayload,
        author_id: Option<&str>,
    ) -> Result<Blog, StoreError> {
        let pool = pool()?;
        let row = sqlx::query_as::<_, Blog>(&format!(
            "UPDATE blogs \
             SET title = $1, slug = $2, excerpt = $3, content = $4, cover_image = $5, \
                 tags = $6, is_published = $7, author_id = $8, updated_at = now() \
             WHERE id = $9 \
             RETURNING {COLUMNS}"
        ))
        .bind(&payload.title)
        .bind(&payload.slug)
        .bind(&payload.excerpt)
        .bind(&payload.content)
        .bind(&payload.cover_image)
        .bind(&payload.tags)
        .bind(payload.is_published)
        .bind(author_id)
        .bind(id)
        .fetch_optional(pool.as_ref())
        .await?;
        row.ok_or(StoreError::NotFound)
    }

    pub async fn delete(id: Uuid) -> Result<(), StoreError> {
        let pool = pool()?;
        let result = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(pool.as_ref())
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

pub mod portfolios {
    use super::*;

    const COLUMNS: &str = "id, title, description, image_url, live_url, github_url, tags, \
                           stack, category, complexity, project_date, is_visible, is_featured, \
                           order_index, creator_id, team_id, created_at, updated_at";

    /// Ascending manual order; ties resolve by arrival.
    pub async fn list() -> Result<Vec<Portfolio>, StoreError> {
        let pool = pool()?;
        let rows = sqlx::query_as::<_, Portfolio>(&format!(
            "SELECT {COLUMNS} FROM portfolios ORDER BY order_index ASC, created_at ASC"
        ))
        .fetch_all(pool.as_ref())
        .await?;
        Ok(rows)
    }

    pub async fn find(id: Uuid) -> Result<Option<Portfolio>, StoreError> {
        let pool = pool()?;
        let row = sqlx::query_as::<_, Portfolio>(&format!(
            "SELECT {COLUMNS} FROM portfolios WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool.as_ref())
        .await?;
        Ok(row)
    }

    /// `creator_id`/`team_id` arrive already stripped of empty strings; a
    /// `None` binds NULL rather than an empty foreign key.
    pub async fn create(
        payload: &PortfolioPayload,
        creator_id: Option<&str>,
        team_id: Option<&str>,
    ) -> Result<Portfolio, StoreError> {
        let pool = pool()?;
        let row = sqlx::query_as::<_, Portfolio>(&format!(
            "INSERT INTO portfolios \
                 (title, description, image_url, live_url, github_url, tags, stack, \
                  category, complexity, project_date, is_visible, is_featured, order_index, \
                  creator_id, team_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
             RETURNING {COLUMNS}"
        ))
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(&payload.image_url)
        .bind(&payload.live_url)
        .bind(&payload.github_url)
        .bind(&payload.tags)
        .bind(&payload.stack)
        .bind(payload.category.map(|c| c.as_str()))
        .bind(payload.complexity.unwrap_or_default().as_str())
        .bind(payload.project_date)
        .bind(payload.is_visible)
        .bind(payload.is_featured)
        .bind(payload.order_index)
        .bind(creator_id)
        .bind(team_id)
        .fetch_one(pool.as_ref())
        .await?;
        Ok(row)
    }

    /// Full field replace. Ownership references (`creator_id`/`team_id`) are
    /// set at creation and left untouched by updates.
    pub async fn update(id: Uuid, payload: &PortfolioPayload) -> Result<Portfolio, StoreError> {
        let pool = pool()?;
        let row = sqlx::query_as::<_, Portfolio>(&format!(
            "UPDATE portfolios \
             SET title = $1, description = $2, image_url = $3, live_url = $4, github_url = $5, \
                 tags = $6, stack = $7, category = $8, complexity = $9, project_date = $10, \
                 is_visible = $11, is_featured = $12, order_index = $13, updated_at = now() \
             WHERE id = $14 \
             RETURNING {COLUMNS}"
        ))
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(&payload.image_url)
        .bind(&payload.live_url)
        .bind(&payload.github_url)
        .bind(&payload.tags)
        .bind(&payload.stack)
        .bind(payload.category.map(|c| c.as_str()))
        .bind(payload.complexity.unwrap_or_default().as_str())
        .bind(payload.project_date)
        .bind(payload.is_visible)
        .bind(payload.is_featured)
        .bind(payload.order_index)
        .bind(id)
        .fetch_optional(pool.as_ref())
        .await?;
        row.ok_or(StoreError::NotFound)
    }

    pub async fn delete(id: Uuid) -> Result<(), StoreError> {
        let pool = pool()?;
        let result = sqlx::query("DELETE FROM portfolios WHERE id = $1")
            .bind(id)
            .execute(pool.as_ref())
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

pub mod enquiries {
    use super::*;

    const COLUMNS: &str = "id, name, email, company, budget, message, status, date";

    /// Newest first.
    pub async fn list() -> Result<Vec<Enquiry>, StoreError> {
        let pool = pool()?;
        let rows = sqlx::query_as::<_, Enquiry>(&format!(
            "SELECT {COLUMNS} FROM enquiries ORDER BY date DESC"
        ))
        .fetch_all(pool.as_ref())
        .await?;
        Ok(rows)
    }

    /// Status and date are store-assigned ('new', now()).
    pub async fn create(payload: &EnquiryPayload) -> Result<Enquiry, StoreError> {
        let pool = pool()?;
        let row = sqlx::query_as::<_, Enquiry>(&format!(
            "INSERT INTO enquiries (name, email, company, budget, message) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        ))
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(&payload.company)
        .bind(&payload.budget)
        .bind(&payload.message)
        .fetch_one(pool.as_ref())
        .await?;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_operations_fail_without_pool() {
        // No pool is initialized in unit tests; every operation must refuse
        // rather than panic.
        assert!(matches!(blogs::list().await, Err(StoreError::Unavailable)));
        assert!(matches!(
            portfolios::find(Uuid::new_v4()).await,
            Err(StoreError::Unavailable)
        ));
        assert!(matches!(
            enquiries::list().await,
            Err(StoreError::Unavailable)
        ));
    }
}
