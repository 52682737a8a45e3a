//! Database models - structs representing the three entity kinds plus the
//! request payloads admin mutations deserialize (used by sqlx/serde).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Blog post.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub is_published: bool,
    pub author_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full field set for blog create (POST) and update (PUT).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPayload {
    /// Required fields still default on deserialize so an absent key reaches
    /// presence validation as `""` instead of failing in the extractor.
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub author_id: Option<String>,
}

/// Portfolio item.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub tags: Vec<String>,
    pub stack: Vec<String>,
    /// Stored as free text; parse with [`Category::parse`] at display sites.
    pub category: Option<String>,
    /// Stored as free text; [`PreviewMode::for_complexity`] decides the
    /// public click-through.
    pub complexity: String,
    pub project_date: Option<NaiveDate>,
    pub is_visible: bool,
    pub is_featured: bool,
    pub order_index: i32,
    pub creator_id: Option<String>,
    pub team_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full field set for portfolio create and update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub stack: Vec<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub complexity: Option<Complexity>,
    #[serde(default)]
    pub project_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_visible: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub order_index: i32,
    #[serde(default)]
    pub creator_id: Option<String>,
    #[serde(default)]
    pub team_id: Option<String>,
}

/// Client enquiry. Read-only from the admin side; created by the public form.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enquiry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub budget: Option<String>,
    pub message: String,
    pub status: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnquiryPayload {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// Portfolio category. Stored as TEXT, closed at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Illustration,
    UiUx,
    Development,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Illustration => "illustration",
            Category::UiUx => "ui-ux",
            Category::Development => "development",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "illustration" => Some(Category::Illustration),
            "ui-ux" => Some(Category::UiUx),
            "development" => Some(Category::Development),
            _ => None,
        }
    }
}

/// Project complexity. "short" projects get an inline preview on the public
/// listing instead of a dedicated page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    #[default]
    Short,
    Long,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Short => "short",
            Complexity::Long => "long",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "short" => Some(Complexity::Short),
            "long" => Some(Complexity::Long),
            _ => None,
        }
    }
}

/// Click-through target for a project card in the public listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewMode {
    /// Inline modal preview on the listing page.
    Inline,
    /// Dedicated detail route.
    Page,
}

impl PreviewMode {
    /// "short" opens inline; any other stored value (including ones no
    /// current variant covers) navigates to the detail page.
    pub fn for_complexity(complexity: &str) -> Self {
        match Complexity::parse(complexity) {
            Some(Complexity::Short) => PreviewMode::Inline,
            Some(Complexity::Long) | None => PreviewMode::Page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip() {
        for c in [Category::Illustration, Category::UiUx, Category::Development] {
            assert_eq!(Category::parse(c.as_str()), Some(c));
        }
        assert_eq!(Category::parse("sculpture"), None);
    }

    #[test]
    fn test_category_serde_kebab_case() {
        assert_eq!(serde_json::to_string(&Category::UiUx).unwrap(), "\"ui-ux\"");
        let parsed: Category = serde_json::from_str("\"illustration\"").unwrap();
        assert_eq!(parsed, Category::Illustration);
    }

    #[test]
    fn test_complexity_defaults_to_short() {
        assert_eq!(Complexity::default(), Complexity::Short);
    }

    #[test]
    fn test_preview_mode_short_is_inline() {
        assert_eq!(PreviewMode::for_complexity("short"), PreviewMode::Inline);
    }

    #[test]
    fn test_preview_mode_anything_else_is_page() {
        assert_eq!(PreviewMode::for_complexity("long"), PreviewMode::Page);
        assert_eq!(PreviewMode::for_complexity("epic"), PreviewMode::Page);
        assert_eq!(PreviewMode::for_complexity(""), PreviewMode::Page);
    }

    #[test]
    fn test_payloads_parse_with_absent_required_keys() {
        // Presence is the handlers' job; the deserializer must not reject.
        let blog: BlogPayload = serde_json::from_str("{}").unwrap();
        assert!(blog.title.is_empty());
        assert!(blog.slug.is_empty());

        let portfolio: PortfolioPayload = serde_json::from_str("{}").unwrap();
        assert!(portfolio.title.is_empty());

        let enquiry: EnquiryPayload = serde_json::from_str(r#"{"name":"Ada"}"#).unwrap();
        assert!(enquiry.email.is_empty());
        assert!(enquiry.message.is_empty());
    }

    #[test]
    fn test_blog_payload_defaults() {
        let payload: BlogPayload = serde_json::from_str(r#"{"title":"Hi","slug":"hi"}"#).unwrap();
        assert!(payload.tags.is_empty());
        assert!(!payload.is_published);
        assert!(payload.author_id.is_none());
    }

    #[test]
    fn test_portfolio_payload_accepts_null_enums() {
        let payload: PortfolioPayload =
            serde_json::from_str(r#"{"title":"T","category":null,"complexity":null}"#).unwrap();
        assert!(payload.category.is_none());
        assert!(payload.complexity.is_none());
        assert_eq!(payload.order_index, 0);
    }
}
