//! Form/edit controller: the draft a form holds while an entity is being
//! created or edited, the submit-time normalization rules, and the phase
//! machine that disables inputs while a request is in flight.
//!
//! Normalization happens at submit time, not at keystroke time: the draft
//! stores text-field state exactly as typed.

use chrono::NaiveDate;

use crate::config::AppConfig;
use crate::db::models::{
    Blog, BlogPayload, Category, Complexity, EnquiryPayload, Portfolio, PortfolioPayload,
};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("{0} is required")]
    MissingField(&'static str),

    /// No actor id configured for admin-created records. A configuration
    /// problem surfaced to the user, never silently defaulted.
    #[error("DEFAULT_ACTOR_ID is not configured; cannot attribute this record")]
    MissingActor,
}

/// Split a comma-separated text field into an ordered list: trim each
/// segment, drop the empty ones. No non-empty segment yields `[]`.
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Optional free-text fields submit an explicit "no value" when cleared.
pub fn blank_to_none(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// A non-numeric order index submits as 0 rather than rejecting the form.
pub fn parse_order_index(input: &str) -> i32 {
    input.trim().parse().unwrap_or(0)
}

/// Dates are plain calendar dates on both sides: the store column has no
/// time-of-day component and the form submits `YYYY-MM-DD`.
fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()
}

/// Resolve the actor id a create submission attaches. Required by
/// configuration even though the store column is nullable.
pub fn require_actor(config: &AppConfig) -> Result<&str, DraftError> {
    config
        .default_actor_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or(DraftError::MissingActor)
}

/// Phases of a create/edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPhase {
    /// New-entity defaults, nothing loaded yet.
    Empty,
    /// Edit mode: fetching the existing record.
    Loading,
    /// Fields populated and editable.
    Ready,
    /// Request in flight; inputs disabled.
    Submitting,
    /// Submit succeeded; the form is discarded on navigation.
    Done,
}

/// Tracks the request lifecycle of a single form. One in-flight submit at a
/// time; a failure surfaces the store's message and re-enables the form.
#[derive(Debug)]
pub struct FormFlow {
    phase: FormPhase,
    error: Option<String>,
}

impl FormFlow {
    /// Create mode starts editable with default field values.
    pub fn create() -> Self {
        Self {
            phase: FormPhase::Ready,
            error: None,
        }
    }

    /// Edit mode starts by fetching the record.
    pub fn edit() -> Self {
        Self {
            phase: FormPhase::Loading,
            error: None,
        }
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Inputs are editable only in `Ready`.
    pub fn can_edit(&self) -> bool {
        self.phase == FormPhase::Ready
    }

    pub fn loaded(&mut self) {
        if self.phase == FormPhase::Loading {
            self.phase = FormPhase::Ready;
        }
    }

    /// Returns false when no submit may start (already submitting, or the
    /// record is still loading). Prevents duplicate submission.
    pub fn submit(&mut self) -> bool {
        if self.phase != FormPhase::Ready {
            return false;
        }
        self.error = None;
        self.phase = FormPhase::Submitting;
        true
    }

    /// Store error: surface the message verbatim, return to editable state.
    /// No automatic retry.
    pub fn submit_failed(&mut self, message: impl Into<String>) {
        if self.phase == FormPhase::Submitting {
            self.error = Some(message.into());
            self.phase = FormPhase::Ready;
        }
    }

    pub fn submit_succeeded(&mut self) {
        if self.phase == FormPhase::Submitting {
            self.phase = FormPhase::Done;
        }
    }
}

impl Default for FormFlow {
    fn default() -> Self {
        Self {
            phase: FormPhase::Empty,
            error: None,
        }
    }
}

/// Blog form fields as typed: tags stay one comma-separated string until
/// submit.
#[derive(Debug, Clone, Default)]
pub struct BlogDraft {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub cover_image: String,
    pub tags: String,
    pub is_published: bool,
}

impl BlogDraft {
    /// Populate an edit form from the stored record.
    pub fn from_record(blog: &Blog) -> Self {
        Self {
            title: blog.title.clone(),
            slug: blog.slug.clone(),
            excerpt: blog.excerpt.clone().unwrap_or_default(),
            content: blog.content.clone().unwrap_or_default(),
            cover_image: blog.cover_image.clone().unwrap_or_default(),
            tags: blog.tags.join(", "),
            is_published: blog.is_published,
        }
    }

    /// Presence checks only; slug charset and uniqueness are the store's job.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.title.trim().is_empty() {
            return Err(DraftError::MissingField("Title"));
        }
        if self.slug.trim().is_empty() {
            return Err(DraftError::MissingField("Slug"));
        }
        Ok(())
    }

    pub fn to_payload(&self, config: &AppConfig) -> Result<BlogPayload, DraftError> {
        self.validate()?;
        let author_id = require_actor(config)?;
        Ok(BlogPayload {
            title: self.title.trim().to_string(),
            slug: self.slug.trim().to_string(),
            excerpt: blank_to_none(&self.excerpt),
            content: blank_to_none(&self.content),
            cover_image: blank_to_none(&self.cover_image),
            tags: split_list(&self.tags),
            is_published: self.is_published,
            author_id: Some(author_id.to_string()),
        })
    }
}

/// Portfolio form fields as typed. Numeric and date fields stay text until
/// submit, matching the input widgets.
#[derive(Debug, Clone)]
pub struct PortfolioDraft {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub live_url: String,
    pub github_url: String,
    pub tags: String,
    pub stack: String,
    pub category: String,
    pub complexity: String,
    pub project_date: String,
    pub is_visible: bool,
    pub is_featured: bool,
    pub order_index: String,
}

impl Default for PortfolioDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            image_url: String::new(),
            live_url: String::new(),
            github_url: String::new(),
            tags: String::new(),
            stack: String::new(),
            category: String::new(),
            complexity: Complexity::default().as_str().to_string(),
            project_date: String::new(),
            is_visible: false,
            is_featured: false,
            order_index: "0".to_string(),
        }
    }
}

impl PortfolioDraft {
    pub fn from_record(portfolio: &Portfolio) -> Self {
        Self {
            title: portfolio.title.clone(),
            description: portfolio.description.clone().unwrap_or_default(),
            image_url: portfolio.image_url.clone().unwrap_or_default(),
            live_url: portfolio.live_url.clone().unwrap_or_default(),
            github_url: portfolio.github_url.clone().unwrap_or_default(),
            tags: portfolio.tags.join(", "),
            stack: portfolio.stack.join(", "),
            category: portfolio.category.clone().unwrap_or_default(),
            complexity: portfolio.complexity.clone(),
            project_date: portfolio
                .project_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            is_visible: portfolio.is_visible,
            is_featured: portfolio.is_featured,
            order_index: portfolio.order_index.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), DraftError> {
        if self.title.trim().is_empty() {
            return Err(DraftError::MissingField("Title"));
        }
        Ok(())
    }

    pub fn to_payload(&self, config: &AppConfig) -> Result<PortfolioPayload, DraftError> {
        self.validate()?;
        let creator_id = require_actor(config)?;
        Ok(PortfolioPayload {
            title: self.title.trim().to_string(),
            description: blank_to_none(&self.description),
            image_url: blank_to_none(&self.image_url),
            live_url: blank_to_none(&self.live_url),
            github_url: blank_to_none(&self.github_url),
            tags: split_list(&self.tags),
            stack: split_list(&self.stack),
            category: Category::parse(self.category.trim()),
            complexity: Complexity::parse(self.complexity.trim()),
            project_date: parse_date(&self.project_date),
            is_visible: self.is_visible,
            is_featured: self.is_featured,
            order_index: parse_order_index(&self.order_index),
            creator_id: Some(creator_id.to_string()),
            team_id: None,
        })
    }
}

/// Public enquiry form. No actor involved.
#[derive(Debug, Clone, Default)]
pub struct EnquiryDraft {
    pub name: String,
    pub email: String,
    pub company: String,
    pub budget: String,
    pub message: String,
}

impl EnquiryDraft {
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.name.trim().is_empty() {
            return Err(DraftError::MissingField("Name"));
        }
        if self.email.trim().is_empty() {
            return Err(DraftError::MissingField("Email"));
        }
        if self.message.trim().is_empty() {
            return Err(DraftError::MissingField("Message"));
        }
        Ok(())
    }

    pub fn to_payload(&self) -> Result<EnquiryPayload, DraftError> {
        self.validate()?;
        Ok(EnquiryPayload {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            company: blank_to_none(&self.company),
            budget: blank_to_none(&self.budget),
            message: self.message.trim().to_string(),
        })
    }
}
