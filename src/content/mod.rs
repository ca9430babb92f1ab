//! Content store adapter — blog posts, projects, testimonials, banners.
//!
//! DESIGN
//! ======
//! Every list operation takes a `ContentFilter` whose `category` is the
//! kind discriminator of that collection (blog category, project kind,
//! testimonial service, banner page). A reachable store with no matches
//! yields an empty list, never an error. Nothing is cached or retried here;
//! callers decide how to degrade on `StoreError::Unavailable`.

pub mod postgres;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use postgres::PgContentStore;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("content store unavailable: {0}")]
    Unavailable(String),
    #[error("content query failed: {0}")]
    Query(String),
    #[error("malformed content record: {0}")]
    Decode(String),
    #[error("invalid content: {0}")]
    Invalid(String),
    #[error("content already exists: {0}")]
    Conflict(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => Self::Unavailable(err.to_string()),
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::Decode(_) => Self::Decode(err.to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => Self::Conflict(db.message().to_owned()),
            _ => Self::Query(err.to_string()),
        }
    }
}

// =============================================================================
// RECORDS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub body: String,
    pub category: String,
    pub cover_url: Option<String>,
    pub author: String,
    /// Milliseconds since the Unix epoch.
    pub published_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    Web,
    Mobile,
    Saas,
    Marketing,
}

impl ProjectKind {
    pub const ALL: [Self; 4] = [Self::Web, Self::Mobile, Self::Saas, Self::Marketing];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Mobile => "mobile",
            Self::Saas => "saas",
            Self::Marketing => "marketing",
        }
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| format!("unknown project kind: {s}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub kind: ProjectKind,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    pub sort_index: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: Uuid,
    pub author: String,
    pub role: Option<String>,
    pub company: Option<String>,
    pub quote: String,
    /// Service the client bought, used as the category.
    pub service: String,
    /// 1 to 5.
    pub rating: i16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub id: Uuid,
    /// Page the banner is shown on, used as the category.
    pub page: String,
    pub headline: String,
    pub subheadline: Option<String>,
    pub cta_label: Option<String>,
    pub cta_href: Option<String>,
    pub image_url: Option<String>,
    pub active: bool,
}

/// Blog post submitted from the admin editor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBlogPost {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    pub body: String,
    pub category: String,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

impl NewBlogPost {
    /// # Errors
    ///
    /// Returns `StoreError::Invalid` when a required field is blank or the
    /// slug would be empty.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.title.trim().is_empty() {
            return Err(StoreError::Invalid("title is required".into()));
        }
        if self.body.trim().is_empty() {
            return Err(StoreError::Invalid("body is required".into()));
        }
        if self.category.trim().is_empty() {
            return Err(StoreError::Invalid("category is required".into()));
        }
        if self.resolved_slug().is_empty() {
            return Err(StoreError::Invalid("slug must contain letters or digits".into()));
        }
        Ok(())
    }

    /// Explicit slug when given, otherwise one derived from the title.
    #[must_use]
    pub fn resolved_slug(&self) -> String {
        match self.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(slug) => slugify(slug),
            None => slugify(&self.title),
        }
    }

    /// Explicit excerpt when given, otherwise the first paragraph of the body
    /// cut to `EXCERPT_LEN` characters.
    #[must_use]
    pub fn resolved_excerpt(&self) -> String {
        if let Some(excerpt) = self.excerpt.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            return excerpt.to_owned();
        }
        let first = self.body.trim().split("\n\n").next().unwrap_or_default().trim();
        if first.chars().count() <= EXCERPT_LEN {
            return first.to_owned();
        }
        let cut: String = first.chars().take(EXCERPT_LEN).collect();
        format!("{}…", cut.trim_end())
    }
}

const EXCERPT_LEN: usize = 160;

/// Lowercase ASCII alphanumerics joined by single hyphens.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

// =============================================================================
// FILTER
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContentFilter {
    /// Kind discriminator; blank means "any".
    #[serde(default)]
    pub category: Option<String>,
    /// Newest first instead of the store's own order.
    #[serde(default)]
    pub newest_first: bool,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl ContentFilter {
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn category(category: impl Into<String>) -> Self {
        Self { category: Some(category.into()), ..Self::default() }
    }

    #[must_use]
    pub fn newest_first(mut self) -> Self {
        self.newest_first = true;
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Category trimmed and lowercased, or `None` when blank.
    #[must_use]
    pub fn normalized_category(&self) -> Option<String> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_ascii_lowercase)
    }
}

// =============================================================================
// STORE
// =============================================================================

#[async_trait::async_trait]
pub trait ContentStore: Send + Sync {
    async fn blog_posts(&self, filter: &ContentFilter) -> Result<Vec<BlogPost>, StoreError>;

    async fn projects(&self, filter: &ContentFilter) -> Result<Vec<Project>, StoreError>;

    async fn testimonials(&self, filter: &ContentFilter) -> Result<Vec<Testimonial>, StoreError>;

    /// Active banners only.
    async fn banners(&self, filter: &ContentFilter) -> Result<Vec<Banner>, StoreError>;

    async fn publish_blog_post(&self, draft: &NewBlogPost) -> Result<BlogPost, StoreError>;
}
