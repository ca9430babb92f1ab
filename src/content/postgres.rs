//! `PostgreSQL`-backed content store.
//!
//! Each collection describes its table through `Collection`; one generic
//! query builder turns a `ContentFilter` into SQL for all of them. Category
//! matching is case-insensitive.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::{info, warn};
use uuid::Uuid;

use super::{Banner, BlogPost, ContentFilter, ContentStore, NewBlogPost, Project, ProjectKind, StoreError, Testimonial};

const BLOG_COLUMNS: &str = "id, slug, title, excerpt, body, category, cover_url, author, \
     (EXTRACT(EPOCH FROM published_at) * 1000)::BIGINT AS published_ms";

pub(crate) trait Collection: Sized {
    const TABLE: &'static str;
    const COLUMNS: &'static str;
    const CATEGORY_COLUMN: &'static str;
    /// Column sorted descending for `newest_first`.
    const NEWEST_COLUMN: &'static str;
    /// The store's own order when the filter asks for none.
    const DEFAULT_ORDER: &'static str;
    const BASE_CONDITION: Option<&'static str> = None;

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error>;
}

impl Collection for BlogPost {
    const TABLE: &'static str = "blog_posts";
    const COLUMNS: &'static str = BLOG_COLUMNS;
    const CATEGORY_COLUMN: &'static str = "category";
    const NEWEST_COLUMN: &'static str = "published_at";
    const DEFAULT_ORDER: &'static str = "published_at DESC, id";

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            slug: row.try_get("slug")?,
            title: row.try_get("title")?,
            excerpt: row.try_get("excerpt")?,
            body: row.try_get("body")?,
            category: row.try_get("category")?,
            cover_url: row.try_get("cover_url")?,
            author: row.try_get("author")?,
            published_at: row.try_get("published_ms")?,
        })
    }
}

impl Collection for Project {
    const TABLE: &'static str = "projects";
    const COLUMNS: &'static str = "id, title, summary, kind, image_url, link_url, sort_index";
    const CATEGORY_COLUMN: &'static str = "kind";
    const NEWEST_COLUMN: &'static str = "created_at";
    const DEFAULT_ORDER: &'static str = "sort_index, created_at, id";

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let kind: String = row.try_get("kind")?;
        let kind = kind.parse::<ProjectKind>().map_err(|e| sqlx::Error::Decode(e.into()))?;
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            summary: row.try_get("summary")?,
            kind,
            image_url: row.try_get("image_url")?,
            link_url: row.try_get("link_url")?,
            sort_index: row.try_get("sort_index")?,
        })
    }
}

impl Collection for Testimonial {
    const TABLE: &'static str = "testimonials";
    const COLUMNS: &'static str = "id, author, role, company, quote, service, rating";
    const CATEGORY_COLUMN: &'static str = "service";
    const NEWEST_COLUMN: &'static str = "created_at";
    const DEFAULT_ORDER: &'static str = "created_at, id";

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            author: row.try_get("author")?,
            role: row.try_get("role")?,
            company: row.try_get("company")?,
            quote: row.try_get("quote")?,
            service: row.try_get("service")?,
            rating: row.try_get("rating")?,
        })
    }
}

impl Collection for Banner {
    const TABLE: &'static str = "banners";
    const COLUMNS: &'static str = "id, page, headline, subheadline, cta_label, cta_href, image_url, active";
    const CATEGORY_COLUMN: &'static str = "page";
    const NEWEST_COLUMN: &'static str = "created_at";
    const DEFAULT_ORDER: &'static str = "created_at, id";
    const BASE_CONDITION: Option<&'static str> = Some("active");

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            page: row.try_get("page")?,
            headline: row.try_get("headline")?,
            subheadline: row.try_get("subheadline")?,
            cta_label: row.try_get("cta_label")?,
            cta_href: row.try_get("cta_href")?,
            image_url: row.try_get("image_url")?,
            active: row.try_get("active")?,
        })
    }
}

/// Assemble the list query for `C` under `filter`.
pub(crate) fn build_list_query<C: Collection>(filter: &ContentFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM {}", C::COLUMNS, C::TABLE));

    let mut has_where = false;
    if let Some(condition) = C::BASE_CONDITION {
        qb.push(" WHERE ").push(condition);
        has_where = true;
    }
    if let Some(category) = filter.normalized_category() {
        qb.push(if has_where { " AND " } else { " WHERE " });
        qb.push(format_args!("lower({}) = ", C::CATEGORY_COLUMN));
        qb.push_bind(category);
    }

    qb.push(" ORDER BY ");
    if filter.newest_first {
        qb.push(format_args!("{} DESC, id", C::NEWEST_COLUMN));
    } else {
        qb.push(C::DEFAULT_ORDER);
    }

    if let Some(limit) = filter.limit {
        qb.push(" LIMIT ").push_bind(i64::from(limit));
    }
    qb
}

#[derive(Clone)]
pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_list<C: Collection>(&self, filter: &ContentFilter) -> Result<Vec<C>, StoreError> {
        let rows = build_list_query::<C>(filter)
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                let err = StoreError::from(e);
                warn!(table = C::TABLE, error = %err, "content fetch failed");
                err
            })?;

        rows.iter()
            .map(C::from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::from)
    }
}

#[async_trait::async_trait]
impl ContentStore for PgContentStore {
    async fn blog_posts(&self, filter: &ContentFilter) -> Result<Vec<BlogPost>, StoreError> {
        self.fetch_list(filter).await
    }

    async fn projects(&self, filter: &ContentFilter) -> Result<Vec<Project>, StoreError> {
        self.fetch_list(filter).await
    }

    async fn testimonials(&self, filter: &ContentFilter) -> Result<Vec<Testimonial>, StoreError> {
        self.fetch_list(filter).await
    }

    async fn banners(&self, filter: &ContentFilter) -> Result<Vec<Banner>, StoreError> {
        self.fetch_list(filter).await
    }

    async fn publish_blog_post(&self, draft: &NewBlogPost) -> Result<BlogPost, StoreError> {
        draft.validate()?;
        let slug = draft.resolved_slug();

        let row = sqlx::query(&format!(
            r"INSERT INTO blog_posts (id, slug, title, excerpt, body, category, cover_url, author)
              VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
              RETURNING {BLOG_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&slug)
        .bind(draft.title.trim())
        .bind(draft.resolved_excerpt())
        .bind(draft.body.trim())
        .bind(draft.category.trim())
        .bind(draft.cover_url.as_deref())
        .bind(draft.author.as_deref().unwrap_or_default().trim())
        .fetch_one(&self.pool)
        .await?;

        let post = BlogPost::from_row(&row)?;
        info!(slug = %post.slug, category = %post.category, "blog post published");
        Ok(post)
    }
}

#[cfg(test)]
#[path = "postgres_test.rs"]
mod tests;
