//! Content routes — read-only listings plus admin blog publishing.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use tracing::info;

use super::auth::AdminUser;
use crate::content::{Banner, BlogPost, ContentFilter, NewBlogPost, Project, StoreError, Testimonial};
use crate::state::AppState;

pub(crate) fn store_error_to_status(err: StoreError) -> StatusCode {
    match err {
        StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        StoreError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        StoreError::Conflict(_) => StatusCode::CONFLICT,
        StoreError::Query(_) | StoreError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BlogQuery {
    category: Option<String>,
    limit: Option<u32>,
    newest: Option<bool>,
}

impl BlogQuery {
    fn filter(self) -> ContentFilter {
        ContentFilter { category: self.category, newest_first: self.newest.unwrap_or(false), limit: self.limit }
    }
}

/// `GET /api/content/blog`
pub async fn list_blog_posts(
    State(state): State<AppState>,
    Query(query): Query<BlogQuery>,
) -> Result<Json<Vec<BlogPost>>, StatusCode> {
    state
        .content
        .blog_posts(&query.filter())
        .await
        .map(Json)
        .map_err(store_error_to_status)
}

#[derive(Debug, Default, Deserialize)]
pub struct KindQuery {
    kind: Option<String>,
}

/// `GET /api/content/projects`
pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<KindQuery>,
) -> Result<Json<Vec<Project>>, StatusCode> {
    let filter = ContentFilter { category: query.kind, ..ContentFilter::all() };
    state
        .content
        .projects(&filter)
        .await
        .map(Json)
        .map_err(store_error_to_status)
}

#[derive(Debug, Default, Deserialize)]
pub struct ServiceQuery {
    service: Option<String>,
}

/// `GET /api/content/testimonials`
pub async fn list_testimonials(
    State(state): State<AppState>,
    Query(query): Query<ServiceQuery>,
) -> Result<Json<Vec<Testimonial>>, StatusCode> {
    let filter = ContentFilter { category: query.service, ..ContentFilter::all() };
    state
        .content
        .testimonials(&filter)
        .await
        .map(Json)
        .map_err(store_error_to_status)
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    page: Option<String>,
}

/// `GET /api/content/banners`
pub async fn list_banners(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<Banner>>, StatusCode> {
    let filter = ContentFilter { category: query.page, ..ContentFilter::all() };
    state
        .content
        .banners(&filter)
        .await
        .map(Json)
        .map_err(store_error_to_status)
}

/// `POST /api/admin/blog` — author defaults to the admin's display name.
pub async fn publish_blog_post(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(mut draft): Json<NewBlogPost>,
) -> Result<(StatusCode, Json<BlogPost>), StatusCode> {
    if draft.author.as_deref().is_none_or(|a| a.trim().is_empty()) {
        draft.author = admin.identity.display_name.clone().or_else(|| admin.identity.email.clone());
    }
    let post = state
        .content
        .publish_blog_post(&draft)
        .await
        .map_err(store_error_to_status)?;
    info!(uid = %admin.identity.uid, slug = %post.slug, "admin published blog post");
    Ok((StatusCode::CREATED, Json(post)))
}

#[cfg(test)]
#[path = "content_test.rs"]
mod tests;
