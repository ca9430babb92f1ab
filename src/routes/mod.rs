//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! JSON endpoints for auth and content live under `/api`; everything else
//! is the static website served from `WEBSITE_DIR`. The guard middleware
//! wraps the whole router, so private pages redirect before any file is read.

pub mod auth;
pub mod content;
pub mod pages;

use axum::Router;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/sign-in", post(auth::sign_in))
        .route("/api/auth/sign-up", post(auth::sign_up))
        .route("/api/auth/sign-out", post(auth::sign_out))
        .route("/api/auth/session", get(auth::session_state))
        .route("/api/guard", get(auth::guard_verdict))
        .route("/api/content/blog", get(content::list_blog_posts))
        .route("/api/content/projects", get(content::list_projects))
        .route("/api/content/testimonials", get(content::list_testimonials))
        .route("/api/content/banners", get(content::list_banners))
        .route("/api/admin/blog", post(content::publish_blog_post))
}

/// Full site: API routes, sitemap, and the guarded static website.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let website = ServeDir::new(&state.config.website_dir).append_index_html_on_directories(true);

    api_routes()
        .route("/sitemap.xml", get(pages::sitemap))
        .route("/healthz", get(healthz))
        .fallback_service(website)
        .layer(middleware::from_fn_with_state(state.clone(), pages::guard_pages))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
