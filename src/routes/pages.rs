//! Static pages behind the route guard, plus the sitemap.

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, warn};

use super::auth::resolve_session;
use crate::content::ContentFilter;
use crate::guard::{self, Verdict};
use crate::services::sitemap;
use crate::state::AppState;

/// Middleware applying the guard to every request. Public paths pass
/// straight through without a session lookup.
pub async fn guard_pages(State(state): State<AppState>, jar: CookieJar, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    if !guard::classify(&path).is_private() {
        return next.run(request).await;
    }

    // A failed lookup is treated as anonymous so private pages fail closed.
    let identity = match resolve_session(&state, &jar).await {
        Ok(resolved) => resolved.map(|(_, identity)| identity),
        Err(e) => {
            warn!(error = %e, %path, "session lookup failed");
            None
        }
    };

    match guard::decide(&path, &state.session_state(identity)) {
        Verdict::Allow => next.run(request).await,
        Verdict::RedirectTo(target) => {
            debug!(%path, %target, "guard redirect");
            Redirect::temporary(&target).into_response()
        }
    }
}

/// `GET /sitemap.xml` — lists static pages only when the store is down.
pub async fn sitemap(State(state): State<AppState>) -> Response {
    let posts = state
        .content
        .blog_posts(&ContentFilter::all().newest_first())
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "sitemap degraded to static pages");
            Vec::new()
        });
    let xml = sitemap::render_sitemap(&state.config.site_url, &posts);
    ([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], xml).into_response()
}

#[cfg(test)]
#[path = "pages_test.rs"]
mod tests;
