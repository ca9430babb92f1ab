//! Route-authorization policy.
//!
//! `decide` is pure: the same path and session state always produce the same
//! verdict. Rules, first match wins:
//!
//! 1. auth still loading → allow (render a loading state, never redirect early)
//! 2. private area without an identity → `/login`
//! 3. admin area with a non-admin identity → `/dashboard`
//! 4. allow

use std::borrow::Cow;

use serde::Serialize;

use crate::session::SessionState;

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// First path segments that require a signed-in identity.
const PRIVATE_AREAS: &[&str] = &["dashboard", "admin"];
/// First path segment that additionally requires admin privilege.
const ADMIN_AREA: &str = "admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteClass {
    Public,
    Private,
    /// Admin routes are private as well.
    Admin,
}

impl RouteClass {
    #[must_use]
    pub fn is_private(self) -> bool {
        !matches!(self, Self::Public)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", content = "target", rename_all = "snake_case")]
pub enum Verdict {
    Allow,
    RedirectTo(String),
}

/// Classify a request path by its first canonical segment.
///
/// Query and fragment are ignored, percent-escapes decoded, empty and `.`
/// segments dropped and `..` resolved, so `/dashboard/`, `//dashboard` and
/// `/blog/../dashboard` all land in the dashboard area while `/dashboards`
/// does not.
#[must_use]
pub fn classify(path: &str) -> RouteClass {
    let decoded = percent_decode(strip_query(path));
    let segments = canonical_segments(&decoded);
    match segments.first() {
        Some(&first) if first == ADMIN_AREA => RouteClass::Admin,
        Some(first) if PRIVATE_AREAS.contains(first) => RouteClass::Private,
        _ => RouteClass::Public,
    }
}

#[must_use]
pub fn decide(path: &str, state: &SessionState) -> Verdict {
    if state.loading_auth() {
        return Verdict::Allow;
    }

    let class = classify(path);
    if class.is_private() && state.identity().is_none() {
        return Verdict::RedirectTo(LOGIN_PATH.to_owned());
    }
    if class == RouteClass::Admin && state.identity().is_some() && !state.is_admin() {
        return Verdict::RedirectTo(DASHBOARD_PATH.to_owned());
    }
    Verdict::Allow
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or_default()
}

fn canonical_segments(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments
}

/// Malformed escapes stay literal; invalid UTF-8 is replaced, never rejected.
fn percent_decode(path: &str) -> Cow<'_, str> {
    match urlencoding::decode_binary(path.as_bytes()) {
        Cow::Borrowed(bytes) => String::from_utf8_lossy(bytes),
        Cow::Owned(bytes) => Cow::Owned(String::from_utf8_lossy(&bytes).into_owned()),
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
