//! studiosite — backend for a small agency's marketing site.
//!
//! ARCHITECTURE
//! ============
//! The core is the auth/session context and its collaborators:
//!
//! - `identity`: adapter over the external identity service plus the
//!   per-session auth-state fan-out.
//! - `content`: typed, read-mostly access to blog posts, projects,
//!   testimonials and banners.
//! - `session`: session state machine, derived admin flag and scoped
//!   provisioning.
//! - `guard`: the pure route-authorization policy.
//!
//! `routes`, `services` and `state` wrap the core in an axum server that
//! serves the static site behind the guard and exposes JSON endpoints.

pub mod config;
pub mod content;
pub mod db;
pub mod guard;
pub mod identity;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
