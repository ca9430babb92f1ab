//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own persistence and rendering concerns so route handlers
//! can stay focused on protocol translation and auth plumbing.

pub mod session;
pub mod sitemap;
