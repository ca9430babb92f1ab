//! Site configuration parsed from environment variables.
//!
//! Required:
//! - `DATABASE_URL`
//! - `ADMIN_EMAIL`: the single account granted admin privilege
//! - `IDENTITY_API_KEY`: API key for the identity service
//!
//! Optional:
//! - `PORT`: default 3000
//! - `DB_MAX_CONNECTIONS`: default 5
//! - `IDENTITY_BASE_URL`: default Identity Toolkit v1 endpoint
//! - `IDENTITY_REQUEST_TIMEOUT_SECS`: default 15
//! - `IDENTITY_CONNECT_TIMEOUT_SECS`: default 5
//! - `WEBSITE_DIR`: static site root, default `website`
//! - `SITE_URL`: public origin used in the sitemap, default `http://localhost:3000`
//! - `COOKIE_SECURE`: defaults to true when `SITE_URL` is https

use std::path::PathBuf;

use crate::session::AdminEmail;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";
pub const DEFAULT_IDENTITY_REQUEST_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_IDENTITY_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_WEBSITE_DIR: &str = "website";
pub const DEFAULT_SITE_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeouts: IdentityTimeouts,
}

#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub admin_email: AdminEmail,
    pub identity: IdentityConfig,
    pub website_dir: PathBuf,
    pub site_url: String,
    pub cookie_secure: bool,
}

impl SiteConfig {
    /// Build the site config from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the site config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a required key is missing or a value fails to parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = required(&lookup, "DATABASE_URL")?;

        let admin_raw = required(&lookup, "ADMIN_EMAIL")?;
        if !admin_raw.contains('@') {
            return Err(ConfigError::Invalid { var: "ADMIN_EMAIL", reason: format!("not an email address: {admin_raw}") });
        }
        let admin_email = AdminEmail::new(admin_raw);

        let identity = IdentityConfig {
            api_key: required(&lookup, "IDENTITY_API_KEY")?,
            base_url: lookup("IDENTITY_BASE_URL")
                .unwrap_or_else(|| DEFAULT_IDENTITY_BASE_URL.to_owned())
                .trim_end_matches('/')
                .to_owned(),
            timeouts: IdentityTimeouts {
                request_secs: parsed(&lookup, "IDENTITY_REQUEST_TIMEOUT_SECS", DEFAULT_IDENTITY_REQUEST_TIMEOUT_SECS)?,
                connect_secs: parsed(&lookup, "IDENTITY_CONNECT_TIMEOUT_SECS", DEFAULT_IDENTITY_CONNECT_TIMEOUT_SECS)?,
            },
        };

        let site_url = lookup("SITE_URL")
            .unwrap_or_else(|| DEFAULT_SITE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();

        let cookie_secure = match lookup("COOKIE_SECURE") {
            Some(raw) => parse_bool(&raw)
                .ok_or_else(|| ConfigError::Invalid { var: "COOKIE_SECURE", reason: format!("not a boolean: {raw}") })?,
            None => site_url.starts_with("https://"),
        };

        Ok(Self {
            port: parsed(&lookup, "PORT", DEFAULT_PORT)?,
            database_url,
            db_max_connections: parsed(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?,
            admin_email,
            identity,
            website_dir: PathBuf::from(lookup("WEBSITE_DIR").unwrap_or_else(|| DEFAULT_WEBSITE_DIR.to_owned())),
            site_url,
            cookie_secure,
        })
    }
}

/// Parse a loose boolean: `1/true/yes/on` and `0/false/no/off`, case-insensitive.
#[must_use]
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn required<F>(lookup: &F, var: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(var))
}

fn parsed<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::Invalid { var, reason: e.to_string() }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
