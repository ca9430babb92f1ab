//! Server-side session management.
//!
//! ARCHITECTURE
//! ============
//! A successful sign-in or sign-up stores a snapshot of the identity next to
//! an opaque random token; the token travels in the `session_token` cookie.
//! The identity service is not consulted again until the session expires.
//!
//! TRADE-OFFS
//! ==========
//! Expired rows are filtered on read and removed by a periodic sweeper, so a
//! stalled sweeper never resurrects a session.

use std::fmt::Write;
use std::time::Duration;

use rand::Rng;
use sqlx::{PgPool, Row};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::identity::Identity;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// Create a session for the given identity, returning the token.
pub async fn create_session(pool: &PgPool, identity: &Identity) -> Result<String, sqlx::Error> {
    let token = generate_token();
    sqlx::query("INSERT INTO sessions (token, uid, email, display_name) VALUES ($1, $2, $3, $4)")
        .bind(&token)
        .bind(&identity.uid)
        .bind(identity.email.as_deref())
        .bind(identity.display_name.as_deref())
        .execute(pool)
        .await?;
    Ok(token)
}

/// Look up the identity behind an unexpired session token.
pub async fn load_session(pool: &PgPool, token: &str) -> Result<Option<Identity>, sqlx::Error> {
    let row = sqlx::query("SELECT uid, email, display_name FROM sessions WHERE token = $1 AND expires_at > now()")
        .bind(token)
        .fetch_optional(pool)
        .await?;

    row.map(|r| {
        Ok::<_, sqlx::Error>(Identity {
            uid: r.try_get("uid")?,
            email: r.try_get("email")?,
            display_name: r.try_get("display_name")?,
        })
    })
    .transpose()
}

/// Delete a session by token.
pub async fn delete_session(pool: &PgPool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

/// Delete every expired session, returning how many were removed.
pub async fn purge_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= now()")
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Spawn the hourly expired-session sweeper.
#[must_use]
pub fn spawn_session_sweeper(pool: PgPool) -> JoinHandle<()> {
    info!(interval_secs = SWEEP_INTERVAL.as_secs(), "session sweeper configured");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            match purge_expired(&pool).await {
                Ok(0) => {}
                Ok(removed) => info!(removed, "expired sessions purged"),
                Err(e) => warn!(error = %e, "session sweep failed"),
            }
        }
    })
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
