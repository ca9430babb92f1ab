//! Identity Toolkit REST client — email/password accounts.
//!
//! Speaks the `accounts:*` JSON API (`signInWithPassword`, `signUp`,
//! `update`). Error envelopes carry a machine code in `error.message`,
//! sometimes followed by ` : human text`; only the code is classified.

use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{AuthError, Credentials, Identity, IdentityBackend, Registration};
use crate::config::IdentityConfig;

pub struct IdentityToolkit {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    id_token: Option<String>,
}

impl From<AccountResponse> for Identity {
    fn from(resp: AccountResponse) -> Self {
        Self {
            uid: resp.local_id,
            email: resp.email.filter(|e| !e.is_empty()),
            display_name: resp.display_name.filter(|n| !n.trim().is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl IdentityToolkit {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &IdentityConfig) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| AuthError::Provider(e.to_string()))?;
        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/accounts:{method}?key={}", self.base_url, self.api_key)
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, body: &serde_json::Value) -> Result<T, AuthError> {
        let resp = self
            .http
            .post(self.endpoint(method))
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::NetworkFailure(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| AuthError::NetworkFailure(e.to_string()))?;
        debug!(method, %status, "identity service responded");

        if status.is_server_error() {
            return Err(AuthError::NetworkFailure(format!("{status}")));
        }
        if !status.is_success() {
            return Err(classify_error_body(&text));
        }
        serde_json::from_str(&text).map_err(|_| AuthError::Provider(format!("unexpected response: {text}")))
    }
}

#[async_trait::async_trait]
impl IdentityBackend for IdentityToolkit {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity, AuthError> {
        let body = serde_json::json!({
            "email": credentials.email.trim(),
            "password": credentials.password,
            "returnSecureToken": true,
        });
        let account: AccountResponse = self.call("signInWithPassword", &body).await?;
        Ok(account.into())
    }

    async fn sign_up(&self, registration: &Registration) -> Result<Identity, AuthError> {
        let body = serde_json::json!({
            "email": registration.email.trim(),
            "password": registration.password,
            "returnSecureToken": true,
        });
        let account: AccountResponse = self.call("signUp", &body).await?;

        let display_name = registration
            .display_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());
        let id_token = account.id_token.clone();
        let (Some(name), Some(id_token)) = (display_name, id_token) else {
            return Ok(account.into());
        };

        let update = serde_json::json!({
            "idToken": id_token,
            "displayName": name,
            "returnSecureToken": false,
        });
        // The account already exists at this point; a failed update only loses the name.
        match self.call::<AccountResponse>("update", &update).await {
            Ok(updated) => Ok(updated.into()),
            Err(e) => {
                warn!(error = %e, uid = %account.local_id, "display name update failed");
                Ok(account.into())
            }
        }
    }
}

/// Map an error response body to the auth taxonomy.
pub(crate) fn classify_error_body(body: &str) -> AuthError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => classify_error_code(&envelope.error.message),
        Err(_) => AuthError::Provider(format!("unexpected error response: {body}")),
    }
}

pub(crate) fn classify_error_code(message: &str) -> AuthError {
    let code = message.split([' ', ':']).next().unwrap_or_default();
    match code {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "USER_DISABLED" => {
            AuthError::InvalidCredentials
        }
        "EMAIL_EXISTS" => AuthError::EmailInUse,
        "WEAK_PASSWORD" => AuthError::WeakCredential,
        "INVALID_EMAIL" => AuthError::InvalidEmail,
        _ => AuthError::Provider(message.to_owned()),
    }
}

#[cfg(test)]
#[path = "toolkit_test.rs"]
mod tests;
