//! Identity Toolkit REST client (email/password auth).

use std::sync::Arc;

use cybee_core::UserId;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::FirebaseConfig;

const IDENTITY_BASE: &str = "https://identitytoolkit.googleapis.com/v1";

/// Authentication failures, mapped from Identity Toolkit error codes.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong email or password. The API reports several codes for this
    /// (`EMAIL_NOT_FOUND`, `INVALID_PASSWORD`, `INVALID_LOGIN_CREDENTIALS`);
    /// they are collapsed so the UI cannot leak which half was wrong.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Sign-up with an email that already has an account.
    #[error("an account with this email already exists")]
    EmailExists,

    /// Password rejected by the service's policy.
    #[error("password too weak: {0}")]
    WeakPassword(String),

    /// Account temporarily locked after repeated failures.
    #[error("too many attempts, try again later")]
    TooManyAttempts,

    /// Account disabled by an administrator.
    #[error("account disabled")]
    UserDisabled,

    /// HTTP transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Anything else the API reported.
    #[error("auth error: {0}")]
    Service(String),
}

/// The signed-in identity returned by the service.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Stable user ID (`localId` on the wire).
    pub uid: UserId,
    /// Email the account was registered with.
    pub email: String,
    /// Short-lived ID token. Unused by the server-rendered site today but
    /// returned so callers do not need a second round trip if they want it.
    pub id_token: SecretString,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PasswordResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    id_token: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Client for the Identity Toolkit REST API.
#[derive(Clone)]
pub struct IdentityClient {
    inner: Arc<IdentityClientInner>,
}

struct IdentityClientInner {
    http: reqwest::Client,
    api_key: SecretString,
}

impl IdentityClient {
    /// Create a new client for the configured project.
    #[must_use]
    pub fn new(config: &FirebaseConfig) -> Self {
        Self {
            inner: Arc::new(IdentityClientInner {
                http: reqwest::Client::new(),
                api_key: config.api_key.clone(),
            }),
        }
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for a wrong email/password,
    /// other variants per the service's error code.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        self.password_call("accounts:signInWithPassword", email, password)
            .await
    }

    /// Create an account with email and password.
    ///
    /// The caller is responsible for creating the matching `users/{uid}`
    /// profile document afterwards.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmailExists` if the email is taken,
    /// `AuthError::WeakPassword` if the password is rejected.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        self.password_call("accounts:signUp", email, password).await
    }

    async fn password_call(
        &self,
        endpoint: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, AuthError> {
        let response = self
            .inner
            .http
            .post(format!("{IDENTITY_BASE}/{endpoint}"))
            .query(&[("key", self.inner.api_key.expose_secret())])
            .json(&PasswordRequest {
                email,
                password,
                return_secure_token: true,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let code = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or_default();
            tracing::warn!(status = %status, code = %code, "identity request rejected");
            return Err(map_error_code(&code));
        }

        let parsed: PasswordResponse = serde_json::from_str(&body)
            .map_err(|e| AuthError::Service(format!("malformed response: {e}")))?;

        Ok(AuthUser {
            uid: UserId::new(parsed.local_id),
            email: parsed.email,
            id_token: SecretString::from(parsed.id_token),
        })
    }
}

/// Map an Identity Toolkit error code to our taxonomy.
fn map_error_code(code: &str) -> AuthError {
    // Codes sometimes carry a suffix, e.g. "WEAK_PASSWORD : Password should
    // be at least 6 characters". Match on the prefix.
    let (prefix, detail) = code
        .split_once(':')
        .map_or((code.trim(), ""), |(p, d)| (p.trim(), d.trim()));

    match prefix {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "INVALID_EMAIL" => {
            AuthError::InvalidCredentials
        }
        "EMAIL_EXISTS" => AuthError::EmailExists,
        "WEAK_PASSWORD" => AuthError::WeakPassword(if detail.is_empty() {
            "password should be at least 6 characters".to_owned()
        } else {
            detail.to_owned()
        }),
        "TOO_MANY_ATTEMPTS_TRY_LATER" => AuthError::TooManyAttempts,
        "USER_DISABLED" => AuthError::UserDisabled,
        other => AuthError::Service(other.to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_error_codes() {
        assert!(matches!(
            map_error_code("EMAIL_NOT_FOUND"),
            AuthError::InvalidCredentials
        ));
        assert!(matches!(
            map_error_code("INVALID_LOGIN_CREDENTIALS"),
            AuthError::InvalidCredentials
        ));
        assert!(matches!(map_error_code("EMAIL_EXISTS"), AuthError::EmailExists));
        assert!(matches!(
            map_error_code("TOO_MANY_ATTEMPTS_TRY_LATER"),
            AuthError::TooManyAttempts
        ));
    }

    #[test]
    fn test_weak_password_detail_passthrough() {
        match map_error_code("WEAK_PASSWORD : Password should be at least 6 characters") {
            AuthError::WeakPassword(detail) => {
                assert_eq!(detail, "Password should be at least 6 characters");
            }
            other => panic!("expected WeakPassword, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_code_is_service_error() {
        assert!(matches!(
            map_error_code("OPERATION_NOT_ALLOWED"),
            AuthError::Service(_)
        ));
    }
}
