//! CLI command implementations.

pub mod admin;
pub mod seed;

use secrecy::SecretString;
use thiserror::Error;

use cybee_firebase::{AuthError, FirebaseConfig, FirebaseError};

/// Errors shared by all CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Backend request failed.
    #[error("Backend error: {0}")]
    Firebase(#[from] FirebaseError),

    /// Identity Toolkit call failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Invalid command input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Load the Firebase project settings from the environment.
pub fn firebase_from_env() -> Result<FirebaseConfig, CliError> {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    let var = |name: &'static str| {
        std::env::var(name)
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or(CliError::MissingEnvVar(name))
    };

    Ok(FirebaseConfig {
        project_id: var("FIREBASE_PROJECT_ID")?,
        api_key: SecretString::from(var("FIREBASE_API_KEY")?),
    })
}
