//! Admin account provisioning.
//!
//! Creates the identity account and its `users/{uid}` profile document.
//! The console itself gates on `ADMIN_EMAIL`, so remember to set that to
//! the same address.

use cybee_core::Email;
use cybee_firebase::{AuthError, FirestoreClient, IdentityClient};

use super::{CliError, firebase_from_env};

/// Create the admin account.
///
/// If the account already exists, signs in instead to fetch its `uid` and
/// still (re)writes the profile document, so the command is safe to rerun.
pub async fn create(email: &str, password: &str) -> Result<(), CliError> {
    let email = Email::parse(email).map_err(|e| CliError::InvalidInput(e.to_string()))?;

    let config = firebase_from_env()?;
    let identity = IdentityClient::new(&config);
    let firestore = FirestoreClient::new(&config);

    let auth = match identity.sign_up(email.as_str(), password).await {
        Ok(auth) => {
            tracing::info!(uid = %auth.uid, "admin account created");
            auth
        }
        Err(AuthError::EmailExists) => {
            tracing::info!("account already exists, signing in");
            identity.sign_in(email.as_str(), password).await?
        }
        Err(e) => return Err(e.into()),
    };

    let mut profile = serde_json::Map::new();
    profile.insert(
        "email".to_owned(),
        serde_json::Value::String(email.to_string()),
    );
    firestore
        .patch_document("users", auth.uid.as_str(), profile, &["email"])
        .await?;

    tracing::info!(uid = %auth.uid, email = %email, "admin profile written");
    tracing::info!("set ADMIN_EMAIL={email} for the admin console");
    Ok(())
}
