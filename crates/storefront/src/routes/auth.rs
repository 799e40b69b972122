//! Authentication routes - email/password login and registration.
//!
//! On a successful sign-in the session switches from guest to user, and any
//! guest cart is migrated into the account cart before the redirect. A failed
//! migration is logged and absorbed: the guest cart stays in the session and
//! login still succeeds.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use cybee_core::Email;
use cybee_firebase::{AuthError, AuthUser};

use crate::error::AppError;
use crate::middleware::MaybeUser;
use crate::models::{CurrentUser, session_keys};
use crate::routes::cart::cart_service;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub signed_in: bool,
}

/// Registration page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
    pub signed_in: bool,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the login page.
#[instrument(skip_all)]
pub async fn login_page(user: MaybeUser) -> Response {
    if user.0.is_some() {
        return Redirect::to("/").into_response();
    }
    LoginTemplate { error: None, signed_in: false }.into_response()
}

/// Handle a login submission.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let auth = match state.identity().sign_in(&form.email, &form.password).await {
        Ok(auth) => auth,
        Err(e) => {
            tracing::info!(error = %e, "sign-in rejected");
            return Ok(LoginTemplate {
                error: Some(login_error_message(&e)),
                signed_in: false,
            }
            .into_response());
        }
    };

    establish_session(&state, &session, auth).await?;
    Ok(Redirect::to("/").into_response())
}

/// Display the registration page.
#[instrument(skip_all)]
pub async fn register_page(user: MaybeUser) -> Response {
    if user.0.is_some() {
        return Redirect::to("/").into_response();
    }
    RegisterTemplate { error: None, signed_in: false }.into_response()
}

/// Handle a registration submission.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    if form.password != form.password_confirm {
        return Ok(RegisterTemplate {
            error: Some("Passwords do not match".to_owned()),
            signed_in: false,
        }
        .into_response());
    }

    let auth = match state.identity().sign_up(&form.email, &form.password).await {
        Ok(auth) => auth,
        Err(e) => {
            tracing::info!(error = %e, "sign-up rejected");
            return Ok(RegisterTemplate {
                error: Some(login_error_message(&e)),
                signed_in: false,
            }
            .into_response());
        }
    };

    // Seed the account document so later cart writes merge into an
    // existing profile. Failure here is not fatal to registration.
    let mut profile = serde_json::Map::new();
    profile.insert(
        "email".to_owned(),
        serde_json::Value::String(auth.email.clone()),
    );
    if let Err(e) = state
        .firestore()
        .patch_document("users", auth.uid.as_str(), profile, &["email"])
        .await
    {
        tracing::error!(error = %e, "failed to seed account document");
    }

    establish_session(&state, &session, auth).await?;
    Ok(Redirect::to("/").into_response())
}

/// Log out and return to the storefront.
///
/// Only the user key is dropped; the session itself survives, holding an
/// empty guest cart. Items added after logout never migrate back into the
/// account on the next sign-in unless they were really re-added.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Redirect, AppError> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .map_err(crate::cart::CartError::from)?;
    Ok(Redirect::to("/"))
}

// =============================================================================
// Helpers
// =============================================================================

/// Record the signed-in user and migrate any guest cart into the account.
async fn establish_session(
    state: &AppState,
    session: &Session,
    auth: AuthUser,
) -> Result<(), AppError> {
    let email = Email::parse(&auth.email).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let uid = auth.uid;

    let mut service = cart_service(state, session.clone(), &MaybeUser(None));
    match service.set_current_user(Some(uid.clone())).await {
        Ok(outcome) => tracing::debug!(?outcome, "guest cart migration finished"),
        Err(e) => {
            // Guest cart stays in the session for a later retry.
            tracing::error!(error = %e, "guest cart migration failed");
        }
    }

    session
        .insert(session_keys::CURRENT_USER, &CurrentUser { uid, email })
        .await
        .map_err(crate::cart::CartError::from)?;
    Ok(())
}

fn login_error_message(error: &AuthError) -> String {
    match error {
        AuthError::Http(_) | AuthError::Service(_) => {
            "Something went wrong, please try again".to_owned()
        }
        other => other.to_string(),
    }
}
