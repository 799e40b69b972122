//! Admin sign-in and sign-out.
//!
//! The console is single-tenant: only the configured admin email may sign
//! in, whatever other accounts exist in the identity backend.

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

use crate::error::AdminError;
use crate::models::{CurrentAdmin, session_keys};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
}

/// Display the login page.
#[instrument(skip_all)]
pub async fn login_page(session: Session) -> Response {
    let signed_in = session
        .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await
        .ok()
        .flatten()
        .is_some();
    if signed_in {
        return Redirect::to("/").into_response();
    }
    LoginTemplate { error: None }.into_response()
}

/// Handle a login submission.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AdminError> {
    // Reject non-admin emails before touching the identity backend.
    if !form
        .email
        .eq_ignore_ascii_case(state.config().admin_email.as_str())
    {
        tracing::warn!(email = %form.email, "non-admin sign-in attempt");
        return Ok(rejected());
    }

    let auth = match state.identity().sign_in(&form.email, &form.password).await {
        Ok(auth) => auth,
        Err(e) => {
            tracing::info!(error = %e, "admin sign-in rejected");
            return Ok(rejected());
        }
    };

    let email =
        Email::parse(&auth.email).map_err(|e| AdminError::BadRequest(e.to_string()))?;
    session
        .insert(
            session_keys::CURRENT_ADMIN,
            &CurrentAdmin {
                uid: auth.uid,
                email,
            },
        )
        .await?;

    Ok(Redirect::to("/").into_response())
}

/// Sign out and return to the login page.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Redirect, AdminError> {
    session
        .remove::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await?;
    Ok(Redirect::to("/auth/login"))
}

/// The one rejection body for every failed login path, so responses do not
/// reveal whether the email was the admin's.
fn rejected() -> Response {
    LoginTemplate {
        error: Some("Invalid email or password".to_owned()),
    }
    .into_response()
}
