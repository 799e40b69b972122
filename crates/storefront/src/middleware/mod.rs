//! HTTP middleware and extractors.

pub mod auth;
pub mod session;

pub use auth::MaybeUser;
pub use session::create_session_layer;
