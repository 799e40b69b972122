//! Cybee Admin library.
//!
//! The admin console as a library, so integration tests can reach the
//! routers and models directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
