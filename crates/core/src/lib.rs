//! Cybee Core - Shared types library.
//!
//! This crate provides common types used across all Cybee components:
//! - `storefront` - Public-facing e-commerce site
//! - `admin` - Internal administration console
//! - `cli` - Command-line tools for seeding and account management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! Firestore access. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, line items, products, orders, currencies

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
