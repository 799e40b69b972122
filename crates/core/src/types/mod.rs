//! Core types for Cybee.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod currency;
pub mod email;
pub mod id;
pub mod order;
pub mod product;

pub use cart::{LineItem, subtotal, total_quantity};
pub use currency::Currency;
pub use email::{Email, EmailError};
pub use id::*;
pub use order::{Order, OrderStatus, OrderStatusError};
pub use product::Product;
