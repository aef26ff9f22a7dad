//! Core types for Kedai.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod role;
pub mod session;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use role::Role;
pub use session::SessionId;
