//! Kedai Core - Shared types library.
//!
//! This crate provides common types used across all Kedai components:
//! - `client` - Storefront client core (stores + API client)
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! persistence. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, session identifiers,
//!   prices, emails, and user roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
