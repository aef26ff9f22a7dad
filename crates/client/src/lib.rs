//! Kedai client core.
//!
//! The headless client layer of the Kedai coffee-shop storefront: everything
//! a front end needs to talk to the backend and keep client-side state
//! consistent, with no rendering concerns.
//!
//! # Architecture
//!
//! - [`api`] - REST client for the coffee-shop backend (`reqwest`, fixed
//!   request timeout, bearer-token attachment, menu catalog caching)
//! - [`store`] - the two stateful stores: the auth session and the
//!   session-scoped cart. The backend is the source of truth; the stores are
//!   caches of the last server-confirmed state (write-after-confirm)
//! - [`persist`] - explicit JSON snapshot persistence with per-store
//!   namespaces, restored once at startup
//! - [`notify`] - notification port so store outcomes can surface in any UI
//! - [`token`] - the ambient bearer-token slot shared between the auth store
//!   and the HTTP client
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use kedai_client::api::ApiClient;
//! use kedai_client::config::ClientConfig;
//! use kedai_client::notify::LogNotifier;
//! use kedai_client::persist::FileSnapshotStore;
//! use kedai_client::store::{AuthStore, CartStore};
//!
//! let config = ClientConfig::from_env()?;
//! let storage = Arc::new(FileSnapshotStore::new(&config.data_dir)?);
//! let notify = Arc::new(LogNotifier);
//! let api = ApiClient::new(&config)?;
//!
//! let auth = AuthStore::new(api.clone(), storage.clone(), notify.clone());
//! let cart = CartStore::new(api, storage, notify);
//! cart.initialize().await;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod notify;
pub mod persist;
pub mod store;
pub mod token;
