//! Command implementations and shared wiring.

pub mod auth;
pub mod cart;
pub mod menu;
pub mod reserve;

use std::sync::Arc;

use thiserror::Error;

use kedai_client::api::ApiClient;
use kedai_client::config::ClientConfig;
use kedai_client::notify::LogNotifier;
use kedai_client::persist::FileSnapshotStore;
use kedai_client::store::{ActionOutcome, AuthStore, CartStore};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] kedai_client::config::ConfigError),

    /// Snapshot storage could not be opened.
    #[error("Storage error: {0}")]
    Storage(#[from] kedai_client::persist::StorageError),

    /// A backend call outside the stores failed.
    #[error("Backend error: {0}")]
    Api(#[from] kedai_client::api::ApiError),

    /// A store operation was rejected; the message was already notified.
    #[error("{0}")]
    Rejected(String),

    /// Bad command input.
    #[error("{0}")]
    Invalid(String),
}

/// Composition root: configuration, API client, and the two stores,
/// constructed once per invocation.
pub struct Context {
    pub api: ApiClient,
    pub auth: AuthStore,
    pub cart: CartStore,
}

impl Context {
    /// Wire everything up and reconcile the cart with the backend.
    ///
    /// The cart fetch inside [`CartStore::initialize`] falls back to the
    /// persisted local items when the backend is unreachable, so commands
    /// still work offline against the cached state.
    pub async fn bootstrap() -> Result<Self, CliError> {
        let config = ClientConfig::from_env()?;
        let storage = Arc::new(FileSnapshotStore::new(&config.data_dir)?);
        let notify = Arc::new(LogNotifier);
        let api = ApiClient::new(&config)?;

        let auth = AuthStore::new(api.clone(), storage.clone(), notify.clone());
        let cart = CartStore::new(api.clone(), storage, notify);
        cart.initialize().await;

        Ok(Self { api, auth, cart })
    }
}

/// Convert a store outcome into a command result (non-zero exit on failure).
pub fn check(outcome: ActionOutcome) -> Result<(), CliError> {
    if outcome.success {
        Ok(())
    } else {
        Err(CliError::Rejected(
            outcome.error.unwrap_or_else(|| "operation failed".to_string()),
        ))
    }
}
