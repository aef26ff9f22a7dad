//! REST client for the coffee-shop backend.
//!
//! # Architecture
//!
//! - Plain REST over `reqwest` with a fixed request timeout for every call
//! - The backend is the source of truth - no local sync, direct API calls
//! - In-memory caching via `moka` for the menu catalog (5 minute TTL);
//!   cart, auth, and order calls are never cached
//! - A bearer token is attached from the shared [`TokenSlot`](crate::token::TokenSlot)
//!   whenever one is present; a 401 response clears that slot
//!
//! # Example
//!
//! ```rust,ignore
//! use kedai_client::api::ApiClient;
//! use kedai_client::api::types::Credentials;
//!
//! let api = ApiClient::new(&config)?;
//!
//! // Browse the menu (cached)
//! let items = api.menu_items(Some("coffee")).await?;
//!
//! // Sign in; subsequent calls carry the bearer token
//! let payload = api.login(&Credentials {
//!     email: "user@example.com".into(),
//!     password: "secret".into(),
//! }).await?;
//! api.token_slot().set(payload.token.into());
//! ```

mod client;
pub mod types;

pub use client::ApiClient;

use thiserror::Error;

/// Fallback shown when the backend gives no usable error message.
pub(crate) const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Errors that can occur when talking to the coffee-shop backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport failed (includes the fixed request timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("{message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body, or a generic fallback.
        message: String,
    },

    /// Response body could not be parsed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Request URL could not be built.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Whether this is an authentication failure (401).
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }

    /// Human-readable message suitable for a user-facing notification.
    ///
    /// Backend-reported messages (validation/business errors) pass through
    /// verbatim; transport and parse failures collapse to a generic message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            Self::Http(_) | Self::Parse(_) | Self::Url(_) => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}
