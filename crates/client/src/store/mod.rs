//! Stateful client stores.
//!
//! Two stores own all client-side state with consistency concerns:
//!
//! - [`AuthStore`] - the signed-in identity and bearer token
//! - [`CartStore`] - the local mirror of the session-scoped server cart
//!
//! Both follow the same contract: the backend is the authority, local state
//! is a cache of the last server-confirmed result (write-after-confirm, no
//! speculative mutations), each persists a whitelisted slice of its state
//! after every accepted mutation, and each restores that slice exactly once
//! at construction. Mutating operations never return `Err`; callers receive
//! an [`ActionOutcome`] and user-facing feedback goes through the injected
//! [`Notify`](crate::notify::Notify) port.

mod auth;
mod cart;

pub use auth::{AuthSnapshot, AuthStore};
pub use cart::{CartSnapshot, CartStore};

/// Result object returned by every mutating store operation.
///
/// Errors are reported, never thrown: the `error` string is the same
/// human-readable message that went to the notification port, so callers can
/// use `success` for flow control (e.g., navigate after login) without
/// implementing their own error handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    /// Whether the backend accepted the operation.
    pub success: bool,
    /// Human-readable failure message when `success` is false.
    pub error: Option<String>,
}

impl ActionOutcome {
    /// A successful outcome.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    /// A failed outcome carrying a user-facing message.
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}
