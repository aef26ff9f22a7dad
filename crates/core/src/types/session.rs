//! Client-generated cart session identifier.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Number of random characters in a generated session identifier.
const SUFFIX_LENGTH: usize = 9;

/// An opaque identifier scoping an anonymous cart on the backend.
///
/// Generated once per installation in the form
/// `session_<unix-millis>_<random alphanumeric>` and persisted alongside the
/// cart snapshot. The identifier is stable for the lifetime of the persisted
/// storage and is only regenerated when absent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh session identifier.
    #[must_use]
    pub fn generate() -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        Self(format!("session_{millis}_{}", random_suffix(SUFFIX_LENGTH)))
    }

    /// Wrap an existing identifier (e.g., restored from a snapshot).
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generate a random alphanumeric string.
fn random_suffix(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    use rand::Rng;
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            // SAFETY: idx is always within bounds since random_range returns 0..CHARSET.len()
            char::from(*CHARSET.get(idx).expect("idx within bounds"))
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_format() {
        let id = SessionId::generate();
        let mut parts = id.as_str().splitn(3, '_');

        assert_eq!(parts.next(), Some("session"));

        let millis = parts.next().unwrap();
        assert!(!millis.is_empty());
        assert!(millis.chars().all(|c| c.is_ascii_digit()));

        let suffix = parts.next().unwrap();
        assert_eq!(suffix.len(), SUFFIX_LENGTH);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(SessionId::generate(), SessionId::generate());
    }

    #[test]
    fn test_serde_transparent() {
        let id = SessionId::new("session_123_abcDEF456");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"session_123_abcDEF456\"");
        assert_eq!(serde_json::from_str::<SessionId>(&json).unwrap(), id);
    }
}
