//! User-facing notification port.
//!
//! Store actions report every mutation outcome (success and failure) through
//! this port rather than importing a UI toast directly, so the transition
//! logic stays testable without a rendering dependency. The view layer is not
//! expected to surface these errors itself.

/// Sink for user-facing notifications.
pub trait Notify: Send + Sync {
    /// A mutation succeeded.
    fn success(&self, message: &str);

    /// A mutation failed; `message` is already human-readable.
    fn error(&self, message: &str);
}

/// Notifier that logs through `tracing`. Used by the CLI front end.
pub struct LogNotifier;

impl Notify for LogNotifier {
    fn success(&self, message: &str) {
        tracing::info!(target: "kedai::notify", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::warn!(target: "kedai::notify", "{message}");
    }
}

/// Notifier that drops everything. For embedders that surface outcomes
/// through the returned result objects alone.
pub struct NullNotifier;

impl Notify for NullNotifier {
    fn success(&self, _message: &str) {}

    fn error(&self, _message: &str) {}
}
