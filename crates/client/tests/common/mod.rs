//! Shared test harness: recording notifier and store wiring against a mock
//! backend.

// Not every test binary uses every helper
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use kedai_client::api::ApiClient;
use kedai_client::config::ClientConfig;
use kedai_client::notify::Notify;
use kedai_client::persist::MemorySnapshotStore;

/// Notifier that records every message for assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    successes: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn successes(&self) -> Vec<String> {
        self.successes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notify for RecordingNotifier {
    fn success(&self, message: &str) {
        self.successes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}

/// Wiring for one test: API client against the mock server plus in-memory
/// storage and a recording notifier.
pub struct Harness {
    pub api: ApiClient,
    pub storage: Arc<MemorySnapshotStore>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn harness(base_url: &str) -> Harness {
    let config = ClientConfig::new(
        base_url.parse().expect("mock server URL must parse"),
        PathBuf::from("unused"),
    );
    Harness {
        api: ApiClient::new(&config).expect("client must build"),
        storage: Arc::new(MemorySnapshotStore::new()),
        notifier: Arc::new(RecordingNotifier::new()),
    }
}
