//! Auth session store.
//!
//! Holds the current user identity and bearer token, persists them across
//! restarts, and mediates every identity-changing operation through the
//! backend. Role checks are synchronous reads; everything else is
//! write-after-confirm.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use kedai_core::Role;

use crate::api::ApiClient;
use crate::api::types::{Credentials, PasswordChange, ProfileUpdate, Registration, User};
use crate::notify::Notify;
use crate::persist::{SnapshotStore, namespaces};
use crate::store::ActionOutcome;

/// Persisted slice of the auth state.
///
/// `is_loading` is deliberately not part of the snapshot; it is transient
/// and always starts true until rehydration completes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSnapshot {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
}

struct AuthState {
    user: Option<User>,
    token: Option<SecretString>,
    is_authenticated: bool,
    is_loading: bool,
}

/// The auth session store.
///
/// Cheaply cloneable via `Arc`; all clones observe the same state.
#[derive(Clone)]
pub struct AuthStore {
    inner: Arc<AuthStoreInner>,
}

struct AuthStoreInner {
    api: ApiClient,
    storage: Arc<dyn SnapshotStore>,
    notify: Arc<dyn Notify>,
    state: RwLock<AuthState>,
}

impl AuthStore {
    /// Create the store and rehydrate it from persisted storage.
    ///
    /// Rehydration runs exactly once, here: if the snapshot holds both a
    /// user and a token the store comes up Ready(authenticated) and the
    /// token is re-mirrored into the ambient slot used by the HTTP client;
    /// otherwise it comes up Ready(anonymous). Either way `is_loading`
    /// transitions true -> false exactly once.
    #[must_use]
    pub fn new(api: ApiClient, storage: Arc<dyn SnapshotStore>, notify: Arc<dyn Notify>) -> Self {
        let store = Self {
            inner: Arc::new(AuthStoreInner {
                api,
                storage,
                notify,
                state: RwLock::new(AuthState {
                    user: None,
                    token: None,
                    is_authenticated: false,
                    is_loading: true,
                }),
            }),
        };
        store.hydrate();
        store
    }

    fn hydrate(&self) {
        let snapshot = match self.inner.storage.load(namespaces::AUTH) {
            Ok(Some(raw)) => match serde_json::from_str::<AuthSnapshot>(&raw) {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    tracing::warn!("Discarding unreadable auth snapshot: {e}");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to load auth snapshot: {e}");
                None
            }
        };

        let mut state = self.write_state();
        if let Some(snapshot) = snapshot
            && let (Some(user), Some(token)) = (snapshot.user, snapshot.token)
        {
            let token = SecretString::from(token);
            self.inner.api.token_slot().set(token.clone());
            state.user = Some(user);
            state.token = Some(token);
            state.is_authenticated = true;
        }
        state.is_loading = false;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The signed-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.read_state().user.clone()
    }

    /// Whether a user is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read_state().is_authenticated
    }

    /// Whether rehydration or a mutating operation is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.read_state().is_loading
    }

    /// Whether the current user's role is one of `required`.
    ///
    /// Returns `false` when no user is present.
    #[must_use]
    pub fn has_role(&self, required: &[Role]) -> bool {
        self.read_state()
            .user
            .as_ref()
            .is_some_and(|user| required.contains(&user.role))
    }

    /// Staff-or-above check.
    #[must_use]
    pub fn is_staff(&self) -> bool {
        self.has_role(&[Role::Staff, Role::Manager, Role::Admin])
    }

    /// Manager-or-above check.
    #[must_use]
    pub fn is_manager(&self) -> bool {
        self.has_role(&[Role::Manager, Role::Admin])
    }

    /// Admin check.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.has_role(&[Role::Admin])
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Sign in. On success the user and token are stored and mirrored into
    /// the ambient token slot; on failure the previous identity fields are
    /// left untouched.
    #[instrument(skip(self, credentials))]
    pub async fn login(&self, credentials: &Credentials) -> ActionOutcome {
        self.set_loading(true);
        match self.inner.api.login(credentials).await {
            Ok(payload) => {
                let name = payload.user.name.clone();
                self.accept_identity(payload.user, payload.token);
                self.inner.notify.success(&format!("Welcome back, {name}"));
                ActionOutcome::ok()
            }
            Err(e) => self.reject("Login failed", &e),
        }
    }

    /// Create an account and sign in. Same contract as [`login`](Self::login).
    #[instrument(skip(self, registration))]
    pub async fn register(&self, registration: &Registration) -> ActionOutcome {
        self.set_loading(true);
        match self.inner.api.register(registration).await {
            Ok(payload) => {
                let name = payload.user.name.clone();
                self.accept_identity(payload.user, payload.token);
                self.inner.notify.success(&format!("Welcome, {name}"));
                ActionOutcome::ok()
            }
            Err(e) => self.reject("Registration failed", &e),
        }
    }

    /// Sign out. Clears user, token, and the authenticated flag atomically,
    /// removes the token from the ambient slot and from persisted storage.
    /// Local only - no backend call - and always succeeds.
    #[instrument(skip(self))]
    pub fn logout(&self) {
        {
            let mut state = self.write_state();
            state.user = None;
            state.token = None;
            state.is_authenticated = false;
        }
        self.inner.api.token_slot().clear();
        self.persist();
        self.inner.notify.success("Signed out");
    }

    /// Update the profile. On success the returned user is mirrored into
    /// state; on failure state is unchanged.
    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> ActionOutcome {
        self.set_loading(true);
        match self.inner.api.update_profile(update).await {
            Ok(user) => {
                {
                    let mut state = self.write_state();
                    state.user = Some(user);
                    state.is_loading = false;
                }
                self.persist();
                self.inner.notify.success("Profile updated");
                ActionOutcome::ok()
            }
            Err(e) => self.reject("Profile update failed", &e),
        }
    }

    /// Change the password. No local state changes beyond the loading flag.
    #[instrument(skip(self, change))]
    pub async fn change_password(&self, change: &PasswordChange) -> ActionOutcome {
        self.set_loading(true);
        match self.inner.api.change_password(change).await {
            Ok(()) => {
                self.set_loading(false);
                self.inner.notify.success("Password changed");
                ActionOutcome::ok()
            }
            Err(e) => self.reject("Password change failed", &e),
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn read_state(&self) -> RwLockReadGuard<'_, AuthState> {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, AuthState> {
        self.inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn set_loading(&self, loading: bool) {
        self.write_state().is_loading = loading;
    }

    /// Store a confirmed identity, mirror the token, persist, clear loading.
    fn accept_identity(&self, user: User, token: String) {
        let token = SecretString::from(token);
        {
            let mut state = self.write_state();
            state.user = Some(user);
            state.token = Some(token.clone());
            state.is_authenticated = true;
            state.is_loading = false;
        }
        self.inner.api.token_slot().set(token);
        self.persist();
    }

    /// Log a failure, notify, clear loading, and build the outcome.
    fn reject(&self, context: &str, error: &crate::api::ApiError) -> ActionOutcome {
        self.set_loading(false);
        let message = error.user_message();
        tracing::warn!("{context}: {error}");
        self.inner.notify.error(&message);
        ActionOutcome::fail(message)
    }

    fn persist(&self) {
        let snapshot = {
            let state = self.read_state();
            AuthSnapshot {
                user: state.user.clone(),
                token: state
                    .token
                    .as_ref()
                    .map(|t| t.expose_secret().to_string()),
                is_authenticated: state.is_authenticated,
            }
        };
        match serde_json::to_string(&snapshot) {
            Ok(raw) => {
                if let Err(e) = self.inner.storage.save(namespaces::AUTH, &raw) {
                    tracing::warn!("Failed to persist auth snapshot: {e}");
                }
            }
            Err(e) => tracing::warn!("Failed to serialize auth snapshot: {e}"),
        }
    }
}
