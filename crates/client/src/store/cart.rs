//! Cart store.
//!
//! Local mirror of the session-scoped server cart. Every mutation is
//! confirmed by the backend before it is treated as durable; the one
//! deliberate exception is [`initialize`](CartStore::initialize), which falls
//! back to the cached local items when the authoritative fetch fails.
//!
//! Operations are not queued or serialized against each other: two mutations
//! triggered concurrently race on the backend and local state reflects
//! whichever response lands last. The state lock is never held across an
//! await, so nothing accidentally serializes the calls either.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::instrument;

use kedai_core::{ItemId, Price, SessionId};

use crate::api::ApiClient;
use crate::api::types::{
    AddCartLineRequest, CartLine, CheckoutDetails, MenuItem, Order, OrderRequest,
    UpdateCartLineRequest, User,
};
use crate::notify::Notify;
use crate::persist::{SnapshotStore, namespaces};
use crate::store::ActionOutcome;

/// Persisted slice of the cart state.
///
/// The transient `loading` flag is never part of the snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub items: Vec<CartLine>,
    pub session_id: Option<SessionId>,
}

struct CartState {
    items: Vec<CartLine>,
    session_id: Option<SessionId>,
    loading: bool,
}

/// The cart store.
///
/// Cheaply cloneable via `Arc`; all clones observe the same state.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    api: ApiClient,
    storage: Arc<dyn SnapshotStore>,
    notify: Arc<dyn Notify>,
    state: RwLock<CartState>,
}

impl CartStore {
    /// Create the store and restore the persisted `{items, session_id}`
    /// slice. Call [`initialize`](Self::initialize) afterwards to reconcile
    /// with the authoritative server cart.
    #[must_use]
    pub fn new(api: ApiClient, storage: Arc<dyn SnapshotStore>, notify: Arc<dyn Notify>) -> Self {
        let snapshot = match storage.load(namespaces::CART) {
            Ok(Some(raw)) => match serde_json::from_str::<CartSnapshot>(&raw) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    tracing::warn!("Discarding unreadable cart snapshot: {e}");
                    CartSnapshot::default()
                }
            },
            Ok(None) => CartSnapshot::default(),
            Err(e) => {
                tracing::warn!("Failed to load cart snapshot: {e}");
                CartSnapshot::default()
            }
        };

        Self {
            inner: Arc::new(CartStoreInner {
                api,
                storage,
                notify,
                state: RwLock::new(CartState {
                    items: snapshot.items,
                    session_id: snapshot.session_id,
                    loading: false,
                }),
            }),
        }
    }

    // =========================================================================
    // Accessors & derived values
    // =========================================================================

    /// Current cart lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> Vec<CartLine> {
        self.read_state().items.clone()
    }

    /// The line for `item_id`, if present.
    #[must_use]
    pub fn get(&self, item_id: &ItemId) -> Option<CartLine> {
        self.read_state()
            .items
            .iter()
            .find(|line| &line.item_id == item_id)
            .cloned()
    }

    /// The persisted session identifier, if one has been generated yet.
    #[must_use]
    pub fn session_id(&self) -> Option<SessionId> {
        self.read_state().session_id.clone()
    }

    /// Whether a mutating operation is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.read_state().loading
    }

    /// Cart total: sum of unit price times quantity, computed fresh.
    #[must_use]
    pub fn total(&self) -> Price {
        self.read_state()
            .items
            .iter()
            .map(|line| line.price.times(line.quantity))
            .sum()
    }

    /// Total item count: sum of quantities, computed fresh.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.read_state().items.iter().map(|line| line.quantity).sum()
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Reconcile with the authoritative server cart.
    ///
    /// Generates and persists a session identifier if none exists, then
    /// fetches the cart for it and replaces the local items with the
    /// response. On fetch failure the pre-existing local items are retained
    /// as a cache; nothing is cleared.
    #[instrument(skip(self))]
    pub async fn initialize(&self) {
        self.set_loading(true);
        let session_id = self.ensure_session_id();

        match self.inner.api.get_cart(&session_id).await {
            Ok(lines) => {
                self.write_state().items = lines;
                self.persist();
            }
            Err(e) => {
                tracing::warn!("Failed to fetch cart for {session_id}: {e}");
            }
        }
        self.set_loading(false);
    }

    /// Add `quantity` of a menu item to the cart.
    ///
    /// If a line for the item already exists this delegates to
    /// [`update_quantity`](Self::update_quantity) with the summed quantity -
    /// a duplicate line is never created. Otherwise the backend confirms the
    /// addition first, and only then is the line appended locally from the
    /// passed item metadata plus the server-assigned row identifier.
    #[instrument(skip(self, item), fields(item_id = %item.id))]
    pub async fn add_to_cart(&self, item: &MenuItem, quantity: u32) -> ActionOutcome {
        if let Some(existing) = self.get(&item.id) {
            let summed = i64::from(existing.quantity) + i64::from(quantity);
            return self.update_quantity(&item.id, summed).await;
        }

        self.set_loading(true);
        let request = AddCartLineRequest {
            item_id: item.id.clone(),
            quantity,
            note: String::new(),
            session_id: self.ensure_session_id(),
        };
        let result = self.inner.api.add_cart_line(&request).await;
        self.set_loading(false);

        match result {
            Ok(created) => {
                let line = CartLine {
                    id: created.id,
                    item_id: item.id.clone(),
                    name: item.name.clone(),
                    price: item.price,
                    quantity,
                    note: String::new(),
                };
                self.write_state().items.push(line);
                self.persist();
                self.inner
                    .notify
                    .success(&format!("{} added to cart", item.name));
                ActionOutcome::ok()
            }
            Err(e) => self.reject("Failed to add to cart", &e),
        }
    }

    /// Set the quantity of an existing line.
    ///
    /// A quantity of zero or less delegates to
    /// [`remove_from_cart`](Self::remove_from_cart); a non-positive quantity
    /// is never stored or sent.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn update_quantity(&self, item_id: &ItemId, new_quantity: i64) -> ActionOutcome {
        if new_quantity <= 0 {
            return self.remove_from_cart(item_id).await;
        }
        let quantity = u32::try_from(new_quantity).unwrap_or(u32::MAX);

        let Some(line) = self.get(item_id) else {
            let message = "Item is not in the cart";
            self.inner.notify.error(message);
            return ActionOutcome::fail(message);
        };

        self.set_loading(true);
        let update = UpdateCartLineRequest {
            quantity: Some(quantity),
            note: None,
        };
        let result = self.inner.api.update_cart_line(&line.id, &update).await;
        self.set_loading(false);

        match result {
            Ok(_confirmed) => {
                {
                    let mut state = self.write_state();
                    if let Some(line) = state
                        .items
                        .iter_mut()
                        .find(|line| &line.item_id == item_id)
                    {
                        line.quantity = quantity;
                    }
                }
                self.persist();
                self.inner.notify.success("Cart updated");
                ActionOutcome::ok()
            }
            Err(e) => self.reject("Failed to update cart", &e),
        }
    }

    /// Remove a line from the cart.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn remove_from_cart(&self, item_id: &ItemId) -> ActionOutcome {
        let Some(line) = self.get(item_id) else {
            let message = "Item is not in the cart";
            self.inner.notify.error(message);
            return ActionOutcome::fail(message);
        };

        self.set_loading(true);
        let result = self.inner.api.remove_cart_line(&line.id).await;
        self.set_loading(false);

        match result {
            Ok(()) => {
                self.write_state()
                    .items
                    .retain(|candidate| &candidate.item_id != item_id);
                self.persist();
                self.inner
                    .notify
                    .success(&format!("{} removed from cart", line.name));
                ActionOutcome::ok()
            }
            Err(e) => self.reject("Failed to remove from cart", &e),
        }
    }

    /// Empty the cart.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> ActionOutcome {
        let session_id = self.ensure_session_id();

        self.set_loading(true);
        let result = self.inner.api.clear_cart(&session_id).await;
        self.set_loading(false);

        match result {
            Ok(()) => {
                self.write_state().items.clear();
                self.persist();
                self.inner.notify.success("Cart cleared");
                ActionOutcome::ok()
            }
            Err(e) => self.reject("Failed to clear cart", &e),
        }
    }

    /// Update the free-text note of a line.
    ///
    /// Lighter-weight than the other mutators: does not toggle the loading
    /// flag.
    #[instrument(skip(self, note), fields(item_id = %item_id))]
    pub async fn update_item_note(&self, item_id: &ItemId, note: &str) -> ActionOutcome {
        let Some(line) = self.get(item_id) else {
            let message = "Item is not in the cart";
            self.inner.notify.error(message);
            return ActionOutcome::fail(message);
        };

        let update = UpdateCartLineRequest {
            quantity: None,
            note: Some(note.to_string()),
        };
        match self.inner.api.update_cart_line(&line.id, &update).await {
            Ok(_confirmed) => {
                {
                    let mut state = self.write_state();
                    if let Some(line) = state
                        .items
                        .iter_mut()
                        .find(|line| &line.item_id == item_id)
                    {
                        line.note = note.to_string();
                    }
                }
                self.persist();
                self.inner.notify.success("Note saved");
                ActionOutcome::ok()
            }
            Err(e) => self.reject("Failed to save note", &e),
        }
    }

    /// Place an order from the current cart.
    ///
    /// The backend consumes the session's cart; on success the local items
    /// are emptied to mirror that. A signed-in user is attached to the order
    /// by id; the cart itself stays keyed by session identifier.
    #[instrument(skip(self, user, details))]
    pub async fn checkout(
        &self,
        user: Option<&User>,
        details: &CheckoutDetails,
    ) -> ActionOutcome {
        if self.read_state().items.is_empty() {
            let message = "Your cart is empty";
            self.inner.notify.error(message);
            return ActionOutcome::fail(message);
        }

        self.set_loading(true);
        let request = OrderRequest {
            session_id: self.ensure_session_id(),
            user_id: user.map(|user| user.id.clone()),
            customer_name: details.customer_name.clone(),
            table_number: details.table_number,
            notes: details.notes.clone(),
        };
        let result = self.inner.api.create_order(&request).await;
        self.set_loading(false);

        match result {
            Ok(order) => {
                self.write_state().items.clear();
                self.persist();
                self.inner
                    .notify
                    .success(&format!("Order {} placed", order.id));
                ActionOutcome::ok()
            }
            Err(e) => self.reject("Failed to place order", &e),
        }
    }

    /// Orders placed by this session, newest first as returned by the backend.
    ///
    /// # Errors
    ///
    /// Unlike the mutating operations this is a plain read for view code
    /// that wants the error; it does not notify.
    pub async fn order_history(&self) -> Result<Vec<Order>, crate::api::ApiError> {
        let session_id = self.ensure_session_id();
        self.inner.api.my_orders(&session_id).await
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn read_state(&self) -> RwLockReadGuard<'_, CartState> {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, CartState> {
        self.inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn set_loading(&self, loading: bool) {
        self.write_state().loading = loading;
    }

    /// Log a failure, notify, and build the outcome. State stays untouched.
    fn reject(&self, context: &str, error: &crate::api::ApiError) -> ActionOutcome {
        let message = error.user_message();
        tracing::warn!("{context}: {error}");
        self.inner.notify.error(&message);
        ActionOutcome::fail(message)
    }

    /// Return the session identifier, generating and persisting one first if
    /// absent.
    fn ensure_session_id(&self) -> SessionId {
        if let Some(session_id) = self.read_state().session_id.clone() {
            return session_id;
        }

        let session_id = SessionId::generate();
        self.write_state().session_id = Some(session_id.clone());
        self.persist();
        session_id
    }

    fn persist(&self) {
        let snapshot = {
            let state = self.read_state();
            CartSnapshot {
                items: state.items.clone(),
                session_id: state.session_id.clone(),
            }
        };
        match serde_json::to_string(&snapshot) {
            Ok(raw) => {
                if let Err(e) = self.inner.storage.save(namespaces::CART, &raw) {
                    tracing::warn!("Failed to persist cart snapshot: {e}");
                }
            }
            Err(e) => tracing::warn!("Failed to serialize cart snapshot: {e}"),
        }
    }
}
