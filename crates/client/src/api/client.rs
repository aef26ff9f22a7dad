//! Coffee-shop backend API client implementation.
//!
//! Uses `reqwest` with a fixed request timeout. The menu catalog is cached
//! using `moka` (5-minute TTL); cart, auth, and order calls always hit the
//! backend.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use tracing::{debug, instrument};
use url::Url;

use kedai_core::{CartRowId, SessionId};

use crate::api::types::{
    AddCartLineRequest, AuthPayload, CartLine, Credentials, MenuCategory, MenuItem, Order,
    OrderRequest, PasswordChange, ProfileResponse, ProfileUpdate, Registration, Reservation,
    ReservationRequest, Table, UpdateCartLineRequest, User,
};
use crate::api::{ApiError, GENERIC_ERROR_MESSAGE};
use crate::config::ClientConfig;
use crate::token::TokenSlot;

/// Maximum number of cached menu responses.
const MENU_CACHE_CAPACITY: u64 = 1000;

/// Menu cache entry lifetime.
const MENU_CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

/// Cached menu response types.
#[derive(Clone)]
enum CacheValue {
    Items(Vec<MenuItem>),
    Categories(Vec<MenuCategory>),
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the coffee-shop backend REST API.
///
/// Cheaply cloneable via `Arc`; every clone shares the HTTP connection pool,
/// the menu cache, and the bearer-token slot.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    token: TokenSlot,
    cache: Cache<String, CacheValue>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(MENU_CACHE_CAPACITY)
            .time_to_live(MENU_CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_base_url.clone(),
                token: TokenSlot::new(),
                cache,
            }),
        })
    }

    /// The ambient bearer-token slot shared with the auth store.
    #[must_use]
    pub fn token_slot(&self) -> &TokenSlot {
        &self.inner.token
    }

    /// Build a request with the bearer token attached when present.
    fn request(&self, method: Method, path: &str) -> Result<reqwest::RequestBuilder, ApiError> {
        let url = self.inner.base_url.join(path)?;
        let mut builder = self.inner.client.request(method, url);
        if let Some(token) = self.inner.token.get() {
            builder = builder.bearer_auth(token.expose_secret());
        }
        Ok(builder)
    }

    /// Send a request; map non-success statuses; return the raw body.
    async fn execute_raw(&self, builder: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let response = builder.send().await?;
        let status = response.status();

        // A 401 invalidates the ambient token. No navigation happens here;
        // the user stays on their current screen.
        if status == StatusCode::UNAUTHORIZED {
            self.inner.token.clear();
        }

        let text = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: extract_message(&text),
            });
        }

        Ok(text)
    }

    /// Send a request and decode a JSON response body.
    async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let text = self.execute_raw(builder).await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }

    /// Send a request and discard the response body.
    async fn execute_empty(&self, builder: reqwest::RequestBuilder) -> Result<(), ApiError> {
        self.execute_raw(builder).await.map(|_| ())
    }

    // =========================================================================
    // Auth Methods
    // =========================================================================

    /// Authenticate with email and password.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the request fails.
    #[instrument(skip(self, credentials))]
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthPayload, ApiError> {
        let builder = self
            .request(Method::POST, "/api/auth/login")?
            .json(credentials);
        self.execute(builder).await
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns an error if registration is rejected or the request fails.
    #[instrument(skip(self, registration))]
    pub async fn register(&self, registration: &Registration) -> Result<AuthPayload, ApiError> {
        let builder = self
            .request(Method::POST, "/api/auth/register")?
            .json(registration);
        self.execute(builder).await
    }

    /// Update the signed-in user's profile. Returns the updated user.
    ///
    /// # Errors
    ///
    /// Returns an error if the update is rejected or the request fails.
    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        let builder = self.request(Method::PUT, "/api/auth/profile")?.json(update);
        let response: ProfileResponse = self.execute(builder).await?;
        Ok(response.user)
    }

    /// Change the signed-in user's password.
    ///
    /// # Errors
    ///
    /// Returns an error if the current password is rejected or the request fails.
    #[instrument(skip(self, change))]
    pub async fn change_password(&self, change: &PasswordChange) -> Result<(), ApiError> {
        let builder = self
            .request(Method::PUT, "/api/auth/change-password")?
            .json(change);
        self.execute_empty(builder).await
    }

    // =========================================================================
    // Cart Methods (not cached - mutable state)
    // =========================================================================

    /// Fetch the cart for a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(session_id = %session_id))]
    pub async fn get_cart(&self, session_id: &SessionId) -> Result<Vec<CartLine>, ApiError> {
        let builder = self
            .request(Method::GET, "/api/cart")?
            .query(&[("sessionId", session_id.as_str())]);
        self.execute(builder).await
    }

    /// Add a line to the session's cart. Returns the created line with its
    /// server-assigned row identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the addition or the request fails.
    #[instrument(skip(self, request))]
    pub async fn add_cart_line(&self, request: &AddCartLineRequest) -> Result<CartLine, ApiError> {
        let builder = self.request(Method::POST, "/api/cart")?.json(request);
        self.execute(builder).await
    }

    /// Update quantity and/or note of a cart line by its row identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the update or the request fails.
    #[instrument(skip(self, update), fields(row_id = %row_id))]
    pub async fn update_cart_line(
        &self,
        row_id: &CartRowId,
        update: &UpdateCartLineRequest,
    ) -> Result<CartLine, ApiError> {
        let builder = self
            .request(Method::PUT, &format!("/api/cart/{row_id}"))?
            .json(update);
        self.execute(builder).await
    }

    /// Remove a cart line by its row identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the removal or the request fails.
    #[instrument(skip(self), fields(row_id = %row_id))]
    pub async fn remove_cart_line(&self, row_id: &CartRowId) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, &format!("/api/cart/{row_id}"))?;
        self.execute_empty(builder).await
    }

    /// Clear the session's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(session_id = %session_id))]
    pub async fn clear_cart(&self, session_id: &SessionId) -> Result<(), ApiError> {
        let builder = self
            .request(Method::DELETE, "/api/cart/clear")?
            .query(&[("sessionId", session_id.as_str())]);
        self.execute_empty(builder).await
    }

    // =========================================================================
    // Menu Methods
    // =========================================================================

    /// Get menu items, optionally filtered by category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn menu_items(&self, category: Option<&str>) -> Result<Vec<MenuItem>, ApiError> {
        let cache_key = format!("menu:{}", category.unwrap_or(""));

        // Check cache
        if let Some(CacheValue::Items(items)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for menu items");
            return Ok(items);
        }

        let mut builder = self.request(Method::GET, "/api/menu")?;
        if let Some(category) = category {
            builder = builder.query(&[("category", category)]);
        }
        let items: Vec<MenuItem> = self.execute(builder).await?;

        // Cache the result
        self.inner
            .cache
            .insert(cache_key, CacheValue::Items(items.clone()))
            .await;

        Ok(items)
    }

    /// Get menu categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn menu_categories(&self) -> Result<Vec<MenuCategory>, ApiError> {
        let cache_key = "categories".to_string();

        if let Some(CacheValue::Categories(categories)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for menu categories");
            return Ok(categories);
        }

        let builder = self.request(Method::GET, "/api/menu/categories")?;
        let categories: Vec<MenuCategory> = self.execute(builder).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Categories(categories.clone()))
            .await;

        Ok(categories)
    }

    /// Invalidate all cached menu data.
    pub async fn invalidate_menu(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }

    // =========================================================================
    // Table & Reservation Methods
    // =========================================================================

    /// List tables with their occupancy status.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn tables(&self) -> Result<Vec<Table>, ApiError> {
        let builder = self.request(Method::GET, "/api/tables")?;
        self.execute(builder).await
    }

    /// Create a table reservation.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the reservation or the request fails.
    #[instrument(skip(self, request))]
    pub async fn create_reservation(
        &self,
        request: &ReservationRequest,
    ) -> Result<Reservation, ApiError> {
        let builder = self
            .request(Method::POST, "/api/reservations")?
            .json(request);
        self.execute(builder).await
    }

    // =========================================================================
    // Order Methods
    // =========================================================================

    /// Place an order from the session's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the order or the request fails.
    #[instrument(skip(self, request))]
    pub async fn create_order(&self, request: &OrderRequest) -> Result<Order, ApiError> {
        let builder = self.request(Method::POST, "/api/orders")?.json(request);
        self.execute(builder).await
    }

    /// List orders placed by this session.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(session_id = %session_id))]
    pub async fn my_orders(&self, session_id: &SessionId) -> Result<Vec<Order>, ApiError> {
        let builder = self
            .request(Method::GET, "/api/orders")?
            .query(&[("sessionId", session_id.as_str())]);
        self.execute(builder).await
    }
}

/// Extract a human-readable message from an error response body.
fn extract_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(serde_json::Value::as_str)
                .map(ToString::to_string)
        })
        .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_message_verbatim() {
        assert_eq!(
            extract_message("{\"message\":\"Invalid credentials\"}"),
            "Invalid credentials"
        );
    }

    #[test]
    fn test_extract_message_fallback() {
        assert_eq!(extract_message(""), GENERIC_ERROR_MESSAGE);
        assert_eq!(extract_message("not json"), GENERIC_ERROR_MESSAGE);
        assert_eq!(extract_message("{\"error\":\"nope\"}"), GENERIC_ERROR_MESSAGE);
    }
}
