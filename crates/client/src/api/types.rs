//! Domain types for the coffee-shop backend API.
//!
//! Wire format is camelCase JSON; these types double as the local mirror
//! kept by the stores, so most of them are `Serialize + Deserialize`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kedai_core::{
    CartRowId, Email, ItemId, OrderId, Price, ReservationId, Role, SessionId, TableId, UserId,
};

// =============================================================================
// Auth Types
// =============================================================================

/// A signed-in user as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: Email,
    /// Role used for back-office authorization checks.
    #[serde(default)]
    pub role: Role,
}

/// Login request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Profile update request body. Only present fields are changed.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Password change request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    /// Current password, verified by the backend.
    pub current_password: String,
    /// Replacement password.
    pub new_password: String,
}

/// Successful login/register response: the user plus a bearer token.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub user: User,
    pub token: String,
}

/// Profile update response wraps the updated user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user: User,
}

// =============================================================================
// Cart Types
// =============================================================================

/// One line of the session-scoped cart.
///
/// `id` is the server-assigned cart-row identifier used for update/delete
/// calls; `item_id` identifies the catalog item and is unique within a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Server-assigned cart-row identifier.
    pub id: CartRowId,
    /// Catalog item identifier.
    pub item_id: ItemId,
    /// Display name at the time the line was created.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Quantity; at least 1 while the line exists.
    pub quantity: u32,
    /// Free-text note (e.g., "less sugar").
    #[serde(default)]
    pub note: String,
}

/// Add-to-cart request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCartLineRequest {
    pub item_id: ItemId,
    pub quantity: u32,
    pub note: String,
    pub session_id: SessionId,
}

/// Cart-line update request body. Only present fields are changed.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartLineRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// =============================================================================
// Menu Types
// =============================================================================

/// An orderable menu item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Catalog item identifier.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Category slug (e.g., "coffee", "pastry").
    #[serde(default)]
    pub category: Option<String>,
    /// Longer description for the menu page.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the item can currently be ordered.
    #[serde(default = "default_true")]
    pub available: bool,
}

const fn default_true() -> bool {
    true
}

/// A menu category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuCategory {
    pub id: String,
    pub name: String,
}

// =============================================================================
// Table & Reservation Types
// =============================================================================

/// Occupancy status of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    Available,
    Occupied,
    Reserved,
}

/// A physical table in the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: TableId,
    /// Table number printed on the table.
    pub number: u32,
    /// Seats.
    pub capacity: u32,
    pub status: TableStatus,
}

/// Reservation request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    pub table_id: TableId,
    /// Name the reservation is held under.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    pub party_size: u32,
    /// Requested start time.
    pub reserved_at: DateTime<Utc>,
}

/// A confirmed reservation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: ReservationId,
    pub table_id: TableId,
    pub name: String,
    pub party_size: u32,
    pub reserved_at: DateTime<Utc>,
}

// =============================================================================
// Order Types
// =============================================================================

/// Fulfillment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

/// Checkout details collected from the user at order time.
#[derive(Debug, Clone, Default)]
pub struct CheckoutDetails {
    /// Name for the order (walk-in customers).
    pub customer_name: Option<String>,
    /// Table the order should be brought to.
    pub table_number: Option<u32>,
    /// Free-text order notes.
    pub notes: Option<String>,
}

/// Create-order request body. The backend consumes the session's cart.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub session_id: SessionId,
    /// Attached when the customer is signed in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One line of a placed order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub name: String,
    pub quantity: u32,
    pub price: Price,
}

/// A placed order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatus,
    pub total: Price,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<OrderLine>,
}
