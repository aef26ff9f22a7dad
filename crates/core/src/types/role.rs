//! User roles for back-office authorization checks.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Role assigned to a user account by the backend.
///
/// Ordered by privilege so role checks can be expressed as comparisons:
/// `Customer < Staff < Manager < Admin`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular storefront customer.
    #[default]
    Customer,
    /// Counter staff: order and billing screens.
    Staff,
    /// Shift manager: staff screens plus menu, tables, and inventory.
    Manager,
    /// Administrator: everything, including user management.
    Admin,
}

impl Role {
    /// Whether this role grants at least `required` privileges.
    #[must_use]
    pub fn grants(self, required: Self) -> bool {
        self >= required
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Customer => "customer",
            Self::Staff => "staff",
            Self::Manager => "manager",
            Self::Admin => "admin",
        };
        write!(f, "{name}")
    }
}
