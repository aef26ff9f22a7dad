//! Cart and order commands.

use kedai_client::api::types::CheckoutDetails;
use kedai_core::ItemId;

use super::{CliError, Context, check};

/// Show the cart with derived totals.
pub fn show(ctx: &Context) {
    let items = ctx.cart.items();

    if items.is_empty() {
        tracing::info!("Your cart is empty");
        return;
    }

    for line in &items {
        let note = if line.note.is_empty() {
            String::new()
        } else {
            format!("  ({})", line.note)
        };
        tracing::info!(
            "{:<8} {:<28} x{:<3} {:>12}{note}",
            line.item_id,
            line.name,
            line.quantity,
            line.price.times(line.quantity).to_string(),
        );
    }
    tracing::info!(
        "{} items, total {}",
        ctx.cart.item_count(),
        ctx.cart.total()
    );
}

/// Add a menu item to the cart by its identifier.
pub async fn add(ctx: &Context, item_id: &str, quantity: u32) -> Result<(), CliError> {
    let items = ctx.api.menu_items(None).await?;
    let item_id = ItemId::new(item_id);
    let Some(item) = items.into_iter().find(|item| item.id == item_id) else {
        return Err(CliError::Invalid(format!("No menu item with id {item_id}")));
    };

    check(ctx.cart.add_to_cart(&item, quantity).await)
}

/// Set the quantity of a line; zero removes it.
pub async fn set_quantity(ctx: &Context, item_id: &str, quantity: i64) -> Result<(), CliError> {
    check(ctx.cart.update_quantity(&ItemId::new(item_id), quantity).await)
}

/// Remove a line.
pub async fn remove(ctx: &Context, item_id: &str) -> Result<(), CliError> {
    check(ctx.cart.remove_from_cart(&ItemId::new(item_id)).await)
}

/// Attach a note to a line.
pub async fn note(ctx: &Context, item_id: &str, note: &str) -> Result<(), CliError> {
    check(ctx.cart.update_item_note(&ItemId::new(item_id), note).await)
}

/// Empty the cart.
pub async fn clear(ctx: &Context) -> Result<(), CliError> {
    check(ctx.cart.clear().await)
}

/// Place an order from the cart. A signed-in user is attached to the order.
pub async fn checkout(
    ctx: &Context,
    name: Option<String>,
    table: Option<u32>,
    notes: Option<String>,
) -> Result<(), CliError> {
    let user = ctx.auth.current_user();
    let details = CheckoutDetails {
        customer_name: name,
        table_number: table,
        notes,
    };
    check(ctx.cart.checkout(user.as_ref(), &details).await)
}

/// List orders placed by this session.
pub async fn orders(ctx: &Context) -> Result<(), CliError> {
    let orders = ctx.cart.order_history().await?;

    if orders.is_empty() {
        tracing::info!("No orders yet");
        return Ok(());
    }

    for order in orders {
        tracing::info!(
            "{:<12} {:<10} {:>12}  {}",
            order.id,
            format!("{:?}", order.status).to_lowercase(),
            order.total.to_string(),
            order.created_at.format("%Y-%m-%d %H:%M"),
        );
    }
    Ok(())
}
