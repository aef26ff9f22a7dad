//! Menu browsing commands.

use super::{CliError, Context};

/// List menu items, optionally filtered by category.
pub async fn list(ctx: &Context, category: Option<&str>) -> Result<(), CliError> {
    let items = ctx.api.menu_items(category).await?;

    if items.is_empty() {
        tracing::info!("No menu items found");
        return Ok(());
    }

    for item in items {
        let availability = if item.available { "" } else { " (sold out)" };
        let category = item.category.as_deref().unwrap_or("-");
        tracing::info!(
            "{:<8} {:<28} {:>12}  {category}{availability}",
            item.id,
            item.name,
            item.price.to_string(),
        );
    }
    Ok(())
}

/// List menu categories.
pub async fn categories(ctx: &Context) -> Result<(), CliError> {
    let categories = ctx.api.menu_categories().await?;
    for category in categories {
        tracing::info!("{:<12} {}", category.id, category.name);
    }
    Ok(())
}
