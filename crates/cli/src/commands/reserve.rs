//! Table reservation command.

use chrono::{DateTime, Utc};

use kedai_client::api::types::{ReservationRequest, TableStatus};

use super::{CliError, Context};

/// Reserve a table by its printed number.
pub async fn reserve(
    ctx: &Context,
    table_number: u32,
    name: &str,
    phone: &str,
    party_size: u32,
    at: &str,
) -> Result<(), CliError> {
    let reserved_at = at
        .parse::<DateTime<Utc>>()
        .map_err(|e| CliError::Invalid(format!("Invalid --at time '{at}': {e}")))?;

    let tables = ctx.api.tables().await?;
    let Some(table) = tables.into_iter().find(|t| t.number == table_number) else {
        return Err(CliError::Invalid(format!("No table number {table_number}")));
    };

    if table.status != TableStatus::Available {
        return Err(CliError::Invalid(format!(
            "Table {table_number} is not available"
        )));
    }

    if party_size > table.capacity {
        return Err(CliError::Invalid(format!(
            "Table {table_number} seats {}, party is {party_size}",
            table.capacity
        )));
    }

    let reservation = ctx
        .api
        .create_reservation(&ReservationRequest {
            table_id: table.id,
            name: name.to_string(),
            phone: phone.to_string(),
            party_size,
            reserved_at,
        })
        .await?;

    tracing::info!(
        "Reserved table {table_number} for {} ({} guests) at {} - confirmation {}",
        reservation.name,
        reservation.party_size,
        reservation.reserved_at.format("%Y-%m-%d %H:%M"),
        reservation.id,
    );
    Ok(())
}
