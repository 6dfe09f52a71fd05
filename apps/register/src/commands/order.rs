//! # Table & Order Commands
//!
//! Table management and active-order selection.
//!
//! ```text
//!   select_table(3) ──► Table(3) ──┐
//!   select_takeaway ──► Takeaway ──┼──► cart commands act here
//!   clear_active_order ► None ─────┘    (None: NO_ACTIVE_ORDER)
//! ```

use cashier_core::currency::{format_amount, to_display};
use cashier_core::{ActiveOrder, Currency, Money, Table, TableDraft, TableStatus};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::SessionState;

/// A table as the floor plan shows it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDto {
    pub id: i64,
    pub name: String,
    pub seats: u32,
    pub status: TableStatus,
    /// Cart lines on the table.
    pub item_count: usize,
    /// Running total in the display currency.
    pub total: Money,
    pub formatted_total: String,
}

impl TableDto {
    pub fn new(table: &Table, currency: Currency) -> Self {
        let total = to_display(table.total, currency);
        TableDto {
            id: table.id,
            name: table.name.clone(),
            seats: table.seats,
            status: table.status(),
            item_count: table.cart.item_count(),
            total,
            formatted_total: format_amount(total, currency),
        }
    }
}

pub fn list_tables(state: &SessionState) -> Vec<TableDto> {
    debug!("list_tables command");
    state.with_engine(|e| {
        let currency = e.settings().currency;
        e.tables().iter().map(|t| TableDto::new(t, currency)).collect()
    })
}

pub fn add_table(state: &SessionState, draft: TableDraft) -> Result<TableDto, ApiError> {
    debug!(name = %draft.name, seats = draft.seats, "add_table command");
    let dto = state.with_engine_mut(|e| {
        let table = e.add_table(&draft)?;
        Ok::<_, ApiError>(TableDto::new(&table, e.settings().currency))
    })?;
    info!(id = dto.id, name = %dto.name, "Table added");
    Ok(dto)
}

pub fn edit_table(state: &SessionState, id: i64, draft: TableDraft) -> Result<TableDto, ApiError> {
    debug!(id, "edit_table command");
    state.with_engine_mut(|e| {
        let table = e.edit_table(id, &draft)?;
        Ok(TableDto::new(&table, e.settings().currency))
    })
}

/// Deletes an available table. Occupied tables are refused.
pub fn delete_table(state: &SessionState, id: i64) -> Result<TableDto, ApiError> {
    debug!(id, "delete_table command");
    let dto = state.with_engine_mut(|e| {
        let removed = e.delete_table(id)?;
        Ok::<_, ApiError>(TableDto::new(&removed, e.settings().currency))
    })?;
    info!(id, "Table deleted");
    Ok(dto)
}

// =============================================================================
// Active Order
// =============================================================================

pub fn get_active_order(state: &SessionState) -> ActiveOrder {
    state.with_engine(|e| e.active_order())
}

pub fn select_table(state: &SessionState, id: i64) -> Result<ActiveOrder, ApiError> {
    debug!(id, "select_table command");
    state.with_engine_mut(|e| {
        e.select_table(id)?;
        Ok(e.active_order())
    })
}

pub fn select_takeaway(state: &SessionState) -> ActiveOrder {
    debug!("select_takeaway command");
    state.with_engine_mut(|e| {
        e.select_takeaway();
        e.active_order()
    })
}

/// Deselects the active order. Its cart keeps its lines.
pub fn clear_active_order(state: &SessionState) -> ActiveOrder {
    debug!("clear_active_order command");
    state.with_engine_mut(|e| {
        e.clear_active_order();
        e.active_order()
    })
}
