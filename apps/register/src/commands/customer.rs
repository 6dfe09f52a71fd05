//! # Customer Commands
//!
//! Customer CRUD. Invoices keep their own copy of the customer name, so
//! edits and deletions never rewrite history.

use cashier_core::{Customer, CustomerDraft};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::SessionState;

pub fn list_customers(state: &SessionState) -> Vec<Customer> {
    debug!("list_customers command");
    state.with_engine(|e| e.customers().to_vec())
}

pub fn add_customer(state: &SessionState, draft: CustomerDraft) -> Result<Customer, ApiError> {
    debug!(name = %draft.name, "add_customer command");
    let customer = state.with_engine_mut(|e| e.add_customer(&draft))?;
    info!(id = customer.id, "Customer added");
    Ok(customer)
}

pub fn edit_customer(
    state: &SessionState,
    id: i64,
    draft: CustomerDraft,
) -> Result<Customer, ApiError> {
    debug!(id, "edit_customer command");
    Ok(state.with_engine_mut(|e| e.edit_customer(id, &draft))?)
}

pub fn delete_customer(state: &SessionState, id: i64) -> Result<Customer, ApiError> {
    debug!(id, "delete_customer command");
    let removed = state.with_engine_mut(|e| e.delete_customer(id))?;
    info!(id, "Customer deleted");
    Ok(removed)
}
