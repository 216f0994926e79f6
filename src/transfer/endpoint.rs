//! Defines the endpoint for moving money between accounts.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    AppState, Error,
    db::lock_connection,
    transfer::{TransferRequest, transfer},
};

/// The message sent to the client after a committed transfer.
pub const TRANSFER_SUCCESSFUL: &str = "Transfer successful";

/// The state needed to run transfers.
#[derive(Debug, Clone)]
pub struct TransferState {
    /// The database connection the transfer transaction runs on.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransferState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The JSON body for a transfer.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransferForm {
    /// The name of the account to take money from.
    pub from: String,
    /// The name of the account to give money to.
    pub to: String,
    /// The amount to move, must be greater than zero.
    pub amount: f64,
}

/// A route handler for atomically moving money from one account to another.
#[utoipa::path(
    post,
    path = "/transfer",
    request_body = TransferForm,
    responses(
        (status = 200, description = "Transfer successful", body = String),
        (status = 400, description = "Invalid request, non-positive amount, same account, insufficient funds or an amount that cannot be moved exactly"),
        (status = 404, description = "Account not found"),
        (status = 409, description = "Conflicting concurrent update, safe to retry"),
        (status = 503, description = "The account store is unavailable")
    ),
    tag = "Transfer"
)]
pub async fn transfer_endpoint(
    State(state): State<TransferState>,
    form: Result<Json<TransferForm>, JsonRejection>,
) -> Result<&'static str, Error> {
    let Json(form) = form?;
    let request = TransferRequest::new(&form.from, &form.to, form.amount)?;

    let connection = lock_connection(&state.db_connection)?;

    let transfer = transfer(&request, &connection).inspect_err(|error| {
        tracing::warn!("Transfer {form:?} failed: {error}");
    })?;

    tracing::info!(
        "Transferred {} from \"{}\" (balance {}) to \"{}\" (balance {})",
        transfer.amount,
        transfer.from.name,
        transfer.from.balance,
        transfer.to.name,
        transfer.to.balance
    );

    Ok(TRANSFER_SUCCESSFUL)
}
