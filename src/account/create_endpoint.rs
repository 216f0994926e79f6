//! Defines the endpoint for creating a new account.
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
    account::{Account, NewAccount, create_account},
    db::lock_connection,
};

/// The state needed to create an account.
#[derive(Debug, Clone)]
pub struct CreateAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The JSON body for creating an account.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountForm {
    /// The unique account name.
    pub name: String,
    /// The initial balance, must not be negative.
    pub balance: f64,
}

/// A route handler for creating a new account, responds with the saved account.
#[utoipa::path(
    post,
    path = "/account",
    request_body = AccountForm,
    responses(
        (status = 200, description = "The created account", body = Account),
        (status = 400, description = "Missing fields, blank name or negative balance"),
        (status = 409, description = "An account with the same name already exists"),
        (status = 503, description = "The account store is unavailable")
    ),
    tag = "Account"
)]
pub async fn create_account_endpoint(
    State(state): State<CreateAccountState>,
    form: Result<Json<AccountForm>, JsonRejection>,
) -> Result<Json<Account>, Error> {
    let Json(form) = form?;
    let new_account = NewAccount::new(&form.name, form.balance)?;

    let connection = lock_connection(&state.db_connection)?;

    let account = create_account(&new_account, &connection).inspect_err(|error| {
        tracing::warn!("Could not create account {form:?}: {error}");
    })?;

    tracing::info!("Created account \"{}\" with balance {}", account.name, account.balance);

    Ok(Json(account))
}
