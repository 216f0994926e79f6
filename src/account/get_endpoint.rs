//! Defines the endpoints for looking up accounts.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{Account, AccountName, get_account, get_all_accounts},
    db::lock_connection,
};

/// The state needed to look up accounts.
#[derive(Debug, Clone)]
pub struct GetAccountState {
    /// The database connection for reading accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GetAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for getting a single account by its name.
#[utoipa::path(
    get,
    path = "/account/{name}",
    params(
        ("name" = String, Path, description = "Name of the account")
    ),
    responses(
        (status = 200, description = "The account", body = Account),
        (status = 400, description = "Blank account name"),
        (status = 404, description = "Account not found"),
        (status = 503, description = "The account store is unavailable")
    ),
    tag = "Account"
)]
pub async fn get_account_endpoint(
    State(state): State<GetAccountState>,
    Path(name): Path<String>,
) -> Result<Json<Account>, Error> {
    let name = AccountName::new(&name)?;
    let connection = lock_connection(&state.db_connection)?;

    get_account(name.as_ref(), &connection)
        .inspect_err(|error| tracing::warn!("Could not get account \"{name}\": {error}"))
        .map(Json)
}

/// A route handler for listing every account ordered by name.
#[utoipa::path(
    get,
    path = "/accounts",
    responses(
        (status = 200, description = "All accounts", body = [Account]),
        (status = 503, description = "The account store is unavailable")
    ),
    tag = "Account"
)]
pub async fn list_accounts_endpoint(
    State(state): State<GetAccountState>,
) -> Result<Json<Vec<Account>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_all_accounts(&connection).map(Json)
}
