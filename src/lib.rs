//! Coffer is a small bank-account web service.
//!
//! This library provides a JSON REST API for creating accounts, looking them
//! up and transferring money between them. Transfers run inside a single
//! SQLite transaction so a debit is never visible without its credit.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod account;
mod app_state;
mod db;
mod endpoints;
mod error;
mod logging;
mod openapi;
mod routing;
mod transfer;

pub use account::{Account, AccountName, NewAccount, create_account, get_account};
pub use app_state::AppState;
pub use db::{DEFAULT_STORE_TIMEOUT, StoreConfig, initialize as initialize_db, open_connection};
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use openapi::ApiDoc;
pub use routing::build_router;
pub use transfer::{Transfer, TransferRequest, transfer};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
