//! Opening connections to the account database and creating its schema.

use std::{
    path::Path,
    sync::{Mutex, MutexGuard},
    time::Duration,
};

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{Error, account::create_account_table};

/// How long a connection waits on a locked database before giving up.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings for connections to the account database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// How long an operation waits for another connection to release its
    /// lock before failing with [Error::StoreUnavailable].
    pub busy_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            busy_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }
}

/// Open a connection to the SQLite database at `path`, creating the file if
/// needed.
///
/// # Errors
/// Returns [Error::StoreUnavailable] if the file cannot be opened.
pub fn open_connection(path: impl AsRef<Path>, config: &StoreConfig) -> Result<Connection, Error> {
    let connection = Connection::open(path)?;
    connection.busy_timeout(config.busy_timeout)?;

    Ok(connection)
}

/// Create the tables for the domain models if they do not exist yet.
///
/// The tables are created in a single exclusive transaction, so calling this
/// on an initialized database is a no-op.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_account_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Acquire the shared database connection.
///
/// # Errors
/// Returns [Error::StoreUnavailable] if the lock was poisoned by a panic in
/// another request.
pub(crate) fn lock_connection(
    connection: &Mutex<Connection>,
) -> Result<MutexGuard<'_, Connection>, Error> {
    connection.lock().map_err(|error| {
        tracing::error!("Could not acquire database lock: {error}");
        Error::StoreUnavailable
    })
}

#[cfg(test)]
pub(crate) mod test_utils {
    use std::path::PathBuf;

    /// A database file path in the system temp directory that is unique to
    /// the calling test. Any file left over from a previous run is removed.
    pub(crate) fn temp_db_path(test_name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "coffer-{test_name}-{}.sqlite",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        path
    }
}
