//! Defines the app level error type and its conversion to HTTP responses.
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::ErrorCode;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request body was missing, malformed or had fields of the wrong type.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A transfer amount that is zero, negative or not a finite number.
    #[error("amount must be a positive number")]
    InvalidAmount,

    /// An initial account balance that is negative or not a finite number.
    #[error("balance must be a non-negative number")]
    InvalidBalance,

    /// An empty string was used as an account name.
    #[error("account name cannot be empty")]
    EmptyAccountName,

    /// A transfer where the source and destination are the same account.
    #[error("cannot transfer money from an account to itself")]
    SameAccount,

    /// No account exists with the given name.
    #[error("Account not found")]
    AccountNotFound(String),

    /// The source account of a transfer does not hold enough money.
    #[error("insufficient funds")]
    InsufficientFunds,

    /// The amount cannot be moved exactly between the two balances, e.g. it
    /// is too small to change a very large balance or the credit would
    /// overflow.
    #[error("the amount cannot be transferred exactly between these balances")]
    UnrepresentableAmount,

    /// Another connection modified or locked the accounts while the transfer
    /// was being written. Nothing was persisted and the caller may retry.
    #[error("the transfer conflicted with a concurrent update, try again")]
    TransactionConflict,

    /// The database could not be reached or stayed locked past the busy
    /// timeout.
    #[error("the account store is unavailable, try again later")]
    StoreUnavailable,

    /// The specified account name already exists in the database.
    #[error("the account \"{0}\" already exists")]
    DuplicateAccount(String),

    /// An unhandled/unexpected SQL error.
    ///
    /// The inner error should only be logged on the server, clients get a
    /// generic message instead.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked | ErrorCode::CannotOpen) => {
                tracing::warn!("the database is unavailable: {value}");
                Error::StoreUnavailable
            }
            _ => {
                tracing::error!("an unhandled SQL error occurred: {}", value);
                Error::SqlError(value)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl Error {
    /// The HTTP status code that best describes the error to a client.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidRequest(_)
            | Error::InvalidAmount
            | Error::InvalidBalance
            | Error::EmptyAccountName
            | Error::SameAccount
            | Error::InsufficientFunds
            | Error::UnrepresentableAmount => StatusCode::BAD_REQUEST,
            Error::AccountNotFound(_) => StatusCode::NOT_FOUND,
            Error::DuplicateAccount(_) | Error::TransactionConflict => StatusCode::CONFLICT,
            Error::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Error::SqlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        match self {
            // SQL errors are not intended to be shown to the client.
            Error::SqlError(error) => {
                tracing::error!("An unexpected error occurred: {}", error);
                (status_code, "Something went wrong, check the server logs").into_response()
            }
            error => (status_code, error.to_string()).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use rusqlite::{Connection, ffi};

    use super::Error;

    #[test]
    fn busy_database_is_unavailable() {
        let error = rusqlite::Error::SqliteFailure(ffi::Error::new(ffi::SQLITE_BUSY), None);

        assert_eq!(Error::from(error), Error::StoreUnavailable);
    }

    #[test]
    fn other_sql_errors_are_wrapped() {
        let connection = Connection::open_in_memory().unwrap();
        let error = connection
            .execute("SELECT * FROM table_that_does_not_exist", ())
            .unwrap_err();

        assert!(matches!(Error::from(error), Error::SqlError(_)));
    }

    #[test]
    fn account_not_found_is_404() {
        let response = Error::AccountNotFound("alice".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn conflicts_are_409() {
        assert_eq!(Error::TransactionConflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            Error::DuplicateAccount("alice".to_owned()).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn unavailable_store_is_503() {
        assert_eq!(
            Error::StoreUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn validation_errors_are_400() {
        for error in [
            Error::InvalidAmount,
            Error::InvalidBalance,
            Error::EmptyAccountName,
            Error::SameAccount,
            Error::InsufficientFunds,
            Error::UnrepresentableAmount,
            Error::InvalidRequest("missing field `amount`".to_owned()),
        ] {
            assert_eq!(error.status_code(), StatusCode::BAD_REQUEST, "{error:?}");
        }
    }
}
