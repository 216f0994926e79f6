//! The transfer executor: moves money between two accounts in one SQLite
//! transaction.

use rusqlite::{Connection, ErrorCode, Transaction, TransactionBehavior};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    Error,
    account::{Account, AccountName, get_account, map_row_to_account},
};

/// A validated request to move `amount` from one account to another.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRequest {
    from: AccountName,
    to: AccountName,
    amount: f64,
}

impl TransferRequest {
    /// Validate a transfer request.
    ///
    /// # Errors
    /// This function will return:
    /// - [Error::InvalidAmount] if `amount` is not a finite number greater than zero,
    /// - [Error::EmptyAccountName] if either account name is blank,
    /// - or [Error::SameAccount] if `from` and `to` name the same account.
    pub fn new(from: &str, to: &str, amount: f64) -> Result<Self, Error> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::InvalidAmount);
        }

        let from = AccountName::new(from)?;
        let to = AccountName::new(to)?;

        if from == to {
            return Err(Error::SameAccount);
        }

        Ok(Self { from, to, amount })
    }

    /// The account to take money from.
    pub fn from(&self) -> &AccountName {
        &self.from
    }

    /// The account to give money to.
    pub fn to(&self) -> &AccountName {
        &self.to
    }

    /// The amount of money to move, always positive.
    pub fn amount(&self) -> f64 {
        self.amount
    }
}

/// The outcome of a committed transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Transfer {
    /// The source account after the debit.
    pub from: Account,
    /// The destination account after the credit.
    pub to: Account,
    /// The amount that was moved.
    pub amount: f64,
}

/// Atomically move the requested amount from one account to another.
///
/// Both accounts are read and written inside a single SQLite transaction, so
/// the balance check always sees the state the writes are applied to, and
/// other connections either see both writes or neither. Any failure rolls
/// the transaction back before the error is returned.
///
/// # Errors
/// This function will return:
/// - [Error::AccountNotFound] if either account does not exist,
/// - [Error::InsufficientFunds] if the source balance is less than the amount,
/// - [Error::UnrepresentableAmount] if floating point rounding would change
///   the amount debited or credited, or the credit would overflow,
/// - [Error::TransactionConflict] if another connection holds or changed the
///   accounts while the writes were applied, the caller may retry,
/// - [Error::StoreUnavailable] if the database stays locked past the busy
///   timeout while the accounts are being read,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn transfer(request: &TransferRequest, connection: &Connection) -> Result<Transfer, Error> {
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Deferred)?;

    let transfer = match apply_transfer(request, &transaction) {
        Ok(transfer) => transfer,
        Err(error) => {
            if let Err(rollback_error) = transaction.rollback() {
                tracing::error!("Could not roll back transfer {request:?}: {rollback_error}");
            }

            return Err(error);
        }
    };

    // A failed commit leaves the transaction open, dropping it rolls back.
    transaction.commit().map_err(map_write_error)?;

    tracing::debug!(
        "Transferred {} from \"{}\" to \"{}\"",
        request.amount,
        request.from,
        request.to
    );

    Ok(transfer)
}

fn apply_transfer(request: &TransferRequest, connection: &Connection) -> Result<Transfer, Error> {
    let from = get_account(request.from.as_ref(), connection)?;
    let to = get_account(request.to.as_ref(), connection)?;

    if from.balance < request.amount {
        return Err(Error::InsufficientFunds);
    }

    let from_balance = from.balance - request.amount;
    let to_balance = to.balance + request.amount;

    // Both balances must change by exactly `amount` or money is created or
    // lost.
    if !to_balance.is_finite()
        || from.balance - from_balance != request.amount
        || to_balance - to.balance != request.amount
    {
        return Err(Error::UnrepresentableAmount);
    }

    let from = set_balance(&from, from_balance, connection)?;
    let to = set_balance(&to, to_balance, connection)?;

    Ok(Transfer {
        from,
        to,
        amount: request.amount,
    })
}

fn set_balance(account: &Account, balance: f64, connection: &Connection) -> Result<Account, Error> {
    connection
        .prepare("UPDATE account SET balance = ?1 WHERE id = ?2 RETURNING id, name, balance")?
        .query_row((balance, account.id), map_row_to_account)
        .map_err(map_write_error)
}

/// Lock errors while writing mean another connection got to the accounts
/// first.
fn map_write_error(error: rusqlite::Error) -> Error {
    match error {
        // Code 275 occurs when a CHECK constraint failed, i.e. the balance
        // would become negative.
        rusqlite::Error::SqliteFailure(ref sql_error, _) if sql_error.extended_code == 275 => {
            Error::InsufficientFunds
        }
        error => match error.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) => {
                tracing::warn!("Transfer conflicted with a concurrent write: {error}");
                Error::TransactionConflict
            }
            _ => error.into(),
        },
    }
}
