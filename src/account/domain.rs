//! Core account domain types and database queries.

use std::fmt::Display;

use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::Error;

/// Database identifier for an account.
pub type AccountId = i64;

/// A validated, non-empty account name.
///
/// Account names are unique and are how clients refer to accounts.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountName(String);

impl AccountName {
    /// Create an account name, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyAccountName] if `name` is
    /// empty after trimming.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyAccountName)
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Create an account name without validation.
    ///
    /// The caller should ensure that the string is not empty. This is used
    /// for names read back from the database, which were validated on insert.
    pub fn new_unchecked(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for AccountName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for AccountName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named bank account and the money it holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Account {
    /// The id for the account.
    pub id: AccountId,
    /// The unique name of the account.
    #[schema(value_type = String)]
    pub name: AccountName,
    /// The balance, never negative.
    pub balance: f64,
}

/// A validated account that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    name: AccountName,
    balance: f64,
}

impl NewAccount {
    /// Validate the name and initial balance for a new account.
    ///
    /// # Errors
    /// Returns an [Error::EmptyAccountName] for a blank `name`, or an
    /// [Error::InvalidBalance] if `balance` is negative, NaN or infinite.
    pub fn new(name: &str, balance: f64) -> Result<Self, Error> {
        let name = AccountName::new(name)?;

        if !balance.is_finite() || balance < 0.0 {
            return Err(Error::InvalidBalance);
        }

        Ok(Self { name, balance })
    }

    /// The name for the new account.
    pub fn name(&self) -> &AccountName {
        &self.name
    }

    /// The initial balance for the new account.
    pub fn balance(&self) -> f64 {
        self.balance
    }
}

pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            balance REAL NOT NULL CHECK (balance >= 0)
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_account(row: &rusqlite::Row) -> Result<Account, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;
    let balance = row.get(2)?;

    Ok(Account {
        id,
        name: AccountName::new_unchecked(name),
        balance,
    })
}

/// Save a new account to the database.
///
/// # Errors
/// Returns an [Error::DuplicateAccount] if an account with the same name
/// already exists, or an [Error::SqlError] for any other SQL error.
pub fn create_account(new_account: &NewAccount, connection: &Connection) -> Result<Account, Error> {
    connection
        .prepare(
            "INSERT INTO account (name, balance) VALUES (?1, ?2)
             RETURNING id, name, balance",
        )?
        .query_row(
            (new_account.name.as_ref(), new_account.balance),
            map_row_to_account,
        )
        .map_err(|error| match error {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(error, Some(_)) if error.extended_code == 2067 => {
                Error::DuplicateAccount(new_account.name.to_string())
            }
            error => error.into(),
        })
}

/// Retrieve an account by its `name`.
///
/// # Errors
/// Returns an [Error::AccountNotFound] if there is no account called `name`.
pub fn get_account(name: &str, connection: &Connection) -> Result<Account, Error> {
    connection
        .prepare("SELECT id, name, balance FROM account WHERE name = :name")?
        .query_row(&[(":name", name)], map_row_to_account)
        .optional()?
        .ok_or_else(|| Error::AccountNotFound(name.to_owned()))
}

/// Retrieve all accounts ordered by name.
pub fn get_all_accounts(connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare("SELECT id, name, balance FROM account ORDER BY name ASC")?
        .query_map([], map_row_to_account)?
        .map(|maybe_account| maybe_account.map_err(Error::from))
        .collect()
}

#[cfg(test)]
mod account_name_tests {
    use crate::Error;

    use super::AccountName;

    #[test]
    fn trims_whitespace() {
        let name = AccountName::new("  alice \n").unwrap();

        assert_eq!(name.as_ref(), "alice");
    }

    #[test]
    fn rejects_empty_name() {
        assert_eq!(AccountName::new(""), Err(Error::EmptyAccountName));
        assert_eq!(AccountName::new("   "), Err(Error::EmptyAccountName));
    }
}

#[cfg(test)]
mod new_account_tests {
    use crate::Error;

    use super::NewAccount;

    #[test]
    fn accepts_zero_balance() {
        let account = NewAccount::new("alice", 0.0).unwrap();

        assert_eq!(account.name().as_ref(), "alice");
        assert_eq!(account.balance(), 0.0);
    }

    #[test]
    fn rejects_negative_balance() {
        assert_eq!(NewAccount::new("alice", -0.01), Err(Error::InvalidBalance));
    }

    #[test]
    fn rejects_non_finite_balance() {
        assert_eq!(NewAccount::new("alice", f64::NAN), Err(Error::InvalidBalance));
        assert_eq!(
            NewAccount::new("alice", f64::INFINITY),
            Err(Error::InvalidBalance)
        );
    }
}

#[cfg(test)]
mod create_table_tests {
    use rusqlite::Connection;

    use super::create_account_table;

    #[test]
    fn sql_is_valid() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        assert_eq!(Ok(()), create_account_table(&connection));
    }

    #[test]
    fn rejects_negative_balance_writes() {
        let connection = Connection::open_in_memory().unwrap();
        create_account_table(&connection).unwrap();

        let result = connection.execute(
            "INSERT INTO account (name, balance) VALUES (?1, ?2)",
            ("alice", -1.0),
        );

        assert!(result.is_err(), "want CHECK constraint error, got {result:?}");
    }
}
