mod domain;
pub(crate) mod create_endpoint;
pub(crate) mod get_endpoint;

pub use domain::{
    Account, AccountName, NewAccount, create_account, create_account_table,
    get_account, get_all_accounts, map_row_to_account,
};
pub use create_endpoint::create_account_endpoint;
pub use get_endpoint::{get_account_endpoint, list_accounts_endpoint};
