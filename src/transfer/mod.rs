mod domain;
pub(crate) mod endpoint;

pub use domain::{Transfer, TransferRequest, transfer};
pub use endpoint::transfer_endpoint;
