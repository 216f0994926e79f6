//! OpenAPI documentation for the REST API.
//!
//! The document is served as JSON at [endpoints::OPENAPI_DOCUMENT](crate::endpoints::OPENAPI_DOCUMENT)
//! and browsable through Swagger UI at [endpoints::API_DOCS](crate::endpoints::API_DOCS).

use utoipa::OpenApi;

use crate::{
    account::{Account, create_endpoint::AccountForm},
    transfer::endpoint::TransferForm,
};

/// Main API documentation struct.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Coffer",
        description = "Bank account API: create accounts, look them up and transfer money between them."
    ),
    paths(
        crate::account::create_endpoint::create_account_endpoint,
        crate::account::get_endpoint::get_account_endpoint,
        crate::account::get_endpoint::list_accounts_endpoint,
        crate::transfer::endpoint::transfer_endpoint,
    ),
    components(schemas(Account, AccountForm, TransferForm)),
    tags(
        (name = "Account", description = "Account creation and lookup"),
        (name = "Transfer", description = "Atomic transfers between accounts")
    )
)]
pub struct ApiDoc;
