//! Application router configuration.

use axum::{
    Router, middleware,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    AppState,
    account::{create_account_endpoint, get_account_endpoint, list_accounts_endpoint},
    endpoints,
    logging::logging_middleware,
    openapi::ApiDoc,
    transfer::transfer_endpoint,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ACCOUNT, post(create_account_endpoint))
        .route(endpoints::ACCOUNT_BY_NAME, get(get_account_endpoint))
        .route(endpoints::ACCOUNTS, get(list_accounts_endpoint))
        .route(endpoints::TRANSFER, post(transfer_endpoint))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
        // The docs are stateless and skip the body logging middleware.
        .merge(
            SwaggerUi::new(endpoints::API_DOCS)
                .url(endpoints::OPENAPI_DOCUMENT, ApiDoc::openapi()),
        )
}

async fn get_404_not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not found").into_response()
}

#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{AppState, account::Account, endpoints, endpoints::format_endpoint};

    use super::build_router;

    fn get_test_server() -> TestServer {
        let state = AppState::new(Connection::open_in_memory().unwrap())
            .expect("Could not create app state");

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    async fn get_balance(server: &TestServer, name: &str) -> f64 {
        let response = server
            .get(&format_endpoint(endpoints::ACCOUNT_BY_NAME, name))
            .await;
        response.assert_status_ok();

        response.json::<Account>().balance
    }

    #[tokio::test]
    async fn create_transfer_and_look_up_accounts() {
        let server = get_test_server();
        server
            .post(endpoints::ACCOUNT)
            .json(&json!({ "name": "alice", "balance": 100 }))
            .await
            .assert_status_ok();
        server
            .post(endpoints::ACCOUNT)
            .json(&json!({ "name": "bob", "balance": 50 }))
            .await
            .assert_status_ok();

        server
            .post(endpoints::TRANSFER)
            .json(&json!({ "from": "alice", "to": "bob", "amount": 30 }))
            .await
            .assert_text("Transfer successful");

        assert_eq!(get_balance(&server, "alice").await, 70.0);
        assert_eq!(get_balance(&server, "bob").await, 80.0);

        let response = server
            .post(endpoints::TRANSFER)
            .json(&json!({ "from": "alice", "to": "bob", "amount": 1000 }))
            .await;

        response.assert_status_bad_request();
        response.assert_text("insufficient funds");
        assert_eq!(get_balance(&server, "alice").await, 70.0);
        assert_eq!(get_balance(&server, "bob").await, 80.0);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server();

        let response = server.get("/dashboard").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn serves_swagger_ui() {
        let server = get_test_server();

        let response = server.get(&format!("{}/", endpoints::API_DOCS)).await;

        response.assert_status_ok();
        assert!(
            response.text().contains("swagger-ui"),
            "want Swagger UI page, got {}",
            response.text()
        );
    }

    #[tokio::test]
    async fn serves_openapi_document() {
        let server = get_test_server();

        let response = server.get(endpoints::OPENAPI_DOCUMENT).await;

        response.assert_status_ok();
        let document = response.json::<Value>();
        let paths = document["paths"]
            .as_object()
            .expect("OpenAPI document has no paths");
        for path in [
            endpoints::ACCOUNT,
            endpoints::ACCOUNT_BY_NAME,
            endpoints::ACCOUNTS,
            endpoints::TRANSFER,
        ] {
            assert!(paths.contains_key(path), "missing path {path}");
        }
    }
}
