//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/account/{name}', use [format_endpoint].

/// The route for creating an account.
pub const ACCOUNT: &str = "/account";
/// The route for getting a single account by name.
pub const ACCOUNT_BY_NAME: &str = "/account/{name}";
/// The route for listing all accounts.
pub const ACCOUNTS: &str = "/accounts";
/// The route for moving money between two accounts.
pub const TRANSFER: &str = "/transfer";
/// The route serving the interactive Swagger UI for the API.
pub const API_DOCS: &str = "/api-docs";
/// The route serving the OpenAPI document for the API.
pub const OPENAPI_DOCUMENT: &str = "/api-docs/openapi.json";

/// Replace the first parameter in `endpoint_path` with `value`.
///
/// A parameter starts with a left brace and ends with a right brace.
/// For example, in the endpoint path '/account/{name}', '{name}' is the parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, value: &str) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        value,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ACCOUNT);
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::ACCOUNT_BY_NAME, "alice"));
        assert_endpoint_is_valid_uri(endpoints::ACCOUNTS);
        assert_endpoint_is_valid_uri(endpoints::TRANSFER);
        assert_endpoint_is_valid_uri(endpoints::OPENAPI_DOCUMENT);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/account/{name}", "alice");

        assert_eq!(formatted_path, "/account/alice");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/account", "alice");

        assert_eq!(formatted_path, "/account");
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/account/{name}/history", "bob");

        assert_eq!(formatted_path, "/account/bob/history");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
