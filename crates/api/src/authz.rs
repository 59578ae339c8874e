//! Per-handler authorization guard.
//!
//! Every protected handler calls [`require`] first with the scopes it needs;
//! there is no implicit middleware.

use axum::http::{HeaderMap, header};
use axum::response::Response;

use catalog_auth::{AuthDecision, Principal, Scope};

use crate::app::errors;
use crate::app::services::AppServices;

/// Bearer token from the `Authorization` header, if well-formed.
pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;

    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

/// Authorize the request for `required` scopes, or produce the error response.
pub fn require(
    services: &AppServices,
    headers: &HeaderMap,
    required: &[Scope],
) -> Result<Principal, Response> {
    let Some(token) = extract_bearer(headers) else {
        return Err(errors::unauthorized("missing_token", "Not authenticated"));
    };

    match services.authorizer.authorize(token, required) {
        AuthDecision::Allowed(principal) => Ok(principal),
        AuthDecision::Denied(err) => Err(errors::auth_error_to_response(&err, required)),
    }
}
