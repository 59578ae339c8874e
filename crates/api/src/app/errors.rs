use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use catalog_auth::{AuthError, Scope, join_scopes};
use catalog_core::DomainError;

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// 401 with the bearer challenge.
pub fn unauthorized(code: &'static str, message: impl Into<String>) -> Response {
    let mut res = json_error(StatusCode::UNAUTHORIZED, code, message);
    res.headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    res
}

/// Map an auth rejection: scope failures are 403 naming the required scopes,
/// everything else is 401.
pub fn auth_error_to_response(err: &AuthError, required: &[Scope]) -> Response {
    if !err.is_forbidden() {
        let message = match err {
            AuthError::BadCredentials => "Could not validate credentials".to_string(),
            other => other.to_string(),
        };
        return unauthorized(err.code(), message);
    }

    let mut res = json_error(StatusCode::FORBIDDEN, err.code(), "Not enough permissions");
    let challenge = format!("Bearer scope=\"{}\"", join_scopes(required));
    if let Ok(value) = HeaderValue::from_str(&challenge) {
        res.headers_mut().insert(header::WWW_AUTHENTICATE, value);
    }
    res
}

pub fn domain_error_to_response(err: DomainError) -> Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "product not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::Storage(msg) => {
            tracing::error!(error = %msg, "storage failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", "storage unavailable")
        }
    }
}
