use std::sync::Arc;

use axum::{Json, extract::Extension, http::HeaderMap, http::StatusCode, response::IntoResponse};

use catalog_auth::Scope;

use crate::app::services::AppServices;
use crate::authz;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// The principal behind the presented token.
pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> axum::response::Response {
    let principal = match authz::require(&services, &headers, &[Scope::ACTIVE]) {
        Ok(p) => p,
        Err(res) => return res,
    };

    Json(serde_json::json!({
        "identifier": principal.identifier,
        "scopes": principal.scopes,
        "disabled": principal.disabled,
    }))
    .into_response()
}
