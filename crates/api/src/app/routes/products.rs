use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Query, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use serde::Deserialize;

use catalog_auth::Scope;
use catalog_core::ProductId;
use catalog_products::{NewProduct, ProductPatch};

use crate::app::errors;
use crate::app::services::AppServices;
use crate::authz;

const REQUIRED: &[Scope] = &[Scope::ACTIVE];

pub fn router() -> Router {
    Router::new()
        .route("/all/", get(list_products))
        .route("/createproduct/", post(create_product))
        .route("/updateproduct/", patch(update_product))
        .route("/deleteproduct/", delete(delete_product))
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

fn product_id(query: &IdQuery) -> Result<ProductId, Response> {
    let raw = query.id.as_deref().ok_or_else(|| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "query parameter 'id' is required")
    })?;
    raw.parse().map_err(errors::domain_error_to_response)
}

fn bad_body(rejection: JsonRejection) -> Response {
    errors::json_error(StatusCode::BAD_REQUEST, "invalid_body", rejection.body_text())
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> Response {
    if let Err(res) = authz::require(&services, &headers, REQUIRED) {
        return res;
    }

    match services.products.list() {
        Ok(products) => Json(products).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    body: Result<Json<NewProduct>, JsonRejection>,
) -> Response {
    let principal = match authz::require(&services, &headers, REQUIRED) {
        Ok(p) => p,
        Err(res) => return res,
    };
    let Json(new) = match body {
        Ok(b) => b,
        Err(rejection) => return bad_body(rejection),
    };

    match services.products.insert(new) {
        Ok(product) => {
            tracing::info!(product_id = %product.id, by = %principal.identifier, "product created");
            (StatusCode::CREATED, Json(product)).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Query(query): Query<IdQuery>,
    body: Result<Json<ProductPatch>, JsonRejection>,
) -> Response {
    let principal = match authz::require(&services, &headers, REQUIRED) {
        Ok(p) => p,
        Err(res) => return res,
    };
    let id = match product_id(&query) {
        Ok(id) => id,
        Err(res) => return res,
    };
    let Json(patch) = match body {
        Ok(b) => b,
        Err(rejection) => return bad_body(rejection),
    };

    match services.products.update(id, &patch) {
        Ok(product) => {
            tracing::info!(product_id = %id, by = %principal.identifier, "product updated");
            Json(product).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Query(query): Query<IdQuery>,
) -> Response {
    let principal = match authz::require(&services, &headers, REQUIRED) {
        Ok(p) => p,
        Err(res) => return res,
    };
    let id = match product_id(&query) {
        Ok(id) => id,
        Err(res) => return res,
    };

    match services.products.delete(id) {
        Ok(product) => {
            tracing::info!(product_id = %id, by = %principal.identifier, "product deleted");
            Json(product).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}
