use axum::{Router, routing::get};

pub mod login;
pub mod products;
pub mod system;

/// Router for every endpoint that needs a bearer token.
pub fn router() -> Router {
    Router::new()
        .route("/me", get(system::me))
        .nest("/products", products::router())
}
