//! OAuth2 password-flow token endpoint.

use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::{Extension, rejection::FormRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};

use catalog_auth::{AuthError, TokenError, parse_scope_list};

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/token", post(issue_token))
}

#[derive(Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
    /// Space-separated scopes; empty asks for everything the principal holds.
    #[serde(default)]
    pub scope: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

enum LoginError {
    Auth(AuthError),
    Token(TokenError),
}

pub async fn issue_token(
    Extension(services): Extension<Arc<AppServices>>,
    form: Result<Form<TokenRequest>, FormRejection>,
) -> Response {
    let Form(form) = match form {
        Ok(f) => f,
        Err(rejection) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_body", rejection.body_text());
        }
    };

    // bcrypt is CPU-bound; keep it off the async workers.
    let outcome = tokio::task::spawn_blocking(move || {
        let principal = services
            .authenticator
            .authenticate(&form.username, &form.password)
            .map_err(LoginError::Auth)?;

        let scopes = principal.grantable_scopes(&parse_scope_list(&form.scope));
        services
            .authorizer
            .codec()
            .issue(&principal, &scopes, None)
            .map_err(LoginError::Token)
    })
    .await;

    match outcome {
        Ok(Ok(access_token)) => Json(TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
        })
        .into_response(),
        Ok(Err(LoginError::Auth(e))) => errors::unauthorized(e.code(), "Incorrect username or password"),
        Ok(Err(LoginError::Token(e))) => {
            tracing::error!(error = %e, "token issuance failed");
            errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "token_error", "could not issue token")
        }
        Err(e) => {
            tracing::error!(error = %e, "login task failed");
            errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "login failed")
        }
    }
}
