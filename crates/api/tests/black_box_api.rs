use std::sync::Arc;

use catalog_api::app::{self, AppServices};
use catalog_auth::{AuthConfig, Scope};
use catalog_infra::PrincipalStore;
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::json;

const SECRET: &str = "test-secret";
const ALICE: &str = "alice@example.com";
const ALICE_PASSWORD: &str = "wonderland";

struct TestServer {
    base_url: String,
    services: Arc<AppServices>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Cheapest bcrypt cost; production default is far slower.
        let config = AuthConfig::new(SECRET).with_password_cost(4);
        let services = Arc::new(AppServices::in_memory(&config).expect("valid config"));
        services
            .register_principal(ALICE, ALICE_PASSWORD, [Scope::ACTIVE])
            .expect("failed to seed alice");

        // Same router as prod, bound to an ephemeral port.
        let app = app::build_app(services.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            services,
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn login(&self, username: &str, password: &str, scope: &str) -> reqwest::Response {
        reqwest::Client::new()
            .post(self.url("/login/token"))
            .form(&[("username", username), ("password", password), ("scope", scope)])
            .send()
            .await
            .unwrap()
    }

    async fn token(&self, username: &str, password: &str, scope: &str) -> String {
        let res = self.login(username, password, scope).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["token_type"], "bearer");
        body["access_token"].as_str().unwrap().to_string()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(secret: &str, algorithm: Algorithm, sub: &str, scopes: &[&str], exp: i64) -> String {
    let claims = json!({
        "sub": sub,
        "scopes": scopes,
        "exp": exp,
    });

    jsonwebtoken::encode(
        &Header::new(algorithm),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

fn challenge(res: &reqwest::Response) -> String {
    res.headers()
        .get("www-authenticate")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn token_scopes(token: &str) -> serde_json::Value {
    let mut validation = jsonwebtoken::Validation::new(Algorithm::HS256);
    validation.set_required_spec_claims(&["exp", "sub"]);
    let data = jsonwebtoken::decode::<serde_json::Value>(
        token,
        &jsonwebtoken::DecodingKey::from_secret(SECRET.as_bytes()),
        &validation,
    )
    .unwrap();
    data.claims["scopes"].clone()
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_issues_bearer_token_for_valid_credentials() {
    let srv = TestServer::spawn().await;
    let token = srv.token(ALICE, ALICE_PASSWORD, "").await;
    assert_eq!(token.split('.').count(), 3);
    assert_eq!(token_scopes(&token), json!(["active"]));

    let res = reqwest::Client::new()
        .get(srv.url("/user/me"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["identifier"], ALICE);
    assert_eq!(body["disabled"], false);
}

#[tokio::test]
async fn wrong_password_and_unknown_user_look_the_same() {
    let srv = TestServer::spawn().await;

    let wrong = srv.login(ALICE, "not-it", "").await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(challenge(&wrong), "Bearer");
    let wrong_body: serde_json::Value = wrong.json().await.unwrap();

    let unknown = srv.login("nobody@example.com", "not-it", "").await;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    let unknown_body: serde_json::Value = unknown.json().await.unwrap();

    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["error"], "bad_credentials");
}

#[tokio::test]
async fn malformed_login_form_gets_json_error() {
    let srv = TestServer::spawn().await;
    let res = reqwest::Client::new()
        .post(srv.url("/login/token"))
        .form(&[("username", ALICE)])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let content_type = res
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("application/json"));
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_body");
    assert!(body["message"].as_str().unwrap().contains("password"));
}

#[tokio::test]
async fn login_never_grants_scopes_the_principal_lacks() {
    let srv = TestServer::spawn().await;
    let token = srv.token(ALICE, ALICE_PASSWORD, "active admin").await;
    assert_eq!(token_scopes(&token), json!(["active"]));
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(srv.url("/user/products/all/")).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(challenge(&res), "Bearer");

    let res = reqwest::Client::new()
        .get(srv.url("/user/products/all/"))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_token");
}

#[tokio::test]
async fn token_without_active_scope_is_forbidden() {
    let srv = TestServer::spawn().await;
    // Asking only for a scope alice lacks leaves the token with none.
    let token = srv.token(ALICE, ALICE_PASSWORD, "admin").await;
    assert_eq!(token_scopes(&token), json!([]));

    let res = reqwest::Client::new()
        .get(srv.url("/user/products/all/"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(challenge(&res), "Bearer scope=\"active\"");
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "insufficient_scope");
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let srv = TestServer::spawn().await;
    let exp = (Utc::now() - ChronoDuration::minutes(1)).timestamp();
    let token = mint_jwt(SECRET, Algorithm::HS256, ALICE, &["active"], exp);

    let res = reqwest::Client::new()
        .get(srv.url("/user/me"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "expired_token");
}

#[tokio::test]
async fn foreign_secret_or_algorithm_is_rejected() {
    let srv = TestServer::spawn().await;
    let exp = (Utc::now() + ChronoDuration::minutes(10)).timestamp();
    let client = reqwest::Client::new();

    for token in [
        mint_jwt("other-secret", Algorithm::HS256, ALICE, &["active"], exp),
        mint_jwt(SECRET, Algorithm::HS512, ALICE, &["active"], exp),
    ] {
        let res = client
            .get(srv.url("/user/me"))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["error"], "invalid_token");
    }
}

#[tokio::test]
async fn disabled_principal_can_log_in_but_not_use_the_catalog() {
    let srv = TestServer::spawn().await;
    let carol = srv
        .services
        .register_principal("carol@example.com", "hunter2", [Scope::ACTIVE])
        .unwrap();
    srv.services.principals.upsert(carol.with_disabled(true)).unwrap();

    let token = srv.token("carol@example.com", "hunter2", "").await;
    let res = reqwest::Client::new()
        .get(srv.url("/user/products/all/"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "inactive_principal");
}

#[tokio::test]
async fn product_lifecycle_create_list_update_delete() {
    let srv = TestServer::spawn().await;
    let token = srv.token(ALICE, ALICE_PASSWORD, "").await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/user/products/createproduct/"))
        .bearer_auth(&token)
        .json(&json!({"name": "Widget", "price": 1999, "instock": true}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["name"], "Widget");

    let res = client
        .get(srv.url("/user/products/all/"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let all: serde_json::Value = res.json().await.unwrap();
    assert_eq!(all.as_array().unwrap().len(), 1);

    let res = client
        .patch(srv.url(&format!("/user/products/updateproduct/?id={id}")))
        .bearer_auth(&token)
        .json(&json!({"instock": false}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: serde_json::Value = res.json().await.unwrap();
    assert_eq!(updated["instock"], false);
    assert_eq!(updated["price"], 1999);

    let res = client
        .delete(srv.url(&format!("/user/products/deleteproduct/?id={id}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let deleted: serde_json::Value = res.json().await.unwrap();
    assert_eq!(deleted["id"], id.as_str());

    let res = client
        .delete(srv.url(&format!("/user/products/deleteproduct/?id={id}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_or_malformed_product_ids() {
    let srv = TestServer::spawn().await;
    let token = srv.token(ALICE, ALICE_PASSWORD, "").await;
    let client = reqwest::Client::new();
    let missing = uuid_like();

    let res = client
        .patch(srv.url(&format!("/user/products/updateproduct/?id={missing}")))
        .bearer_auth(&token)
        .json(&json!({"price": 5}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .delete(srv.url("/user/products/deleteproduct/?id=42"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_id");
}

#[tokio::test]
async fn invalid_product_payloads_are_rejected() {
    let srv = TestServer::spawn().await;
    let token = srv.token(ALICE, ALICE_PASSWORD, "").await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/user/products/createproduct/"))
        .bearer_auth(&token)
        .json(&json!({"name": "Widget", "price": -1, "instock": true}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");

    let res = client
        .post(srv.url("/user/products/createproduct/"))
        .bearer_auth(&token)
        .json(&json!({"name": "Widget"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_body");
}

#[tokio::test]
async fn auth_is_checked_before_the_body() {
    let srv = TestServer::spawn().await;
    let res = reqwest::Client::new()
        .post(srv.url("/user/products/createproduct/"))
        .body("not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

fn uuid_like() -> String {
    catalog_core::ProductId::new().to_string()
}
