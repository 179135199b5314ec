use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::IntoResponse,
    routing::{get, post},
};
use pretty_assertions::assert_eq as pretty_assert_eq;
use serde_json::{Value, json};
use tempfile::TempDir;

use crate::{backoffice, json, serve, stderr};

async fn login(Json(credentials): Json<Value>) -> impl IntoResponse {
    if credentials["password"] != json!("s3cret") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Identifiants invalides"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "access_token": "fresh-token",
            "user": {"id": 7, "name": "Nadia Cherif", "email": credentials["email"], "role": "admin"}
        })),
    )
}

async fn me(headers: HeaderMap) -> impl IntoResponse {
    if headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) != Some("Bearer fresh-token") {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Unauthenticated."})));
    }
    (
        StatusCode::OK,
        Json(json!({"user": {"id": 7, "nom": "Nadia Cherif", "email": "nadia@agence.dz", "actif": 1}})),
    )
}

fn backend() -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
}

#[test_log::test(tokio::test)]
async fn login_status_logout() {
    let dir = TempDir::new().expect("create temporary directory");
    let api = serve(backend()).await;

    let output = backoffice(
        &api,
        dir.path(),
        None,
        &["auth", "login", "--email", "nadia@agence.dz", "--password", "s3cret"],
    )
    .await;
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stderr(&output).contains("Nadia Cherif"));
    let stored = std::fs::read_to_string(dir.path().join("token")).expect("read token file");
    pretty_assert_eq!(stored.trim(), "fresh-token");

    let status = json(&backoffice(&api, dir.path(), None, &["auth", "status", "--json"]).await);
    pretty_assert_eq!(status["signed_in"], json!(true));
    pretty_assert_eq!(status["user"]["email"], json!("nadia@agence.dz"));

    let output = backoffice(&api, dir.path(), None, &["auth", "logout"]).await;
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(!dir.path().join("token").exists());

    let status = json(&backoffice(&api, dir.path(), None, &["auth", "status", "--json"]).await);
    pretty_assert_eq!(status, json!({"signed_in": false}));
}

#[test_log::test(tokio::test)]
async fn rejected_login_keeps_no_token() {
    let dir = TempDir::new().expect("create temporary directory");
    let api = serve(backend()).await;

    let output = backoffice(
        &api,
        dir.path(),
        None,
        &["auth", "login", "--email", "nadia@agence.dz", "--password", "wrong"],
    )
    .await;
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Identifiants invalides"));
    assert!(!dir.path().join("token").exists());
}

#[test_log::test(tokio::test)]
async fn reports_expired_session() {
    let dir = TempDir::new().expect("create temporary directory");
    let api = serve(backend()).await;

    let status = json(&backoffice(&api, dir.path(), Some("old-token"), &["auth", "status", "--json"]).await);
    pretty_assert_eq!(status, json!({"signed_in": false, "expired": true}));
}
