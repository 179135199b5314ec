use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::IntoResponse,
    routing::get,
};
use pretty_assertions::assert_eq as pretty_assert_eq;
use serde_json::json;
use tempfile::TempDir;

use crate::{backoffice, json, serve, stderr};

async fn clients(headers: HeaderMap) -> impl IntoResponse {
    if headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) != Some("Bearer secret") {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Unauthenticated."})));
    }
    (
        StatusCode::OK,
        Json(json!({"data": [
            {"id": 1, "nom": "Benali", "prenom": "Yasmine", "statut_paiement": "paye"},
            {"id": 2, "nom": "Haddad", "prenom": "Omar", "statut_paiement": "impaye"},
            {"id": 3, "nom": "Benali", "prenom": "Karim", "statut_paiement": "impayé"},
            {"id": 4, "nom": "Amrani", "prenom": "Sofia"}
        ]})),
    )
}

#[test_log::test(tokio::test)]
async fn lists_filtered_page_as_json() {
    let dir = TempDir::new().expect("create temporary directory");
    let api = serve(Router::new().route("/clients", get(clients))).await;

    let output = backoffice(
        &api,
        dir.path(),
        Some("secret"),
        &["clients", "list", "--json", "--search", "benali", "--per-page", "1", "--page", "2"],
    )
    .await;
    let page = json(&output);
    pretty_assert_eq!(page["total"], json!(2));
    pretty_assert_eq!(page["pages"], json!(2));
    pretty_assert_eq!(page["page"], json!(2));
    pretty_assert_eq!(page["items"].as_array().map(Vec::len), Some(1));
    pretty_assert_eq!(page["items"][0]["prenom"], json!("Yasmine"));
}

#[test_log::test(tokio::test)]
async fn filters_by_status_alias() {
    let dir = TempDir::new().expect("create temporary directory");
    let api = serve(Router::new().route("/clients", get(clients))).await;

    let output = backoffice(
        &api,
        dir.path(),
        Some("secret"),
        &["clients", "list", "--json", "--status", "impayé", "--all"],
    )
    .await;
    let page = json(&output);
    pretty_assert_eq!(page["total"], json!(2));
}

#[test_log::test(tokio::test)]
async fn requires_sign_in() {
    let dir = TempDir::new().expect("create temporary directory");
    let api = serve(Router::new().route("/clients", get(clients))).await;

    let output = backoffice(&api, dir.path(), None, &["clients", "list"]).await;
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("not signed in"), "{err}");
    assert!(err.contains("backoffice auth login"), "{err}");
}

#[test_log::test(tokio::test)]
async fn explains_rejected_token() {
    let dir = TempDir::new().expect("create temporary directory");
    let api = serve(Router::new().route("/clients", get(clients))).await;

    let output = backoffice(&api, dir.path(), Some("stale"), &["clients", "list"]).await;
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("Unauthenticated."), "{err}");
}
