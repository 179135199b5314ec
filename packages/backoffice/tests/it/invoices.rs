use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::Path,
    http::StatusCode,
    routing::{get, post},
};
use pretty_assertions::assert_eq as pretty_assert_eq;
use serde_json::{Value, json};
use tempfile::TempDir;

use crate::{backoffice, json, serve, stderr};

fn invoice(id: u64, paid: f64) -> Value {
    json!({
        "id": id,
        "numero": format!("FAC-2026-{id:04}"),
        "type": "facture",
        "client_id": 3,
        "montant_total": "1 000,00",
        "montant_paye": paid,
        "statut": "envoyee",
        "date_emission": "2026-09-01"
    })
}

/// Backend for a single invoice, recording the payments it receives.
fn backend(paid: Arc<Mutex<Vec<Value>>>) -> Router {
    let recorded = paid.clone();
    Router::new()
        .route(
            "/factures/{id}",
            get(move |Path(id): Path<u64>| {
                let paid = paid.clone();
                async move {
                    let total = paid
                        .lock()
                        .expect("lock payments")
                        .iter()
                        .filter_map(|payment| payment["montant"].as_f64())
                        .sum::<f64>();
                    Json(json!({"data": invoice(id, total)}))
                }
            })
            .delete(|| async { StatusCode::NO_CONTENT }),
        )
        .route(
            "/factures/{id}/paiements",
            post(move |Path(id): Path<u64>, Json(payment): Json<Value>| {
                let recorded = recorded.clone();
                async move {
                    let amount = payment["montant"].as_f64().unwrap_or_default();
                    recorded.lock().expect("lock payments").push(payment);
                    Json(json!({"data": invoice(id, amount)}))
                }
            }),
        )
}

#[test_log::test(tokio::test)]
async fn records_payment() {
    let dir = TempDir::new().expect("create temporary directory");
    let payments = Arc::new(Mutex::new(Vec::new()));
    let api = serve(backend(payments.clone())).await;

    let updated = json(
        &backoffice(
            &api,
            dir.path(),
            Some("secret"),
            &["invoices", "pay", "5", "400", "--date", "2026-10-01", "--method", "virement", "--json"],
        )
        .await,
    );
    pretty_assert_eq!(updated["numero"], json!("FAC-2026-0005"));
    pretty_assert_eq!(
        payments.lock().expect("lock payments").clone(),
        vec![json!({"montant": 400.0, "date_paiement": "2026-10-01", "mode_paiement": "virement"})]
    );
}

#[test_log::test(tokio::test)]
async fn rejects_overpayment() {
    let dir = TempDir::new().expect("create temporary directory");
    let payments = Arc::new(Mutex::new(Vec::new()));
    let api = serve(backend(payments.clone())).await;

    let output = backoffice(&api, dir.path(), Some("secret"), &["factures", "pay", "5", "1500"]).await;
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("exceeds"), "{err}");
    assert!(payments.lock().expect("lock payments").is_empty());
}

#[test_log::test(tokio::test)]
async fn deletes_without_prompt() {
    let dir = TempDir::new().expect("create temporary directory");
    let api = serve(backend(Arc::default())).await;

    let output = backoffice(&api, dir.path(), Some("secret"), &["invoices", "delete", "5", "--yes"]).await;
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stderr(&output).contains("#5"));
}

#[test_log::test(tokio::test)]
async fn rejects_unknown_kind() {
    let dir = TempDir::new().expect("create temporary directory");
    let api = serve(Router::new().route(
        "/factures",
        get(|| async {
            let mut quote = invoice(6, 0.0);
            quote["type"] = json!("devis");
            Json(json!([invoice(5, 0.0), quote]))
        }),
    ))
    .await;

    let output = backoffice(&api, dir.path(), Some("secret"), &["invoices", "list", "--kind", "avoir"]).await;
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("expected `devis` or `facture`"), "{err}");

    let output = backoffice(&api, dir.path(), Some("secret"), &["devis", "list", "--kind", "Devis", "--json"]).await;
    let page = json(&output);
    pretty_assert_eq!(page["total"], json!(1));
    pretty_assert_eq!(page["items"][0]["id"], json!(6));
}
