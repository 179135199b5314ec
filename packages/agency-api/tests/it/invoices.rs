use std::sync::{Arc, Mutex};

use agency_api::{
    Agency,
    v1::{Amount, Invoice, InvoiceId, InvoiceKind, InvoiceStatus, PaymentRequest},
};
use axum::{
    Json, Router,
    extract::Path,
    routing::{get, post},
};
use color_eyre::Result;
use pretty_assertions::assert_eq as pretty_assert_eq;
use serde_json::{Value, json};

use crate::serve;

#[test_log::test(tokio::test)]
async fn converts_quote_into_invoice() -> Result<()> {
    let api = Router::new().route(
        "/factures/{id}/convertir",
        post(|Path(id): Path<u64>| async move {
            Json(json!({
                "message": "Devis converti",
                "data": {
                    "id": id,
                    "numero": "FAC-2024-0012",
                    "type": "facture",
                    "client_id": 3,
                    "montant_total": "1 250,00",
                    "statut": "envoyée"
                }
            }))
        }),
    );
    let agency = Agency::new(serve(api).await);

    let invoice = agency.convert_quote(InvoiceId::new(12)).await?;
    pretty_assert_eq!(invoice.id, InvoiceId::new(12));
    pretty_assert_eq!(invoice.kind, InvoiceKind::Invoice);
    pretty_assert_eq!(invoice.total, Amount::from_units(1250));
    pretty_assert_eq!(invoice.status, Some(InvoiceStatus::Sent));
    Ok(())
}

#[test_log::test(tokio::test)]
async fn refetches_invoice_after_payment() -> Result<()> {
    let payments = Arc::new(Mutex::new(Vec::<Value>::new()));
    let api = Router::new()
        .route(
            "/factures/{id}/paiements",
            post({
                let payments = payments.clone();
                move |Json(body): Json<Value>| async move {
                    payments.lock().expect("lock").push(body.clone());
                    Json(json!({"data": {"id": 90, "montant": body["montant"], "facture_id": 5}}))
                }
            }),
        )
        .route(
            "/factures/{id}",
            get(|Path(id): Path<u64>| async move {
                Json(json!({
                    "id": id,
                    "type": "facture",
                    "client_id": 1,
                    "montant_total": 1000,
                    "montant_paye": 400,
                    "montant_restant": 600
                }))
            }),
        );
    let agency = Agency::new(serve(api).await);

    let payment = PaymentRequest::builder()
        .amount(Amount::from_units(400))
        .method("virement")
        .build();
    let invoice: Invoice = agency.record_payment(InvoiceId::new(5), &payment).await?;

    pretty_assert_eq!(invoice.id, InvoiceId::new(5));
    pretty_assert_eq!(invoice.amount_due(), Amount::from_units(600));
    pretty_assert_eq!(invoice.paid_percent(), Some(40));
    pretty_assert_eq!(
        payments.lock().expect("lock").clone(),
        vec![json!({"montant": 400.0, "mode_paiement": "virement"})]
    );
    Ok(())
}
