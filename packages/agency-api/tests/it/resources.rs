use std::sync::{Arc, Mutex};

use agency_api::{
    Agency, Token,
    v1::{
        ApiError, Customer, CustomerDraft, CustomerId, Voyage, VoyageId, VoyageStatus, VisaType,
        envelope::ShapeError,
    },
};
use axum::{
    Json, Router,
    extract::Path,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::IntoResponse,
    routing::get,
};
use color_eyre::Result;
use pretty_assertions::assert_eq as pretty_assert_eq;
use serde_json::{Value, json};

use crate::serve;

fn customers() -> Value {
    json!([
        {"id": 1, "nom": "Benali", "prenom": "Yasmine", "type_visa": "touriste"},
        {"id": "2", "nom": "Haddad", "prenom": "Omar", "statut_paiement": "Payé"}
    ])
}

#[test_log::test(tokio::test)]
async fn lists_data_envelope() -> Result<()> {
    let api = Router::new().route("/clients", get(|| async { Json(json!({"data": customers()})) }));
    let agency = Agency::new(serve(api).await);

    let listed = agency.list::<Customer>().await?;
    pretty_assert_eq!(listed.len(), 2);
    pretty_assert_eq!(listed[0].visa_type, Some(VisaType::Tourist));
    pretty_assert_eq!(listed[1].id, CustomerId::new(2));
    Ok(())
}

#[test_log::test(tokio::test)]
async fn lists_paginated_and_bare_shapes() -> Result<()> {
    let api = Router::new()
        .route(
            "/clients",
            get(|| async {
                Json(json!({"data": {"data": customers(), "current_page": 1, "last_page": 1}}))
            }),
        )
        .route(
            "/voyages",
            get(|| async {
                Json(json!([{
                    "id": 4,
                    "client_id": 1,
                    "destination": "Antalya",
                    "prix": 950,
                    "statut": "en cours"
                }]))
            }),
        );
    let agency = Agency::new(serve(api).await);

    pretty_assert_eq!(agency.list::<Customer>().await?.len(), 2);
    let voyages = agency.list::<Voyage>().await?;
    pretty_assert_eq!(voyages.len(), 1);
    pretty_assert_eq!(voyages[0].status, Some(VoyageStatus::InProgress));
    Ok(())
}

#[test_log::test(tokio::test)]
async fn attaches_bearer_token() -> Result<()> {
    let api = Router::new().route(
        "/clients",
        get(|headers: HeaderMap| async move {
            match headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok()) {
                Some("Bearer secret") => Json(customers()).into_response(),
                _ => (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"message": "Unauthenticated."})),
                )
                    .into_response(),
            }
        }),
    );
    let base = serve(api).await;

    let anonymous = Agency::new(base.clone());
    let err = anonymous
        .list::<Customer>()
        .await
        .expect_err("anonymous request should fail");
    let api_error = err
        .downcast_ref::<ApiError>()
        .expect("error should carry the API error");
    assert!(api_error.is_unauthorized());
    pretty_assert_eq!(api_error.message, "Unauthenticated.");

    let signed_in = Agency::new(base).with_token(Token::new("secret")?);
    pretty_assert_eq!(signed_in.list::<Customer>().await?.len(), 2);
    Ok(())
}

#[test_log::test(tokio::test)]
async fn gets_record_by_id() -> Result<()> {
    let api = Router::new().route(
        "/clients/{id}",
        get(|Path(id): Path<u64>| async move {
            if id == 7 {
                Json(json!({"data": {"id": 7, "nom": "Mansouri", "prenom": "Karim"}})).into_response()
            } else {
                (StatusCode::NOT_FOUND, Json(json!({"message": "Client introuvable"})))
                    .into_response()
            }
        }),
    );
    let agency = Agency::new(serve(api).await);

    let customer = agency.get::<Customer>(CustomerId::new(7)).await?;
    pretty_assert_eq!(customer.full_name(), "Karim Mansouri");

    let err = agency
        .get::<Customer>(CustomerId::new(8))
        .await
        .expect_err("missing record should fail");
    let api_error = err.downcast_ref::<ApiError>().expect("api error");
    assert!(api_error.is_not_found());
    pretty_assert_eq!(api_error.message, "Client introuvable");
    Ok(())
}

#[test_log::test(tokio::test)]
async fn creates_and_updates_records() -> Result<()> {
    let received = Arc::new(Mutex::new(Vec::<Value>::new()));
    let api = Router::new()
        .route(
            "/clients",
            axum::routing::post({
                let received = received.clone();
                move |Json(body): Json<Value>| async move {
                    received.lock().expect("lock").push(body.clone());
                    let mut record = body;
                    record["id"] = json!(11);
                    (StatusCode::CREATED, Json(json!({"data": record})))
                }
            }),
        )
        .route(
            "/clients/{id}",
            axum::routing::put({
                let received = received.clone();
                move |Path(id): Path<u64>, Json(body): Json<Value>| async move {
                    received.lock().expect("lock").push(body);
                    Json(json!({"message": format!("Client {id} mis à jour")}))
                }
            }),
        );
    let agency = Agency::new(serve(api).await);

    let draft = CustomerDraft::builder()
        .last_name("Kaci")
        .first_name("Samia")
        .email("samia@example.com")
        .build();
    let created = agency
        .create::<Customer>(&draft)
        .await?
        .expect("created record echoed back");
    pretty_assert_eq!(created.id, CustomerId::new(11));
    pretty_assert_eq!(created.email.as_deref(), Some("samia@example.com"));

    let mut edit = CustomerDraft::from(&created);
    edit.phone = Some(String::from("0555 00 11 22"));
    let updated = agency.update::<Customer>(created.id, &edit).await?;
    pretty_assert_eq!(updated, None);

    let received = received.lock().expect("lock").clone();
    pretty_assert_eq!(
        received,
        vec![
            json!({"nom": "Kaci", "prenom": "Samia", "email": "samia@example.com"}),
            json!({
                "nom": "Kaci",
                "prenom": "Samia",
                "email": "samia@example.com",
                "telephone": "0555 00 11 22"
            }),
        ]
    );
    Ok(())
}

#[test_log::test(tokio::test)]
async fn rejects_malformed_created_record() -> Result<()> {
    let api = Router::new().route(
        "/clients",
        axum::routing::post(|| async {
            (
                StatusCode::CREATED,
                Json(json!({"data": {"id": 12, "nom": ["Kaci"]}})),
            )
        }),
    );
    let agency = Agency::new(serve(api).await);

    let draft = CustomerDraft::builder().last_name("Kaci").build();
    let err = agency
        .create::<Customer>(&draft)
        .await
        .expect_err("malformed echo should fail");
    let shape = err.downcast_ref::<ShapeError>().expect("shape error");
    assert!(matches!(shape, ShapeError::Record(_)), "{shape:?}");
    Ok(())
}

#[test_log::test(tokio::test)]
async fn reports_validation_errors() -> Result<()> {
    let api = Router::new().route(
        "/clients",
        axum::routing::post(|| async {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "message": "The given data was invalid.",
                    "errors": {"email": ["Cet email est déjà utilisé."]}
                })),
            )
        }),
    );
    let agency = Agency::new(serve(api).await);

    let draft = CustomerDraft::builder()
        .last_name("Kaci")
        .email("samia@example.com")
        .build();
    let err = agency
        .create::<Customer>(&draft)
        .await
        .expect_err("create should fail");
    let api_error = err.downcast_ref::<ApiError>().expect("api error");
    assert!(api_error.is_validation());
    pretty_assert_eq!(api_error.fields.len(), 1);
    pretty_assert_eq!(api_error.fields[0].field, "email");
    Ok(())
}

#[test_log::test(tokio::test)]
async fn deletes_records() -> Result<()> {
    let api = Router::new().route(
        "/voyages/{id}",
        axum::routing::delete(|Path(id): Path<u64>| async move {
            if id == 3 {
                StatusCode::NO_CONTENT
            } else {
                StatusCode::NOT_FOUND
            }
        }),
    );
    let agency = Agency::new(serve(api).await);

    agency.delete::<Voyage>(VoyageId::new(3)).await?;
    let err = agency
        .delete::<Voyage>(VoyageId::new(4))
        .await
        .expect_err("missing record should fail");
    let api_error = err.downcast_ref::<ApiError>().expect("api error");
    assert!(api_error.is_not_found());
    pretty_assert_eq!(api_error.message, "Not Found");
    Ok(())
}

#[test_log::test(tokio::test)]
async fn reports_status_when_error_body_is_cut_short() -> Result<()> {
    use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept connection");
        let mut request = [0u8; 4096];
        let _ = stream.read(&mut request).await.expect("read request");
        stream
            .write_all(b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 64\r\n\r\n{\"mess")
            .await
            .expect("write response");
        stream.shutdown().await.expect("close connection");
    });
    let agency = Agency::new(url::Url::parse(&format!("http://{addr}/api"))?);

    let err = agency
        .get::<Customer>(CustomerId::new(1))
        .await
        .expect_err("server error should fail");
    let api_error = err.downcast_ref::<ApiError>().expect("api error");
    pretty_assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
    pretty_assert_eq!(api_error.message, "Internal Server Error");
    Ok(())
}
