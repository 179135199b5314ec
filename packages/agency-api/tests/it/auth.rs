use agency_api::{Agency, v1::Role};
use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::IntoResponse,
    routing::{get, post},
};
use color_eyre::Result;
use pretty_assertions::assert_eq as pretty_assert_eq;
use serde_json::{Value, json};

use crate::serve;

fn api() -> Router {
    Router::new()
        .route(
            "/auth/login",
            post(|Json(body): Json<Value>| async move {
                if body["password"] == "correct-horse" {
                    Json(json!({
                        "access_token": "tok-42",
                        "token_type": "Bearer",
                        "user": {"id": 1, "name": "Nadia", "email": body["email"], "role": "agent"}
                    }))
                    .into_response()
                } else {
                    (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({"error": {"message": "Identifiants invalides"}})),
                    )
                        .into_response()
                }
            }),
        )
        .route(
            "/auth/me",
            get(|headers: HeaderMap| async move {
                match headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok()) {
                    Some("Bearer tok-42") => Json(json!({
                        "user": {"id": 1, "nom": "Nadia", "email": "nadia@agence.example", "actif": 1}
                    }))
                    .into_response(),
                    _ => StatusCode::UNAUTHORIZED.into_response(),
                }
            }),
        )
}

#[test_log::test(tokio::test)]
async fn logs_in_and_fetches_current_user() -> Result<()> {
    let base = serve(api()).await;

    let session = Agency::new(base.clone())
        .login("nadia@agence.example", "correct-horse")
        .await?;
    pretty_assert_eq!(session.token.expose(), "tok-42");
    let user = session.user.expect("login response includes the user");
    pretty_assert_eq!(user.role, Some(Role::Agent));

    let me = Agency::new(base).with_token(session.token).me().await?;
    pretty_assert_eq!(me.name, "Nadia");
    assert!(me.is_active());
    Ok(())
}

#[test_log::test(tokio::test)]
async fn rejects_bad_credentials() -> Result<()> {
    let agency = Agency::new(serve(api()).await);

    let err = agency
        .login("nadia@agence.example", "wrong")
        .await
        .expect_err("login should fail");
    let api_error = err
        .downcast_ref::<agency_api::v1::ApiError>()
        .expect("api error");
    assert!(api_error.is_unauthorized());
    pretty_assert_eq!(api_error.message, "Identifiants invalides");
    Ok(())
}

#[test_log::test(tokio::test)]
async fn ping_accepts_client_errors() -> Result<()> {
    let agency = Agency::new(serve(api()).await);
    agency.ping().await
}
