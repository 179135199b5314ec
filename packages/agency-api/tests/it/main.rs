//! Integration tests for the agency client against an in-process backend.

use axum::Router;
use url::Url;

pub mod auth;
pub mod invoices;
pub mod resources;

/// Serve the router under `/api` on an ephemeral local port, returning the
/// API base URL.
pub async fn serve(api: Router) -> Url {
    let app = Router::new().nest("/api", api);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("read local address");
    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("serve fake backend");
    });
    Url::parse(&format!("http://{addr}/api")).expect("parse base url")
}
