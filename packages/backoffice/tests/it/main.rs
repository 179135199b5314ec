//! End-to-end tests driving the `backoffice` binary against an in-process
//! backend.

use std::{path::Path, process::Output};

use axum::Router;
use tokio::process::Command;
use url::Url;

pub mod auth;
pub mod invoices;
pub mod listing;

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
    Url::parse(&format!("http://{addr}/api/")).expect("parse base url")
}

/// Run the binary with its configuration isolated in `config_dir`.
pub async fn backoffice(
    api: &Url,
    config_dir: &Path,
    token: Option<&str>,
    args: &[&str],
) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_backoffice"));
    cmd.args(args)
        .env("BACKOFFICE_API_URL", api.as_str())
        .env("BACKOFFICE_CONFIG_DIR", config_dir)
        .env("NO_COLOR", "1")
        .env_remove("BACKOFFICE_API_TOKEN")
        .env_remove("BACKOFFICE_PAGE_SIZE")
        .env_remove("RUST_LOG");
    if let Some(token) = token {
        cmd.env("BACKOFFICE_API_TOKEN", token);
    }
    cmd.output().await.expect("run backoffice")
}

#[track_caller]
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[track_caller]
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Parse stdout as JSON, failing the test with stderr attached otherwise.
#[track_caller]
pub fn json(output: &Output) -> serde_json::Value {
    assert!(output.status.success(), "command failed: {}", stderr(output));
    serde_json::from_slice(&output.stdout)
        .unwrap_or_else(|err| panic!("parse stdout as json: {err}\n{}", stdout(output)))
}
