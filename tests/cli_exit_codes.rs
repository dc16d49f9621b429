use std::process::{Command, Output};

use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use figkit_lib::FigkitOutput;
use serde_json::{json, Value};
use tempfile::TempDir;

fn figkit(args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_figkit"));
    cmd.args(args)
        .env_remove("FIGMA_TOKEN")
        .env_remove("FIGMA_OAUTH_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is json")
}

#[test]
fn missing_token_is_a_config_error() {
    let output = figkit(&["whoami"]).output().expect("run figkit");
    assert_eq!(output.status.code(), Some(2));

    let body = stdout_json(&output);
    assert_eq!(body["mode"], "error");
    assert_eq!(body["error"]["category"], "config");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("FIGMA_TOKEN"));
}

#[test]
fn unrecognized_link_is_an_input_error() {
    let output = figkit(&[
        "file",
        "https://example.com/not-figma",
        "--token",
        "figd_x",
    ])
    .output()
    .expect("run figkit");
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stdout_json(&output)["error"]["category"], "input");
}

#[test]
fn invalid_config_file_fails_before_any_request() {
    let dir = TempDir::new().expect("tempdir");
    let cfg_path = dir.path().join("figkit.toml");
    std::fs::write(&cfg_path, "[api]\nbase_url = \"ftp://example.com\"\n").expect("write config");

    let output = figkit(&[
        "whoami",
        "--token",
        "figd_x",
        "--config",
        cfg_path.to_str().unwrap(),
    ])
    .output()
    .expect("run figkit");
    assert_eq!(output.status.code(), Some(2));

    let body = stdout_json(&output);
    assert_eq!(body["error"]["category"], "config");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Invalid config"));
}

#[test]
fn out_of_range_scale_is_rejected() {
    let output = figkit(&[
        "render",
        "AbC123",
        "--ids",
        "1:2",
        "--scale",
        "9",
        "--token",
        "figd_x",
    ])
    .output()
    .expect("run figkit");
    assert_eq!(output.status.code(), Some(2));
    assert!(stdout_json(&output)["error"]["message"]
        .as_str()
        .unwrap()
        .contains("--scale"));
}

#[test]
fn error_document_is_written_to_output_path() {
    let dir = TempDir::new().expect("tempdir");
    let out_path = dir.path().join("error.json");

    let output = figkit(&["whoami", "--output", out_path.to_str().unwrap()])
        .output()
        .expect("run figkit");
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());

    let written = std::fs::read_to_string(&out_path).expect("error file written");
    let parsed: FigkitOutput = serde_json::from_str(&written).expect("valid output document");
    assert!(matches!(parsed, FigkitOutput::Error(_)));
}

async fn me(headers: HeaderMap) -> Json<Value> {
    let token = headers
        .get("x-figma-token")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    Json(json!({ "id": "u1", "handle": token, "img_url": "" }))
}

#[tokio::test(flavor = "multi_thread")]
async fn whoami_reports_the_authenticated_user() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock");
    let addr = listener.local_addr().expect("mock addr");
    tokio::spawn(async move {
        let router = Router::new().route("/v1/me", get(me));
        axum::serve(listener, router).await.expect("mock server");
    });

    let dir = TempDir::new().expect("tempdir");
    let cfg_path = dir.path().join("figkit.toml");
    std::fs::write(
        &cfg_path,
        format!("[api]\nbase_url = \"http://{addr}\"\ntimeout = \"5s\"\n"),
    )
    .expect("write config");

    let output = tokio::task::spawn_blocking(move || {
        figkit(&["whoami", "--config", cfg_path.to_str().unwrap()])
            .env("FIGMA_TOKEN", "figd_from_env")
            .output()
            .expect("run figkit")
    })
    .await
    .expect("join");

    assert_eq!(output.status.code(), Some(0));
    let body = stdout_json(&output);
    assert_eq!(body["mode"], "whoami");
    assert_eq!(body["user"]["handle"], "figd_from_env");
}
