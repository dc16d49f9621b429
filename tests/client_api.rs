use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use figkit_lib::types::{FileNodesParams, GetImageParams, ImageFormat, PostCommentParams};
use figkit_lib::{FigmaAuth, FigmaClient, FigmaClientConfig, FigmaError, RetryPolicy};
use serde_json::{json, Value};
use url::Url;

const TOKEN: &str = "figd_test_token";

#[derive(Clone, Default)]
struct MockState {
    queries: Arc<Mutex<Vec<String>>>,
    bodies: Arc<Mutex<Vec<Value>>>,
    flaky_calls: Arc<AtomicU32>,
    missing_calls: Arc<AtomicU32>,
}

fn user() -> Value {
    json!({
        "id": "u1",
        "handle": "ada",
        "img_url": "https://img/ada.png",
        "email": "ada@example.com"
    })
}

fn authorized(headers: &HeaderMap) -> bool {
    let personal = headers
        .get("x-figma-token")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == TOKEN);
    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"));
    personal || bearer
}

async fn me(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "status": 403, "err": "Invalid token" })),
        )
            .into_response();
    }
    Json(user()).into_response()
}

async fn file_nodes(
    State(state): State<MockState>,
    Path(key): Path<String>,
    RawQuery(query): RawQuery,
) -> Json<Value> {
    state
        .queries
        .lock()
        .unwrap()
        .push(query.unwrap_or_default());
    Json(json!({
        "name": format!("File {key}"),
        "lastModified": "2024-01-01T00:00:00Z",
        "version": "7",
        "nodes": {
            "1:2": { "document": { "id": "1:2", "name": "Card", "type": "FRAME" } },
            "3:4": null
        }
    }))
}

async fn missing_file(State(state): State<MockState>) -> Response {
    state.missing_calls.fetch_add(1, Ordering::SeqCst);
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "status": 404, "err": "Not found" })),
    )
        .into_response()
}

async fn bad_request() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "status": 400, "message": "ids are malformed" })),
    )
        .into_response()
}

async fn plain_failure() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response()
}

async fn flaky_me(State(state): State<MockState>) -> Response {
    let n = state.flaky_calls.fetch_add(1, Ordering::SeqCst) + 1;
    if n < 3 {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": 503, "err": "try later" })),
        )
            .into_response();
    }
    Json(user()).into_response()
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(2)).await;
    Json(user())
}

async fn images(RawQuery(query): RawQuery) -> Json<Value> {
    Json(json!({
        "err": null,
        "images": { "1:2": format!("rendered?{}", query.unwrap_or_default()), "3:4": null }
    }))
}

async fn post_comment(
    State(state): State<MockState>,
    Path(key): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.bodies.lock().unwrap().push(body.clone());
    Json(json!({
        "id": "c9",
        "file_key": key,
        "user": user(),
        "created_at": "2024-03-03T00:00:00Z",
        "message": body["message"],
    }))
}

async fn delete_comment() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn asset(headers: HeaderMap) -> Response {
    if headers.contains_key("x-figma-token") {
        return StatusCode::BAD_REQUEST.into_response();
    }
    (StatusCode::OK, vec![0x89u8, b'P', b'N', b'G']).into_response()
}

async fn spawn_mock() -> (Url, MockState) {
    let state = MockState::default();
    let router = Router::new()
        .route("/v1/me", get(me))
        .route("/v1/files/{key}/nodes", get(file_nodes))
        .route("/v1/files/missing", get(missing_file))
        .route("/v1/files/badreq", get(bad_request))
        .route("/v1/files/broken", get(plain_failure))
        .route("/v1/files/slow", get(slow))
        .route("/v1/images/{key}", get(images))
        .route("/v1/files/{key}/comments", post(post_comment))
        .route("/v1/files/{key}/comments/{id}", delete(delete_comment))
        .route("/flaky/v1/me", get(flaky_me))
        .route("/assets/render.png", get(asset))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock");
    let addr = listener.local_addr().expect("mock addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("mock server");
    });
    (
        Url::parse(&format!("http://{addr}")).expect("mock url"),
        state,
    )
}

fn client_for(base: &Url) -> FigmaClient {
    let config = FigmaClientConfig::new(TOKEN)
        .base_url(base.clone())
        .retry(RetryPolicy::new(3, Duration::from_millis(10)));
    FigmaClient::new(config).expect("client")
}

#[tokio::test]
async fn current_user_with_personal_token() {
    let (base, _) = spawn_mock().await;
    let user = client_for(&base).get_current_user().await.expect("user");
    assert_eq!(user.handle, "ada");
    assert_eq!(user.email.as_deref(), Some("ada@example.com"));
}

#[tokio::test]
async fn oauth_token_is_sent_as_bearer() {
    let (base, _) = spawn_mock().await;
    let config = FigmaClientConfig::with_auth(FigmaAuth::OAuth(TOKEN.into())).base_url(base);
    let user = FigmaClient::new(config)
        .expect("client")
        .get_current_user()
        .await
        .expect("user");
    assert_eq!(user.id, "u1");
}

#[tokio::test]
async fn wrong_token_surfaces_forbidden() {
    let (base, _) = spawn_mock().await;
    let config = FigmaClientConfig::new("nope").base_url(base);
    let err = FigmaClient::new(config)
        .expect("client")
        .get_current_user()
        .await
        .unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(403));
    assert!(err.to_string().contains("Invalid token"));
}

#[tokio::test]
async fn file_nodes_joins_ids_with_commas() {
    let (base, state) = spawn_mock().await;
    let ids = vec!["1:2".to_string(), "3:4".to_string()];
    let params = FileNodesParams {
        depth: Some(2),
        ..Default::default()
    };
    let response = client_for(&base)
        .get_file_nodes("ABC", &ids, Some(&params))
        .await
        .expect("nodes");

    assert_eq!(response.name, "File ABC");
    assert!(response.nodes["1:2"].is_some());
    assert!(response.nodes["3:4"].is_none());

    let raw = state.queries.lock().unwrap()[0].clone();
    let query: HashMap<String, String> = url::form_urlencoded::parse(raw.as_bytes())
        .into_owned()
        .collect();
    assert_eq!(query["ids"], "1:2,3:4");
    assert_eq!(query["depth"], "2");
    assert!(!query.contains_key("version"));
}

#[tokio::test]
async fn image_params_omit_unset_fields() {
    let (base, _) = spawn_mock().await;
    let params = GetImageParams {
        scale: Some(2.0),
        format: Some(ImageFormat::Svg),
        ..GetImageParams::for_ids(["1:2", "3:4"])
    };
    let response = client_for(&base)
        .get_image("ABC", &params)
        .await
        .expect("images");

    let url = response.images["1:2"].clone().expect("rendered url");
    let query: HashMap<String, String> =
        url::form_urlencoded::parse(url.trim_start_matches("rendered?").as_bytes())
            .into_owned()
            .collect();
    assert_eq!(query["ids"], "1:2,3:4");
    assert_eq!(query["scale"].parse::<f64>().ok(), Some(2.0));
    assert_eq!(query["format"], "svg");
    assert_eq!(query.len(), 3);
    assert_eq!(response.images["3:4"], None);
}

#[tokio::test]
async fn not_found_maps_to_api_error_with_body() {
    let (base, state) = spawn_mock().await;
    let err = client_for(&base).get_file("missing", None).await.unwrap_err();

    match &err {
        FigmaError::Api {
            status,
            message,
            body,
        } => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(message, "Not found");
            assert_eq!(body.as_ref().unwrap()["status"], 404);
        }
        other => panic!("expected api error, got {other:?}"),
    }
    assert_eq!(err.error_response().unwrap().err, "Not found");
    assert_eq!(state.missing_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn error_message_falls_back_to_message_then_status() {
    let (base, _) = spawn_mock().await;
    let client = client_for(&base);

    let err = client.get_file("badreq", None).await.unwrap_err();
    assert!(matches!(err, FigmaError::Api { ref message, .. } if message == "ids are malformed"));

    let err = client.get_file("broken", None).await.unwrap_err();
    match err {
        FigmaError::Api { message, body, .. } => {
            assert_eq!(message, "HTTP 500");
            assert_eq!(body, Some(Value::String("upstream exploded".into())));
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn post_comment_sends_json_body() {
    let (base, state) = spawn_mock().await;
    let params = PostCommentParams {
        message: "Looks good".into(),
        comment_id: None,
        client_meta: None,
    };
    let comment = client_for(&base)
        .post_comment("ABC", &params)
        .await
        .expect("comment");
    assert_eq!(comment.id, "c9");
    assert_eq!(comment.message, "Looks good");

    let body = state.bodies.lock().unwrap()[0].clone();
    assert_eq!(body, json!({ "message": "Looks good" }));
}

#[tokio::test]
async fn delete_accepts_no_content() {
    let (base, _) = spawn_mock().await;
    client_for(&base)
        .delete_comment("ABC", "c9")
        .await
        .expect("204 is success");
}

#[tokio::test]
async fn slow_responses_map_to_timeout() {
    let (base, _) = spawn_mock().await;
    let config = FigmaClientConfig::new(TOKEN)
        .base_url(base)
        .timeout(Some(Duration::from_millis(200)));
    let err = FigmaClient::new(config)
        .expect("client")
        .get_file("slow", None)
        .await
        .unwrap_err();
    assert!(matches!(err, FigmaError::Timeout(d) if d == Duration::from_millis(200)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn with_retry_recovers_from_transient_failures() {
    let (base, state) = spawn_mock().await;
    let flaky_base = base.join("/flaky/").expect("flaky base");
    let client = client_for(&flaky_base);

    let user = client
        .with_retry(|c| c.get_current_user())
        .await
        .expect("third attempt succeeds");
    assert_eq!(user.handle, "ada");
    assert_eq!(state.flaky_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn with_retry_does_not_repeat_client_errors() {
    let (base, state) = spawn_mock().await;
    let client = client_for(&base);
    let err = client
        .with_retry(|c| c.get_file("missing", None))
        .await
        .unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(404));
    assert_eq!(state.missing_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn download_image_skips_credentials() {
    let (base, _) = spawn_mock().await;
    let asset_url = base.join("/assets/render.png").expect("asset url");
    let bytes = client_for(&base)
        .download_image(asset_url.as_str())
        .await
        .expect("bytes");
    assert_eq!(bytes, [0x89, b'P', b'N', b'G']);
}
