mod common;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use common::{schema, Recorder};
use crud_router::{app, AccessorRegistry, AppState, RouterBuilder, Settings};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app(recorder: Arc<Recorder>) -> Router {
    test_app_with(recorder, &Settings::default())
}

fn test_app_with(recorder: Arc<Recorder>, settings: &Settings) -> Router {
    let router = RouterBuilder::new(&schema()).build();
    let accessor = AccessorRegistry::new().with_model("User", recorder);
    app(AppState::new(router, Arc::new(accessor)), settings)
}

fn create_body(name_len: usize) -> String {
    json!({ "data": { "email": "a@b.com", "name": "x".repeat(name_len) } }).to_string()
}

fn encode(input: &Value) -> String {
    let raw = input.to_string();
    let mut out = String::with_capacity(raw.len() * 3);
    for b in raw.bytes() {
        if b.is_ascii_alphanumeric() || b"-_.~".contains(&b) {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            req = req.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let res = app.oneshot(req.body(body).unwrap()).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn query_over_get() {
    let recorder = Arc::new(Recorder::default());
    let input = json!({ "where": { "email": "a@b.com" } });
    let uri = format!("/rpc/user.findMany?input={}", encode(&input));
    let (status, body) = send(test_app(recorder.clone()), Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], "u1");
    assert_eq!(recorder.calls.lock().unwrap()[0].1, input);
}

#[tokio::test]
async fn query_without_input() {
    let (status, body) = send(
        test_app(Arc::new(Recorder::default())),
        Method::GET,
        "/rpc/user.count",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], 1);
}

#[tokio::test]
async fn mutation_over_post() {
    let recorder = Arc::new(Recorder::default());
    let (status, body) = send(
        test_app(recorder.clone()),
        Method::POST,
        "/rpc/user.create",
        Some(json!({ "data": { "email": "a@b.com", "name": "Ann" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], "u2");
    assert_eq!(body["data"]["name"], "Ann");
}

#[tokio::test]
async fn wrong_method_is_rejected() {
    let recorder = Arc::new(Recorder::default());
    let (status, body) = send(test_app(recorder.clone()), Method::GET, "/rpc/user.create", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"]["code"], "method_not_supported");

    let (status, _) = send(
        test_app(recorder.clone()),
        Method::POST,
        "/rpc/user.findMany",
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert!(recorder.operations().is_empty());
}

#[tokio::test]
async fn invalid_input_lists_issues() {
    let recorder = Arc::new(Recorder::default());
    let (status, body) = send(
        test_app(recorder.clone()),
        Method::POST,
        "/rpc/user.create",
        Some(json!({ "data": { "age": "old" } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
    let paths: Vec<Value> = body["error"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|issue| issue["path"].clone())
        .collect();
    assert!(paths.contains(&json!(["data", "email"])));
    assert!(paths.contains(&json!(["data", "age"])));
    assert!(recorder.operations().is_empty());
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = test_app(Arc::new(Recorder::default()));
    let req = Request::builder()
        .method(Method::POST)
        .uri("/rpc/user.create")
        .body(Body::from("{not json"))
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn accessor_errors_map_to_status() {
    let recorder = Arc::new(Recorder::default());
    let (status, body) = send(
        test_app(recorder.clone()),
        Method::POST,
        "/rpc/user.create",
        Some(json!({ "data": { "email": "taken@b.com" } })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "conflict");

    // Post has no registered delegate.
    let (status, body) = send(test_app(recorder), Method::GET, "/rpc/post.findMany", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "config_error");
}

#[tokio::test]
async fn unknown_procedure_is_404() {
    let (status, body) = send(
        test_app(Arc::new(Recorder::default())),
        Method::GET,
        "/rpc/comment.findMany",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn lists_every_procedure() {
    let (status, body) = send(test_app(Arc::new(Recorder::default())), Method::GET, "/rpc", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["count"], 26);
    let paths: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["path"].as_str())
        .collect();
    assert!(paths.contains(&"user.findMany"));
    assert!(paths.contains(&"post.groupBy"));
}

#[tokio::test]
async fn health_is_served() {
    let (status, _) = send(test_app(Arc::new(Recorder::default())), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn body_limit_above_axum_default() {
    let settings = Settings {
        body_limit: 8 * 1024 * 1024,
        ..Settings::default()
    };
    let app = test_app_with(Arc::new(Recorder::default()), &settings);
    let req = Request::builder()
        .method(Method::POST)
        .uri("/rpc/user.create")
        .header("content-type", "application/json")
        .body(Body::from(create_body(3 * 1024 * 1024)))
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn body_over_limit_is_413_json() {
    let settings = Settings {
        body_limit: 1024,
        ..Settings::default()
    };
    let recorder = Arc::new(Recorder::default());
    let body = create_body(4096);

    // Streamed body without a length header.
    let (status, json_body) = send(
        test_app_with(recorder.clone(), &settings),
        Method::POST,
        "/rpc/user.create",
        Some(serde_json::from_str(&body).unwrap()),
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json_body["error"]["code"], "payload_too_large");

    // Declared length over the limit is rejected before the handler runs.
    let req = Request::builder()
        .method(Method::POST)
        .uri("/rpc/user.create")
        .header("content-type", "application/json")
        .header("content-length", body.len().to_string())
        .body(Body::from(body))
        .unwrap();
    let res = test_app_with(recorder.clone(), &settings).oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json_body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json_body["error"]["code"], "payload_too_large");
    assert!(recorder.operations().is_empty());
}

#[tokio::test]
async fn malformed_query_string_is_json_400() {
    let (status, body) = send(
        test_app(Arc::new(Recorder::default())),
        Method::GET,
        "/rpc/user.findMany?input=1&input=2",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}
