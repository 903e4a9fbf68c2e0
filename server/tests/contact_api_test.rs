use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use irg_site_server::contact::ContactResponse;
use irg_site_server::site_config::{ContactConfig, SiteConfig};
use irg_site_server::web_server::{WebServerState, build_router};
use serde_json::{Value, json};

#[derive(Clone)]
struct FakeWebhook {
    status: StatusCode,
    body: &'static str,
    received: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

async fn fake_webhook_handler(
    State(webhook): State<FakeWebhook>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, &'static str) {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    webhook.received.lock().unwrap().push((authorization, body));
    (webhook.status, webhook.body)
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn start_webhook(status: StatusCode, body: &'static str) -> (SocketAddr, FakeWebhook) {
    let webhook = FakeWebhook {
        status,
        body,
        received: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/hook", post(fake_webhook_handler))
        .with_state(webhook.clone());
    (serve(app).await, webhook)
}

fn static_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("irg_site_static_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.html"), "<h1>Intelligent Robotics Group</h1>").unwrap();
    dir
}

async fn start_site(contact: ContactConfig) -> SocketAddr {
    common::logger::init_logger(Some("test".to_string()));
    let config = SiteConfig {
        contact,
        ..SiteConfig::default()
    };
    let state = WebServerState::from_config(&config).unwrap();
    serve(build_router(state, &static_dir())).await
}

fn contact_config(webhook: SocketAddr) -> ContactConfig {
    ContactConfig {
        webhook_url: Some(format!("http://{}/hook", webhook)),
        token: Some("tok".to_string()),
        timeout_ms: 2_000,
        ..ContactConfig::default()
    }
}

fn valid_body() -> Value {
    json!({
        "name": "Ada Lovelace",
        "email": "ada@uni.edu",
        "role": "Prospective student",
        "message": "Are you taking PhD students?"
    })
}

async fn post_contact(site: SocketAddr, body: &Value) -> (StatusCode, ContactResponse) {
    let response = reqwest::Client::new()
        .post(format!("http://{}/api/contact", site))
        .json(body)
        .send()
        .await
        .unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn test_submission_is_forwarded_with_token() {
    let (webhook_addr, webhook) = start_webhook(StatusCode::OK, r#"{"ok":true}"#).await;
    let site = start_site(contact_config(webhook_addr)).await;

    let (status, body) = post_contact(site, &valid_body()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, ContactResponse { ok: true, message: None });

    let received = webhook.received.lock().unwrap();
    assert_eq!(received.len(), 1);
    let (authorization, payload) = &received[0];
    assert_eq!(authorization.as_deref(), Some("Bearer tok"));
    assert_eq!(payload["name"], "Ada Lovelace");
    assert_eq!(payload["email"], "ada@uni.edu");
    assert_eq!(payload["role"], "Prospective student");
    assert_eq!(payload["message"], "Are you taking PhD students?");
    assert_eq!(payload["source"], "irg-auw.app");
    assert_eq!(payload["token"], "tok");
}

#[tokio::test]
async fn test_missing_field_is_rejected_before_relay() {
    let (webhook_addr, webhook) = start_webhook(StatusCode::OK, r#"{"ok":true}"#).await;
    let site = start_site(contact_config(webhook_addr)).await;

    let mut body = valid_body();
    body["role"] = json!("  ");
    let (status, response) = post_contact(site, &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message.as_deref(), Some("Missing required fields."));

    let mut body = valid_body();
    body.as_object_mut().unwrap().remove("message");
    let (status, _) = post_contact(site, &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(webhook.received.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_email_is_rejected() {
    let (webhook_addr, _webhook) = start_webhook(StatusCode::OK, r#"{"ok":true}"#).await;
    let site = start_site(contact_config(webhook_addr)).await;

    let mut body = valid_body();
    body["email"] = json!("ada-at-uni.edu");
    let (status, response) = post_contact(site, &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response.message.as_deref(), Some("Invalid email address."));
}

#[tokio::test]
async fn test_non_json_body_is_rejected() {
    let (webhook_addr, _webhook) = start_webhook(StatusCode::OK, r#"{"ok":true}"#).await;
    let site = start_site(contact_config(webhook_addr)).await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/api/contact", site))
        .body("name=Ada")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ContactResponse = response.json().await.unwrap();
    assert_eq!(body.message.as_deref(), Some("Invalid request body."));
}

#[tokio::test]
async fn test_missing_configuration_is_server_error() {
    let site = start_site(ContactConfig::default()).await;

    let (status, response) = post_contact(site, &valid_body()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.message.as_deref(), Some("Server not configured."));
}

#[tokio::test]
async fn test_upstream_error_message_is_passed_through() {
    let (webhook_addr, _webhook) =
        start_webhook(StatusCode::OK, r#"{"ok":false,"error":"Sheet is locked"}"#).await;
    let site = start_site(contact_config(webhook_addr)).await;

    let (status, response) = post_contact(site, &valid_body()).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(response, ContactResponse::failure("Sheet is locked"));
}

#[tokio::test]
async fn test_upstream_failure_status_is_bad_gateway() {
    let (webhook_addr, _webhook) =
        start_webhook(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>").await;
    let site = start_site(contact_config(webhook_addr)).await;

    let (status, response) = post_contact(site, &valid_body()).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.message.as_deref(), Some("Submission failed."));
}

#[tokio::test]
async fn test_unreachable_upstream_is_bad_gateway() {
    let closed = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let site = start_site(contact_config(closed)).await;

    let (status, response) = post_contact(site, &valid_body()).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.message.as_deref(), Some("Submission failed."));
}

#[tokio::test]
async fn test_get_is_method_not_allowed() {
    let site = start_site(ContactConfig::default()).await;

    let response = reqwest::get(format!("http://{}/api/contact", site)).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body: ContactResponse = response.json().await.unwrap();
    assert_eq!(body, ContactResponse::failure("Use POST method."));
}

#[tokio::test]
async fn test_static_pages_are_served() {
    let site = start_site(ContactConfig::default()).await;

    let response = reqwest::get(format!("http://{}/", site)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("Intelligent Robotics Group"));
}
