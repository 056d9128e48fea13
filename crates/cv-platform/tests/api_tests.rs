//! HTTP API Integration Tests
//!
//! Drives the full router with `tower::ServiceExt::oneshot`.

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use common::TestPlatform;
use cv_platform::api::{api_router, ApiSettings};
use serde_json::{json, Value};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    _platform: TestPlatform,
}

impl TestApp {
    async fn new() -> Self {
        Self::with_settings(ApiSettings::default()).await
    }

    async fn with_settings(settings: ApiSettings) -> Self {
        let platform = TestPlatform::new().await;
        let router = api_router(&platform.services, settings);
        Self { router, _platform: platform }
    }

    async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        self.send_raw(method, uri, token, body.map(|b| b.to_string())).await
    }

    async fn send_raw(&self, method: Method, uri: &str, token: Option<&str>, body: Option<String>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn register(&self, email: &str, name: &str) -> i64 {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/auth/register",
                None,
                Some(json!({ "email": email, "password": "password123", "name": name })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_i64().unwrap()
    }

    async fn login(&self, email: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({ "email": email, "password": "password123" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["token"].as_str().unwrap().to_string()
    }

    async fn create_event(&self, token: &str, name: &str) -> i64 {
        let (status, body) = self.send(Method::POST, "/api/v1/events", Some(token), Some(event_body(name))).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_i64().unwrap()
    }
}

fn event_body(name: &str) -> Value {
    json!({
        "name": name,
        "description": "A gathering for testing",
        "date": "2030-06-01T18:00:00Z",
        "location": "Main Hall"
    })
}

mod auth_api_tests {
    use super::*;

    #[tokio::test]
    async fn test_register_response_has_no_password() {
        let app = TestApp::new().await;
        let (status, body) = app
            .send(
                Method::POST,
                "/api/v1/auth/register",
                None,
                Some(json!({ "email": "alice@example.com", "password": "password123", "name": "Alice" })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["email"], "alice@example.com");
        let raw = body.to_string();
        assert!(!raw.to_lowercase().contains("password"));
        assert!(!raw.contains("argon2"));
    }

    #[tokio::test]
    async fn test_register_validation_and_duplicate() {
        let app = TestApp::new().await;
        let (status, body) = app
            .send(
                Method::POST,
                "/api/v1/auth/register",
                None,
                Some(json!({ "email": "alice@example.com", "password": "short", "name": "Alice" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");

        app.register("alice@example.com", "Alice").await;
        let (status, body) = app
            .send(
                Method::POST,
                "/api/v1/auth/register",
                None,
                Some(json!({ "email": "alice@example.com", "password": "password123", "name": "Alice" })),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "DUPLICATE");
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let app = TestApp::new().await;
        app.register("alice@example.com", "Alice").await;

        let (wrong_status, wrong) = app
            .send(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({ "email": "alice@example.com", "password": "not-the-password" })),
            )
            .await;
        let (unknown_status, unknown) = app
            .send(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({ "email": "nobody@example.com", "password": "password123" })),
            )
            .await;

        assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong, unknown);
    }

    #[tokio::test]
    async fn test_login_returns_bearer_token() {
        let app = TestApp::new().await;
        app.register("alice@example.com", "Alice").await;
        let (status, body) = app
            .send(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({ "email": "alice@example.com", "password": "password123" })),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tokenType"], "Bearer");
        assert!(body["expiresAt"].is_string());
        assert_eq!(body["token"].as_str().unwrap().split('.').count(), 3);
    }

    #[tokio::test]
    async fn test_case_insensitive_email_option() {
        let app = TestApp::with_settings(ApiSettings { case_insensitive_email: true }).await;
        app.register("Alice@Example.com", "Alice").await;
        app.login("alice@example.COM").await;
    }
}

mod event_api_tests {
    use super::*;

    #[tokio::test]
    async fn test_protected_routes_require_token() {
        let app = TestApp::new().await;

        let (status, body) = app.send(Method::POST, "/api/v1/events", None, Some(event_body("Party"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "MISSING_TOKEN");

        let (status, body) = app
            .send(Method::POST, "/api/v1/events", Some("not-a-jwt"), Some(event_body("Party")))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "INVALID_TOKEN");
    }

    #[tokio::test]
    async fn test_challenge_header_on_401() {
        let app = TestApp::new().await;
        let request = Request::builder()
            .method(Method::DELETE)
            .uri("/api/v1/events/1")
            .body(Body::empty())
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers().get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
    }

    #[tokio::test]
    async fn test_event_lifecycle_and_ownership() {
        let app = TestApp::new().await;
        let alice_id = app.register("alice@example.com", "Alice").await;
        app.register("bob@example.com", "Bob").await;
        let alice = app.login("alice@example.com").await;
        let bob = app.login("bob@example.com").await;

        let event_id = app.create_event(&alice, "Launch").await;
        let uri = format!("/api/v1/events/{}", event_id);

        let (status, body) = app.send(Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ownerId"], alice_id);

        let (status, body) = app.send(Method::PUT, &uri, Some(&bob), Some(event_body("Hijack"))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "FORBIDDEN");

        let mut update = event_body("Launch v2");
        update["ownerId"] = json!(9999);
        let (status, body) = app.send(Method::PUT, &uri, Some(&alice), Some(update)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Launch v2");
        assert_eq!(body["ownerId"], alice_id);

        let (status, _) = app.send(Method::DELETE, &uri, Some(&bob), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app.send(Method::DELETE, &uri, Some(&alice), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = app.send(Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_event_validation() {
        let app = TestApp::new().await;
        app.register("alice@example.com", "Alice").await;
        let alice = app.login("alice@example.com").await;

        let mut body = event_body("Launch");
        body["description"] = json!("short");
        let (status, response) = app.send(Method::POST, "/api/v1/events", Some(&alice), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_list_events_is_public() {
        let app = TestApp::new().await;
        app.register("alice@example.com", "Alice").await;
        let alice = app.login("alice@example.com").await;
        app.create_event(&alice, "First").await;
        app.create_event(&alice, "Second").await;

        let (status, body) = app.send(Method::GET, "/api/v1/events", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body.as_array().unwrap().iter().map(|e| e["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["First", "Second"]);
    }
}

mod attendee_api_tests {
    use super::*;

    #[tokio::test]
    async fn test_attendee_flow() {
        let app = TestApp::new().await;
        app.register("alice@example.com", "Alice").await;
        let bob_id = app.register("bob@example.com", "Bob").await;
        let alice = app.login("alice@example.com").await;
        let bob = app.login("bob@example.com").await;

        let event_id = app.create_event(&alice, "Hackday").await;
        let member_uri = format!("/api/v1/events/{}/attendees/{}", event_id, bob_id);
        let list_uri = format!("/api/v1/events/{}/attendees", event_id);

        let (status, _) = app.send(Method::POST, &member_uri, Some(&bob), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = app.send(Method::POST, &member_uri, Some(&alice), None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["userId"], bob_id);

        let (status, body) = app.send(Method::POST, &member_uri, Some(&alice), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "ALREADY_MEMBER");

        let (status, body) = app.send(Method::GET, &list_uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["id"], bob_id);
        assert!(!body.to_string().contains("argon2"));

        let (status, body) = app
            .send(Method::GET, &format!("/api/v1/attendees/{}/events", bob_id), None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["id"], event_id);

        let (status, _) = app.send(Method::DELETE, &member_uri, Some(&alice), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = app.send(Method::DELETE, &member_uri, Some(&alice), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = app.send(Method::GET, &list_uri, None, None).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_add_unknown_user_is_not_found() {
        let app = TestApp::new().await;
        app.register("alice@example.com", "Alice").await;
        let alice = app.login("alice@example.com").await;
        let event_id = app.create_event(&alice, "Hackday").await;

        let (status, body) = app
            .send(Method::POST, &format!("/api/v1/events/{}/attendees/999", event_id), Some(&alice), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NOT_FOUND");
    }
}

mod misc_api_tests {
    use super::*;

    #[tokio::test]
    async fn test_health() {
        let app = TestApp::new().await;
        let (status, body) = app.send(Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "UP");
    }

    #[tokio::test]
    async fn test_openapi_document_served() {
        let app = TestApp::new().await;
        let (status, body) = app.send(Method::GET, "/api-doc/openapi.json", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/api/v1/events/{id}"].is_object());
        assert!(body["components"]["securitySchemes"]["bearer_auth"].is_object());
    }
}

mod malformed_request_tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_field_is_validation_error() {
        let app = TestApp::new().await;
        let (status, body) = app
            .send(
                Method::POST,
                "/api/v1/auth/register",
                None,
                Some(json!({ "email": "alice@example.com", "password": "password123" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert!(body["message"].as_str().unwrap().contains("name"));
    }

    #[tokio::test]
    async fn test_invalid_json_is_validation_error() {
        let app = TestApp::new().await;
        let (status, body) = app
            .send_raw(Method::POST, "/api/v1/auth/login", None, Some("{not json".to_string()))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");

        app.register("alice@example.com", "Alice").await;
        let token = app.login("alice@example.com").await;
        let (status, body) = app
            .send_raw(Method::POST, "/api/v1/events", Some(&token), Some("{not json".to_string()))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_validation_error() {
        let app = TestApp::new().await;
        let (status, body) = app.send(Method::GET, "/api/v1/events/abc", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");

        let (status, body) = app.send(Method::GET, "/api/v1/attendees/abc/events", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }
}
