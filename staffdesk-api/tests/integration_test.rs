/// Integration tests for the StaffDesk API
///
/// These tests exercise the assembled router:
/// - Public endpoints (health, login view, logout)
/// - Session gating on every protected page and mutation
/// - JSON shapes of the public views
///
/// Query and mutation behavior against real data is covered by the model
/// and handler unit tests; these tests run without a database.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::TestContext;
use tower::Service as _;

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::empty())
        .unwrap()
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get("location")
        .expect("Redirect should carry a Location header")
        .to_str()
        .unwrap()
}

/// The login view is reachable without a session and carries no flash
#[tokio::test]
async fn test_login_view_is_public() {
    let ctx = TestContext::new().unwrap();

    let response = ctx.app.clone().call(get("/login")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["flash"], serde_json::Value::Null);
}

/// Logout works without a session and redirects to the login flow
#[tokio::test]
async fn test_logout_is_public_and_redirects() {
    let ctx = TestContext::new().unwrap();

    let response = ctx.app.clone().call(get("/logout")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

/// Every protected page redirects to the login flow without a session
#[tokio::test]
async fn test_protected_pages_require_session() {
    let ctx = TestContext::new().unwrap();

    for uri in [
        "/",
        "/home",
        "/home/export",
        "/projects",
        "/projects/export",
        "/project/10",
        "/employees",
        "/employee/add",
        "/employee/123456789/edit",
        "/employees/import",
        "/managers",
    ] {
        let response = ctx.app.clone().call(get(uri)).await.unwrap();
        assert_eq!(
            response.status(),
            StatusCode::SEE_OTHER,
            "GET {} should redirect",
            uri
        );
        assert_eq!(location(&response), "/login", "GET {}", uri);
    }
}

/// Mutations are behind the same session gate as the pages
#[tokio::test]
async fn test_mutations_require_session() {
    let ctx = TestContext::new().unwrap();

    for uri in [
        "/project/10/add",
        "/employee/add",
        "/employee/123456789/edit",
        "/employee/123456789/delete",
        "/employees/import",
    ] {
        let response = ctx.app.clone().call(post(uri)).await.unwrap();
        assert_eq!(
            response.status(),
            StatusCode::SEE_OTHER,
            "POST {} should redirect",
            uri
        );
        assert_eq!(location(&response), "/login", "POST {}", uri);
    }
}

/// A forged session cookie is rejected, not decoded
#[tokio::test]
async fn test_forged_session_cookie_is_rejected() {
    let ctx = TestContext::new().unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/employees")
        .header(
            "cookie",
            "staffdesk_session={\"username\":\"admin\",\"role\":\"admin\"}",
        )
        .body(Body::empty())
        .unwrap();

    // The plaintext payload fails private-jar decryption.
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

/// The health check answers even when the database is unreachable
#[tokio::test]
async fn test_health_reports_database_state() {
    let ctx = TestContext::new().unwrap();

    let response = ctx.app.clone().call(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    // The test pool points at an unreachable address.
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["database"], "disconnected");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

/// Unknown paths are a plain 404, not a redirect
#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let ctx = TestContext::new().unwrap();

    let response = ctx.app.clone().call(get("/no-such-page")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
