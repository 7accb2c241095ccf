//! Integration tests for meditation history, health and CORS.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use common::{
    FakeScripts, SCRIPT_JSON, TestApp, body_bytes, body_events, body_json, generate_request,
    get_request,
};

async fn generate(app: &TestApp, user: &str) -> String {
    let response = app
        .send(generate_request(Some(user), None, r#"{"userInput":"tired","durationMinutes":1}"#))
        .await;
    let events = body_events(response).await;
    let last = events.last().unwrap();
    assert_eq!(last["type"], "complete");
    last["meditation"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let app = TestApp::new(FakeScripts::returning(SCRIPT_JSON), true).await;

    let response = app.send(get_request("/health", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"OK");
}

#[tokio::test]
async fn history_requires_identity() {
    let app = TestApp::new(FakeScripts::returning(SCRIPT_JSON), true).await;

    let response = app.send(get_request("/api/meditations", None)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn history_lists_only_own_records_newest_first() {
    let app = TestApp::new(FakeScripts::returning(SCRIPT_JSON), true).await;
    let first = generate(&app, "alice").await;
    let second = generate(&app, "alice").await;
    generate(&app, "bob").await;

    let page = body_json(app.send(get_request("/api/meditations", Some("alice"))).await).await;

    assert_eq!(page["total"], 2);
    assert_eq!(page["page"], 1);
    assert_eq!(page["limit"], 10);
    let ids: Vec<&str> = page["meditations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![second.as_str(), first.as_str()]);

    let paged = body_json(
        app.send(get_request("/api/meditations?page=2&limit=1", Some("alice")))
            .await,
    )
    .await;
    assert_eq!(paged["meditations"].as_array().unwrap().len(), 1);
    assert_eq!(paged["meditations"][0]["id"], first.as_str());
}

#[tokio::test]
async fn bad_query_is_bad_request() {
    let app = TestApp::new(FakeScripts::returning(SCRIPT_JSON), true).await;

    let response = app
        .send(get_request("/api/meditations?page=first", Some("alice")))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_hides_other_users_records() {
    let app = TestApp::new(FakeScripts::returning(SCRIPT_JSON), true).await;
    let id = generate(&app, "alice").await;

    let own = app
        .send(get_request(&format!("/api/meditations/{id}"), Some("alice")))
        .await;
    assert_eq!(own.status(), StatusCode::OK);
    assert_eq!(body_json(own).await["meditationScript"]["title"], "Before the Talk");

    let other = app
        .send(get_request(&format!("/api/meditations/{id}"), Some("bob")))
        .await;
    assert_eq!(other.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(other).await["status"], 404);

    let bogus = app
        .send(get_request("/api/meditations/not-a-uuid", Some("alice")))
        .await;
    assert_eq!(bogus.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cors_preflight_is_answered() {
    let app = TestApp::new(FakeScripts::returning(SCRIPT_JSON), true).await;

    let response = app
        .send(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/generate-meditation")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert!(response.status().is_success());
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}
