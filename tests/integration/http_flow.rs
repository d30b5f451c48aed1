//! In-process HTTP tests against the in-memory store

mod common;

use axum::http::StatusCode;
use common::{app, read_json, request, test_state};
use guestbook_server::AppState;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn login(state: &AppState, email: &str, name: Option<&str>) -> (StatusCode, Value) {
    let body = match name {
        Some(name) => json!({ "email": email, "name": name }),
        None => json!({ "email": email }),
    };
    let response = app(state)
        .oneshot(request("POST", "/api/v1/visitor/login", Some(body), None))
        .await
        .expect("login");
    let status = response.status();
    (status, read_json(response).await)
}

async fn token_for(state: &AppState, email: &str, name: &str) -> String {
    let (status, body) = login(state, email, Some(name)).await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().expect("token").to_string()
}

async fn admin_token(state: &AppState) -> String {
    let token = token_for(state, "admin@x.com", "Admin").await;
    state
        .services
        .visitors
        .promote_admins(&["admin@x.com".to_string()])
        .await
        .expect("promote");
    token
}

async fn submit(state: &AppState, token: &str, message: &str) -> (StatusCode, Value) {
    let response = app(state)
        .oneshot(request(
            "POST",
            "/api/v1/comments",
            Some(json!({ "message": message })),
            Some(token),
        ))
        .await
        .expect("submit");
    let status = response.status();
    (status, read_json(response).await)
}

async fn get(state: &AppState, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    let response = app(state)
        .oneshot(request("GET", uri, None, token))
        .await
        .expect("get");
    let status = response.status();
    (status, read_json(response).await)
}

async fn approve(state: &AppState, id: &str, token: &str) -> (StatusCode, Value) {
    let response = app(state)
        .oneshot(request(
            "PUT",
            &format!("/api/v1/comments/{}/approve", id),
            None,
            Some(token),
        ))
        .await
        .expect("approve");
    let status = response.status();
    (status, read_json(response).await)
}

#[tokio::test]
async fn test_comment_moderation_scenario() {
    let state = test_state(false);

    let (status, body) = login(&state, "a@x.com", Some("Ann")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["visitor"]["commentCount"], 0);
    assert_eq!(body["visitor"]["role"], "visitor");
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = submit(&state, &token, "hi").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["commentNumber"], 1);
    assert_eq!(body["comment"]["approved"], false);
    let comment_id = body["comment"]["id"].as_str().unwrap().to_string();

    let (_, profile) = get(&state, "/api/v1/visitor/profile", Some(&token)).await;
    assert_eq!(profile["commentCount"], 1);
    assert!(profile["lastCommentAt"].is_string());

    // Pending comments stay off the public page
    let (status, public) = get(&state, "/api/v1/comments", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(public.as_array().unwrap().is_empty());

    let (_, own) = get(&state, "/api/v1/comments/my-comments", Some(&token)).await;
    assert_eq!(own.as_array().unwrap().len(), 1);
    assert_eq!(own[0]["approved"], false);

    let admin = admin_token(&state).await;

    let (status, all) = get(&state, "/api/v1/comments/admin", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all[0]["id"], comment_id.as_str());
    assert_eq!(all[0]["visitor"]["email"], "a@x.com");
    assert_eq!(all[0]["visitor"]["commentCount"], 1);
    assert_eq!(all[0]["visitor"]["role"], "visitor");

    let (status, approved) = approve(&state, &comment_id, &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["comment"]["approved"], true);

    // Approving again is still a success
    let (status, again) = approve(&state, &comment_id, &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again, approved);

    let (_, public) = get(&state, "/api/v1/comments", None).await;
    let public = public.as_array().unwrap();
    assert_eq!(public.len(), 1);
    assert_eq!(public[0]["message"], "hi");
    assert_eq!(public[0]["name"], "Ann");
    assert_eq!(public[0]["commentNumber"], 1);
    assert!(public[0].get("email").is_none());
    assert!(public[0].get("visitorId").is_none());
}

#[tokio::test]
async fn test_auto_approve_publishes_newest_first() {
    let state = test_state(true);
    let token = token_for(&state, "a@x.com", "Ann").await;

    let (_, first) = submit(&state, &token, "first").await;
    let (_, second) = submit(&state, &token, "second").await;
    assert_eq!(first["commentNumber"], 1);
    assert_eq!(second["commentNumber"], 2);

    let (_, public) = get(&state, "/api/v1/comments", None).await;
    assert_eq!(public[0]["message"], "second");
    assert_eq!(public[1]["message"], "first");
}

#[tokio::test]
async fn test_visitor_cannot_use_admin_endpoints() {
    let state = test_state(false);
    let token = token_for(&state, "a@x.com", "Ann").await;
    let (_, body) = submit(&state, &token, "hi").await;
    let comment_id = body["comment"]["id"].as_str().unwrap().to_string();

    let (status, body) = get(&state, "/api/v1/comments/admin", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "AdminRequired");

    let (status, body) = approve(&state, &comment_id, &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "AdminRequired");

    // Even for an id that does not exist
    let (status, _) = approve(&state, &uuid::Uuid::new_v4().to_string(), &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_missing_and_bad_tokens() {
    let state = test_state(false);

    let (status, body) = get(&state, "/api/v1/comments/my-comments", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "MissingToken");

    let (status, body) = get(&state, "/api/v1/visitor/profile", Some("garbage")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "InvalidToken");

    let token = token_for(&state, "a@x.com", "Ann").await;
    let tampered = format!("{}x", token);
    let (status, _) = submit(&state, &tampered, "hi").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = get(&state, "/api/v1/comments/admin", Some(&tampered)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_login_validation_and_profile_update() {
    let state = test_state(false);

    let (status, body) = login(&state, "new@x.com", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "MissingName");

    let token = token_for(&state, "a@x.com", "Ann").await;

    // Existing visitor can log in without a name
    let (status, body) = login(&state, "A@x.com", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["visitor"]["name"], "Ann");

    let response = app(&state)
        .oneshot(request(
            "PUT",
            "/api/v1/visitor/profile",
            Some(json!({ "name": "" })),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], "MissingName");

    let response = app(&state)
        .oneshot(request(
            "PUT",
            "/api/v1/visitor/profile",
            Some(json!({ "name": "Ann B." })),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["visitor"]["name"], "Ann B.");
    let new_token = body["token"].as_str().unwrap().to_string();

    // New comments snapshot the new name; the old token still works
    let (status, body) = submit(&state, &new_token, "renamed").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["comment"]["name"], "Ann B.");

    let (status, _) = get(&state, "/api/v1/visitor/profile", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_submit_requires_message() {
    let state = test_state(false);
    let token = token_for(&state, "a@x.com", "Ann").await;

    let (status, body) = submit(&state, &token, "   ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "MissingMessage");

    let (_, own) = get(&state, "/api/v1/comments/my-comments", Some(&token)).await;
    assert!(own.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_approve_unknown_comment() {
    let state = test_state(false);
    let admin = admin_token(&state).await;

    let (status, body) = approve(&state, &uuid::Uuid::new_v4().to_string(), &admin).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NotFound");
}

#[tokio::test]
async fn test_health_check() {
    let state = test_state(false);
    let (status, body) = get(&state, "/api/v1/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
    assert_eq!(body["backend"], "memory");
    assert!(body["timestamp"].is_string());
}
