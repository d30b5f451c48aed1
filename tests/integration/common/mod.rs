use axum::{
    body::Body,
    http::{header::AUTHORIZATION, Request},
    response::Response,
    Router,
};
use guestbook_server::{
    api,
    config::{AppConfig, AuthConfig, CommentsConfig},
    repository::Repository,
    AppState,
};
use serde_json::Value;

pub const SECRET: &str = "integration-test-secret-0123456789";

pub fn test_state(auto_approve: bool) -> AppState {
    let config = AppConfig {
        auth: AuthConfig {
            jwt_secret: SECRET.to_string(),
            ..Default::default()
        },
        comments: CommentsConfig {
            auto_approve,
            public_page_size: 20,
        },
        ..Default::default()
    };
    AppState::new(config, Repository::in_memory())
}

pub fn app(state: &AppState) -> Router {
    api::router(state.clone())
}

pub fn request(method: &str, uri: &str, body: Option<Value>, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

pub async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}
