//! API handlers for guestbook REST endpoints

pub mod comments;
pub mod health;
pub mod openapi;
pub mod visitors;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    error::AppError,
    models::{Visitor, VisitorClaims},
    AppState,
};

/// Extractor for an authenticated visitor from the bearer token
pub struct AuthenticatedVisitor(pub VisitorClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedVisitor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let claims = state.services.auth.authenticate(header)?;
        Ok(AuthenticatedVisitor(claims))
    }
}

/// Extractor for an authenticated visitor whose stored role is admin
pub struct AdminVisitor(pub Visitor);

#[async_trait]
impl FromRequestParts<AppState> for AdminVisitor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthenticatedVisitor(claims) =
            AuthenticatedVisitor::from_request_parts(parts, state).await?;

        let admin = state.services.auth.require_admin(&claims).await?;
        Ok(AdminVisitor(admin))
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Visitors
        .route("/visitor/login", post(visitors::login))
        .route(
            "/visitor/profile",
            get(visitors::get_profile).put(visitors::update_profile),
        )
        // Comments
        .route(
            "/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route("/comments/my-comments", get(comments::my_comments))
        .route("/comments/admin", get(comments::admin_comments))
        .route("/comments/:id/approve", put(comments::approve_comment))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
