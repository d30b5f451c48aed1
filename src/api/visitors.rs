//! Visitor login and profile endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::visitor::{LoginRequest, SessionResponse, UpdateProfileRequest, Visitor, VisitorSummary},
    AppState,
};

use super::AuthenticatedVisitor;

fn session(token: String, visitor: &Visitor) -> SessionResponse {
    SessionResponse {
        token,
        token_type: "Bearer".to_string(),
        visitor: VisitorSummary::from(visitor),
    }
}

/// Log in with an email, registering the visitor on first use
#[utoipa::path(
    post,
    path = "/visitor/login",
    tag = "visitors",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = SessionResponse),
        (status = 400, description = "Missing email, or missing name for a new visitor"),
        (status = 409, description = "Email registered concurrently, retry as a login")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<SessionResponse>> {
    let (token, visitor) = state.services.visitors.login(request).await?;
    Ok(Json(session(token, &visitor)))
}

/// Get the current visitor
#[utoipa::path(
    get,
    path = "/visitor/profile",
    tag = "visitors",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current visitor", body = Visitor),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Visitor not found")
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthenticatedVisitor(claims): AuthenticatedVisitor,
) -> AppResult<Json<Visitor>> {
    let visitor = state.services.visitors.get_profile(claims.visitor_id).await?;
    Ok(Json(visitor))
}

/// Update the current visitor's name
#[utoipa::path(
    put,
    path = "/visitor/profile",
    tag = "visitors",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = SessionResponse),
        (status = 400, description = "Missing name"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Visitor not found")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthenticatedVisitor(claims): AuthenticatedVisitor,
    Json(request): Json<UpdateProfileRequest>,
) -> AppResult<Json<SessionResponse>> {
    let (token, visitor) = state
        .services
        .visitors
        .update_profile(claims.visitor_id, request)
        .await?;
    Ok(Json(session(token, &visitor)))
}
