//! Comment endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::comment::{
        AdminComment, CommentCreatedResponse, CommentResponse, CreateCommentRequest, OwnComment,
        PublicComment,
    },
    AppState,
};

use super::{AdminVisitor, AuthenticatedVisitor};

/// Submit a comment
#[utoipa::path(
    post,
    path = "/comments",
    tag = "comments",
    security(("bearer_auth" = [])),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentCreatedResponse),
        (status = 400, description = "Missing message"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Visitor not found")
    )
)]
pub async fn create_comment(
    State(state): State<AppState>,
    AuthenticatedVisitor(claims): AuthenticatedVisitor,
    Json(request): Json<CreateCommentRequest>,
) -> AppResult<(StatusCode, Json<CommentCreatedResponse>)> {
    let comment = state
        .services
        .comments
        .submit(claims.visitor_id, request)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CommentCreatedResponse {
            comment_number: comment.comment_number,
            comment: comment.into(),
        }),
    ))
}

/// List approved comments, newest first
#[utoipa::path(
    get,
    path = "/comments",
    tag = "comments",
    responses(
        (status = 200, description = "Approved comments", body = Vec<PublicComment>)
    )
)]
pub async fn list_comments(State(state): State<AppState>) -> AppResult<Json<Vec<PublicComment>>> {
    let comments = state.services.comments.list_public().await?;
    Ok(Json(comments))
}

/// List the current visitor's comments, pending ones included
#[utoipa::path(
    get,
    path = "/comments/my-comments",
    tag = "comments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own comments", body = Vec<OwnComment>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_comments(
    State(state): State<AppState>,
    AuthenticatedVisitor(claims): AuthenticatedVisitor,
) -> AppResult<Json<Vec<OwnComment>>> {
    let comments = state.services.comments.list_own(claims.visitor_id).await?;
    Ok(Json(comments))
}

/// List every comment with its author (admin only)
#[utoipa::path(
    get,
    path = "/comments/admin",
    tag = "comments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All comments", body = Vec<AdminComment>),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn admin_comments(
    State(state): State<AppState>,
    AdminVisitor(_admin): AdminVisitor,
) -> AppResult<Json<Vec<AdminComment>>> {
    let comments = state.services.comments.list_all().await?;
    Ok(Json(comments))
}

/// Approve a comment (admin only)
#[utoipa::path(
    put,
    path = "/comments/{id}/approve",
    tag = "comments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Comment approved", body = CommentResponse),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Comment not found")
    )
)]
pub async fn approve_comment(
    State(state): State<AppState>,
    AdminVisitor(admin): AdminVisitor,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CommentResponse>> {
    tracing::debug!(admin_id = %admin.id, comment_id = %id, "Approving comment");
    let comment = state.services.comments.approve(id).await?;
    Ok(Json(CommentResponse { comment }))
}
