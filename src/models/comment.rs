//! Comment model and its API projections

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::visitor::VisitorRole;

/// Comment record. Name and email are copied from the visitor at submission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub visitor_id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub approved: bool,
    /// Per-visitor ordinal, starting at 1
    pub comment_number: i32,
    pub created_at: DateTime<Utc>,
}

/// Data for a comment about to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub visitor_id: Uuid,
    pub message: String,
    pub approved: bool,
}

/// Submit comment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCommentRequest {
    #[validate(length(max = 2000, message = "Message must be at most 2000 characters"))]
    pub message: Option<String>,
}

/// Comment as shown on the public page
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicComment {
    pub name: String,
    pub message: String,
    pub comment_number: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for PublicComment {
    fn from(comment: Comment) -> Self {
        Self {
            name: comment.name,
            message: comment.message,
            comment_number: comment.comment_number,
            created_at: comment.created_at,
        }
    }
}

/// Comment as shown to its author
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnComment {
    pub id: Uuid,
    pub name: String,
    pub message: String,
    pub approved: bool,
    pub comment_number: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for OwnComment {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            name: comment.name,
            message: comment.message,
            approved: comment.approved,
            comment_number: comment.comment_number,
            created_at: comment.created_at,
        }
    }
}

/// Live visitor data attached to a comment in the moderation view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentAuthor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub comment_count: i32,
    pub role: VisitorRole,
}

/// Comment with its owning visitor expanded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminComment {
    #[serde(flatten)]
    pub comment: Comment,
    /// Missing only if the visitor record was removed out of band
    pub visitor: Option<CommentAuthor>,
}

/// Row shape for the moderation join
#[derive(Debug, Clone, FromRow)]
pub struct AdminCommentRow {
    pub id: Uuid,
    pub visitor_id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub approved: bool,
    pub comment_number: i32,
    pub created_at: DateTime<Utc>,
    pub visitor_name: Option<String>,
    pub visitor_email: Option<String>,
    pub visitor_comment_count: Option<i32>,
    pub visitor_role: Option<String>,
}

impl From<AdminCommentRow> for AdminComment {
    fn from(row: AdminCommentRow) -> Self {
        let visitor = match (row.visitor_name, row.visitor_email, row.visitor_comment_count) {
            (Some(name), Some(email), Some(comment_count)) => Some(CommentAuthor {
                id: row.visitor_id,
                name,
                email,
                comment_count,
                role: row
                    .visitor_role
                    .and_then(|r| r.parse().ok())
                    .unwrap_or_default(),
            }),
            _ => None,
        };

        AdminComment {
            comment: Comment {
                id: row.id,
                visitor_id: row.visitor_id,
                name: row.name,
                email: row.email,
                message: row.message,
                approved: row.approved,
                comment_number: row.comment_number,
                created_at: row.created_at,
            },
            visitor,
        }
    }
}

/// Response to a successful submission
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentCreatedResponse {
    pub comment_number: i32,
    pub comment: OwnComment,
}

/// Response to an approval
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CommentResponse {
    pub comment: Comment,
}
