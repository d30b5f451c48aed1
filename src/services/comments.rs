//! Comment submission, listing and moderation

use uuid::Uuid;
use validator::Validate;

use crate::{
    config::CommentsConfig,
    error::{AppError, AppResult},
    models::{
        comment::CreateCommentRequest, visitor::non_blank, AdminComment, Comment, NewComment,
        OwnComment, PublicComment,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CommentsService {
    repository: Repository,
    config: CommentsConfig,
}

impl CommentsService {
    pub fn new(repository: Repository, config: CommentsConfig) -> Self {
        Self { repository, config }
    }

    /// Submit a comment for the given visitor.
    ///
    /// The comment gets the visitor's next ordinal and is approved right away only when
    /// `comments.auto_approve` is set.
    pub async fn submit(
        &self,
        visitor_id: Uuid,
        request: CreateCommentRequest,
    ) -> AppResult<Comment> {
        let message = non_blank(request.message.as_deref())
            .ok_or_else(AppError::missing_message)?
            .to_string();
        request.validate()?;

        let visitor = self
            .repository
            .visitors
            .get_by_id(visitor_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Visitor not found".to_string()))?;

        let comment = self
            .repository
            .comments
            .append(NewComment {
                visitor_id: visitor.id,
                message,
                approved: self.config.auto_approve,
            })
            .await?
            .ok_or_else(|| AppError::NotFound("Visitor not found".to_string()))?;

        tracing::info!(
            visitor_id = %visitor.id,
            comment_id = %comment.id,
            comment_number = comment.comment_number,
            approved = comment.approved,
            "Comment submitted"
        );

        Ok(comment)
    }

    /// Approved comments for the public page
    pub async fn list_public(&self) -> AppResult<Vec<PublicComment>> {
        let rows = self
            .repository
            .comments
            .list_approved(self.config.public_page_size)
            .await?;
        Ok(rows.into_iter().map(PublicComment::from).collect())
    }

    /// All comments of one visitor, pending ones included
    pub async fn list_own(&self, visitor_id: Uuid) -> AppResult<Vec<OwnComment>> {
        let rows = self.repository.comments.list_by_visitor(visitor_id).await?;
        Ok(rows.into_iter().map(OwnComment::from).collect())
    }

    /// Every comment with its author expanded, for moderation
    pub async fn list_all(&self) -> AppResult<Vec<AdminComment>> {
        self.repository.comments.list_with_visitors().await
    }

    pub async fn approve(&self, id: Uuid) -> AppResult<Comment> {
        let comment = self
            .repository
            .comments
            .approve(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Comment with id {} not found", id)))?;

        tracing::info!(comment_id = %comment.id, "Comment approved");
        Ok(comment)
    }
}
