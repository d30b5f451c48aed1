//! Postgres implementation of the visitor and comment stores

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        comment::AdminCommentRow, AdminComment, Comment, NewComment, NewVisitor, Visitor,
        VisitorRole,
    },
};

use super::{CommentStore, VisitorStore};

#[derive(Clone)]
pub struct PostgresStore {
    pool: Pool<Postgres>,
}

impl PostgresStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Turn a unique-constraint violation into a conflict
fn map_unique_violation(err: sqlx::Error, message: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(message.to_string())
        }
        _ => AppError::Database(err),
    }
}

#[async_trait]
impl VisitorStore for PostgresStore {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Visitor>> {
        let visitor = sqlx::query_as::<_, Visitor>("SELECT * FROM visitors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(visitor)
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<Visitor>> {
        let visitor = sqlx::query_as::<_, Visitor>(
            "SELECT * FROM visitors WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(visitor)
    }

    async fn create(&self, visitor: NewVisitor) -> AppResult<Visitor> {
        sqlx::query_as::<_, Visitor>(
            r#"
            INSERT INTO visitors (id, name, email, role, comment_count, created_at)
            VALUES ($1, $2, $3, $4, 0, NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&visitor.name)
        .bind(&visitor.email)
        .bind(visitor.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "A visitor with this email already exists"))
    }

    async fn update_name(&self, id: Uuid, name: &str) -> AppResult<Option<Visitor>> {
        let visitor = sqlx::query_as::<_, Visitor>(
            "UPDATE visitors SET name = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(visitor)
    }

    async fn set_role(&self, id: Uuid, role: VisitorRole) -> AppResult<Option<Visitor>> {
        let visitor = sqlx::query_as::<_, Visitor>(
            "UPDATE visitors SET role = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?;
        Ok(visitor)
    }
}

#[async_trait]
impl CommentStore for PostgresStore {
    async fn append(&self, comment: NewComment) -> AppResult<Option<Comment>> {
        let mut tx = self.pool.begin().await?;

        // The row lock taken here serializes concurrent submissions of the same visitor.
        // clock_timestamp() is read after the lock, so created_at follows the ordinals.
        let visitor = sqlx::query_as::<_, Visitor>(
            r#"
            UPDATE visitors
            SET comment_count = comment_count + 1, last_comment_at = clock_timestamp()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(comment.visitor_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(visitor) = visitor else {
            tx.rollback().await?;
            return Ok(None);
        };

        let created = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments
                (id, visitor_id, name, email, message, approved, comment_number, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(visitor.id)
        .bind(&visitor.name)
        .bind(&visitor.email)
        .bind(&comment.message)
        .bind(comment.approved)
        .bind(visitor.comment_count)
        .bind(visitor.last_comment_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(created))
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(comment)
    }

    async fn list_approved(&self, limit: i64) -> AppResult<Vec<Comment>> {
        let rows = sqlx::query_as::<_, Comment>(
            r#"
            SELECT * FROM comments
            WHERE approved = TRUE
            ORDER BY created_at DESC, comment_number DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_by_visitor(&self, visitor_id: Uuid) -> AppResult<Vec<Comment>> {
        let rows = sqlx::query_as::<_, Comment>(
            r#"
            SELECT * FROM comments
            WHERE visitor_id = $1
            ORDER BY created_at DESC, comment_number DESC
            "#,
        )
        .bind(visitor_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_with_visitors(&self) -> AppResult<Vec<AdminComment>> {
        let rows = sqlx::query_as::<_, AdminCommentRow>(
            r#"
            SELECT c.*,
                   v.name AS visitor_name,
                   v.email AS visitor_email,
                   v.comment_count AS visitor_comment_count,
                   v.role AS visitor_role
            FROM comments c
            LEFT JOIN visitors v ON v.id = c.visitor_id
            ORDER BY c.created_at DESC, c.comment_number DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(AdminComment::from).collect())
    }

    async fn approve(&self, id: Uuid) -> AppResult<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            "UPDATE comments SET approved = TRUE WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(comment)
    }
}
