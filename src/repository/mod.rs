//! Repository layer for visitor and comment storage
//!
//! Workflows only see the [`VisitorStore`] and [`CommentStore`] traits. Two
//! backends implement both: [`postgres::PostgresStore`] for deployments and
//! [`memory::InMemoryStore`] for local development and tests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{AdminComment, Comment, NewComment, NewVisitor, Visitor, VisitorRole},
};

/// Persistence for visitor records. Email uniqueness is enforced here.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisitorStore: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Visitor>>;

    /// Lookup by normalized email
    async fn get_by_email(&self, email: &str) -> AppResult<Option<Visitor>>;

    /// Insert a visitor with a zero comment count. Fails with `Conflict` if the email is taken.
    async fn create(&self, visitor: NewVisitor) -> AppResult<Visitor>;

    async fn update_name(&self, id: Uuid, name: &str) -> AppResult<Option<Visitor>>;

    async fn set_role(&self, id: Uuid, role: VisitorRole) -> AppResult<Option<Visitor>>;
}

/// Persistence for comments
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Store a comment and advance the owner's comment count and last comment time.
    ///
    /// The comment number is the owner's new count and the name/email are copied from the
    /// owner row as it is after the increment. Backends apply both writes as one unit when
    /// they can; a backend that cannot must increment first so that numbers are never reused.
    /// Returns `None` if the visitor does not exist.
    async fn append(&self, comment: NewComment) -> AppResult<Option<Comment>>;

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Comment>>;

    /// Approved comments, newest first
    async fn list_approved(&self, limit: i64) -> AppResult<Vec<Comment>>;

    /// All comments of one visitor, newest first
    async fn list_by_visitor(&self, visitor_id: Uuid) -> AppResult<Vec<Comment>>;

    /// Every comment with its owning visitor expanded, newest first
    async fn list_with_visitors(&self) -> AppResult<Vec<AdminComment>>;

    /// Set the approved flag. Approving twice is not an error.
    async fn approve(&self, id: Uuid) -> AppResult<Option<Comment>>;
}

/// Main repository struct holding the store handles
#[derive(Clone)]
pub struct Repository {
    pub visitors: Arc<dyn VisitorStore>,
    pub comments: Arc<dyn CommentStore>,
    pool: Option<Pool<Postgres>>,
}

impl Repository {
    /// Create a Postgres-backed repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        let store = Arc::new(postgres::PostgresStore::new(pool.clone()));
        Self {
            visitors: store.clone(),
            comments: store,
            pool: Some(pool),
        }
    }

    /// Create a repository that keeps everything in process memory
    pub fn in_memory() -> Self {
        let store = Arc::new(memory::InMemoryStore::new());
        Self {
            visitors: store.clone(),
            comments: store,
            pool: None,
        }
    }

    /// Build a repository from arbitrary store implementations
    pub fn from_stores(visitors: Arc<dyn VisitorStore>, comments: Arc<dyn CommentStore>) -> Self {
        Self {
            visitors,
            comments,
            pool: None,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        if self.pool.is_some() {
            "postgres"
        } else {
            "memory"
        }
    }

    /// Check that the backing database answers
    pub async fn health_check(&self) -> AppResult<()> {
        if let Some(pool) = &self.pool {
            sqlx::query("SELECT 1").execute(pool).await?;
        }
        Ok(())
    }

    /// Release database connections
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
