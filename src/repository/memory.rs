//! In-memory implementation of the visitor and comment stores.
//!
//! All state lives behind one `tokio::sync::RwLock`, so a comment insert and the matching
//! visitor counter update happen under the same write lock. Nothing is persisted: state is
//! lost when the process exits.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        comment::CommentAuthor, AdminComment, Comment, NewComment, NewVisitor, Visitor,
        VisitorRole,
    },
};

use super::{CommentStore, VisitorStore};

#[derive(Debug, Default)]
struct State {
    visitors: HashMap<Uuid, Visitor>,
    /// Lowercased email to visitor id
    emails: HashMap<String, Uuid>,
    /// Comments in insertion order
    comments: Vec<Comment>,
}

impl State {
    /// Comments matching `keep`, newest first. Ties keep reverse insertion order.
    fn newest_first(&self, keep: impl Fn(&Comment) -> bool) -> Vec<Comment> {
        let mut rows: Vec<Comment> =
            self.comments.iter().rev().filter(|c| keep(c)).cloned().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VisitorStore for InMemoryStore {
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Visitor>> {
        Ok(self.state.read().await.visitors.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<Visitor>> {
        let state = self.state.read().await;
        Ok(state
            .emails
            .get(&email.to_lowercase())
            .and_then(|id| state.visitors.get(id))
            .cloned())
    }

    async fn create(&self, visitor: NewVisitor) -> AppResult<Visitor> {
        let mut state = self.state.write().await;
        let key = visitor.email.to_lowercase();
        if state.emails.contains_key(&key) {
            return Err(AppError::Conflict(
                "A visitor with this email already exists".to_string(),
            ));
        }

        let created = Visitor {
            id: Uuid::new_v4(),
            name: visitor.name,
            email: visitor.email,
            role: visitor.role,
            comment_count: 0,
            last_comment_at: None,
            created_at: Utc::now(),
        };
        state.emails.insert(key, created.id);
        state.visitors.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_name(&self, id: Uuid, name: &str) -> AppResult<Option<Visitor>> {
        let mut state = self.state.write().await;
        Ok(state.visitors.get_mut(&id).map(|visitor| {
            visitor.name = name.to_string();
            visitor.clone()
        }))
    }

    async fn set_role(&self, id: Uuid, role: VisitorRole) -> AppResult<Option<Visitor>> {
        let mut state = self.state.write().await;
        Ok(state.visitors.get_mut(&id).map(|visitor| {
            visitor.role = role;
            visitor.clone()
        }))
    }
}

#[async_trait]
impl CommentStore for InMemoryStore {
    async fn append(&self, comment: NewComment) -> AppResult<Option<Comment>> {
        let mut state = self.state.write().await;

        let Some(visitor) = state.visitors.get_mut(&comment.visitor_id) else {
            return Ok(None);
        };
        // Stamped under the write lock so newest-first order follows the ordinals
        let created_at = Utc::now();
        visitor.comment_count += 1;
        visitor.last_comment_at = Some(created_at);

        let created = Comment {
            id: Uuid::new_v4(),
            visitor_id: visitor.id,
            name: visitor.name.clone(),
            email: visitor.email.clone(),
            message: comment.message,
            approved: comment.approved,
            comment_number: visitor.comment_count,
            created_at,
        };
        state.comments.push(created.clone());
        Ok(Some(created))
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Comment>> {
        let state = self.state.read().await;
        Ok(state.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn list_approved(&self, limit: i64) -> AppResult<Vec<Comment>> {
        let state = self.state.read().await;
        let mut rows = state.newest_first(|c| c.approved);
        rows.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(rows)
    }

    async fn list_by_visitor(&self, visitor_id: Uuid) -> AppResult<Vec<Comment>> {
        let state = self.state.read().await;
        Ok(state.newest_first(|c| c.visitor_id == visitor_id))
    }

    async fn list_with_visitors(&self) -> AppResult<Vec<AdminComment>> {
        let state = self.state.read().await;
        Ok(state
            .newest_first(|_| true)
            .into_iter()
            .map(|comment| {
                let visitor = state.visitors.get(&comment.visitor_id).map(|v| CommentAuthor {
                    id: v.id,
                    name: v.name.clone(),
                    email: v.email.clone(),
                    comment_count: v.comment_count,
                    role: v.role,
                });
                AdminComment { comment, visitor }
            })
            .collect())
    }

    async fn approve(&self, id: Uuid) -> AppResult<Option<Comment>> {
        let mut state = self.state.write().await;
        Ok(state.comments.iter_mut().find(|c| c.id == id).map(|comment| {
            comment.approved = true;
            comment.clone()
        }))
    }
}
