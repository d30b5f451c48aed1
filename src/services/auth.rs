//! Request authorization checks

use crate::{
    error::{AppError, AppResult},
    models::{Visitor, VisitorClaims},
    repository::Repository,
};

use super::sessions::SessionIssuer;

/// Authenticated-visitor and authenticated-admin checks
#[derive(Clone)]
pub struct AuthGate {
    sessions: SessionIssuer,
    repository: Repository,
}

impl AuthGate {
    pub fn new(sessions: SessionIssuer, repository: Repository) -> Self {
        Self {
            sessions,
            repository,
        }
    }

    /// Verify the bearer credential from an `Authorization` header value
    pub fn authenticate(&self, header: Option<&str>) -> AppResult<VisitorClaims> {
        let header = header
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AppError::Authentication("Invalid authorization header format".to_string())
            })?;

        self.sessions.verify(token)
    }

    /// Check the visitor's current role in the store rather than the role in the token
    pub async fn require_admin(&self, claims: &VisitorClaims) -> AppResult<Visitor> {
        let visitor = self.repository.visitors.get_by_id(claims.visitor_id).await?;

        match visitor {
            Some(visitor) if visitor.is_admin() => Ok(visitor),
            _ => {
                tracing::warn!(visitor_id = %claims.visitor_id, "Rejected non-admin request");
                Err(AppError::Authorization(
                    "Administrator privileges required".to_string(),
                ))
            }
        }
    }
}
