//! Session token issuing and verification

use chrono::{DateTime, Duration, Utc};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{Visitor, VisitorClaims},
};

/// Mints and verifies HS256 session tokens carrying visitor claims
#[derive(Clone)]
pub struct SessionIssuer {
    secret: String,
    ttl: Duration,
}

impl SessionIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            ttl: Duration::hours(config.jwt_expiration_hours as i64),
        }
    }

    /// Issue a token for the visitor as currently stored
    pub fn issue(&self, visitor: &Visitor) -> AppResult<String> {
        self.claims_at(visitor, Utc::now())
            .create_token(&self.secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Verify signature and expiry, returning the embedded claims
    pub fn verify(&self, token: &str) -> AppResult<VisitorClaims> {
        VisitorClaims::from_token(token, &self.secret)
            .map_err(|e| AppError::InvalidToken(format!("{:?}", e.kind())))
    }

    fn claims_at(&self, visitor: &Visitor, now: DateTime<Utc>) -> VisitorClaims {
        VisitorClaims {
            sub: visitor.id.to_string(),
            visitor_id: visitor.id,
            email: visitor.email.clone(),
            name: visitor.name.clone(),
            comment_count: visitor.comment_count,
            role: visitor.role,
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        }
    }
}
