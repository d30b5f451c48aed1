//! Visitor model and session claims

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Visitor role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VisitorRole {
    #[default]
    Visitor,
    Admin,
}

impl VisitorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitorRole::Visitor => "visitor",
            VisitorRole::Admin => "admin",
        }
    }
}

impl std::fmt::Display for VisitorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VisitorRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "visitor" => Ok(VisitorRole::Visitor),
            "admin" => Ok(VisitorRole::Admin),
            _ => Err(format!("Invalid visitor role: {}", s)),
        }
    }
}

// SQLx conversion for VisitorRole
impl sqlx::Type<Postgres> for VisitorRole {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for VisitorRole {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for VisitorRole {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Full visitor record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Visitor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: VisitorRole,
    /// Number of comments ever submitted by this visitor
    pub comment_count: i32,
    pub last_comment_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Visitor {
    pub fn is_admin(&self) -> bool {
        self.role == VisitorRole::Admin
    }
}

/// Data for a visitor that does not exist yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewVisitor {
    pub name: String,
    pub email: String,
    pub role: VisitorRole,
}

/// Visitor fields exposed alongside a session token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitorSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub comment_count: i32,
    pub role: VisitorRole,
}

impl From<&Visitor> for VisitorSummary {
    fn from(visitor: &Visitor) -> Self {
        Self {
            id: visitor.id,
            name: visitor.name.clone(),
            email: visitor.email.clone(),
            comment_count: visitor.comment_count,
            role: visitor.role,
        }
    }
}

/// Login-or-register request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: Option<String>,
    /// Required only when the email has never been seen
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,
}

/// Profile update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,
}

/// Token plus the visitor it was issued for
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub token: String,
    pub token_type: String,
    pub visitor: VisitorSummary,
}

/// JWT claims for authenticated visitors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitorClaims {
    pub sub: String,
    pub visitor_id: Uuid,
    pub email: String,
    pub name: String,
    pub comment_count: i32,
    pub role: VisitorRole,
    pub exp: i64,
    pub iat: i64,
}

impl VisitorClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse and verify a JWT token (signature and expiry)
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let mut validation = Validation::default();
        validation.leeway = 0;
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )?;
        Ok(token_data.claims)
    }
}

/// Trim and lowercase an email so lookups are case-insensitive
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Trim a free-text field, treating blank input as absent
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
