//! Visitor login-or-register and profile management

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        visitor::{non_blank, normalize_email, LoginRequest, UpdateProfileRequest},
        NewVisitor, Visitor, VisitorRole,
    },
    repository::Repository,
};

use super::sessions::SessionIssuer;

#[derive(Clone)]
pub struct VisitorsService {
    repository: Repository,
    sessions: SessionIssuer,
}

impl VisitorsService {
    pub fn new(repository: Repository, sessions: SessionIssuer) -> Self {
        Self {
            repository,
            sessions,
        }
    }

    /// Log in an existing visitor or register a new one, keyed by email.
    /// Returns a fresh token and the visitor as stored afterwards.
    pub async fn login(&self, mut request: LoginRequest) -> AppResult<(String, Visitor)> {
        let email = non_blank(request.email.as_deref())
            .map(normalize_email)
            .ok_or_else(AppError::missing_email)?;
        // Validate the address as it will be stored
        request.email = Some(email.clone());
        request.validate()?;
        let name = non_blank(request.name.as_deref());

        let visitor = match self.repository.visitors.get_by_email(&email).await? {
            Some(existing) => match name {
                Some(name) if name != existing.name => self
                    .repository
                    .visitors
                    .update_name(existing.id, name)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Visitor not found".to_string()))?,
                _ => existing,
            },
            None => {
                let name = name.ok_or_else(AppError::missing_name)?;
                let created = self
                    .repository
                    .visitors
                    .create(NewVisitor {
                        name: name.to_string(),
                        email,
                        role: VisitorRole::Visitor,
                    })
                    .await?;
                tracing::info!(visitor_id = %created.id, "Registered new visitor");
                created
            }
        };

        let token = self.sessions.issue(&visitor)?;
        Ok((token, visitor))
    }

    /// Get the caller's own visitor record
    pub async fn get_profile(&self, visitor_id: uuid::Uuid) -> AppResult<Visitor> {
        self.repository
            .visitors
            .get_by_id(visitor_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Visitor not found".to_string()))
    }

    /// Rename the caller and issue a token carrying the new name.
    /// Older tokens stay valid until they expire.
    pub async fn update_profile(
        &self,
        visitor_id: uuid::Uuid,
        request: UpdateProfileRequest,
    ) -> AppResult<(String, Visitor)> {
        let name = non_blank(request.name.as_deref()).ok_or_else(AppError::missing_name)?;
        request.validate()?;

        let visitor = self
            .repository
            .visitors
            .update_name(visitor_id, name)
            .await?
            .ok_or_else(|| AppError::NotFound("Visitor not found".to_string()))?;

        let token = self.sessions.issue(&visitor)?;
        Ok((token, visitor))
    }

    /// Promote the visitors with the given emails to admin.
    /// Emails without a visitor yet are skipped. Returns the number promoted.
    pub async fn promote_admins(&self, emails: &[String]) -> AppResult<usize> {
        let mut promoted = 0;
        for email in emails {
            let email = normalize_email(email);
            match self.repository.visitors.get_by_email(&email).await? {
                Some(visitor) if visitor.is_admin() => {}
                Some(visitor) => {
                    self.repository
                        .visitors
                        .set_role(visitor.id, VisitorRole::Admin)
                        .await?;
                    tracing::info!(visitor_id = %visitor.id, "Promoted visitor to admin");
                    promoted += 1;
                }
                None => {
                    tracing::warn!(email = %email, "No visitor to promote to admin");
                }
            }
        }
        Ok(promoted)
    }
}
