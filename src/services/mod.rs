//! Business logic services

pub mod auth;
pub mod comments;
pub mod sessions;
pub mod visitors;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub sessions: sessions::SessionIssuer,
    pub auth: auth::AuthGate,
    pub visitors: visitors::VisitorsService,
    pub comments: comments::CommentsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        let sessions = sessions::SessionIssuer::new(&config.auth);
        Self {
            auth: auth::AuthGate::new(sessions.clone(), repository.clone()),
            visitors: visitors::VisitorsService::new(repository.clone(), sessions.clone()),
            comments: comments::CommentsService::new(repository.clone(), config.comments.clone()),
            sessions,
            repository,
        }
    }
}
