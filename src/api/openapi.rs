//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{comments, health, visitors};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Guestbook API",
        version = "1.0.0",
        description = "Visitor comments with moderation"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        // Visitors
        visitors::login,
        visitors::get_profile,
        visitors::update_profile,
        // Comments
        comments::create_comment,
        comments::list_comments,
        comments::my_comments,
        comments::admin_comments,
        comments::approve_comment,
    ),
    components(
        schemas(
            // Visitors
            crate::models::visitor::Visitor,
            crate::models::visitor::VisitorRole,
            crate::models::visitor::VisitorSummary,
            crate::models::visitor::LoginRequest,
            crate::models::visitor::UpdateProfileRequest,
            crate::models::visitor::SessionResponse,
            // Comments
            crate::models::comment::Comment,
            crate::models::comment::PublicComment,
            crate::models::comment::OwnComment,
            crate::models::comment::CommentAuthor,
            crate::models::comment::AdminComment,
            crate::models::comment::CreateCommentRequest,
            crate::models::comment::CommentCreatedResponse,
            crate::models::comment::CommentResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "visitors", description = "Visitor login and profile"),
        (name = "comments", description = "Comment submission and moderation")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
