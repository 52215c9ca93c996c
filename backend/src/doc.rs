//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer together
//! with the request and response bodies they exchange. Domain types are
//! described through wrapper schemas ([`ErrorSchema`], [`ErrorCodeSchema`]) so
//! the domain stays free of utoipa.
//!
//! The document backs Swagger UI in debug builds and is exported by
//! `cargo run --bin openapi-dump`.

use crate::inbound::http::lists_dto::{
    CommentRequest, CreatedResponse, DeletedResponse, ListBody, ListBodyRequest, ListResponse,
    ListsResponse, PublishedResponse, UpdatedResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::session_config::SESSION_COOKIE_NAME;
use crate::inbound::http::users::{
    AuthResponse, LoggedInResponse, LoginRequest, RegisterRequest, SuccessResponse, UserBody,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE_NAME,
                "Encrypted session cookie issued by POST /api/user/register and /api/user/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Top 5 lister API",
        description = "Personal Top 5 lists, publishing and community vote aggregation.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::logged_in,
        crate::inbound::http::lists::create_list,
        crate::inbound::http::lists::update_list,
        crate::inbound::http::lists::publish_list,
        crate::inbound::http::lists::delete_list,
        crate::inbound::http::lists::get_list,
        crate::inbound::http::lists::list_lists,
        crate::inbound::http::lists::view_list,
        crate::inbound::http::lists::like_list,
        crate::inbound::http::lists::dislike_list,
        crate::inbound::http::lists::comment_list,
        crate::inbound::http::community::list_community,
        crate::inbound::http::community::get_community,
        crate::inbound::http::community::view_community,
        crate::inbound::http::community::like_community,
        crate::inbound::http::community::dislike_community,
        crate::inbound::http::community::comment_community,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        RegisterRequest,
        LoginRequest,
        UserBody,
        AuthResponse,
        LoggedInResponse,
        SuccessResponse,
        ListBodyRequest,
        CommentRequest,
        ListBody,
        ListResponse,
        CreatedResponse,
        UpdatedResponse,
        PublishedResponse,
        DeletedResponse,
        ListsResponse,
    )),
    tags(
        (name = "users", description = "Registration, login and session status"),
        (name = "lists", description = "Personal Top 5 lists"),
        (name = "community", description = "Aggregated community lists"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
