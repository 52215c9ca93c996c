//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::ServiceResponse;

use std::sync::Arc;

use super::session_config::{SESSION_COOKIE_NAME, session_middleware};
use super::state::HttpState;
use crate::outbound::security::Argon2PasswordHasher;
use crate::server::in_memory_state;

/// Session middleware with the production cookie policy, a fresh key and the
/// `Secure` flag off so plain-HTTP test requests carry the cookie.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    session_middleware(Key::generate(), false, SameSite::Strict)
}

/// The `token` cookie set by a response, if any.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(Cookie::into_owned)
}

/// In-memory HTTP state with cheap Argon2 parameters.
pub fn test_state() -> HttpState {
    let hasher = Argon2PasswordHasher::with_params(8 * 1024, 1, 1).expect("test hash params");
    in_memory_state(Arc::new(hasher))
}
