//! Domain primitives, aggregates, and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, together with the services that implement the driving
//! ports. Keep types immutable and document invariants in each type's
//! Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User (alias to `user::User`): registered account.
//! - PersonalList / CommunityList: the two list aggregates.
//! - AccountService, ListService, CommunityListService: port
//!   implementations wired by the server.

pub mod account_service;
pub mod auth;
pub mod community_ledger;
pub mod community_service;
pub mod error;
pub mod list_service;
pub mod lists;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{
    LoginCredentials, LoginValidationError, MIN_PASSWORD_LEN, Registration,
    RegistrationValidationError,
};
pub use self::community_ledger::CommunityLedger;
pub use self::community_service::CommunityListService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::list_service::ListService;
pub use self::trace_id::TraceId;
pub use self::user::{
    EmailAddress, PERSON_NAME_MAX, PasswordHash, PersonName, User, UserId, UserProfile,
    UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use lister::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
