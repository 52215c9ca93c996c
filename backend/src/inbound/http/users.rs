//! Account API handlers.
//!
//! ```text
//! POST /api/user/register {"firstName":"Ada","lastName":"Lovelace","email":"ada@example.com","password":"analytical","passwordVerify":"analytical"}
//! POST /api/user/login {"email":"ada@example.com","password":"analytical"}
//! POST /api/user/logout
//! GET /api/user/loggedin
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{Error, LoginCredentials, Registration, UserProfile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Registration form for `POST /api/user/register`. Missing fields read as
/// empty so validation reports them with the usual message.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub password_verify: String,
}

/// Credentials for `POST /api/user/login`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserBody {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<UserProfile> for UserBody {
    fn from(profile: UserProfile) -> Self {
        Self {
            first_name: profile.first_name,
            last_name: profile.last_name,
            email: profile.email,
        }
    }
}

/// Body returned after registering or logging in.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub user: UserBody,
}

/// Body returned by `GET /api/user/loggedin`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoggedInResponse {
    pub logged_in: bool,
    pub user: UserBody,
}

/// Body returned by `POST /api/user/logout`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

fn authenticated(session: &SessionContext, profile: UserProfile) -> ApiResult<HttpResponse> {
    session.persist_user(&profile.id)?;
    Ok(HttpResponse::Ok().json(AuthResponse {
        success: true,
        user: profile.into(),
    }))
}

/// Create an account and log it in.
#[utoipa::path(
    post,
    path = "/api/user/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = AuthResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid form or email already registered", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let form = payload.into_inner();
    let registration = Registration::try_from_parts(
        &form.first_name,
        &form.last_name,
        &form.email,
        &form.password,
        &form.password_verify,
    )
    .map_err(|err| Error::invalid_request(err.to_string()))?;
    let profile = state.accounts.register(registration).await?;
    authenticated(&session, profile)
}

/// Check credentials and establish a session.
#[utoipa::path(
    post,
    path = "/api/user/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AuthResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Missing or wrong credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&email, &password)
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    let profile = state.accounts.login(credentials).await?;
    authenticated(&session, profile)
}

/// Forget the session and clear the cookie.
#[utoipa::path(
    post,
    path = "/api/user/logout",
    responses((status = 200, description = "Logged out", body = SuccessResponse)),
    tags = ["users"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::Ok().json(SuccessResponse { success: true })
}

/// Report the account behind the current session.
#[utoipa::path(
    get,
    path = "/api/user/loggedin",
    responses(
        (status = 200, description = "Current account", body = LoggedInResponse),
        (status = 403, description = "No session", body = ErrorSchema),
        (status = 404, description = "Account no longer exists", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "loggedIn"
)]
#[get("/loggedin")]
pub async fn logged_in(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<LoggedInResponse>> {
    let user_id = session.require_user_id("Unauthorized")?;
    let profile = state.accounts_query.profile(&user_id).await?;
    Ok(web::Json(LoggedInResponse {
        logged_in: true,
        user: profile.into(),
    }))
}

/// Mount the account routes; the caller supplies the `/api` prefix.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/user")
            .service(register)
            .service(login)
            .service(logout)
            .service(logged_in),
    );
}
