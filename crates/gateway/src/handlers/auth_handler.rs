//! Authentication handlers.

use axum::{
    extract::{Extension, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use common::{AppError, AppResult};
use domain::MAX_PASSWORD_LENGTH;

use crate::extractors::ValidatedJson;
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterRequest {
    /// User email address
    #[validate(email(message = "Invalid email address"))]
    #[schema(example = "user@gmail.com")]
    pub email: String,
    /// User password (8 to 128 characters)
    #[validate(length(min = 8, max = 128, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8, max_length = 128)]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "Invalid first name"))]
    #[schema(example = "Jane")]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Invalid last name"))]
    #[schema(example = "Doe")]
    pub last_name: Option<String>,
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    /// User email address
    #[validate(email(message = "Invalid email address"))]
    #[schema(example = "user@gmail.com")]
    pub email: String,
    /// User password; never validated beyond credential matching
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Identifier pair returned after registration
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub ok: bool,
    pub user: UserSummary,
}

/// Successful login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    /// Token lifetime as configured, e.g. `1h`
    #[schema(example = "1h")]
    pub expires_in: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LogoutResponse {
    pub message: String,
}

/// Claims of the presented token
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponse {
    pub id: Uuid,
    pub email: String,
    /// Issued-at (seconds since the epoch)
    pub iat: i64,
    /// Expiry (seconds since the epoch)
    pub exp: i64,
}

/// Public authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Routes that need a bearer token
pub fn protected_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/logout", post(logout))
        .route("/me", get(me))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered successfully", body = RegisterResponse),
        (status = 400, description = "Validation error or email domain not accepted"),
        (status = 409, description = "User already exists"),
        (status = 503, description = "A dependent service is unavailable")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Json<RegisterResponse>> {
    let user = state
        .auth
        .register(
            payload.email,
            payload.password,
            payload.first_name,
            payload.last_name,
        )
        .await?;

    Ok(Json(RegisterResponse {
        ok: true,
        user: UserSummary {
            id: user.id,
            email: user.email,
        },
    }))
}

/// Login and get JWT token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Malformed body or email"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    // No stored password can match these; skip the round trip and hash
    if payload.password.is_empty() || payload.password.chars().count() > MAX_PASSWORD_LENGTH {
        return Err(AppError::InvalidCredentials);
    }

    let session = state.auth.login(payload.email, payload.password).await?;

    Ok(Json(LoginResponse {
        access_token: session.access_token,
        expires_in: session.expires_in,
        email: session.user.email,
        first_name: session.user.first_name,
        last_name: session.user.last_name,
    }))
}

/// Log out. Tokens are stateless, so the client must discard its copy.
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Logged out", body = LogoutResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn logout(Extension(current_user): Extension<CurrentUser>) -> Json<LogoutResponse> {
    tracing::info!(user_id = %current_user.id, "Logout requested");

    Json(LogoutResponse {
        message: "Logged out. The token stays valid until it expires; delete it on the client."
            .to_string(),
    })
}

/// Claims of the current token
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Token claims", body = MeResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn me(Extension(current_user): Extension<CurrentUser>) -> Json<MeResponse> {
    Json(MeResponse {
        id: current_user.id,
        email: current_user.email,
        iat: current_user.iat,
        exp: current_user.exp,
    })
}
