//! Bearer-token authentication middleware.

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use uuid::Uuid;

use common::AppError;

use crate::state::AppState;

/// Current authenticated user, taken from verified token claims.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    /// Issued-at, seconds since the epoch
    pub iat: i64,
    /// Expiry, seconds since the epoch
    pub exp: i64,
}

/// Authentication middleware that validates JWT tokens.
///
/// Requests without a valid `Authorization: Bearer` token are answered
/// with 401 before reaching the handler.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AppError::Unauthorized)?;

    // Verify token via auth-service
    let claims = state
        .auth
        .verify_token(token.token())
        .await?
        .ok_or(AppError::Unauthorized)?;

    request.extensions_mut().insert(CurrentUser {
        id: claims.user_id,
        email: claims.email,
        iat: claims.issued_at,
        exp: claims.expires_at,
    });

    Ok(next.run(request).await)
}
