//! Google sign-in handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{Json, Redirect},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::{IntoParams, ToSchema};

use common::{AppError, AppResult};

use crate::handlers::auth_handler::UserSummary;
use crate::oauth::OAuthProvider;
use crate::state::AppState;

/// Query string Google appends to the callback
#[derive(Debug, Deserialize, IntoParams)]
pub struct GoogleCallback {
    /// Authorization code
    pub code: Option<String>,
    /// Set instead of `code` when the user declines
    pub error: Option<String>,
}

/// Successful Google sign-in
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OAuthLoginResponse {
    pub access_token: String,
    pub user: UserSummary,
}

/// Create OAuth routes
pub fn oauth_routes() -> Router<AppState> {
    Router::new()
        .route("/google", get(google_login))
        .route("/google/redirect", get(google_redirect))
}

fn google(state: &AppState) -> AppResult<&Arc<dyn OAuthProvider>> {
    state
        .google
        .as_ref()
        .ok_or_else(|| AppError::service_unavailable("Google sign-in is not configured"))
}

/// Start Google sign-in
#[utoipa::path(
    get,
    path = "/auth/google",
    tag = "OAuth",
    responses(
        (status = 303, description = "Redirect to Google's consent page"),
        (status = 503, description = "Google sign-in is not configured")
    )
)]
pub async fn google_login(State(state): State<AppState>) -> AppResult<Redirect> {
    let url = google(&state)?.authorization_url()?;
    Ok(Redirect::to(&url))
}

/// Google callback: exchange the code and sign the user in
#[utoipa::path(
    get,
    path = "/auth/google/redirect",
    tag = "OAuth",
    params(GoogleCallback),
    responses(
        (status = 200, description = "Signed in", body = OAuthLoginResponse),
        (status = 400, description = "Missing authorization code"),
        (status = 401, description = "Google rejected the sign-in"),
        (status = 503, description = "Google or a dependent service is unavailable")
    )
)]
pub async fn google_redirect(
    State(state): State<AppState>,
    Query(callback): Query<GoogleCallback>,
) -> AppResult<Json<OAuthLoginResponse>> {
    let provider = google(&state)?;

    if let Some(error) = callback.error {
        warn!(%error, "Google sign-in declined");
        return Err(AppError::Unauthorized);
    }
    let code = callback
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::validation("Missing authorization code"))?;

    let profile = provider.exchange_code(&code).await?;
    let session = state.auth.oauth_login(profile).await?;

    Ok(Json(OAuthLoginResponse {
        access_token: session.access_token,
        user: UserSummary {
            id: session.user.id,
            email: session.user.email,
        },
    }))
}
