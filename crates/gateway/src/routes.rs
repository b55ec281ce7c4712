//! Route configuration.

use axum::{middleware, Router};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{auth_routes, health_routes, oauth_routes, protected_auth_routes};
use crate::middleware::auth_middleware;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let auth = auth_routes()
        .merge(oauth_routes())
        .merge(
            protected_auth_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        );

    Router::new()
        // Health check (no auth)
        .nest("/health", health_routes())
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Auth routes; logout and me require a bearer token
        .nest("/auth", auth)
        .with_state(state)
}
