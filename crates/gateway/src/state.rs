//! Application state for dependency injection.

use std::sync::Arc;

use crate::clients::AuthApi;
use crate::oauth::OAuthProvider;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn AuthApi>,
    /// `None` when Google sign-in is not configured
    pub google: Option<Arc<dyn OAuthProvider>>,
}

impl AppState {
    /// Create new app state.
    pub fn new(auth: Arc<dyn AuthApi>, google: Option<Arc<dyn OAuthProvider>>) -> Self {
        Self { auth, google }
    }
}
