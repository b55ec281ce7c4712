//! Google OAuth 2.0 authorization-code flow.
//!
//! Plain HTTPS calls to Google's documented endpoints: build the consent
//! URL, exchange the returned code for an access token, then read the
//! OpenID Connect userinfo profile.

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use common::{AppError, AppResult};
use domain::{OAuthProfile, PROVIDER_GOOGLE};

use crate::config::GoogleOAuthConfig;

const AUTHORIZATION_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";
const SCOPES: &str = "openid email profile";

/// An external identity provider.
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// URL the browser is sent to for consent.
    fn authorization_url(&self) -> AppResult<String>;

    /// Trade an authorization code for the user's profile.
    async fn exchange_code(&self, code: &str) -> AppResult<OAuthProfile>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    sub: String,
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
    given_name: Option<String>,
    family_name: Option<String>,
    picture: Option<String>,
}

impl GoogleUserInfo {
    fn into_profile(self, access_token: String) -> AppResult<OAuthProfile> {
        let email = match self.email {
            Some(email) if self.email_verified => email,
            _ => {
                warn!(sub = %self.sub, "Google account without verified email");
                return Err(AppError::Unauthorized);
            }
        };

        Ok(OAuthProfile {
            provider: PROVIDER_GOOGLE.to_string(),
            provider_id: self.sub,
            email,
            first_name: self.given_name,
            last_name: self.family_name,
            photo: self.picture,
            access_token: Some(access_token),
        })
    }
}

/// Google sign-in over reqwest.
pub struct GoogleOAuth {
    config: GoogleOAuthConfig,
    http: reqwest::Client,
}

impl GoogleOAuth {
    pub fn new(config: GoogleOAuthConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    async fn fetch_access_token(&self, code: &str) -> AppResult<String> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.callback_url.as_str()),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];

        let resp = self
            .http
            .post(TOKEN_URL)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::service_unavailable(format!("Google token request: {}", e)))?;

        let status = resp.status();
        if status.is_client_error() {
            let body = resp.text().await.unwrap_or_default();
            warn!(%status, "Google rejected authorization code: {}", body);
            return Err(AppError::Unauthorized);
        }
        if !status.is_success() {
            return Err(AppError::service_unavailable(format!(
                "Google token endpoint returned {}",
                status
            )));
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| AppError::service_unavailable(format!("Google token response: {}", e)))?;
        Ok(token.access_token)
    }

    async fn fetch_user_info(&self, access_token: &str) -> AppResult<GoogleUserInfo> {
        let resp = self
            .http
            .get(USERINFO_URL)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::service_unavailable(format!("Google userinfo request: {}", e)))?;

        match resp.status() {
            StatusCode::OK => resp.json().await.map_err(|e| {
                AppError::service_unavailable(format!("Google userinfo response: {}", e))
            }),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AppError::Unauthorized),
            status => Err(AppError::service_unavailable(format!(
                "Google userinfo returned {}",
                status
            ))),
        }
    }
}

#[async_trait]
impl OAuthProvider for GoogleOAuth {
    fn authorization_url(&self) -> AppResult<String> {
        let url = Url::parse_with_params(
            AUTHORIZATION_URL,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.callback_url.as_str()),
                ("response_type", "code"),
                ("scope", SCOPES),
                ("prompt", "select_account"),
            ],
        )
        .map_err(|e| AppError::internal(format!("Google authorization URL: {}", e)))?;

        Ok(url.into())
    }

    async fn exchange_code(&self, code: &str) -> AppResult<OAuthProfile> {
        let access_token = self.fetch_access_token(code).await?;
        let info = self.fetch_user_info(&access_token).await?;
        debug!(sub = %info.sub, "Google profile fetched");
        info.into_profile(access_token)
    }
}
