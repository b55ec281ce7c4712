//! gRPC client for auth-service.

use async_trait::async_trait;
use tonic::transport::Channel;
use tracing::debug;
use uuid::Uuid;

use common::{AppError, AppResult, GrpcClientConfig};
use domain::{OAuthProfile, UserResponse};
use proto::auth::{
    auth_service_client::AuthServiceClient as ProtoAuthServiceClient, LoginRequest,
    OauthLoginRequest, RegisterRequest, SafeUser, VerifyTokenRequest,
};

/// Token issued by auth-service together with the account it belongs to.
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub expires_in: String,
    pub user: UserResponse,
}

/// Verified token claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub email: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// Auth operations the HTTP handlers depend on.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn register(
        &self,
        email: String,
        password: String,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> AppResult<UserResponse>;

    async fn login(&self, email: String, password: String) -> AppResult<Session>;

    async fn oauth_login(&self, profile: OAuthProfile) -> AppResult<Session>;

    /// `None` when the token is invalid or expired
    async fn verify_token(&self, token: &str) -> AppResult<Option<TokenClaims>>;
}

/// gRPC client wrapper for auth-service.
#[derive(Clone)]
pub struct AuthClient {
    client: ProtoAuthServiceClient<Channel>,
}

impl AuthClient {
    /// Build a client whose channel connects on first call.
    pub fn new(config: &GrpcClientConfig) -> AppResult<Self> {
        debug!("Configuring auth-service client for {}", config.endpoint);
        let channel = config
            .lazy_channel()
            .map_err(|e| AppError::internal(format!("Invalid auth-service URL: {}", e)))?;

        Ok(Self {
            client: ProtoAuthServiceClient::new(channel),
        })
    }
}

#[async_trait]
impl AuthApi for AuthClient {
    async fn register(
        &self,
        email: String,
        password: String,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> AppResult<UserResponse> {
        let request = tonic::Request::new(RegisterRequest {
            email,
            password,
            first_name,
            last_name,
        });

        let mut client = self.client.clone();
        let response = client.register(request).await.map_err(AppError::from)?;
        safe_user(Some(response.into_inner()))
    }

    async fn login(&self, email: String, password: String) -> AppResult<Session> {
        let request = tonic::Request::new(LoginRequest { email, password });

        let mut client = self.client.clone();
        let response = client.login(request).await.map_err(AppError::from)?;
        let proto = response.into_inner();

        Ok(Session {
            access_token: proto.access_token,
            expires_in: proto.expires_in,
            user: safe_user(proto.user)?,
        })
    }

    async fn oauth_login(&self, profile: OAuthProfile) -> AppResult<Session> {
        let request = tonic::Request::new(OauthLoginRequest {
            provider: profile.provider,
            provider_id: profile.provider_id,
            email: profile.email,
            first_name: profile.first_name,
            last_name: profile.last_name,
            photo: profile.photo,
            access_token: profile.access_token,
        });

        let mut client = self.client.clone();
        let response = client.oauth_login(request).await.map_err(AppError::from)?;
        let proto = response.into_inner();

        Ok(Session {
            access_token: proto.access_token,
            expires_in: proto.expires_in,
            user: safe_user(proto.user)?,
        })
    }

    async fn verify_token(&self, token: &str) -> AppResult<Option<TokenClaims>> {
        let request = tonic::Request::new(VerifyTokenRequest {
            token: token.to_string(),
        });

        let mut client = self.client.clone();
        let response = client.verify_token(request).await.map_err(AppError::from)?;
        let proto = response.into_inner();

        if !proto.valid {
            return Ok(None);
        }

        Ok(Some(TokenClaims {
            user_id: proto
                .user_id
                .parse()
                .map_err(|_| AppError::service_unavailable("auth-service sent invalid UUID"))?,
            email: proto.email,
            issued_at: proto.issued_at,
            expires_at: proto.expires_at,
        }))
    }
}

/// Convert the wire user; a missing or undecodable user is a malformed reply.
fn safe_user(user: Option<SafeUser>) -> AppResult<UserResponse> {
    let user = user.ok_or_else(|| AppError::service_unavailable("auth-service sent no user"))?;

    Ok(UserResponse {
        id: user
            .id
            .parse()
            .map_err(|_| AppError::service_unavailable("auth-service sent invalid UUID"))?,
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
    })
}
