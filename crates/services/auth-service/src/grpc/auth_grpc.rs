//! gRPC implementation for AuthService.

use std::sync::Arc;

use tonic::{Request, Response, Status};

use crate::service::{AuthService, AuthSession};
use domain::{OAuthProfile, User};
use proto::auth::{
    auth_service_server::AuthService as AuthServiceProto, LoginRequest, LoginResponse,
    OauthLoginRequest, OauthLoginResponse, RegisterRequest, SafeUser, VerifyTokenRequest,
    VerifyTokenResponse,
};

/// gRPC service wrapper for AuthService.
pub struct AuthGrpcService {
    service: Arc<dyn AuthService>,
}

impl AuthGrpcService {
    /// Create a new gRPC service wrapper.
    pub fn new(service: Arc<dyn AuthService>) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl AuthServiceProto for AuthGrpcService {
    async fn register(
        &self,
        request: Request<RegisterRequest>,
    ) -> Result<Response<SafeUser>, Status> {
        let req = request.into_inner();

        let user = self
            .service
            .register(req.email, req.password, req.first_name, req.last_name)
            .await
            .map_err(Status::from)?;

        Ok(Response::new(safe_user(user)))
    }

    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> Result<Response<LoginResponse>, Status> {
        let req = request.into_inner();

        let AuthSession {
            access_token,
            expires_in,
            user,
        } = self
            .service
            .login(req.email, req.password)
            .await
            .map_err(Status::from)?;

        Ok(Response::new(LoginResponse {
            access_token,
            expires_in,
            user: Some(safe_user(user)),
        }))
    }

    async fn oauth_login(
        &self,
        request: Request<OauthLoginRequest>,
    ) -> Result<Response<OauthLoginResponse>, Status> {
        let req = request.into_inner();
        let profile = OAuthProfile {
            provider: req.provider,
            provider_id: req.provider_id,
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            photo: req.photo,
            access_token: req.access_token,
        };

        let session = self
            .service
            .oauth_login(profile)
            .await
            .map_err(Status::from)?;

        Ok(Response::new(OauthLoginResponse {
            access_token: session.access_token,
            expires_in: session.expires_in,
            user: Some(safe_user(session.user)),
        }))
    }

    async fn verify_token(
        &self,
        request: Request<VerifyTokenRequest>,
    ) -> Result<Response<VerifyTokenResponse>, Status> {
        let req = request.into_inner();

        match self.service.verify_token(&req.token) {
            Ok(claims) => Ok(Response::new(VerifyTokenResponse {
                valid: true,
                user_id: claims.sub.to_string(),
                email: claims.email,
                issued_at: claims.iat,
                expires_at: claims.exp,
            })),
            Err(_) => Ok(Response::new(VerifyTokenResponse {
                valid: false,
                ..Default::default()
            })),
        }
    }
}

/// Project a user onto the credential-free wire type.
fn safe_user(user: User) -> SafeUser {
    SafeUser {
        id: user.id.to_string(),
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
    }
}
