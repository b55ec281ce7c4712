//! gRPC implementation for UserService.

use std::sync::Arc;

use tonic::{Request, Response, Status};
use uuid::Uuid;

use crate::service::UserService;
use common::AppResult;
use domain::{CreateUser, UpdateUser, User};
use proto::user::{
    user_service_server::UserService as UserServiceProto, CreateUserRequest,
    FindOauthUserRequest, GetUserByEmailRequest, GetUserByIdRequest, UpdateUserRequest,
    UserRecord,
};

/// gRPC service wrapper for UserService.
pub struct UserGrpcService {
    service: Arc<dyn UserService>,
}

impl UserGrpcService {
    /// Create a new gRPC service wrapper.
    pub fn new(service: Arc<dyn UserService>) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl UserServiceProto for UserGrpcService {
    async fn create_user(
        &self,
        request: Request<CreateUserRequest>,
    ) -> Result<Response<UserRecord>, Status> {
        let req = request.into_inner();
        let input = CreateUser {
            email: req.email,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
            provider: req.provider,
            provider_id: req.provider_id,
            photo: req.photo,
            access_token: req.access_token,
        };

        let user = self.service.create_user(input).await.map_err(Status::from)?;
        Ok(Response::new(record_to_proto(&user)))
    }

    async fn get_user_by_email(
        &self,
        request: Request<GetUserByEmailRequest>,
    ) -> Result<Response<UserRecord>, Status> {
        let req = request.into_inner();
        found(self.service.find_by_email(&req.email).await)
    }

    async fn get_user_by_id(
        &self,
        request: Request<GetUserByIdRequest>,
    ) -> Result<Response<UserRecord>, Status> {
        let req = request.into_inner();
        let id = parse_uuid(&req.id)?;
        found(self.service.find_by_id(id).await)
    }

    async fn find_oauth_user(
        &self,
        request: Request<FindOauthUserRequest>,
    ) -> Result<Response<UserRecord>, Status> {
        let req = request.into_inner();
        found(
            self.service
                .find_by_provider(&req.provider, &req.provider_id)
                .await,
        )
    }

    async fn update_user(
        &self,
        request: Request<UpdateUserRequest>,
    ) -> Result<Response<UserRecord>, Status> {
        let req = request.into_inner();
        let id = parse_uuid(&req.id)?;
        let changes = UpdateUser {
            email: req.email,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
            photo: req.photo,
            access_token: req.access_token,
        };

        found(self.service.update_user(id, changes).await)
    }
}

/// Map an optional lookup onto the wire; absence is `NOT_FOUND`.
fn found(result: AppResult<Option<User>>) -> Result<Response<UserRecord>, Status> {
    match result.map_err(Status::from)? {
        Some(user) => Ok(Response::new(record_to_proto(&user))),
        None => Err(Status::not_found("User not found")),
    }
}

/// Parse UUID from string.
fn parse_uuid(s: &str) -> Result<Uuid, Status> {
    Uuid::parse_str(s).map_err(|_| Status::invalid_argument("Invalid UUID format"))
}

/// Convert domain User to the internal proto record (includes password hash).
fn record_to_proto(user: &User) -> UserRecord {
    UserRecord {
        id: user.id.to_string(),
        email: user.email.clone(),
        password_hash: user.password_hash.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        provider: user.provider.clone(),
        provider_id: user.provider_id.clone(),
        photo: user.photo.clone(),
        access_token: user.access_token.clone(),
        created_at: user.created_at.to_rfc3339(),
        updated_at: user.updated_at.to_rfc3339(),
    }
}
