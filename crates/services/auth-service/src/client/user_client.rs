//! gRPC client for user-service.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tonic::transport::Channel;
use tracing::debug;
use uuid::Uuid;

use common::{AppError, AppResult, GrpcClientConfig};
use domain::{CreateUser, UpdateUser, User};
use proto::user::{
    user_service_client::UserServiceClient as ProtoUserServiceClient, CreateUserRequest,
    FindOauthUserRequest, GetUserByEmailRequest, UpdateUserRequest, UserRecord,
};

/// Trait for user operations needed by auth-service.
///
/// Lookups answer `None` when the user service reports `NOT_FOUND`; any
/// transport failure surfaces as `ServiceUnavailable`.
#[async_trait]
pub trait UserServiceClient: Send + Sync {
    /// Find user by email
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find user by OAuth provider identity
    async fn find_oauth_user(&self, provider: &str, provider_id: &str) -> AppResult<Option<User>>;

    /// Create a new user; the password is hashed by the user service
    async fn create(&self, input: CreateUser) -> AppResult<User>;

    /// Apply a partial update
    async fn update(&self, id: Uuid, changes: UpdateUser) -> AppResult<Option<User>>;
}

/// gRPC client wrapper for user-service.
#[derive(Clone)]
pub struct UserClient {
    client: ProtoUserServiceClient<Channel>,
}

impl UserClient {
    /// Build a client whose channel connects on first call.
    pub fn new(config: &GrpcClientConfig) -> AppResult<Self> {
        debug!("Configuring user-service client for {}", config.endpoint);
        let channel = config
            .lazy_channel()
            .map_err(|e| AppError::internal(format!("Invalid user-service URL: {}", e)))?;

        Ok(Self {
            client: ProtoUserServiceClient::new(channel),
        })
    }
}

/// Map `NOT_FOUND` to `None`, keep every other status as an error.
fn optional(result: Result<tonic::Response<UserRecord>, tonic::Status>) -> AppResult<Option<User>> {
    match result {
        Ok(response) => Ok(Some(record_to_user(response.into_inner())?)),
        Err(status) if status.code() == tonic::Code::NotFound => Ok(None),
        Err(status) => Err(AppError::from(status)),
    }
}

#[async_trait]
impl UserServiceClient for UserClient {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let request = tonic::Request::new(GetUserByEmailRequest {
            email: email.to_string(),
        });

        let mut client = self.client.clone();
        optional(client.get_user_by_email(request).await)
    }

    async fn find_oauth_user(&self, provider: &str, provider_id: &str) -> AppResult<Option<User>> {
        let request = tonic::Request::new(FindOauthUserRequest {
            provider: provider.to_string(),
            provider_id: provider_id.to_string(),
        });

        let mut client = self.client.clone();
        optional(client.find_oauth_user(request).await)
    }

    async fn create(&self, input: CreateUser) -> AppResult<User> {
        let request = tonic::Request::new(CreateUserRequest {
            email: input.email,
            password: input.password,
            first_name: input.first_name,
            last_name: input.last_name,
            provider: input.provider,
            provider_id: input.provider_id,
            photo: input.photo,
            access_token: input.access_token,
        });

        let mut client = self.client.clone();
        let response = client.create_user(request).await.map_err(AppError::from)?;
        record_to_user(response.into_inner())
    }

    async fn update(&self, id: Uuid, changes: UpdateUser) -> AppResult<Option<User>> {
        let request = tonic::Request::new(UpdateUserRequest {
            id: id.to_string(),
            email: changes.email,
            password: changes.password,
            first_name: changes.first_name,
            last_name: changes.last_name,
            photo: changes.photo,
            access_token: changes.access_token,
        });

        let mut client = self.client.clone();
        optional(client.update_user(request).await)
    }
}

fn parse_timestamp(value: &str, field: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::service_unavailable(format!("user-service sent invalid {}", field)))
}

/// Convert the proto record to a domain User (includes password hash).
///
/// A record that cannot be decoded counts as a malformed peer response.
fn record_to_user(record: UserRecord) -> AppResult<User> {
    let id = record
        .id
        .parse()
        .map_err(|_| AppError::service_unavailable("user-service sent invalid UUID"))?;

    Ok(User {
        id,
        email: record.email,
        password_hash: record.password_hash,
        first_name: record.first_name,
        last_name: record.last_name,
        provider: record.provider,
        provider_id: record.provider_id,
        photo: record.photo,
        access_token: record.access_token,
        created_at: parse_timestamp(&record.created_at, "created_at")?,
        updated_at: parse_timestamp(&record.updated_at, "updated_at")?,
    })
}
