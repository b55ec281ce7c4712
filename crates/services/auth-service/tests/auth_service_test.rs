//! Auth service tests against in-memory peers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use auth_service_lib::client::UserServiceClient;
use auth_service_lib::service::{AuthService, Authenticator, TokenIssuer};
use auth_service_lib::validation::{EmailDomainValidator, MxLookup};
use common::{AppError, AppResult, JwtConfig};
use domain::{CreateUser, OAuthProfile, Password, UpdateUser, User};

const SECRET: &str = "integration-secret-at-least-32-characters";

/// Stands in for the user service: unique emails, hashed passwords.
#[derive(Default)]
struct FakeUserService {
    users: Mutex<HashMap<Uuid, User>>,
    unavailable: bool,
}

impl FakeUserService {
    fn down() -> Self {
        Self {
            unavailable: true,
            ..Default::default()
        }
    }

    fn count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    fn check(&self) -> AppResult<()> {
        if self.unavailable {
            return Err(AppError::service_unavailable("user-service"));
        }
        Ok(())
    }
}

#[async_trait]
impl UserServiceClient for FakeUserService {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.check()?;
        let users = self.users.lock().unwrap();
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_oauth_user(&self, provider: &str, provider_id: &str) -> AppResult<Option<User>> {
        self.check()?;
        let users = self.users.lock().unwrap();
        Ok(users
            .values()
            .find(|u| {
                u.provider.as_deref() == Some(provider)
                    && u.provider_id.as_deref() == Some(provider_id)
            })
            .cloned())
    }

    async fn create(&self, input: CreateUser) -> AppResult<User> {
        self.check()?;
        let input = input.validated()?;
        let password_hash = match &input.password {
            Some(plain) => Some(Password::new(plain)?.into_string()),
            None => None,
        };

        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == input.email) {
            return Err(AppError::conflict("User"));
        }

        let user = User {
            id: Uuid::new_v4(),
            email: input.email,
            password_hash,
            first_name: input.first_name,
            last_name: input.last_name,
            provider: input.provider,
            provider_id: input.provider_id,
            photo: input.photo,
            access_token: input.access_token,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: Uuid, changes: UpdateUser) -> AppResult<Option<User>> {
        self.check()?;
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };
        if changes.first_name.is_some() {
            user.first_name = changes.first_name;
        }
        if changes.last_name.is_some() {
            user.last_name = changes.last_name;
        }
        if changes.photo.is_some() {
            user.photo = changes.photo;
        }
        if changes.access_token.is_some() {
            user.access_token = changes.access_token;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }
}

/// Every allowed domain has one mail exchanger.
struct StaticMx;

#[async_trait]
impl MxLookup for StaticMx {
    async fn mx_hosts(&self, domain: &str) -> AppResult<Vec<String>> {
        Ok(vec![format!("mx.{}.", domain)])
    }
}

/// Resolution always fails.
struct BrokenMx;

#[async_trait]
impl MxLookup for BrokenMx {
    async fn mx_hosts(&self, _domain: &str) -> AppResult<Vec<String>> {
        Err(AppError::service_unavailable("NXDOMAIN"))
    }
}

fn authenticator_with(users: Arc<FakeUserService>, mx: Arc<dyn MxLookup>) -> Authenticator {
    Authenticator::new(
        users,
        EmailDomainValidator::new(mx),
        TokenIssuer::new(&JwtConfig::new(SECRET, "1h").unwrap()),
    )
}

fn setup() -> (Authenticator, Arc<FakeUserService>) {
    let users = Arc::new(FakeUserService::default());
    (authenticator_with(users.clone(), Arc::new(StaticMx)), users)
}

fn google_profile(token: &str) -> OAuthProfile {
    OAuthProfile {
        provider: "google".to_string(),
        provider_id: "115550001".to_string(),
        email: "gina@gmail.com".to_string(),
        first_name: Some("Gina".to_string()),
        last_name: Some("Lee".to_string()),
        photo: None,
        access_token: Some(token.to_string()),
    }
}

#[tokio::test]
async fn test_register_then_login() {
    let (auth, _) = setup();

    let user = auth
        .register(
            "a@gmail.com".to_string(),
            "password123".to_string(),
            Some("Ann".to_string()),
            None,
        )
        .await
        .unwrap();
    assert_eq!(user.email, "a@gmail.com");

    let session = auth
        .login("a@gmail.com".to_string(), "password123".to_string())
        .await
        .unwrap();
    assert_eq!(session.expires_in, "1h");
    assert_eq!(session.user.id, user.id);
    assert_eq!(session.user.first_name.as_deref(), Some("Ann"));

    let claims = auth.verify_token(&session.access_token).unwrap();
    assert_eq!(claims.sub, user.id);
    assert_eq!(claims.email, "a@gmail.com");
}

#[tokio::test]
async fn test_login_accepts_differently_cased_email() {
    let (auth, _) = setup();
    auth.register("b@gmail.com".to_string(), "password123".to_string(), None, None)
        .await
        .unwrap();

    assert!(auth
        .login(" B@Gmail.com".to_string(), "password123".to_string())
        .await
        .is_ok());
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let (auth, users) = setup();

    auth.register("a@gmail.com".to_string(), "password123".to_string(), None, None)
        .await
        .unwrap();
    let second = auth
        .register("a@gmail.com".to_string(), "other-password".to_string(), None, None)
        .await;

    assert!(matches!(second, Err(AppError::Conflict(_))));
    assert_eq!(users.count(), 1);
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_fail_alike() {
    let (auth, _) = setup();
    auth.register("a@gmail.com".to_string(), "password123".to_string(), None, None)
        .await
        .unwrap();

    let wrong_password = auth
        .login("a@gmail.com".to_string(), "not-the-password".to_string())
        .await
        .unwrap_err();
    let unknown_email = auth
        .login("nobody@gmail.com".to_string(), "password123".to_string())
        .await
        .unwrap_err();

    assert!(matches!(wrong_password, AppError::InvalidCredentials));
    assert!(matches!(unknown_email, AppError::InvalidCredentials));
    assert_eq!(wrong_password.user_message(), unknown_email.user_message());
}

#[tokio::test]
async fn test_short_wrong_password_is_invalid_credentials() {
    let (auth, _) = setup();
    auth.register("a@gmail.com".to_string(), "password123".to_string(), None, None)
        .await
        .unwrap();

    let err = auth
        .login("a@gmail.com".to_string(), "short".to_string())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidCredentials));
}

#[tokio::test]
async fn test_oauth_only_account_cannot_password_login() {
    let (auth, _) = setup();
    auth.oauth_login(google_profile("ya29.a")).await.unwrap();

    assert!(matches!(
        auth.login("gina@gmail.com".to_string(), "password123".to_string())
            .await,
        Err(AppError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn test_disallowed_domain_is_rejected() {
    let (auth, users) = setup();

    let result = auth
        .register("x@example.com".to_string(), "password123".to_string(), None, None)
        .await;

    assert!(matches!(result, Err(AppError::InvalidDomain)));
    assert_eq!(users.count(), 0);
}

#[tokio::test]
async fn test_unresolvable_domain_is_rejected() {
    let users = Arc::new(FakeUserService::default());
    let auth = authenticator_with(users.clone(), Arc::new(BrokenMx));

    let result = auth
        .register("a@gmail.com".to_string(), "password123".to_string(), None, None)
        .await;

    assert!(matches!(result, Err(AppError::InvalidDomain)));
    assert_eq!(users.count(), 0);
}

#[tokio::test]
async fn test_oauth_twice_keeps_one_record() {
    let (auth, users) = setup();

    let first = auth.oauth_login(google_profile("ya29.first")).await.unwrap();
    let second = auth.oauth_login(google_profile("ya29.second")).await.unwrap();

    assert_eq!(users.count(), 1);
    assert_eq!(first.user.id, second.user.id);
    assert_eq!(second.user.access_token.as_deref(), Some("ya29.second"));
    assert_eq!(
        auth.verify_token(&second.access_token).unwrap().sub,
        first.user.id
    );
}

#[tokio::test]
async fn test_oauth_email_taken_by_password_account_conflicts() {
    let (auth, users) = setup();
    auth.register("gina@gmail.com".to_string(), "password123".to_string(), None, None)
        .await
        .unwrap();

    let result = auth.oauth_login(google_profile("ya29.a")).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_eq!(users.count(), 1);
}

#[tokio::test]
async fn test_user_service_down_is_service_unavailable() {
    let auth = authenticator_with(Arc::new(FakeUserService::down()), Arc::new(StaticMx));

    assert!(matches!(
        auth.login("a@gmail.com".to_string(), "password123".to_string())
            .await,
        Err(AppError::ServiceUnavailable(_))
    ));
    assert!(matches!(
        auth.register("a@gmail.com".to_string(), "password123".to_string(), None, None)
            .await,
        Err(AppError::ServiceUnavailable(_))
    ));
}

#[tokio::test]
async fn test_tampered_token_is_unauthorized() {
    let (auth, _) = setup();
    auth.register("a@gmail.com".to_string(), "password123".to_string(), None, None)
        .await
        .unwrap();
    let session = auth
        .login("a@gmail.com".to_string(), "password123".to_string())
        .await
        .unwrap();

    let mut tampered = session.access_token.clone();
    tampered.push('x');

    assert!(matches!(
        auth.verify_token(&tampered),
        Err(AppError::Unauthorized)
    ));
}
