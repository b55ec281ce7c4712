//! Router tests for the HTTP surface.
//!
//! The auth-service client and the Google provider are replaced with
//! in-process fakes; requests are driven through the full router.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{OAuthProfile, UserResponse, PROVIDER_GOOGLE};
use gateway_lib::clients::{AuthApi, Session, TokenClaims};
use gateway_lib::oauth::OAuthProvider;
use gateway_lib::routes::create_router;
use gateway_lib::state::AppState;

const VALID_TOKEN: &str = "valid-test-token";

// =============================================================================
// Fakes
// =============================================================================

/// Accepts one account, `jane@gmail.com` / `SecurePass123!`.
struct FakeAuth {
    user_id: Uuid,
    registered: Mutex<Vec<String>>,
    oauth_profiles: Mutex<Vec<OAuthProfile>>,
}

impl FakeAuth {
    fn new() -> Self {
        Self {
            user_id: Uuid::new_v4(),
            registered: Mutex::new(Vec::new()),
            oauth_profiles: Mutex::new(Vec::new()),
        }
    }

    fn user(&self, email: &str) -> UserResponse {
        UserResponse {
            id: self.user_id,
            email: email.to_string(),
            first_name: Some("Jane".to_string()),
            last_name: None,
        }
    }
}

#[async_trait]
impl AuthApi for FakeAuth {
    async fn register(
        &self,
        email: String,
        _password: String,
        _first_name: Option<String>,
        _last_name: Option<String>,
    ) -> AppResult<UserResponse> {
        if email.ends_with("@nowhere.test") {
            return Err(AppError::InvalidDomain);
        }
        let mut registered = self.registered.lock().unwrap();
        if registered.contains(&email) {
            return Err(AppError::conflict("User"));
        }
        registered.push(email.clone());
        Ok(self.user(&email))
    }

    async fn login(&self, email: String, password: String) -> AppResult<Session> {
        if email != "jane@gmail.com" || password != "SecurePass123!" {
            return Err(AppError::InvalidCredentials);
        }
        Ok(Session {
            access_token: "issued-token".to_string(),
            expires_in: "1h".to_string(),
            user: self.user(&email),
        })
    }

    async fn oauth_login(&self, profile: OAuthProfile) -> AppResult<Session> {
        let user = self.user(&profile.email);
        self.oauth_profiles.lock().unwrap().push(profile);
        Ok(Session {
            access_token: "oauth-token".to_string(),
            expires_in: "1h".to_string(),
            user,
        })
    }

    async fn verify_token(&self, token: &str) -> AppResult<Option<TokenClaims>> {
        if token != VALID_TOKEN {
            return Ok(None);
        }
        Ok(Some(TokenClaims {
            user_id: self.user_id,
            email: "jane@gmail.com".to_string(),
            issued_at: 1_700_000_000,
            expires_at: 1_700_003_600,
        }))
    }
}

/// Answers every request with ServiceUnavailable.
struct DownAuth;

#[async_trait]
impl AuthApi for DownAuth {
    async fn register(
        &self,
        _email: String,
        _password: String,
        _first_name: Option<String>,
        _last_name: Option<String>,
    ) -> AppResult<UserResponse> {
        Err(AppError::service_unavailable("auth-service"))
    }

    async fn login(&self, _email: String, _password: String) -> AppResult<Session> {
        Err(AppError::service_unavailable("auth-service"))
    }

    async fn oauth_login(&self, _profile: OAuthProfile) -> AppResult<Session> {
        Err(AppError::service_unavailable("auth-service"))
    }

    async fn verify_token(&self, _token: &str) -> AppResult<Option<TokenClaims>> {
        Err(AppError::service_unavailable("auth-service"))
    }
}

/// Accepts the code `good-code`.
struct FakeGoogle;

#[async_trait]
impl OAuthProvider for FakeGoogle {
    fn authorization_url(&self) -> AppResult<String> {
        Ok("https://accounts.google.com/o/oauth2/v2/auth?client_id=test".to_string())
    }

    async fn exchange_code(&self, code: &str) -> AppResult<OAuthProfile> {
        if code != "good-code" {
            return Err(AppError::Unauthorized);
        }
        Ok(OAuthProfile {
            provider: PROVIDER_GOOGLE.to_string(),
            provider_id: "google-sub-1".to_string(),
            email: "jane@gmail.com".to_string(),
            first_name: Some("Jane".to_string()),
            last_name: None,
            photo: None,
            access_token: Some("google-access".to_string()),
        })
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn app(auth: Arc<FakeAuth>, google: bool) -> Router {
    let google = google.then(|| Arc::new(FakeGoogle) as Arc<dyn OAuthProvider>);
    create_router(AppState::new(auth, google))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_reports_ok() {
    let (status, body) = send(app(Arc::new(FakeAuth::new()), false), get("/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn test_register_returns_id_and_email() {
    let auth = Arc::new(FakeAuth::new());
    let (status, body) = send(
        app(auth.clone(), false),
        post_json(
            "/auth/register",
            json!({ "email": "jane@gmail.com", "password": "SecurePass123!", "firstName": "Jane" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["user"]["email"], "jane@gmail.com");
    assert_eq!(body["user"]["id"], auth.user_id.to_string());
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
async fn test_register_rejects_unknown_fields() {
    let auth = Arc::new(FakeAuth::new());
    let (status, body) = send(
        app(auth.clone(), false),
        post_json(
            "/auth/register",
            json!({ "email": "jane@gmail.com", "password": "SecurePass123!", "role": "admin" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(auth.registered.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_register_rejects_bad_email_and_short_password() {
    let auth = Arc::new(FakeAuth::new());

    let (status, body) = send(
        app(auth.clone(), false),
        post_json(
            "/auth/register",
            json!({ "email": "not-an-email", "password": "SecurePass123!" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Invalid email address");

    let (status, _) = send(
        app(auth.clone(), false),
        post_json(
            "/auth/register",
            json!({ "email": "jane@gmail.com", "password": "short" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(auth.registered.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_register_duplicate_is_conflict() {
    let auth = Arc::new(FakeAuth::new());
    let request = || {
        post_json(
            "/auth/register",
            json!({ "email": "jane@gmail.com", "password": "SecurePass123!" }),
        )
    };

    let (status, _) = send(app(auth.clone(), false), request()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(app(auth.clone(), false), request()).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_register_rejected_domain_is_bad_request() {
    let (status, body) = send(
        app(Arc::new(FakeAuth::new()), false),
        post_json(
            "/auth/register",
            json!({ "email": "jane@nowhere.test", "password": "SecurePass123!" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_DOMAIN");
}

#[tokio::test]
async fn test_unavailable_backend_is_503() {
    let router = create_router(AppState::new(Arc::new(DownAuth), None));
    let (status, body) = send(
        router,
        post_json(
            "/auth/register",
            json!({ "email": "jane@gmail.com", "password": "SecurePass123!" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_login_returns_token_and_profile() {
    let (status, body) = send(
        app(Arc::new(FakeAuth::new()), false),
        post_json(
            "/auth/login",
            json!({ "email": "jane@gmail.com", "password": "SecurePass123!" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["accessToken"], "issued-token");
    assert_eq!(body["expiresIn"], "1h");
    assert_eq!(body["email"], "jane@gmail.com");
    assert_eq!(body["firstName"], "Jane");
    assert!(body.get("lastName").is_none());
}

#[tokio::test]
async fn test_login_wrong_password_is_unauthorized() {
    let (status, body) = send(
        app(Arc::new(FakeAuth::new()), false),
        post_json(
            "/auth/login",
            json!({ "email": "jane@gmail.com", "password": "WrongPass123!" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_login_password_length_never_leaks_as_validation() {
    for password in ["short".to_string(), String::new(), "x".repeat(129)] {
        let (status, body) = send(
            app(Arc::new(FakeAuth::new()), false),
            post_json(
                "/auth/login",
                json!({ "email": "jane@gmail.com", "password": password }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
    }
}

#[tokio::test]
async fn test_login_wrong_and_unknown_answer_alike() {
    let wrong = send(
        app(Arc::new(FakeAuth::new()), false),
        post_json(
            "/auth/login",
            json!({ "email": "jane@gmail.com", "password": "short" }),
        ),
    )
    .await;
    let unknown = send(
        app(Arc::new(FakeAuth::new()), false),
        post_json(
            "/auth/login",
            json!({ "email": "nobody@gmail.com", "password": "SecurePass123!" }),
        ),
    )
    .await;

    assert_eq!(wrong, unknown);
}

// =============================================================================
// Protected routes
// =============================================================================

#[tokio::test]
async fn test_me_requires_token() {
    let auth = Arc::new(FakeAuth::new());

    let (status, _) = send(app(auth.clone(), false), get("/auth/me", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(app(auth.clone(), false), get("/auth/me", Some("forged"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_returns_claims() {
    let auth = Arc::new(FakeAuth::new());
    let (status, body) = send(app(auth.clone(), false), get("/auth/me", Some(VALID_TOKEN))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], auth.user_id.to_string());
    assert_eq!(body["email"], "jane@gmail.com");
    assert_eq!(body["iat"], 1_700_000_000);
    assert_eq!(body["exp"], 1_700_003_600);
}

#[tokio::test]
async fn test_logout_with_token() {
    let request = Request::builder()
        .method("POST")
        .uri("/auth/logout")
        .header(header::AUTHORIZATION, format!("Bearer {}", VALID_TOKEN))
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app(Arc::new(FakeAuth::new()), false), request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().starts_with("Logged out"));
}

#[tokio::test]
async fn test_logout_without_token_is_unauthorized() {
    let request = Request::builder()
        .method("POST")
        .uri("/auth/logout")
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(app(Arc::new(FakeAuth::new()), false), request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Google sign-in
// =============================================================================

#[tokio::test]
async fn test_google_unconfigured_is_503() {
    let auth = Arc::new(FakeAuth::new());

    let (status, _) = send(app(auth.clone(), false), get("/auth/google", None)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, _) = send(
        app(auth.clone(), false),
        get("/auth/google/redirect?code=good-code", None),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_google_login_redirects_to_consent() {
    let response = app(Arc::new(FakeAuth::new()), true)
        .oneshot(get("/auth/google", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with("https://accounts.google.com/"));
}

#[tokio::test]
async fn test_google_redirect_signs_in() {
    let auth = Arc::new(FakeAuth::new());
    let (status, body) = send(
        app(auth.clone(), true),
        get("/auth/google/redirect?code=good-code", None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["access_token"], "oauth-token");
    assert_eq!(body["user"]["email"], "jane@gmail.com");

    let profiles = auth.oauth_profiles.lock().unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].provider, PROVIDER_GOOGLE);
    assert_eq!(profiles[0].provider_id, "google-sub-1");
}

#[tokio::test]
async fn test_google_redirect_failures() {
    let auth = Arc::new(FakeAuth::new());

    let (status, _) = send(app(auth.clone(), true), get("/auth/google/redirect", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        app(auth.clone(), true),
        get("/auth/google/redirect?error=access_denied", None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        app(auth.clone(), true),
        get("/auth/google/redirect?code=stolen", None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert!(auth.oauth_profiles.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_openapi_document_lists_auth_paths() {
    let (status, body) = send(
        app(Arc::new(FakeAuth::new()), false),
        get("/api-docs/openapi.json", None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    for path in ["/auth/register", "/auth/login", "/auth/me", "/auth/google/redirect"] {
        assert!(body["paths"].get(path).is_some(), "missing {}", path);
    }
}
