//! JWT issuing and verification (HS256).

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use common::{AppError, AppResult, JwtConfig};
use domain::{TokenLifetime, User};

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// A freshly signed token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    /// Lifetime in the configured notation (e.g. `1h`)
    pub expires_in: String,
}

/// Signs and verifies access tokens with one shared secret.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    lifetime: TokenLifetime,
}

impl TokenIssuer {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            lifetime: config.lifetime.clone(),
        }
    }

    /// Sign a token for `user` valid for the configured lifetime.
    pub fn issue(&self, user: &User) -> AppResult<IssuedToken> {
        let now = Utc::now().timestamp();
        let exp = now
            .checked_add(self.lifetime.seconds())
            .ok_or_else(|| AppError::internal("Token lifetime overflows the expiry timestamp"))?;
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            iat: now,
            exp,
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;

        Ok(IssuedToken {
            access_token,
            expires_in: self.lifetime.as_str().to_string(),
        })
    }

    /// Check signature and expiry. Every failure is `Unauthorized`.
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Token rejected: {}", e);
                AppError::Unauthorized
            })
    }
}
