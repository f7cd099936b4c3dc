//! HS256 bearer-token verification.
//!
//! Tokens are issued by the external identity provider and signed with the
//! shared `AUTH_SECRET`. This service only verifies them and reads the
//! subject and role. [`generate_access_token`] mints tokens with the same
//! shape for tooling and integration tests.

use castline_core::roles::ROLE_USER;
use castline_core::types::DbId;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Claims read from every bearer token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id. Accepted as a JSON number
    /// or a numeric string.
    #[serde(deserialize_with = "deserialize_sub")]
    pub sub: DbId,
    /// The user's role name (`user`, `admin`, `super_admin`).
    #[serde(default = "default_role")]
    pub role: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    #[serde(default)]
    pub iat: i64,
    #[serde(default)]
    pub jti: Option<String>,
}

fn default_role() -> String {
    ROLE_USER.to_string()
}

fn deserialize_sub<'de, D>(deserializer: D) -> Result<DbId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Subject {
        Number(DbId),
        Text(String),
    }

    match Subject::deserialize(deserializer)? {
        Subject::Number(id) => Ok(id),
        Subject::Text(raw) => raw
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("sub is not a user id: '{raw}'"))),
    }
}

/// Configuration for token verification.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret shared with the identity provider.
    pub secret: String,
}

impl JwtConfig {
    /// Load the shared secret from the environment.
    ///
    /// | Env Var           | Required                        |
    /// |-------------------|---------------------------------|
    /// | `AUTH_SECRET`     | **yes** (or `NEXTAUTH_SECRET`)  |
    /// | `NEXTAUTH_SECRET` | fallback                        |
    ///
    /// # Panics
    ///
    /// Panics if neither variable is set or the value is empty.
    pub fn from_env() -> Self {
        let secret = std::env::var("AUTH_SECRET")
            .or_else(|_| std::env::var("NEXTAUTH_SECRET"))
            .expect("AUTH_SECRET (or NEXTAUTH_SECRET) must be set in the environment");
        assert!(!secret.is_empty(), "AUTH_SECRET must not be empty");
        Self { secret }
    }
}

/// Mint an HS256 token for the given user, valid for `ttl_mins` minutes.
pub fn generate_access_token(
    user_id: DbId,
    role: &str,
    ttl_mins: i64,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        exp: now + ttl_mins * 60,
        iat: now,
        jti: Some(Uuid::new_v4().to_string()),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode a bearer token, returning the embedded [`Claims`].
///
/// Checks the signature and expiry. The role is lowercased so upstream
/// casing differences do not leak into authorization checks.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    let mut claims = token_data.claims;
    claims.role = claims.role.trim().to_lowercase();
    Ok(claims)
}
