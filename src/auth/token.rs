use crate::types::{AppError, Claims, Result, SanitizedUser};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

/// Default validity window for issued tokens: 60 minutes.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 60 * 60;

/// Issues and validates HS256-signed claim sets.
///
/// The signing secret is injected once at construction and read-only
/// afterwards; there is no rotation. Signature verification always runs
/// before the expiry check, so a forged token is rejected as invalid even
/// when its claimed expiry is already in the past.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_seconds: i64,
}

impl TokenService {
    /// Creates a token service from a symmetric secret and a TTL in seconds.
    ///
    /// The TTL must be positive, otherwise issued tokens would expire at or
    /// before their own issue instant.
    pub fn new(secret: &str, ttl_seconds: i64) -> Result<Self> {
        if ttl_seconds <= 0 {
            return Err(AppError::Internal(format!(
                "token ttl must be positive, got {}",
                ttl_seconds
            )));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_seconds,
        })
    }

    /// Signs a claim set for the given account, stamping `iat` with the
    /// current instant and `exp` with `iat + ttl`.
    pub fn issue(&self, user: &SanitizedUser) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.user_id.clone(),
            username: user.username.clone(),
            roles: user.roles.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            iat: now.timestamp() as usize,
            exp: (now + Duration::seconds(self.ttl_seconds)).timestamp() as usize,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("failed to sign token: {}", e)))
    }

    /// Verifies a token and returns its claims.
    ///
    /// Failures collapse to two cases: `TokenExpired` when the signature is
    /// good but `exp` has passed, `TokenInvalid` for everything else
    /// (malformed input, wrong algorithm, bad signature).
    pub fn validate(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact; the crate default allows 60s of clock skew.
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::TokenInvalid,
            })
    }
}
