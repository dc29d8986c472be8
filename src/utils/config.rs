use std::env;

use rand::{distr::Alphanumeric, Rng};
use serde::Deserialize;
use tracing::warn;

use crate::auth::token::DEFAULT_TOKEN_TTL_SECS;
use crate::types::{AppError, Result};

/// Server configuration, read once at startup and passed into
/// constructors. Nothing below the binary reads the environment directly.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub admin: Option<AdminConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
}

/// Values for the admin bootstrap. Present only when the environment
/// supplies all of them; a partial set disables bootstrap.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
}

impl Config {
    /// Builds the configuration from the environment, loading `.env` first.
    ///
    /// `JWT_SECRET` has no hard-coded fallback: when it is absent an
    /// ephemeral secret is generated and a warning logged, so every issued
    /// token dies with the process instead of being signed with a default
    /// everyone knows.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                warn!(
                    "JWT_SECRET is not set; using an ephemeral secret, \
                     issued tokens will not survive a restart"
                );
                generate_ephemeral_secret()
            }
        };

        Ok(Config {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .map_err(|e| AppError::InvalidInput(format!("PORT must be a number: {}", e)))?,
            },
            auth: AuthConfig {
                jwt_secret,
                token_ttl_secs: env::var("TOKEN_TTL_SECS")
                    .unwrap_or_else(|_| DEFAULT_TOKEN_TTL_SECS.to_string())
                    .parse()
                    .map_err(|e| {
                        AppError::InvalidInput(format!("TOKEN_TTL_SECS must be a number: {}", e))
                    })?,
            },
            admin: AdminConfig::from_env(),
        })
    }
}

impl AdminConfig {
    /// Reads `ADMIN_USERNAME`, `ADMIN_EMAIL`, `ADMIN_PASSWORD`, and
    /// `ADMIN_FULL_NAME`. Any one missing or empty yields `None`.
    fn from_env() -> Option<Self> {
        let get = |key: &str| env::var(key).ok().filter(|v| !v.is_empty());

        Some(Self {
            username: get("ADMIN_USERNAME")?,
            email: get("ADMIN_EMAIL")?,
            password: get("ADMIN_PASSWORD")?,
            full_name: get("ADMIN_FULL_NAME")?,
        })
    }
}

fn generate_ephemeral_secret() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}
