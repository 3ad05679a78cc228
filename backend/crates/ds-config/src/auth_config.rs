use crate::{
    ConfigError, ConfigErrorResult, ConfigSection, DEFAULT_AUTH_ENABLED, MIN_JWT_SECRET_LENGTH,
};

use serde::Deserialize;

/// Token validation for WebSocket identities.
///
/// With auth disabled the upgrade handler trusts `user_id`/`username`
/// query parameters, which is only acceptable for local development.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub enabled: bool,
    /// HS256 shared secret
    pub jwt_secret: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: DEFAULT_AUTH_ENABLED,
            jwt_secret: None,
        }
    }
}

impl AuthConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if !self.enabled {
            return Ok(());
        }

        match &self.jwt_secret {
            None => Err(ConfigError::invalid(
                ConfigSection::Auth,
                "jwt_secret is required when enabled = true",
            )),
            Some(secret) if secret.len() < MIN_JWT_SECRET_LENGTH => {
                Err(ConfigError::invalid(
                    ConfigSection::Auth,
                    format!(
                        "jwt_secret must be at least {} bytes, got {}",
                        MIN_JWT_SECRET_LENGTH,
                        secret.len()
                    ),
                ))
            }
            Some(_) => Ok(()),
        }
    }
}
