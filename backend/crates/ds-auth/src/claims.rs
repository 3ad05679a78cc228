use crate::{AuthError, Result as AuthErrorResult};

use std::panic::Location;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

const MAX_USERNAME_LENGTH: usize = 128;

/// JWT claims issued by the login endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user_id)
    pub sub: String,
    /// Display name shown to collaborators
    #[serde(default)]
    pub username: String,
    /// Expiration timestamp (Unix)
    pub exp: i64,
    /// Issued at timestamp (Unix)
    pub iat: i64,
}

impl Claims {
    /// Validate claims after JWT signature verification
    #[track_caller]
    pub fn validate(&self) -> AuthErrorResult<()> {
        if self.sub.is_empty() {
            return Err(AuthError::InvalidClaim {
                claim: "sub".to_string(),
                message: "sub (user_id) cannot be empty".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self.username.len() > MAX_USERNAME_LENGTH {
            return Err(AuthError::InvalidClaim {
                claim: "username".to_string(),
                message: "username exceeds maximum length".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }

    /// Name to present to other users; falls back to the subject.
    pub fn display_name(&self) -> &str {
        if self.username.is_empty() {
            &self.sub
        } else {
            &self.username
        }
    }
}
