use crate::{ClientIdentity, Result as WsErrorResult, WsError};

use ds_auth::{JwtValidator, bearer_token};

use std::collections::HashMap;

use log::{debug, warn};

pub const DOCUMENT_ID_PARAM: &str = "docId";
pub const TOKEN_PARAM: &str = "token";
pub const USER_ID_PARAM: &str = "user_id";
pub const USERNAME_PARAM: &str = "username";

/// Document id from the upgrade query, rejecting a missing or blank one.
pub fn document_id(params: &HashMap<String, String>) -> WsErrorResult<&str> {
    params
        .get(DOCUMENT_ID_PARAM)
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| WsError::invalid_request("Missing document ID"))
}

/// Decide who is connecting.
///
/// With a validator, identities come from the token only and a caller
/// supplied `user_id` is refused. Without one, the query parameters are
/// trusted. A connection with nothing to go on becomes an anonymous guest.
pub fn resolve_identity(
    params: &HashMap<String, String>,
    authorization: Option<&str>,
    validator: Option<&JwtValidator>,
) -> WsErrorResult<ClientIdentity> {
    match validator {
        Some(validator) => resolve_authenticated(params, authorization, validator),
        None => Ok(resolve_unauthenticated(params)),
    }
}

fn resolve_authenticated(
    params: &HashMap<String, String>,
    authorization: Option<&str>,
    validator: &JwtValidator,
) -> WsErrorResult<ClientIdentity> {
    if params.contains_key(USER_ID_PARAM) {
        warn!("Rejecting upgrade that names its own user_id while auth is enabled");
        return Err(WsError::unauthorized(
            "user_id cannot be supplied when authentication is enabled",
        ));
    }

    let token = match authorization {
        Some(header) => Some(bearer_token(header).map_err(|e| {
            warn!("Bad Authorization header: {}", e);
            WsError::unauthorized(e.to_string())
        })?),
        None => params
            .get(TOKEN_PARAM)
            .map(String::as_str)
            .filter(|token| !token.is_empty()),
    };

    let Some(token) = token else {
        debug!("No token presented, connecting as anonymous guest");
        return Ok(ClientIdentity::anonymous());
    };

    let claims = validator.validate(token).map_err(|e| {
        warn!("JWT validation failed: {}", e);
        WsError::unauthorized(e.to_string())
    })?;

    Ok(ClientIdentity::user(&claims.sub, claims.display_name()))
}

fn resolve_unauthenticated(params: &HashMap<String, String>) -> ClientIdentity {
    let user_id = params
        .get(USER_ID_PARAM)
        .map(|id| id.trim())
        .filter(|id| !id.is_empty());

    match user_id {
        Some(user_id) => {
            let username = params
                .get(USERNAME_PARAM)
                .map(|name| name.trim())
                .filter(|name| !name.is_empty())
                .unwrap_or(user_id);
            ClientIdentity::user(user_id, username)
        }
        None => ClientIdentity::anonymous(),
    }
}
