use ds_auth::JwtValidator;
use ds_config::Config;
use ds_ws::{AppState, ConnectionConfig, HubRegistry, Metrics, ShutdownCoordinator};

use std::sync::Arc;

use log::{info, warn};

/// Wire the hub registry, auth and connection settings from validated config.
pub fn build_app_state(config: &Config, shutdown: ShutdownCoordinator) -> AppState {
    let jwt_validator = match (config.auth.enabled, &config.auth.jwt_secret) {
        (true, Some(secret)) => {
            info!("JWT: HS256 authentication enabled");
            Some(Arc::new(JwtValidator::with_hs256(secret.as_bytes())))
        }
        _ => {
            warn!("Authentication DISABLED - identities are taken from query parameters");
            None
        }
    };

    let metrics = Metrics::new();
    let hubs = HubRegistry::new(config.hub.intake_capacity, metrics.clone());

    let connection_config = ConnectionConfig {
        send_buffer_size: config.websocket.send_buffer_size,
        heartbeat_interval_secs: config.websocket.heartbeat_interval_secs,
        heartbeat_timeout_secs: config.websocket.heartbeat_timeout_secs,
        join_attempts: config.hub.join_attempts,
    };

    AppState {
        jwt_validator,
        hubs,
        metrics,
        shutdown,
        config: connection_config,
    }
}
