#![allow(dead_code)]

use ds_auth::JwtValidator;
use ds_ws::{AppState, ConnectionConfig, HubRegistry, Metrics, ShutdownCoordinator};

use std::sync::Arc;

use axum::{Router, routing::get};
use axum_test::TestServer;
use tokio::time::{Duration, sleep, timeout};

/// Default JWT secret for all tests (HS256 requires at least 32 bytes)
pub const TEST_JWT_SECRET: &[u8] = b"test-secret-key-for-integration-tests-min-32-bytes-long";

/// Configuration for test server instances
#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub jwt_secret: Option<Vec<u8>>,
    pub connection: ConnectionConfig,
    pub intake_capacity: usize,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            connection: ConnectionConfig::default(),
            intake_capacity: 256,
        }
    }
}

impl TestServerConfig {
    /// Create config that validates JWTs
    pub fn with_auth() -> Self {
        Self {
            jwt_secret: Some(TEST_JWT_SECRET.to_vec()),
            ..Default::default()
        }
    }

    /// Create config whose read deadline expires after one idle second
    pub fn with_short_read_deadline() -> Self {
        Self {
            connection: ConnectionConfig {
                heartbeat_interval_secs: 300,
                heartbeat_timeout_secs: 1,
                ..ConnectionConfig::default()
            },
            ..Default::default()
        }
    }
}

/// Test server with access to AppState for testing
pub struct TestServerWithState {
    pub server: TestServer,
    pub app_state: AppState,
}

impl TestServerWithState {
    /// Wait until no hub is registered for `document_id`
    pub async fn wait_for_hub_removed(&self, document_id: &str) {
        timeout(Duration::from_secs(3), async {
            while self
                .app_state
                .hubs
                .document_ids()
                .await
                .iter()
                .any(|id| id == document_id)
            {
                sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("hub was never removed");
    }
}

/// Create a TestServer with default configuration
pub fn create_test_server() -> TestServerWithState {
    create_test_server_with_config(TestServerConfig::default())
}

/// Create a TestServer with custom configuration
pub fn create_test_server_with_config(config: TestServerConfig) -> TestServerWithState {
    let (app, app_state) = create_app(config);
    let server = TestServer::builder()
        .http_transport()
        .build(app)
        .expect("Failed to create test server");

    TestServerWithState { server, app_state }
}

/// Build the Axum Router with AppState
fn create_app(config: TestServerConfig) -> (Router, AppState) {
    let jwt_validator: Option<Arc<JwtValidator>> = config
        .jwt_secret
        .map(|secret| Arc::new(JwtValidator::with_hs256(&secret)));

    let metrics = Metrics::default();
    let hubs = HubRegistry::new(config.intake_capacity, metrics.clone());

    let app_state = AppState {
        jwt_validator,
        hubs,
        metrics,
        shutdown: ShutdownCoordinator::new(),
        config: config.connection,
    };

    let app = Router::new()
        .route("/ws", get(ds_ws::handler))
        .with_state(app_state.clone());

    (app, app_state)
}
