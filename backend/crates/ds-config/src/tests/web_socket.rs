use crate::{Config, ConfigError, ConfigSection};
use crate::tests::{EnvGuard, setup_config_dir};

use googletest::assert_that;
use googletest::prelude::{anything, eq, err, ok, some};
use serial_test::serial;

// =========================================================================
// Validation Tests - WebSocket
// =========================================================================

#[test]
#[serial]
fn given_timeout_less_than_interval_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let _interval = EnvGuard::set("DS_WS_HEARTBEAT_INTERVAL_SECS", "60");
    let _timeout = EnvGuard::set("DS_WS_HEARTBEAT_TIMEOUT_SECS", "30");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert!(matches!(
        result,
        Err(ConfigError::Invalid {
            section: ConfigSection::WebSocket,
            ..
        })
    ));
}

#[test]
#[serial]
fn given_zero_send_buffer_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let _buffer = EnvGuard::set("DS_WS_SEND_BUFFER_SIZE", "0");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_send_buffer_at_max_when_validate_then_ok() {
    // Given
    let _temp = setup_config_dir();
    let _buffer = EnvGuard::set("DS_WS_SEND_BUFFER_SIZE", "10000");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, ok(anything()));
}

#[test]
#[serial]
fn given_timeout_above_max_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let _timeout = EnvGuard::set("DS_WS_HEARTBEAT_TIMEOUT_SECS", "601");

    // When
    let config = Config::load().unwrap();
    let error = config.validate().unwrap_err();

    // Then
    assert_that!(error.section(), some(eq(ConfigSection::WebSocket)));
    assert!(
        error
            .to_string()
            .starts_with("[websocket] websocket.heartbeat_timeout_secs must be 10-600, got 601")
    );
}
