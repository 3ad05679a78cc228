use crate::Config;
use crate::tests::{EnvGuard, setup_config_dir};

use googletest::assert_that;
use googletest::prelude::{anything, err, ok};
use serial_test::serial;

// =========================================================================
// Validation Tests - Auth
// =========================================================================

#[test]
#[serial]
fn given_auth_enabled_without_secret_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let _enabled = EnvGuard::set("DS_AUTH_ENABLED", "true");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_auth_enabled_with_short_secret_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let _enabled = EnvGuard::set("DS_AUTH_ENABLED", "1");
    let _secret = EnvGuard::set("DS_AUTH_JWT_SECRET", "too-short");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_auth_enabled_with_long_secret_when_validate_then_ok() {
    // Given
    let _temp = setup_config_dir();
    let _enabled = EnvGuard::set("DS_AUTH_ENABLED", "true");
    let _secret = EnvGuard::set(
        "DS_AUTH_JWT_SECRET",
        "a-secret-that-is-comfortably-longer-than-32-bytes",
    );

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, ok(anything()));
}

#[test]
#[serial]
fn given_auth_disabled_without_secret_when_validate_then_ok() {
    // Given
    let _temp = setup_config_dir();
    let _enabled = EnvGuard::set("DS_AUTH_ENABLED", "false");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, ok(anything()));
}
