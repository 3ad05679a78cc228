use crate::{Config, ConfigError, ConfigSection};
use crate::tests::{EnvGuard, setup_config_dir};

use googletest::assert_that;
use googletest::prelude::{anything, err};
use serial_test::serial;

// =========================================================================
// Validation Tests - Hub
// =========================================================================

#[test]
#[serial]
fn given_zero_intake_capacity_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let _intake = EnvGuard::set("DS_HUB_INTAKE_CAPACITY", "0");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert!(matches!(
        result,
        Err(ConfigError::OutOfRange {
            section: ConfigSection::Hub,
            field: "intake_capacity",
            actual: 0,
            ..
        })
    ));
}

#[test]
#[serial]
fn given_too_many_join_attempts_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let _attempts = EnvGuard::set("DS_HUB_JOIN_ATTEMPTS", "11");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}
