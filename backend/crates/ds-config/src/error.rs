use std::fmt;
use std::panic::Location;
use std::path::PathBuf;
use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error as ThisError;

/// Top-level table of config.toml an error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Server,
    Auth,
    Logging,
    WebSocket,
    Hub,
    /// Process environment, outside any table
    Environment,
}

impl fmt::Display for ConfigSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Server => "server",
            Self::Auth => "auth",
            Self::Logging => "logging",
            Self::WebSocket => "websocket",
            Self::Hub => "hub",
            Self::Environment => "environment",
        };
        f.write_str(name)
    }
}

#[derive(ThisError, Debug)]
pub enum ConfigError {
    #[error("[{section}] {message} {location}")]
    Invalid {
        section: ConfigSection,
        message: String,
        location: ErrorLocation,
    },

    #[error("[{section}] {section}.{field} must be {min}-{max}, got {actual} {location}")]
    OutOfRange {
        section: ConfigSection,
        field: &'static str,
        min: u64,
        max: u64,
        actual: u64,
        location: ErrorLocation,
    },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[track_caller]
    pub fn invalid<S: Into<String>>(section: ConfigSection, message: S) -> Self {
        ConfigError::Invalid {
            section,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// `actual` is outside `min..=max` for `section.field`
    #[track_caller]
    pub fn out_of_range(
        section: ConfigSection,
        field: &'static str,
        min: u64,
        max: u64,
        actual: u64,
    ) -> Self {
        ConfigError::OutOfRange {
            section,
            field,
            min,
            max,
            actual,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Check `actual` against an inclusive range.
    #[track_caller]
    pub fn check_range(
        section: ConfigSection,
        field: &'static str,
        min: u64,
        max: u64,
        actual: u64,
    ) -> ConfigErrorResult<()> {
        if (min..=max).contains(&actual) {
            Ok(())
        } else {
            Err(Self::out_of_range(section, field, min, max, actual))
        }
    }

    /// Section the error belongs to; file errors have none.
    pub fn section(&self) -> Option<ConfigSection> {
        match self {
            ConfigError::Invalid { section, .. } | ConfigError::OutOfRange { section, .. } => {
                Some(*section)
            }
            ConfigError::Io { .. } | ConfigError::Toml { .. } => None,
        }
    }
}

pub type ConfigErrorResult<T> = StdResult<T, ConfigError>;
