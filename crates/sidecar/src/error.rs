#![forbid(unsafe_code)]

//! Facade error type.
//!
//! Only construction can fail. Once a [`crate::Tour`] exists, missing
//! targets, stale measurements and out-of-range jumps degrade gracefully and
//! never surface as errors.

use std::fmt;

use sidecar_core::step::RegistryError;
#[cfg(feature = "config")]
use sidecar_core::config::ConfigError;

/// Top-level error type for Sidecar.
#[derive(Debug)]
pub enum Error {
    /// The step script was rejected.
    Registry(RegistryError),
    /// Configuration values out of range.
    InvalidConfig(Vec<String>),
    /// A configuration file could not be loaded.
    #[cfg(feature = "config")]
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registry(err) => write!(f, "{err}"),
            Self::InvalidConfig(errors) => write!(f, "invalid config: {}", errors.join("; ")),
            #[cfg(feature = "config")]
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Registry(err) => Some(err),
            Self::InvalidConfig(_) => None,
            #[cfg(feature = "config")]
            Self::Config(err) => Some(err),
        }
    }
}

impl From<RegistryError> for Error {
    fn from(err: RegistryError) -> Self {
        Self::Registry(err)
    }
}

#[cfg(feature = "config")]
impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Invalid(errors) => Self::InvalidConfig(errors),
            other => Self::Config(other),
        }
    }
}

/// Standard result type for Sidecar APIs.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn registry_errors_convert_and_chain() {
        let err: Error = RegistryError::Empty.into();
        assert!(matches!(err, Error::Registry(RegistryError::Empty)));
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "step registry must contain at least one step");
    }

    #[test]
    fn invalid_config_lists_every_problem() {
        let err = Error::InvalidConfig(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "invalid config: a; b");
        assert!(err.source().is_none());
    }

    #[cfg(feature = "config")]
    #[test]
    fn config_invalid_flattens() {
        let err: Error = ConfigError::Invalid(vec!["x".into()]).into();
        assert!(matches!(err, Error::InvalidConfig(ref v) if v.len() == 1));
    }
}
