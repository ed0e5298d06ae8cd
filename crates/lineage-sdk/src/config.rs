use lineage_registry::RegistrationPolicy;
use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// Configuration for a [`Lineage`](crate::Lineage) runtime.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Memoize cast verdicts per `(real, target)` pair.
    pub cast_cache: bool,
    /// Memoize behavior resolution per real type.
    pub dispatch_cache: bool,
    /// What re-registering an object as a different type does.
    pub registration: RegistrationPolicy,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            cast_cache: true,
            dispatch_cache: true,
            registration: RegistrationPolicy::Strict,
        }
    }
}

impl RuntimeConfig {
    /// Let objects be re-registered as another type, last registration wins.
    pub fn permissive() -> Self {
        Self {
            registration: RegistrationPolicy::Rebind,
            ..Default::default()
        }
    }

    /// Parse a TOML document; missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> SdkResult<Self> {
        toml::from_str(s).map_err(|e| SdkError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> SdkResult<String> {
        toml::to_string(self).map_err(|e| SdkError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RuntimeConfig::default();
        assert!(config.cast_cache);
        assert!(config.dispatch_cache);
        assert_eq!(config.registration, RegistrationPolicy::Strict);
    }

    #[test]
    fn permissive_rebinds() {
        let config = RuntimeConfig::permissive();
        assert_eq!(config.registration, RegistrationPolicy::Rebind);
        assert!(config.cast_cache);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config = RuntimeConfig::from_toml_str("cast_cache = false\n").unwrap();
        assert!(!config.cast_cache);
        assert!(config.dispatch_cache);
        assert_eq!(config.registration, RegistrationPolicy::Strict);

        let config = RuntimeConfig::from_toml_str("registration = \"rebind\"").unwrap();
        assert_eq!(config, RuntimeConfig::permissive());
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(
            RuntimeConfig::from_toml_str("").unwrap(),
            RuntimeConfig::default()
        );
    }

    #[test]
    fn toml_roundtrip() {
        let config = RuntimeConfig {
            cast_cache: false,
            dispatch_cache: true,
            registration: RegistrationPolicy::Rebind,
        };
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("registration = \"rebind\""));
        assert_eq!(RuntimeConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = RuntimeConfig::from_toml_str("registration = \"sometimes\"").unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));

        let err = RuntimeConfig::from_toml_str("cast_cache = ").unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }
}
