//! Gateway settings and validation.
//!
//! Pure configuration types. Loading from disk is the binary's job; this
//! module only knows about defaults, validation and environment overrides.

use serde::{Deserialize, Serialize};

/// Default timeout for a health probe, in milliseconds.
pub const DEFAULT_HEALTH_TIMEOUT_MS: u64 = 5_000;

/// Default timeout for a remote tool call, in milliseconds.
pub const DEFAULT_CALL_TIMEOUT_MS: u64 = 30_000;

/// Default name advertised in the `initialize` handshake.
pub const DEFAULT_SERVER_NAME: &str = "toolhub";

/// Default version advertised in the `initialize` handshake.
pub const DEFAULT_SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default MCP protocol revision advertised in the `initialize` handshake.
pub const DEFAULT_MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// Gateway settings.
///
/// All fields are optional to support partial configuration files.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GatewaySettings {
    /// Timeout for each health probe request.
    pub health_timeout_ms: Option<u64>,

    /// Timeout for each remote tool call request.
    pub call_timeout_ms: Option<u64>,

    /// Name reported to protocol clients.
    pub server_name: Option<String>,

    /// Version reported to protocol clients.
    pub server_version: Option<String>,

    /// MCP protocol revision reported to protocol clients.
    pub protocol_version: Option<String>,
}

impl GatewaySettings {
    /// Create settings with every default filled in.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            health_timeout_ms: Some(DEFAULT_HEALTH_TIMEOUT_MS),
            call_timeout_ms: Some(DEFAULT_CALL_TIMEOUT_MS),
            server_name: Some(DEFAULT_SERVER_NAME.to_string()),
            server_version: Some(DEFAULT_SERVER_VERSION.to_string()),
            protocol_version: Some(DEFAULT_MCP_PROTOCOL_VERSION.to_string()),
        }
    }

    #[must_use]
    pub const fn effective_health_timeout_ms(&self) -> u64 {
        match self.health_timeout_ms {
            Some(ms) => ms,
            None => DEFAULT_HEALTH_TIMEOUT_MS,
        }
    }

    #[must_use]
    pub const fn effective_call_timeout_ms(&self) -> u64 {
        match self.call_timeout_ms {
            Some(ms) => ms,
            None => DEFAULT_CALL_TIMEOUT_MS,
        }
    }

    #[must_use]
    pub fn effective_server_name(&self) -> &str {
        self.server_name.as_deref().unwrap_or(DEFAULT_SERVER_NAME)
    }

    #[must_use]
    pub fn effective_server_version(&self) -> &str {
        self.server_version
            .as_deref()
            .unwrap_or(DEFAULT_SERVER_VERSION)
    }

    #[must_use]
    pub fn effective_protocol_version(&self) -> &str {
        self.protocol_version
            .as_deref()
            .unwrap_or(DEFAULT_MCP_PROTOCOL_VERSION)
    }

    /// Overlay every field that is set in `other`.
    pub fn merge(&mut self, other: &Self) {
        if other.health_timeout_ms.is_some() {
            self.health_timeout_ms = other.health_timeout_ms;
        }
        if other.call_timeout_ms.is_some() {
            self.call_timeout_ms = other.call_timeout_ms;
        }
        if other.server_name.is_some() {
            self.server_name.clone_from(&other.server_name);
        }
        if other.server_version.is_some() {
            self.server_version.clone_from(&other.server_version);
        }
        if other.protocol_version.is_some() {
            self.protocol_version.clone_from(&other.protocol_version);
        }
    }

    /// Apply `TOOLHUB_*` overrides read through `lookup`.
    ///
    /// Recognized variables: `TOOLHUB_HEALTH_TIMEOUT_MS`,
    /// `TOOLHUB_CALL_TIMEOUT_MS`, `TOOLHUB_SERVER_NAME`,
    /// `TOOLHUB_SERVER_VERSION`, `TOOLHUB_PROTOCOL_VERSION`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("TOOLHUB_HEALTH_TIMEOUT_MS") {
            self.health_timeout_ms = Some(parse_ms("TOOLHUB_HEALTH_TIMEOUT_MS", &raw)?);
        }
        if let Some(raw) = lookup("TOOLHUB_CALL_TIMEOUT_MS") {
            self.call_timeout_ms = Some(parse_ms("TOOLHUB_CALL_TIMEOUT_MS", &raw)?);
        }
        if let Some(name) = lookup("TOOLHUB_SERVER_NAME") {
            self.server_name = Some(name);
        }
        if let Some(version) = lookup("TOOLHUB_SERVER_VERSION") {
            self.server_version = Some(version);
        }
        if let Some(version) = lookup("TOOLHUB_PROTOCOL_VERSION") {
            self.protocol_version = Some(version);
        }
        Ok(())
    }
}

fn parse_ms(variable: &str, raw: &str) -> Result<u64, SettingsError> {
    raw.trim()
        .parse()
        .map_err(|_| SettingsError::InvalidEnvValue {
            variable: variable.to_string(),
            value: raw.to_string(),
        })
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("{field} cannot be empty")]
    EmptyValue { field: &'static str },

    #[error("Invalid value for {variable}: '{value}'")]
    InvalidEnvValue { variable: String, value: String },
}

/// Validate settings values.
pub fn validate_settings(settings: &GatewaySettings) -> Result<(), SettingsError> {
    if settings.health_timeout_ms == Some(0) {
        return Err(SettingsError::ZeroTimeout {
            field: "health_timeout_ms",
        });
    }
    if settings.call_timeout_ms == Some(0) {
        return Err(SettingsError::ZeroTimeout {
            field: "call_timeout_ms",
        });
    }

    let text_fields = [
        ("server_name", &settings.server_name),
        ("server_version", &settings.server_version),
        ("protocol_version", &settings.protocol_version),
    ];
    for (field, value) in text_fields {
        if value.as_ref().is_some_and(|v| v.trim().is_empty()) {
            return Err(SettingsError::EmptyValue { field });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_settings() {
        let settings = GatewaySettings::with_defaults();
        assert_eq!(settings.health_timeout_ms, Some(5_000));
        assert_eq!(settings.call_timeout_ms, Some(30_000));
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_effective_values_fall_back() {
        let settings = GatewaySettings::default();
        assert_eq!(settings.effective_health_timeout_ms(), DEFAULT_HEALTH_TIMEOUT_MS);
        assert_eq!(settings.effective_call_timeout_ms(), DEFAULT_CALL_TIMEOUT_MS);
        assert_eq!(settings.effective_server_name(), "toolhub");
        assert_eq!(settings.effective_protocol_version(), "2024-11-05");
    }

    #[test]
    fn test_validate_zero_timeout() {
        let settings = GatewaySettings {
            call_timeout_ms: Some(0),
            ..GatewaySettings::default()
        };
        assert_eq!(
            validate_settings(&settings),
            Err(SettingsError::ZeroTimeout {
                field: "call_timeout_ms"
            })
        );
    }

    #[test]
    fn test_validate_empty_name() {
        let settings = GatewaySettings {
            server_name: Some("  ".to_string()),
            ..GatewaySettings::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::EmptyValue { field: "server_name" })
        ));
    }

    #[test]
    fn test_merge_only_set_fields() {
        let mut base = GatewaySettings::with_defaults();
        let overlay = GatewaySettings {
            call_timeout_ms: Some(1_000),
            ..GatewaySettings::default()
        };
        base.merge(&overlay);
        assert_eq!(base.call_timeout_ms, Some(1_000));
        assert_eq!(base.health_timeout_ms, Some(5_000));
        assert_eq!(base.server_name.as_deref(), Some("toolhub"));
    }

    #[test]
    fn test_env_overrides() {
        let mut settings = GatewaySettings::with_defaults();
        settings
            .apply_env_overrides(env(&[
                ("TOOLHUB_HEALTH_TIMEOUT_MS", " 250 "),
                ("TOOLHUB_SERVER_NAME", "edge"),
            ]))
            .unwrap();
        assert_eq!(settings.effective_health_timeout_ms(), 250);
        assert_eq!(settings.effective_call_timeout_ms(), 30_000);
        assert_eq!(settings.effective_server_name(), "edge");
    }

    #[test]
    fn test_env_override_rejects_garbage() {
        let mut settings = GatewaySettings::default();
        let err = settings
            .apply_env_overrides(env(&[("TOOLHUB_CALL_TIMEOUT_MS", "soon")]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value for TOOLHUB_CALL_TIMEOUT_MS: 'soon'"
        );
    }

    #[test]
    fn test_partial_json() {
        let settings: GatewaySettings = serde_json::from_str(r#"{"call_timeout_ms": 10}"#).unwrap();
        assert_eq!(settings.call_timeout_ms, Some(10));
        assert_eq!(settings.health_timeout_ms, None);
    }
}
