//! Notification routing configuration.
//!
//! Routes are declared by operators, one per notification channel, and
//! loaded from YAML. Token validation happens here, at load time: the
//! matching engine treats an unknown token as an ordinary string that never
//! matches, so the loader is the only place a typo'd event or group name
//! can be surfaced. Application and environment tokens are operator-defined
//! identifiers and are never checked.

use std::collections::HashSet;
use std::path::Path;

use convoy_model::EventKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a notification config.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid route {route:?}: {message}")]
    InvalidRoute { route: String, message: String },

    #[error("unknown {dimension} token {token:?} in route {route:?}")]
    UnknownToken {
        route: String,
        dimension: &'static str,
        token: String,
    },
}

/// Routing rule for one notification channel.
///
/// Each of the eight token lists is optional in config. An empty list
/// places no constraint on its axis; it never means "match nothing".
/// Tokens are case-sensitive and duplicates are harmless.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NotificationRoute {
    /// Route identifier, unique within a config.
    pub name: String,
    /// Name of the channel this route feeds.
    pub receiver: String,
    /// Event types to deliver, spelled as action tokens (`TRIGGERED`) or
    /// full type strings (`DEPLOYMENT_TRIGGERED`).
    pub events: Vec<String>,
    /// Event types to drop, same spelling as `events`.
    pub ignore_events: Vec<String>,
    /// Event groups to deliver (`DEPLOYMENT`, `APPLICATION`, `AGENT`).
    pub groups: Vec<String>,
    /// Event groups to drop.
    pub ignore_groups: Vec<String>,
    /// Application identifiers to deliver.
    pub apps: Vec<String>,
    /// Application identifiers to drop.
    pub ignore_apps: Vec<String>,
    /// Environment identifiers to deliver.
    pub envs: Vec<String>,
    /// Environment identifiers to drop.
    pub ignore_envs: Vec<String>,
}

/// Top-level notification configuration: the full route set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub routes: Vec<NotificationRoute>,
}

impl NotificationConfig {
    /// Loads and validates a configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }

    /// Parses and validates a configuration from a YAML string.
    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates route names and event/group tokens.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut names = HashSet::new();
        for route in &self.routes {
            if route.name.is_empty() {
                return Err(ConfigError::InvalidRoute {
                    route: route.receiver.clone(),
                    message: "route name must not be empty".to_string(),
                });
            }
            if route.receiver.is_empty() {
                return Err(ConfigError::InvalidRoute {
                    route: route.name.clone(),
                    message: "receiver must not be empty".to_string(),
                });
            }
            if !names.insert(route.name.as_str()) {
                return Err(ConfigError::InvalidRoute {
                    route: route.name.clone(),
                    message: "duplicate route name".to_string(),
                });
            }

            for token in route.events.iter().chain(&route.ignore_events) {
                if !EventKind::is_known_event_token(token) {
                    return Err(ConfigError::UnknownToken {
                        route: route.name.clone(),
                        dimension: "event",
                        token: token.clone(),
                    });
                }
            }
            for token in route.groups.iter().chain(&route.ignore_groups) {
                if !EventKind::is_known_group(token) {
                    return Err(ConfigError::UnknownToken {
                        route: route.name.clone(),
                        dimension: "group",
                        token: token.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
