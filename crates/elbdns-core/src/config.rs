//! Configuration types for the elbdns system
//!
//! All settings are carried by value into the engine and the gateway; there
//! is no process-wide mutable state.

use serde::{Deserialize, Serialize};

/// Label selector marking a service as managed by elbdns
pub const MANAGED_SELECTOR: &str = "dns=route53";

/// Main synchronization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Namespace to watch, `None` for all namespaces
    #[serde(default)]
    pub namespace: Option<String>,

    /// Interval between reconciliation passes (in seconds)
    #[serde(default = "default_sync_interval_secs")]
    pub sync_interval_secs: u64,

    /// Log intended record changes instead of sending them
    #[serde(default)]
    pub dry_run: bool,

    /// Label selector used to discover managed services
    #[serde(default = "default_selector")]
    pub selector: String,

    /// Capacity of the internal event channel
    ///
    /// When full, new engine events are dropped (with a warning log).
    ///
    /// Default: 1000 events
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl SyncConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            namespace: None,
            sync_interval_secs: default_sync_interval_secs(),
            dry_run: false,
            selector: default_selector(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }

    /// Restrict discovery to one namespace; an empty string means all namespaces
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        self.namespace = if namespace.is_empty() { None } else { Some(namespace) };
        self
    }

    pub fn with_sync_interval_secs(mut self, secs: u64) -> Self {
        self.sync_interval_secs = secs;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sync interval as a [`std::time::Duration`]
    pub fn sync_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.sync_interval_secs)
    }

    /// Validate the configuration
    ///
    /// A malformed selector is a startup error here rather than a failure
    /// on every pass later.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.sync_interval_secs == 0 {
            return Err(crate::Error::config("Sync interval must be > 0"));
        }

        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config("Event channel capacity must be > 0"));
        }

        validate_label_selector(&self.selector)?;

        Ok(())
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate an equality/existence based Kubernetes label selector
///
/// Accepted requirements, comma separated: `key=value`, `key==value`,
/// `key!=value`, `key` and `!key`. Set-based requirements are not supported.
pub fn validate_label_selector(selector: &str) -> Result<(), crate::Error> {
    if selector.trim().is_empty() {
        return Err(crate::Error::config("Label selector cannot be empty"));
    }

    for requirement in selector.split(',') {
        let requirement = requirement.trim();
        if requirement.is_empty() {
            return Err(crate::Error::config(format!(
                "Label selector '{}' has an empty requirement",
                selector
            )));
        }

        let (key, value) = if let Some((key, value)) = requirement.split_once("!=") {
            (key, Some(value))
        } else if let Some((key, value)) = requirement.split_once("==") {
            (key, Some(value))
        } else if let Some((key, value)) = requirement.split_once('=') {
            (key, Some(value))
        } else if let Some(key) = requirement.strip_prefix('!') {
            (key, None)
        } else {
            (requirement, None)
        };

        validate_label_key(key.trim(), selector)?;
        if let Some(value) = value {
            validate_label_value(value.trim(), selector)?;
        }
    }

    Ok(())
}

fn validate_label_key(key: &str, selector: &str) -> Result<(), crate::Error> {
    let name = match key.split_once('/') {
        Some((prefix, name)) => {
            if prefix.is_empty() || prefix.len() > 253 {
                return Err(crate::Error::config(format!(
                    "Invalid label key prefix '{}' in selector '{}'",
                    prefix, selector
                )));
            }
            name
        }
        None => key,
    };

    if name.is_empty() || !is_label_token(name) {
        return Err(crate::Error::config(format!(
            "Invalid label key '{}' in selector '{}'",
            key, selector
        )));
    }

    Ok(())
}

fn validate_label_value(value: &str, selector: &str) -> Result<(), crate::Error> {
    // Empty values are legal in Kubernetes
    if !value.is_empty() && !is_label_token(value) {
        return Err(crate::Error::config(format!(
            "Invalid label value '{}' in selector '{}'",
            value, selector
        )));
    }

    Ok(())
}

/// At most 63 chars, alphanumeric at both ends, `-`, `_` and `.` inside
fn is_label_token(token: &str) -> bool {
    token.len() <= 63
        && token.starts_with(|c: char| c.is_ascii_alphanumeric())
        && token.ends_with(|c: char| c.is_ascii_alphanumeric())
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
}

fn default_sync_interval_secs() -> u64 {
    30
}

fn default_selector() -> String {
    MANAGED_SELECTOR.to_string()
}

fn default_event_channel_capacity() -> usize {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.namespace, None);
        assert_eq!(config.sync_interval_secs, 30);
        assert!(!config.dry_run);
        assert_eq!(config.selector, "dns=route53");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_namespace_means_all() {
        assert_eq!(SyncConfig::new().with_namespace("").namespace, None);
        assert_eq!(
            SyncConfig::new().with_namespace("prod").namespace.as_deref(),
            Some("prod")
        );
    }

    #[test]
    fn zero_interval_rejected() {
        let config = SyncConfig::new().with_sync_interval_secs(0);
        assert!(matches!(config.validate(), Err(crate::Error::Config(_))));
    }

    #[test]
    fn zero_event_channel_capacity_rejected() {
        let config = SyncConfig {
            event_channel_capacity: 0,
            ..SyncConfig::default()
        };
        assert!(matches!(config.validate(), Err(crate::Error::Config(_))));
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: SyncConfig = serde_json::from_str(r#"{"dry_run": true}"#).unwrap();
        assert!(config.dry_run);
        assert_eq!(config.sync_interval_secs, 30);
        assert_eq!(config.selector, MANAGED_SELECTOR);
    }

    #[test]
    fn selector_accepts_equality_and_existence() {
        for selector in [
            "dns=route53",
            "dns==route53",
            "dns!=route53",
            "dns",
            "!dns",
            "app.kubernetes.io/managed-by=elbdns,dns=route53",
            "dns=",
        ] {
            assert!(validate_label_selector(selector).is_ok(), "{}", selector);
        }
    }

    #[test]
    fn selector_rejects_malformed() {
        for selector in ["", "dns=route 53", "=route53", "dns=route53,", "-dns=x", "dns in (a,b)"] {
            assert!(validate_label_selector(selector).is_err(), "{}", selector);
        }
    }

    #[test]
    fn malformed_selector_fails_validation() {
        let mut config = SyncConfig::new();
        config.selector = "dns=route 53".to_string();
        assert!(matches!(config.validate(), Err(crate::Error::Config(_))));
    }
}
