// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Configuration file support for slim-bridge.
//!
//! Config is loaded from the `[slim-bridge]` section of `slim-rs.toml`.
//! Default search order:
//! 1. Path specified via `--config` CLI argument
//! 2. `./slim-rs.toml`
//! 3. `~/.config/slim-rs/slim-rs.toml`
//! 4. `/etc/slim-rs/slim-rs.toml`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use slim_app::{ConfigError, ConfigFile};
use slim_frame::CachePolicy;

use crate::topic::{subscription_filter, validate_filter};

/// Top-level bridge configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// General settings
    pub general: GeneralConfig,
    /// Where payloads come from
    pub feed: FeedConfig,
    /// Subscribe and publish topics
    pub topics: TopicsConfig,
    /// Buoy position cache
    pub cache: CacheConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: Option<String>,
}

/// Feed access configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Feed type: "stdio" or "tcp"
    #[serde(rename = "type")]
    pub feed_type: Option<String>,
    /// Gateway host (for TCP feed)
    pub host: Option<String>,
    /// Gateway port (for TCP feed)
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicsConfig {
    /// Topic to subscribe to; a trailing `/` subscribes to the whole subtree
    pub subscribe: String,
    /// Topic decoded events are published on
    pub publish: String,
}

impl Default for TopicsConfig {
    fn default() -> Self {
        Self {
            subscribe: "toServer".to_string(),
            publish: "defaultPublishTopic".to_string(),
        }
    }
}

/// What to do with a new buoy once the cache is full.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FullPolicy {
    #[default]
    Reject,
    EvictOldest,
}

impl From<FullPolicy> for CachePolicy {
    fn from(policy: FullPolicy) -> Self {
        match policy {
            FullPolicy::Reject => CachePolicy::Reject,
            FullPolicy::EvictOldest => CachePolicy::EvictOldest,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of buoys whose position is remembered
    pub max_buoys: usize,
    pub full_policy: FullPolicy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_buoys: 1000,
            full_policy: FullPolicy::Reject,
        }
    }
}

impl BridgeConfig {
    pub fn validate(&self) -> Result<(), String> {
        validate_log_level(self.general.log_level.as_deref())?;
        validate_feed(&self.feed)?;

        if self.topics.subscribe.trim().is_empty() {
            return Err("[topics].subscribe must not be empty".to_string());
        }
        validate_filter(&subscription_filter(&self.topics.subscribe))
            .map_err(|e| format!("[topics].subscribe: {}", e))?;
        if self.topics.publish.trim().is_empty() {
            return Err("[topics].publish must not be empty".to_string());
        }
        if self.topics.publish.contains(['+', '#']) {
            return Err("[topics].publish must not contain wildcards".to_string());
        }

        if self.cache.max_buoys == 0 {
            return Err("[cache].max_buoys must be > 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        <Self as ConfigFile>::load_from_file(path)
    }

    /// Load configuration from the default search paths.
    /// Returns default config if no config file is found.
    pub fn load_from_default_paths() -> Result<(Self, Option<PathBuf>), ConfigError> {
        <Self as ConfigFile>::load_from_default_paths()
    }

    /// Generate an example configuration wrapped under the `[slim-bridge]`
    /// section header, suitable for use in a combined `slim-rs.toml` file.
    pub fn example_combined_toml() -> String {
        #[derive(serde::Serialize)]
        struct Wrapper {
            #[serde(rename = "slim-bridge")]
            inner: BridgeConfig,
        }
        let example = BridgeConfig {
            general: GeneralConfig {
                log_level: Some("info".to_string()),
            },
            feed: FeedConfig {
                feed_type: Some("tcp".to_string()),
                host: Some("127.0.0.1".to_string()),
                port: Some(1884),
            },
            topics: TopicsConfig::default(),
            cache: CacheConfig::default(),
        };
        toml::to_string_pretty(&Wrapper { inner: example }).unwrap_or_default()
    }
}

fn validate_log_level(level: Option<&str>) -> Result<(), String> {
    if let Some(level) = level {
        match level {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(format!(
                    "[general].log_level '{}' is invalid (expected one of: trace, debug, info, warn, error)",
                    level
                ))
            }
        }
    }
    Ok(())
}

fn validate_feed(feed: &FeedConfig) -> Result<(), String> {
    match feed.feed_type.as_deref().unwrap_or("stdio") {
        "stdio" => {}
        "tcp" => {
            if feed.host.as_deref().unwrap_or("").trim().is_empty() {
                return Err(
                    "[feed].host must be set for tcp feed ([feed].type='tcp')".to_string(),
                );
            }
            if feed.port.unwrap_or(0) == 0 {
                return Err("[feed].port must be > 0 for tcp feed ([feed].type='tcp')".to_string());
            }
        }
        other => {
            return Err(format!(
                "[feed].type '{}' is invalid (expected 'stdio' or 'tcp')",
                other
            ))
        }
    }
    Ok(())
}

impl ConfigFile for BridgeConfig {
    const SECTION: &'static str = "slim-bridge";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = BridgeConfig::default();
        assert!(config.general.log_level.is_none());
        assert!(config.feed.feed_type.is_none());
        assert_eq!(config.topics.subscribe, "toServer");
        assert_eq!(config.topics.publish, "defaultPublishTopic");
        assert_eq!(config.cache.max_buoys, 1000);
        assert_eq!(config.cache.full_policy, FullPolicy::Reject);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[general]
log_level = "debug"

[feed]
type = "tcp"
host = "gateway.local"
port = 1884

[topics]
subscribe = "slim/"
publish = "slim-decoded"

[cache]
max_buoys = 16
full_policy = "evict_oldest"
"#;

        let config: BridgeConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level.as_deref(), Some("debug"));
        assert_eq!(config.feed.feed_type.as_deref(), Some("tcp"));
        assert_eq!(config.feed.host.as_deref(), Some("gateway.local"));
        assert_eq!(config.feed.port, Some(1884));
        assert_eq!(config.topics.subscribe, "slim/");
        assert_eq!(config.topics.publish, "slim-decoded");
        assert_eq!(config.cache.max_buoys, 16);
        assert_eq!(
            CachePolicy::from(config.cache.full_policy),
            CachePolicy::EvictOldest
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_example_combined_toml_parses() {
        let example = BridgeConfig::example_combined_toml();
        let table: toml::Table = toml::from_str(&example).unwrap();
        let section = table.get("slim-bridge").unwrap();
        let config: BridgeConfig = toml::from_str(&toml::to_string(section).unwrap()).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = BridgeConfig::default();
        config.cache.max_buoys = 0;
        assert!(config.validate().is_err());

        let mut config = BridgeConfig::default();
        config.general.log_level = Some("loud".to_string());
        assert!(config.validate().is_err());

        let mut config = BridgeConfig::default();
        config.feed.feed_type = Some("tcp".to_string());
        assert!(config.validate().is_err());
        config.feed.host = Some("localhost".to_string());
        config.feed.port = Some(1884);
        assert!(config.validate().is_ok());

        let mut config = BridgeConfig::default();
        config.feed.feed_type = Some("mqtt".to_string());
        assert!(config.validate().is_err());

        let mut config = BridgeConfig::default();
        config.topics.subscribe = "slim/#/x".to_string();
        assert!(config.validate().is_err());

        let mut config = BridgeConfig::default();
        config.topics.publish = "out/#".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_policy_is_a_parse_error() {
        let toml_str = "[cache]\nfull_policy = \"lru\"\n";
        assert!(toml::from_str::<BridgeConfig>(toml_str).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[slim-bridge.topics]\nsubscribe = \"buoys/\"\n\n[other]\nkey = 1"
        )
        .unwrap();
        let config = BridgeConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.topics.subscribe, "buoys/");
        assert_eq!(config.topics.publish, "defaultPublishTopic");
    }
}
