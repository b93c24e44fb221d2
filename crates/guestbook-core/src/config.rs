//! Guestbook configuration system.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables. The binary applies its CLI flags last.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{GuestbookError, Result};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuestbookConfig {
    #[serde(default)]
    pub redis: RedisConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub scanner: ScannerConfig,
    #[serde(default)]
    pub twilio: TwilioConfig,
}

impl GuestbookConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Load config from a TOML file, then apply the process environment.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GuestbookError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        let mut config = Self::parse(&content)?;
        config.apply_env();
        Ok(config)
    }

    /// Parse a TOML document. Missing sections fall back to defaults.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| GuestbookError::Config(format!("Failed to parse config: {e}")))
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup. Empty values are ignored.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(master) = get("REDIS_MASTER") {
            self.redis.master = master;
        }
        if let Some(slave) = get("REDIS_SLAVE") {
            self.redis.slave = slave;
        }
        if let Some(sid) = get("TWILIO_ACCOUNT_SID") {
            self.twilio.account_sid = sid;
        }
        if let Some(token) = get("TWILIO_ACCOUNT_TOKEN") {
            self.twilio.auth_token = token;
        }
        if let Some(from) = get("TWILIO_FROM_NUMBER") {
            self.twilio.from_number = from;
        }
        if let Some(port) = get("GUESTBOOK_PORT") {
            match port.parse() {
                Ok(p) => self.gateway.port = p,
                Err(e) => tracing::warn!("Ignoring invalid GUESTBOOK_PORT={port}: {e}"),
            }
        }
        if let Some(dir) = get("GUESTBOOK_PUBLIC_DIR") {
            self.gateway.public_dir = PathBuf::from(dir);
        }
        if let Some(ms) = get("GUESTBOOK_SCAN_INTERVAL_MS") {
            match ms.parse() {
                Ok(v) => self.scanner.interval_ms = v,
                Err(e) => tracing::warn!("Ignoring invalid GUESTBOOK_SCAN_INTERVAL_MS={ms}: {e}"),
            }
        }
    }

    /// Reject values that would make the service unusable.
    pub fn validate(&self) -> Result<()> {
        if self.redis.master.trim().is_empty() || self.redis.slave.trim().is_empty() {
            return Err(GuestbookError::Config("Redis addresses must not be empty".into()));
        }
        if self.scanner.interval_ms == 0 {
            return Err(GuestbookError::Config("scanner.interval_ms must be > 0".into()));
        }
        Ok(())
    }
}

/// Addresses of the primary (read-write) and replica (read-only) store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    #[serde(default = "default_master")]
    pub master: String,
    #[serde(default = "default_slave")]
    pub slave: String,
}

fn default_master() -> String { "redis-master:6379".into() }
fn default_slave() -> String { "redis-slave:6379".into() }

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            master: default_master(),
            slave: default_slave(),
        }
    }
}

impl RedisConfig {
    pub fn master_url(&self) -> String {
        redis_url(&self.master)
    }

    pub fn slave_url(&self) -> String {
        redis_url(&self.slave)
    }
}

/// `host:port` becomes `redis://host:port`; full URLs pass through.
pub fn redis_url(address: &str) -> String {
    let address = address.trim();
    if address.contains("://") {
        address.to_string()
    } else {
        format!("redis://{address}")
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served for paths no API route claims (the guestbook page).
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,
}

fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { 3000 }
fn default_public_dir() -> PathBuf { PathBuf::from("public") }

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_dir: default_public_dir(),
        }
    }
}

/// Outbox scanner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    #[serde(default = "bool_true")]
    pub enabled: bool,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn bool_true() -> bool { true }
fn default_interval_ms() -> u64 { 100 }

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: default_interval_ms(),
        }
    }
}

impl ScannerConfig {
    pub fn interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.interval_ms)
    }
}

/// SMS provider configuration. Empty credentials disable sending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwilioConfig {
    #[serde(default)]
    pub account_sid: String,
    #[serde(default)]
    pub auth_token: String,
    #[serde(default = "default_from_number")]
    pub from_number: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_from_number() -> String { "+14157874263".into() }
fn default_api_base() -> String { "https://api.twilio.com/2010-04-01".into() }
fn default_timeout_secs() -> u64 { 10 }

impl Default for TwilioConfig {
    fn default() -> Self {
        Self {
            account_sid: String::new(),
            auth_token: String::new(),
            from_number: default_from_number(),
            api_base: default_api_base(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl TwilioConfig {
    /// `(account_sid, auth_token)` when both are set.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        if self.account_sid.is_empty() || self.auth_token.is_empty() {
            None
        } else {
            Some((self.account_sid.as_str(), self.auth_token.as_str()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = GuestbookConfig::default();
        assert_eq!(config.redis.master, "redis-master:6379");
        assert_eq!(config.redis.slave, "redis-slave:6379");
        assert_eq!(config.gateway.port, 3000);
        assert_eq!(config.gateway.public_dir, PathBuf::from("public"));
        assert_eq!(config.scanner.interval_ms, 100);
        assert_eq!(config.twilio.from_number, "+14157874263");
        assert!(config.twilio.credentials().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = GuestbookConfig::default();
        config.apply_env_with(lookup(&[
            ("REDIS_MASTER", "10.0.0.1:6380"),
            ("REDIS_SLAVE", "redis://10.0.0.2:6381/0"),
            ("TWILIO_ACCOUNT_SID", "AC123"),
            ("TWILIO_ACCOUNT_TOKEN", "secret"),
            ("GUESTBOOK_PORT", "8080"),
            ("GUESTBOOK_PUBLIC_DIR", "/srv/guestbook"),
        ]));
        assert_eq!(config.redis.master_url(), "redis://10.0.0.1:6380");
        assert_eq!(config.gateway.public_dir, PathBuf::from("/srv/guestbook"));
        assert_eq!(config.redis.slave_url(), "redis://10.0.0.2:6381/0");
        assert_eq!(config.gateway.port, 8080);
        assert_eq!(config.twilio.credentials(), Some(("AC123", "secret")));
    }

    #[test]
    fn test_empty_env_values_are_unset() {
        let mut config = GuestbookConfig::default();
        config.apply_env_with(lookup(&[("REDIS_MASTER", ""), ("TWILIO_ACCOUNT_SID", "  ")]));
        assert_eq!(config.redis.master, "redis-master:6379");
        assert!(config.twilio.account_sid.is_empty());
    }

    #[test]
    fn test_invalid_numeric_env_is_ignored() {
        let mut config = GuestbookConfig::default();
        config.apply_env_with(lookup(&[
            ("GUESTBOOK_PORT", "not-a-port"),
            ("GUESTBOOK_SCAN_INTERVAL_MS", "-5"),
        ]));
        assert_eq!(config.gateway.port, 3000);
        assert_eq!(config.scanner.interval_ms, 100);
    }

    #[test]
    fn test_half_credentials_disable_sending() {
        let mut config = GuestbookConfig::default();
        config.apply_env_with(lookup(&[("TWILIO_ACCOUNT_SID", "AC123")]));
        assert!(config.twilio.credentials().is_none());
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = GuestbookConfig::parse(
            r#"
            [gateway]
            port = 9000
            public_dir = "web"

            [scanner]
            interval_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.gateway.port, 9000);
        assert_eq!(config.gateway.host, "0.0.0.0");
        assert_eq!(config.gateway.public_dir, PathBuf::from("web"));
        assert_eq!(config.scanner.interval_ms, 250);
        assert!(config.scanner.enabled);
        assert_eq!(config.redis.master, "redis-master:6379");
    }

    #[test]
    fn test_parse_rejects_bad_toml() {
        let err = GuestbookConfig::parse("[gateway\nport = 1").unwrap_err();
        assert!(matches!(err, GuestbookError::Config(_)));
    }

    #[test]
    fn test_validate_zero_interval() {
        let mut config = GuestbookConfig::default();
        config.scanner.interval_ms = 0;
        assert!(config.validate().is_err());
    }
}
