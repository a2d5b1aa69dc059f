use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 7717;
pub const DEFAULT_BIND: &str = "127.0.0.1";
/// Maximum posts a publisher tick will attempt.
pub const DEFAULT_BATCH_SIZE: usize = 50;
/// Cadence of the background publisher loop.
pub const DEFAULT_PUBLISH_INTERVAL_MS: u64 = 15_000;

/// Top-level config (quill.toml + QUILL_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuillConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub platform: PlatformConfig,
    #[serde(default)]
    pub publisher: PublisherConfig,
}

impl Default for QuillConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            database: DatabaseConfig::default(),
            platform: PlatformConfig::default(),
            publisher: PublisherConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Posting platform settings.
///
/// Only the deterministic fake client ships in this iteration; `fake = false`
/// is accepted but logs a warning at startup and still uses the fake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    #[serde(default = "bool_true")]
    pub fake: bool,
    /// Account used when a tool call does not name one.
    #[serde(default = "default_account")]
    pub default_account: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            fake: true,
            default_account: default_account(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherConfig {
    /// Maximum due posts published per tick. Zero falls back to the default.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Milliseconds between publisher ticks.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            interval_ms: DEFAULT_PUBLISH_INTERVAL_MS,
        }
    }
}

fn bool_true() -> bool {
    true
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_account() -> String {
    "demo-account".to_string()
}
fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}
fn default_interval_ms() -> u64 {
    DEFAULT_PUBLISH_INTERVAL_MS
}
fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.quill/quill.db", home)
}

impl QuillConfig {
    /// Load config from a TOML file with QUILL_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.quill/quill.toml
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: QuillConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("QUILL_").split("_"))
            .extract()
            .map_err(|e| crate::error::QuillError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.quill/quill.toml", home)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = QuillConfig::default();
        assert_eq!(cfg.gateway.port, DEFAULT_PORT);
        assert_eq!(cfg.publisher.batch_size, 50);
        assert_eq!(cfg.publisher.interval_ms, 15_000);
        assert!(cfg.platform.fake);
        assert_eq!(cfg.platform.default_account, "demo-account");
    }

    #[test]
    fn partial_toml_fills_missing_sections() {
        let cfg: QuillConfig = serde_json::from_value(serde_json::json!({
            "gateway": { "port": 9000 }
        }))
        .unwrap();
        assert_eq!(cfg.gateway.port, 9000);
        assert_eq!(cfg.gateway.bind, DEFAULT_BIND);
        assert_eq!(cfg.publisher.batch_size, DEFAULT_BATCH_SIZE);
    }
}
