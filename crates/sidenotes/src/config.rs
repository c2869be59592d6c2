use crate::error::{Result, SidenotesError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

const CONFIG_FILENAME: &str = "config.json";

/// Configuration for sidenotes, stored in `<data dir>/config.json`.
///
/// Every field has a default, so a partial (or missing) file is fine. UI
/// preferences (theme, auto-save window) are not here; they live in the
/// store as [`Settings`](crate::model::Settings).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SidenotesConfig {
    pub cache: CacheConfig,
}

/// Cache router settings: origin, versioned partition names and the route
/// table prefixes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CacheConfig {
    /// The application origin; requests to other origins bypass the router
    pub origin: String,

    /// Prefix shared by every partition this application owns
    pub prefix: String,

    /// Software version baked into partition names
    pub version: String,

    /// Path prefixes served network-first
    pub network_first: Vec<String>,

    /// Path prefixes served cache-first
    pub cache_first: Vec<String>,

    /// Assets that must all be cached for install to succeed
    pub install_manifest: Vec<String>,

    /// Share-target endpoint (POST)
    pub share_path: String,

    /// Maximum entries held per partition
    pub max_entries: u64,

    /// Timeout applied by the HTTP fetcher, in seconds
    pub request_timeout_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:3000".to_string(),
            prefix: "sidenotes".to_string(),
            version: "1.0.0".to_string(),
            network_first: vec!["/api/".to_string()],
            cache_first: vec![
                "/static/".to_string(),
                "/images/".to_string(),
                "/fonts/".to_string(),
            ],
            install_manifest: vec![
                "/".to_string(),
                "/static/js/bundle.js".to_string(),
                "/static/css/main.css".to_string(),
                "/manifest.json".to_string(),
                "/favicon.ico".to_string(),
            ],
            share_path: "/share".to_string(),
            max_entries: 10_000,
            request_timeout_secs: 30,
        }
    }
}

impl CacheConfig {
    pub fn static_partition(&self) -> String {
        format!("{}-static-v{}", self.prefix, self.version)
    }

    pub fn dynamic_partition(&self) -> String {
        format!("{}-dynamic-v{}", self.prefix, self.version)
    }

    pub fn origin_url(&self) -> Result<Url> {
        Url::parse(&self.origin)
            .map_err(|e| SidenotesError::Config(format!("invalid origin '{}': {}", self.origin, e)))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Reject values that would make the router unusable.
    pub fn validate(&self) -> Result<()> {
        self.origin_url()?;
        if self.request_timeout_secs == 0 {
            return Err(SidenotesError::Config(
                "request_timeout_secs must be at least 1".into(),
            ));
        }
        if self.max_entries == 0 {
            return Err(SidenotesError::Config("max_entries must be at least 1".into()));
        }
        Ok(())
    }
}

impl SidenotesConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(SidenotesError::Io)?;
        let config: SidenotesConfig = serde_json::from_str(&content)
            .map_err(|e| SidenotesError::Config(format!("{}: {}", config_path.display(), e)))?;
        config
            .cache
            .validate()
            .map_err(|e| SidenotesError::Config(format!("{}: {}", config_path.display(), e)))?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        self.cache.validate()?;

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(SidenotesError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content).map_err(SidenotesError::Io)?;
        Ok(())
    }
}
