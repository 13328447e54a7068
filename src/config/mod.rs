//! Configuration loading and management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Listening address of the HTTP server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_sensitive_roles() -> Vec<String> {
    vec!["staff".to_string()]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Complete configuration of the API server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Absolute prefix for hyperlinks (e.g., "https://api.example.com").
    /// Links are relative when unset.
    #[serde(default)]
    pub public_url: Option<String>,

    /// Roles allowed to see vets' and groomers' contact details
    #[serde(default = "default_sensitive_roles")]
    pub sensitive_roles: Vec<String>,

    /// Answer cross-origin requests with a permissive CORS policy
    #[serde(default)]
    pub cors: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

impl ApiConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path))?;
        Self::from_yaml_str(&content).with_context(|| format!("invalid config file {}", path))
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Configuration used when no file is given
    pub fn default_config() -> Self {
        Self {
            server: ServerConfig::default(),
            public_url: None,
            sensitive_roles: default_sensitive_roles(),
            cors: false,
        }
    }

    /// `host:port` to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Hyperlink prefix without a trailing slash
    pub fn base_url(&self) -> &str {
        self.public_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .unwrap_or("")
    }
}
