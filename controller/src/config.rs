//! Controller configuration: defaults, then an optional TOML file.
//!
//! Command-line overrides are applied by the binary on top of the loaded
//! value.

use crate::error::ControlError;
use crate::fleet::Template;
use protocol::Address;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the config file when none is given.
pub const CONFIG_ENV: &str = "CLOUD_CONFIG";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Address the control-plane socket binds to (default 127.0.0.1).
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Scheduler tick in milliseconds (default 50).
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Non-loopback hosts allowed past the perimeter check.
    #[serde(default)]
    pub trusted_hosts: Vec<String>,
    #[serde(default)]
    pub templates: Vec<Template>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    protocol::DEFAULT_PORT
}
fn default_tick_ms() -> u64 {
    50
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            tick_ms: default_tick_ms(),
            trusted_hosts: Vec::new(),
            templates: Vec::new(),
        }
    }
}

impl Config {
    /// Loads `path`, or the file named by `CLOUD_CONFIG`, or the defaults
    /// when neither is set. A named file that cannot be read is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ControlError> {
        let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        match resolve_path(path, env_path) {
            Some(path) => Self::load_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_file(path: &Path) -> Result<Self, ControlError> {
        let text = std::fs::read_to_string(path).map_err(|source| ControlError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ControlError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `host:port`, with IPv6 hosts in brackets.
    pub fn bind_addr(&self) -> String {
        Address::new(self.host.clone(), self.port).to_string()
    }
}

fn resolve_path(explicit: Option<&Path>, from_env: Option<PathBuf>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| from_env.filter(|p| !p.as_os_str().is_empty()))
}
