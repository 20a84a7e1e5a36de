use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub library: LibraryConfig,
    /// OMDb metadata lookup. Without it only already-stored titles can be added.
    #[serde(default)]
    pub omdb: Option<OmdbConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("movieweb.db")
}

/// Library policy configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LibraryConfig {
    /// Reject `add_user` when a user with the same name already exists.
    #[serde(default)]
    pub unique_user_names: bool,
}

/// OMDb lookup configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OmdbConfig {
    /// OMDb API key
    pub api_key: String,
    /// API endpoint (default: http://www.omdbapi.com/)
    #[serde(default = "default_omdb_url")]
    pub base_url: String,
    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_omdb_url() -> String {
    "http://www.omdbapi.com/".to_string()
}

fn default_timeout() -> u32 {
    10
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub library: LibraryConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub omdb: Option<SanitizedOmdbConfig>,
}

/// Sanitized OMDb config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedOmdbConfig {
    pub base_url: String,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            database: config.database.clone(),
            library: config.library.clone(),
            omdb: config.omdb.as_ref().map(|o| SanitizedOmdbConfig {
                base_url: o.base_url.clone(),
                api_key_configured: !o.api_key.is_empty(),
                timeout_secs: o.timeout_secs,
            }),
        }
    }
}
