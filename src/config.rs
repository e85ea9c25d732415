//! Configuration management for Placetrack
//!
//! Loads settings from TOML file at ~/.placetrack/config.toml, with
//! environment overrides for the values hosting platforms inject.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server port (default: 3000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Server host (default: 0.0.0.0)
    #[serde(default = "default_host")]
    pub host: String,

    /// Origins allowed to call the API from a browser (sent with credentials)
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_port() -> u16 {
    3000
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "https://tracking-team.vercel.app".to_string(),
        "https://tracking-team-website-frontend.vercel.app".to_string(),
        "http://localhost:5173".to_string(),
        "http://localhost:5174".to_string(),
        "http://localhost:4173".to_string(),
    ]
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: default_port(),
            host: default_host(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database file (defaults to ~/.placetrack/placetrack.db)
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
}

fn default_database_path() -> PathBuf {
    dirs::home_dir()
        .map(|p| p.join(".placetrack").join("placetrack.db"))
        .unwrap_or_else(|| PathBuf::from(".placetrack/placetrack.db"))
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: default_database_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let expanded_path = expand_path(path.as_ref());

        if !expanded_path.exists() {
            return Err(CoreError::Config(format!(
                "Configuration file not found: {}",
                expanded_path.display()
            )));
        }

        let content = std::fs::read_to_string(&expanded_path)?;
        let config: Config = toml::from_str(&content)?;

        Ok(config)
    }

    /// Get the default configuration file path
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|p| p.join(".placetrack").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".placetrack/config.toml"))
    }

    /// Get the database path, expanding ~ if present
    pub fn database_path(&self) -> PathBuf {
        expand_path(&self.database.path)
    }

    /// Get the server socket address
    pub fn server_addr(&self) -> SocketAddr {
        use std::net::ToSocketAddrs;

        format!("{}:{}", self.server.host, self.server.port)
            .to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], self.server.port)))
    }

    /// Apply environment variable overrides (`PORT`, `HOST`, `DATABASE_URL`)
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid PORT value: {}", port),
            }
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.path = database_path_from_url(&url);
        }
    }

    /// Create a default configuration file at the given path
    pub fn create_default<P: AsRef<Path>>(path: P) -> Result<()> {
        let content = r#"# Placetrack Configuration

[server]
# Port to listen on (default: 3000, PORT overrides)
port = 3000

# Host to bind to (HOST overrides)
host = "0.0.0.0"

# Browser origins allowed to call the API
allowed_origins = [
    "https://tracking-team.vercel.app",
    "https://tracking-team-website-frontend.vercel.app",
    "http://localhost:5173",
    "http://localhost:5174",
    "http://localhost:4173",
]

[database]
# SQLite database file (DATABASE_URL overrides)
path = "~/.placetrack/placetrack.db"
"#;

        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;

        Ok(())
    }
}

/// Accepts a bare path or a `sqlite://` / `sqlite:` URL
fn database_path_from_url(url: &str) -> PathBuf {
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);
    PathBuf::from(path)
}

/// Expand ~ to home directory in paths
pub fn expand_path(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}
