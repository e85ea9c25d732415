//! Placetrack - HTTP service for tracking placement companies
//!
//! This crate provides:
//! - SQLite storage for company records
//! - Listing with search, sorting and pagination
//! - Coordinator assignment and Tracked/Invited/Called status flags
//! - Per-coordinator progress statistics
//!
//! # Usage
//!
//! As a library:
//! ```ignore
//! use placetrack::{Config, Core};
//!
//! let config = Config::from_file("~/.placetrack/config.toml")?;
//! let core = Core::new(config)?;
//! core.start_api_server().await?;
//! ```
//!
//! As a standalone server (CLI):
//! ```text
//! placetrack --config ~/.placetrack/config.toml
//! ```

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;

// Re-export main types for convenience
pub use config::Config;
pub use db::Database;
pub use error::{CoreError, Result};

use std::sync::Arc;

/// Core service tying configuration to the database and HTTP API
pub struct Core {
    /// Configuration
    pub config: Config,

    /// Database connection
    pub db: Arc<Database>,
}

impl Core {
    /// Create a new Core instance with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        let db = Database::new(config.database_path())?;
        tracing::info!("Opened database at {}", db.path().display());

        Ok(Core {
            config,
            db: Arc::new(db),
        })
    }

    /// Start the HTTP API server (blocks until shutdown)
    pub async fn start_api_server(&self) -> Result<()> {
        let addr = self.config.server_addr();
        tracing::info!("Starting API server on {}", addr);
        api::serve(addr, self.db.clone(), &self.config).await
    }

    /// Get a reference to the database
    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }
}
