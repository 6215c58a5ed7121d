//! pulp-rs: a fast front-end server for headless WordPress blogs
//!
//! Posts and pages are read from the WordPress REST API and rendered as a
//! homepage (hero slider plus a paginated grid), post pages and an about
//! page. The contact form is proxied to Gravity Forms.

pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod controllers;
pub mod forms;
pub mod helpers;
pub mod server;

#[cfg(test)]
pub(crate) mod testing;

use anyhow::Result;
use std::path::Path;

/// The main application
#[derive(Debug, Clone)]
pub struct Pulp {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Static asset directory
    pub public_dir: std::path::PathBuf,
}

impl Pulp {
    /// Create a new instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No _config.yml in {:?}, using defaults", base_dir);
            config::SiteConfig::default()
        };

        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            public_dir,
        })
    }

    /// Client for the configured content API
    pub fn content_client(&self) -> Result<content::WordPressClient> {
        content::WordPressClient::new(&self.config)
    }

    /// Start the HTTP server
    pub async fn serve(&self, ip: &str, port: u16) -> Result<()> {
        server::start(self, ip, port).await
    }
}
