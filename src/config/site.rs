//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    /// Public URL of the site, used for share links
    pub url: String,

    // Content API
    pub api_url: String,
    /// Seconds a successful CMS response stays cached (0 disables caching)
    pub revalidate: u64,
    /// Seconds before an outbound request is abandoned
    pub request_timeout: u64,

    // Home page
    pub per_page: u32,
    #[serde(default)]
    pub slider: SliderConfig,

    // Presentation
    pub placeholder_image: String,
    pub public_dir: String,
    #[serde(default)]
    pub about: AboutConfig,

    // Contact form
    #[serde(default)]
    pub forms: FormsConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Design Pulp".to_string(),
            description: String::new(),
            url: "https://designpulp.net".to_string(),

            api_url: "https://designpulp.net/wp-json/wp/v2".to_string(),
            revalidate: 60,
            request_timeout: 30,

            per_page: 9,
            slider: SliderConfig::default(),

            placeholder_image: crate::helpers::PLACEHOLDER_IMAGE.to_string(),
            public_dir: "public".to_string(),
            about: AboutConfig::default(),

            forms: FormsConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Timeout applied to every outbound HTTP request
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout.max(1))
    }

    /// How long a CMS response may be served from cache
    pub fn revalidate(&self) -> Duration {
        Duration::from_secs(self.revalidate)
    }
}

/// Hero slider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderConfig {
    /// Maximum number of posts shown in the slider
    pub count: usize,
    /// Auto-advance interval in milliseconds
    pub interval: u64,
    /// Transition settle delay in milliseconds
    pub settle: u64,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            count: 5,
            interval: 6000,
            settle: 500,
        }
    }
}

/// Static fallback for the about page when the CMS has none
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AboutConfig {
    pub title: String,
    pub image: String,
    pub body: String,
}

impl Default for AboutConfig {
    fn default() -> Self {
        Self {
            title: "About".to_string(),
            image: String::new(),
            body: "<p>Welcome to <strong>Design Pulp</strong>, a love letter to the art of living well.</p>"
                .to_string(),
        }
    }
}

/// Gravity Forms configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormsConfig {
    /// Base URL of the Gravity Forms REST API (`.../wp-json/gf/v2`)
    pub endpoint: String,
    pub form_id: u32,
    pub default_subject: String,
    #[serde(default)]
    pub fields: FormFieldsConfig,
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://headless.designpulp.net/wp-json/gf/v2".to_string(),
            form_id: 1,
            default_subject: "Contact Form Submission".to_string(),
            fields: FormFieldsConfig::default(),
        }
    }
}

/// Gravity Forms input ids for each contact field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormFieldsConfig {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl Default for FormFieldsConfig {
    fn default() -> Self {
        Self {
            name: "input_1".to_string(),
            email: "input_2".to_string(),
            subject: "input_3".to_string(),
            message: "input_4".to_string(),
        }
    }
}
