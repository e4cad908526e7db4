use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use uuid::Uuid;

use crate::error::Result;

pub const DEFAULT_API_BASE: &str = "http://localhost:5000/api/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const PLACEHOLDER_IMAGE_URL: &str = "https://placehold.co/600x400";
pub const DEFAULT_IMAGE_FOLDER: &str = "cable-shop/products";
pub const DEFAULT_BUSINESS_NAME: &str = "CABLE SHOP";
pub const DEFAULT_CURRENCY_PREFIX: &str = "Rs.";

pub mod endpoints {
    use super::Uuid;

    pub const LOGIN: &str = "Auth/Login";
    pub const PRODUCTS: &str = "Product";
    pub const CATEGORIES: &str = "Category";
    pub const ORDERS: &str = "Order";

    pub fn product_with_id(id: Uuid) -> String {
        format!("{}/{}", PRODUCTS, id)
    }

    pub fn category_with_id(id: Uuid) -> String {
        format!("{}/{}", CATEGORIES, id)
    }

    pub fn order_with_id(id: Uuid) -> String {
        format!("{}/{}", ORDERS, id)
    }
}

/// Credentials for the hosted image store used for product photos.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ImageHostConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    #[serde(default = "default_image_folder")]
    pub folder: String,
}

/// Application settings, read from `config.toml` and the environment.
///
/// Every key is optional in the file; missing keys take the defaults above.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShopConfig {
    pub api_base_url: String,
    pub timeout_secs: u64,
    pub report_dir: Option<PathBuf>,
    pub business_name: String,
    pub currency_prefix: String,
    pub image_host: Option<ImageHostConfig>,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            report_dir: None,
            business_name: DEFAULT_BUSINESS_NAME.to_string(),
            currency_prefix: DEFAULT_CURRENCY_PREFIX.to_string(),
            image_host: None,
        }
    }
}

impl ShopConfig {
    /// Parse a TOML document.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Read and parse a TOML config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load `.env`, then the platform config file if it exists, then apply
    /// `CABLE_SHOP_*` environment overrides.
    pub fn load_default() -> Result<Self> {
        dotenvy::dotenv().ok();
        let path = default_config_path();
        let mut config = if path.exists() {
            tracing::debug!(path = %path.display(), "loading config file");
            Self::load(&path)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides from a key lookup (normally the process environment).
    ///
    /// Image host credentials only take effect when all three are present,
    /// unless the file already configured a host.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("CABLE_SHOP_API_URL") {
            self.api_base_url = url;
        }
        if let Some(secs) = lookup("CABLE_SHOP_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            self.timeout_secs = secs;
        }
        if let Some(dir) = lookup("CABLE_SHOP_REPORT_DIR") {
            self.report_dir = Some(PathBuf::from(dir));
        }

        let cloud = lookup("CABLE_SHOP_IMAGE_CLOUD");
        let key = lookup("CABLE_SHOP_IMAGE_KEY");
        let secret = lookup("CABLE_SHOP_IMAGE_SECRET");
        match (cloud, key, secret) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => {
                let folder = self
                    .image_host
                    .as_ref()
                    .map(|h| h.folder.clone())
                    .unwrap_or_else(default_image_folder);
                self.image_host = Some(ImageHostConfig {
                    cloud_name,
                    api_key,
                    api_secret,
                    folder,
                });
            }
            (cloud, key, secret) => {
                if let Some(host) = self.image_host.as_mut() {
                    if let Some(v) = cloud {
                        host.cloud_name = v;
                    }
                    if let Some(v) = key {
                        host.api_key = v;
                    }
                    if let Some(v) = secret {
                        host.api_secret = v;
                    }
                }
            }
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Directory rendered reports are written to.
    pub fn report_dir(&self) -> PathBuf {
        self.report_dir.clone().unwrap_or_else(default_report_dir)
    }
}

fn default_image_folder() -> String {
    DEFAULT_IMAGE_FOLDER.to_string()
}

pub fn default_config_path() -> PathBuf {
    if let Some(config) = dirs::config_dir() {
        config.join("cable-shop").join("config.toml")
    } else {
        PathBuf::from(".cable-shop").join("config.toml")
    }
}

pub fn default_report_dir() -> PathBuf {
    std::env::temp_dir().join("cable-shop-reports")
}
