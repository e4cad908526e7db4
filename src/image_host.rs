//! Product photo uploads to a Cloudinary-style hosted image store.
//!
//! Uploads are signed: every parameter except the file and the API key is
//! sorted by name, joined as `k=v&k=v`, suffixed with the API secret and
//! hashed with SHA-256.

use std::path::Path;
use std::time::Duration;

use reqwest::blocking::multipart::Form;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::config::{ImageHostConfig, DEFAULT_TIMEOUT_SECS};
use crate::error::{Result, ShopError};

const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1/";

/// Resize on upload so stored photos stay at most 800x800.
const UPLOAD_TRANSFORMATION: &str = "c_limit,h_800,w_800";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: Option<String>,
}

/// Compute the request signature for `params`.
pub fn sign(params: &[(&str, String)], secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Derive the stored public id from a delivery URL.
///
/// `https://res.cloudinary.com/demo/image/upload/v17/cable-shop/products/product_1.jpg`
/// yields `cable-shop/products/product_1`.
pub fn public_id_from_url(image_url: &str) -> Option<String> {
    let url = reqwest::Url::parse(image_url).ok()?;
    let path = url.path();
    let (_, after) = path.split_once("/upload/")?;

    let mut segments: Vec<&str> = after.split('/').filter(|s| !s.is_empty()).collect();
    if let Some(first) = segments.first() {
        let is_version = first.len() > 1
            && first.starts_with('v')
            && first[1..].chars().all(|c| c.is_ascii_digit());
        if is_version {
            segments.remove(0);
        }
    }

    let last = segments.pop()?;
    let stem = match last.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => last,
    };
    segments.push(stem);
    Some(segments.join("/"))
}

/// Signed client for the image store.
pub struct ImageHost {
    config: ImageHostConfig,
    api_base: String,
    client: reqwest::blocking::Client,
}

impl ImageHost {
    pub fn new(config: ImageHostConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            config,
            api_base: DEFAULT_API_BASE.to_string(),
            client,
        })
    }

    /// Point the client at a different API root, e.g. a local stand-in.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        let mut base = base.into();
        if !base.ends_with('/') {
            base.push('/');
        }
        self.api_base = base;
        self
    }

    pub fn folder(&self) -> &str {
        &self.config.folder
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}{}/image/{}", self.api_base, self.config.cloud_name, action)
    }

    fn timestamp() -> String {
        chrono::Utc::now().timestamp().to_string()
    }

    /// Upload an image file and return its HTTPS delivery URL.
    pub fn upload<P: AsRef<Path>>(&self, path: P) -> Result<String> {
        let path = path.as_ref();
        let public_id = format!("product_{}", uuid::Uuid::new_v4());
        let params = vec![
            ("folder", self.config.folder.clone()),
            ("overwrite", "false".to_string()),
            ("public_id", public_id.clone()),
            ("timestamp", Self::timestamp()),
            ("transformation", UPLOAD_TRANSFORMATION.to_string()),
        ];
        let signature = sign(&params, &self.config.api_secret);

        let mut form = Form::new()
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (k, v) in params {
            form = form.text(k, v);
        }
        let form = form
            .file("file", path)
            .map_err(|e| ShopError::Upload(format!("Cannot read {}: {}", path.display(), e)))?;

        tracing::debug!(file = %path.display(), public_id = %public_id, "uploading image");
        let resp = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .map_err(|e| ShopError::Upload(format!("Failed to upload image: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "image upload rejected");
            return Err(ShopError::Upload(format!(
                "Failed to upload image ({}): {}",
                status.as_u16(),
                body
            )));
        }

        let parsed: UploadResponse = resp
            .json()
            .map_err(|e| ShopError::Upload(format!("Unexpected upload response: {}", e)))?;
        let url = parsed
            .secure_url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ShopError::Upload("Upload response had no URL".to_string()))?;

        tracing::info!(url = %url, "image uploaded");
        Ok(url)
    }

    /// Remove a previously uploaded image by its delivery URL.
    pub fn delete(&self, image_url: &str) -> Result<()> {
        let public_id = public_id_from_url(image_url).ok_or_else(|| {
            ShopError::InvalidArgument(format!("not a hosted image URL: {}", image_url))
        })?;
        let params = vec![
            ("public_id", public_id.clone()),
            ("timestamp", Self::timestamp()),
        ];
        let signature = sign(&params, &self.config.api_secret);

        let mut form: Vec<(&str, String)> = params;
        form.push(("api_key", self.config.api_key.clone()));
        form.push(("signature", signature));
        form.push(("signature_algorithm", "sha256".to_string()));

        let resp = self
            .client
            .post(self.endpoint("destroy"))
            .form(&form)
            .send()
            .map_err(|e| ShopError::Upload(format!("Failed to delete image: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ShopError::Upload(format!(
                "Failed to delete image ({})",
                status.as_u16()
            )));
        }
        let parsed: DestroyResponse = resp
            .json()
            .map_err(|e| ShopError::Upload(format!("Unexpected delete response: {}", e)))?;
        match parsed.result.as_deref() {
            Some("ok") => {
                tracing::info!(public_id = %public_id, "image deleted");
                Ok(())
            }
            other => Err(ShopError::Upload(format!(
                "Image {} was not deleted: {}",
                public_id,
                other.unwrap_or("no result")
            ))),
        }
    }
}
