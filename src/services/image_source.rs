// src/services/image_source.rs
// DOCUMENTATION: Image byte sources for the describe flow
// PURPOSE: Download remote photos and read bundled images

use crate::errors::GalleryError;
use crate::models::ImageResource;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Downloads image bytes from a URL
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, GalleryError>;
}

/// Reads image bytes behind a local handle
#[async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load(&self, resource: &ImageResource) -> Result<Vec<u8>, GalleryError>;
}

/// reqwest-backed downloader with bounded connect and read time
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    /// Create a downloader
    /// DOCUMENTATION: reqwest 0.11 has no per-read timeout, so the read
    /// bound is applied to the whole request
    pub fn new(connect_timeout: Duration, read_timeout: Duration) -> Result<Self, GalleryError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(read_timeout)
            .build()
            .map_err(|e| GalleryError::ConfigError(format!("HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, GalleryError> {
        log::debug!("Downloading image: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GalleryError::ImageDownload(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GalleryError::ImageDownload(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_ascii_lowercase());
        if let Some(content_type) = content_type.as_deref() {
            if !content_type.starts_with("image/")
                && !content_type.starts_with("application/octet-stream")
            {
                return Err(GalleryError::ImageDownload(format!(
                    "not an image: {}",
                    content_type
                )));
            }
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GalleryError::ImageDownload(e.to_string()))?;

        if bytes.is_empty() {
            return Err(GalleryError::ImageDownload("empty body".to_string()));
        }
        if detect_image_type(&bytes).is_none() {
            return Err(GalleryError::ImageDownload(
                "body is not a decodable image".to_string(),
            ));
        }

        Ok(bytes.to_vec())
    }
}

/// MIME type of a JPEG, PNG, GIF or WebP payload, from its magic bytes
pub fn detect_image_type(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        Some("image/png")
    } else if bytes.starts_with(b"GIF8") {
        Some("image/gif")
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}

/// Loads bundled images from disk
#[derive(Debug, Default, Clone)]
pub struct FsImageLoader;

#[async_trait]
impl ImageLoader for FsImageLoader {
    async fn load(&self, resource: &ImageResource) -> Result<Vec<u8>, GalleryError> {
        let bytes = tokio::fs::read(resource.path()).await.map_err(|e| {
            log::error!("Failed to read {}: {}", resource.path().display(), e);
            GalleryError::LocalImageLoad(e.to_string())
        })?;

        if bytes.is_empty() {
            return Err(GalleryError::LocalImageLoad(format!(
                "{} is empty",
                resource.path().display()
            )));
        }

        Ok(bytes)
    }
}
