// src/models/photo.rs

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Fallback caption when a photo carries no text of its own
pub const DEFAULT_DESCRIPTION: &str = "Baked goods image";

/// Remote photo as returned by the image-search API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRecord {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub description: Option<String>,
    pub alt_description: Option<String>,
    pub urls: PhotoUrls,
    pub user: PhotoUser,
}

/// URL variants of one photo, largest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoUrls {
    pub raw: String,
    pub full: String,
    pub regular: String,
    pub small: String,
    pub thumb: String,
}

impl PhotoUrls {
    /// Every variant pointing at the same URL
    pub fn uniform(url: &str) -> Self {
        PhotoUrls {
            raw: url.to_string(),
            full: url.to_string(),
            regular: url.to_string(),
            small: url.to_string(),
            thumb: url.to_string(),
        }
    }
}

/// Attributed photographer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: String,
}

impl PhotoRecord {
    /// Description, then alt text, then the generic caption
    pub fn best_description(&self) -> &str {
        self.description
            .as_deref()
            .or(self.alt_description.as_deref())
            .unwrap_or(DEFAULT_DESCRIPTION)
    }
}

impl PhotoUser {
    /// Display name for attribution
    /// DOCUMENTATION: Without a last name this is the first name (or the
    /// username); otherwise both names joined and trimmed
    pub fn full_name(&self) -> String {
        match self.last_name.as_deref() {
            None | Some("") => self
                .first_name
                .clone()
                .unwrap_or_else(|| self.username.clone()),
            Some(last) => format!("{} {}", self.first_name.as_deref().unwrap_or(""), last)
                .trim()
                .to_string(),
        }
    }
}

/// Response body of `GET /search/photos`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub total: u64,
    pub total_pages: u64,
    pub results: Vec<PhotoRecord>,
}

/// Parameters of one gallery search
/// DOCUMENTATION: Validated before any request leaves the process
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchRequest {
    #[validate(length(min = 1, max = 255))]
    pub query: String,

    /// Unsplash caps a page at 30 results
    #[validate(range(min = 1, max = 30))]
    pub per_page: u32,

    #[validate(custom = "validate_orientation")]
    pub orientation: String,
}

impl Default for SearchRequest {
    fn default() -> Self {
        SearchRequest {
            query: "baking pastries food desserts".to_string(),
            per_page: 10,
            orientation: "landscape".to_string(),
        }
    }
}

fn validate_orientation(orientation: &str) -> Result<(), ValidationError> {
    match orientation {
        "landscape" | "portrait" | "squarish" => Ok(()),
        _ => Err(ValidationError::new("orientation")),
    }
}
