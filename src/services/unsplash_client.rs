// src/services/unsplash_client.rs
// DOCUMENTATION: Unsplash API client
// PURPOSE: Fetch the gallery's photo page from the Unsplash search endpoint

use crate::errors::GalleryError;
use crate::models::{PhotoRecord, SearchRequest, SearchResponse};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use validator::Validate;

/// Image-search collaborator used by the gallery view model
#[async_trait]
pub trait PhotoSearch: Send + Sync {
    /// Run one search and return its results in API order
    async fn search_photos(&self, request: &SearchRequest)
        -> Result<Vec<PhotoRecord>, GalleryError>;
}

/// Unsplash API client
/// DOCUMENTATION: Handles authentication and the search call
pub struct UnsplashClient {
    /// HTTP client for making requests
    client: Client,
    /// Unsplash access key, sent as `client_id`
    api_key: String,
    /// Base URL for the Unsplash API
    base_url: String,
}

/// Error body Unsplash returns on failures
#[derive(Debug, Deserialize)]
struct UnsplashErrorBody {
    #[serde(default)]
    errors: Vec<String>,
}

impl UnsplashClient {
    /// Create new Unsplash API client
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, "https://api.unsplash.com".to_string())
    }

    /// Client against another API root (proxies, test servers)
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Search photos
    /// DOCUMENTATION: Calls `GET /search/photos` and returns the full page
    ///
    /// # Arguments
    /// * `request` - Query, page size (1-30) and orientation
    ///
    /// # Returns
    /// Parsed search response (total, total_pages, results)
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, GalleryError> {
        request.validate()?;

        let url = format!("{}/search/photos", self.base_url);
        let per_page = request.per_page.to_string();
        let params = [
            ("client_id", self.api_key.as_str()),
            ("query", request.query.as_str()),
            ("per_page", per_page.as_str()),
            ("orientation", request.orientation.as_str()),
        ];

        log::debug!(
            "Unsplash search: query={:?}, per_page={}, orientation={}",
            request.query,
            request.per_page,
            request.orientation
        );

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                log::error!("Unsplash API request failed: {}", e);
                GalleryError::ExternalApiError(format!("Request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::map_error_status(status, &body));
        }

        let search: SearchResponse = response.json().await.map_err(|e| {
            log::error!("Failed to parse Unsplash response: {}", e);
            GalleryError::ExternalApiError(format!("Parse error: {}", e))
        })?;

        log::info!(
            "Unsplash search returned {} of {} results",
            search.results.len(),
            search.total
        );

        Ok(search)
    }

    /// Map a non-2xx response to an error
    /// DOCUMENTATION: Unsplash signals an exhausted hourly quota with 403
    /// and the text "Rate Limit Exceeded"; 429 is treated the same
    fn map_error_status(status: StatusCode, body: &str) -> GalleryError {
        let rate_limited = status == StatusCode::TOO_MANY_REQUESTS
            || (status == StatusCode::FORBIDDEN && body.contains("Rate Limit Exceeded"));
        if rate_limited {
            log::error!("Unsplash API quota exceeded");
            return GalleryError::RateLimitExceeded;
        }

        let message = serde_json::from_str::<UnsplashErrorBody>(body)
            .ok()
            .filter(|parsed| !parsed.errors.is_empty())
            .map(|parsed| parsed.errors.join(", "))
            .unwrap_or_else(|| body.trim().to_string());

        log::error!("Unsplash API error {}: {}", status, message);
        GalleryError::ExternalApiError(format!("API error {}: {}", status, message))
    }
}

#[async_trait]
impl PhotoSearch for UnsplashClient {
    async fn search_photos(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<PhotoRecord>, GalleryError> {
        Ok(self.search(request).await?.results)
    }
}
