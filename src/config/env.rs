// src/config/env.rs
// DOCUMENTATION: Environment variable management
// PURPOSE: Load and validate configuration from .env files

use dotenv::dotenv;
use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables
/// DOCUMENTATION: Centralizes all configuration in one struct
/// Load with Config::from_env() at application startup
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection string for the favorites store
    /// Format: sqlite://path/to/favorites.db
    pub database_url: String,

    /// Log level: debug, info, warn, error
    pub log_level: String,

    /// Unsplash access key (sent as client_id)
    pub unsplash_api_key: String,

    /// Unsplash API root
    pub unsplash_base_url: String,

    /// Gemini API key
    pub gemini_api_key: String,

    /// Gemini model used for captions
    pub gemini_model: String,

    /// Gemini REST root (versioned)
    pub gemini_base_url: String,

    /// Search terms for the gallery
    pub search_query: String,

    /// Results per gallery page
    pub search_per_page: u32,

    /// Unsplash orientation filter
    pub search_orientation: String,

    /// Image download connect timeout in seconds
    pub download_connect_timeout: u64,

    /// Image download read timeout in seconds
    pub download_read_timeout: u64,

    /// Maximum connections in database pool
    pub db_max_connections: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: "sqlite://favorites.db".to_string(),
            log_level: "info".to_string(),
            unsplash_api_key: String::new(),
            unsplash_base_url: "https://api.unsplash.com".to_string(),
            gemini_api_key: String::new(),
            gemini_model: "gemini-1.5-flash".to_string(),
            gemini_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            search_query: "baking pastries food desserts".to_string(),
            search_per_page: 10,
            search_orientation: "landscape".to_string(),
            download_connect_timeout: 10,
            download_read_timeout: 15,
            db_max_connections: 5,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    /// DOCUMENTATION: Reads from .env or process environment
    /// Called once at application startup
    pub fn from_env() -> Self {
        // Load .env file if it exists
        dotenv().ok();

        let defaults = Config::default();

        Config {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),

            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),

            unsplash_api_key: env::var("UNSPLASH_API_KEY").unwrap_or_default(),

            unsplash_base_url: env::var("UNSPLASH_BASE_URL")
                .unwrap_or(defaults.unsplash_base_url),

            gemini_api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),

            gemini_model: env::var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),

            gemini_base_url: env::var("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),

            search_query: env::var("SEARCH_QUERY").unwrap_or(defaults.search_query),

            search_per_page: parse_or("SEARCH_PER_PAGE", defaults.search_per_page),

            search_orientation: env::var("SEARCH_ORIENTATION")
                .unwrap_or(defaults.search_orientation),

            download_connect_timeout: parse_or(
                "DOWNLOAD_CONNECT_TIMEOUT_SECS",
                defaults.download_connect_timeout,
            ),

            download_read_timeout: parse_or(
                "DOWNLOAD_READ_TIMEOUT_SECS",
                defaults.download_read_timeout,
            ),

            db_max_connections: parse_or("DB_MAX_CONNECTIONS", defaults.db_max_connections),
        }
    }

    /// Validate critical configuration
    /// DOCUMENTATION: Ensures application can start safely. Missing API keys
    /// only warn; the affected calls fail later and surface as Error states
    pub fn validate(&self) -> Result<(), String> {
        if self.database_url.is_empty() {
            return Err("DATABASE_URL is required".to_string());
        }

        if self.unsplash_api_key.is_empty() {
            log::warn!("UNSPLASH_API_KEY not configured - gallery loads will fail");
        }

        if self.gemini_api_key.is_empty() {
            log::warn!("GEMINI_API_KEY not configured - descriptions will fail");
        }

        Ok(())
    }

    pub fn download_connect_timeout(&self) -> Duration {
        Duration::from_secs(self.download_connect_timeout)
    }

    pub fn download_read_timeout(&self) -> Duration {
        Duration::from_secs(self.download_read_timeout)
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
