// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, database and collaborators, then drive the gallery headlessly

use anyhow::Context;
use baking_gallery::config::{self, Config};
use baking_gallery::models::{DetailPhase, DisplayContext, HomeState, SearchRequest};
use baking_gallery::services::{
    DetailServices, DetailViewModel, FavoritesStore, FsImageLoader, GalleryViewModel,
    GeminiClient, HttpImageFetcher, UnsplashClient,
};
use dotenv::dotenv;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            config.log_level.as_str()
        } else {
            "info,sqlx=warn"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    log::info!("Starting baking gallery...");

    // 4. Open the favorites store
    let pool = config::init_db_pool(&config)
        .await
        .context("failed to open favorites database")?;
    let favorites = Arc::new(FavoritesStore::open(pool).await?);

    // 5. Load the gallery
    let search = Arc::new(UnsplashClient::with_base_url(
        config.unsplash_api_key.clone(),
        config.unsplash_base_url.clone(),
    ));
    let request = SearchRequest {
        query: config.search_query.clone(),
        per_page: config.search_per_page,
        orientation: config.search_orientation.clone(),
    };

    let gallery = GalleryViewModel::new(search, favorites.clone(), request);
    gallery.load().await?;

    let photos = match gallery.current() {
        HomeState::Success { photos, .. } => photos,
        HomeState::Error { message } => {
            log::error!("Gallery failed to load: {}", message);
            return Ok(());
        }
        HomeState::Loading => {
            log::warn!("Gallery still loading after load completed");
            return Ok(());
        }
    };

    for photo in &photos {
        let favorite = gallery.is_photo_favorite(&photo.id).await;
        log::info!(
            "{} {} by {}{}",
            photo.id,
            photo.best_description(),
            photo.user.full_name(),
            if favorite { " [favorite]" } else { "" }
        );
    }

    // 6. Optionally describe the first photo
    let describe_first = std::env::var("DESCRIBE_FIRST").map(|v| v == "1").unwrap_or(false);
    if let (true, Some(first)) = (describe_first, photos.first()) {
        let services = DetailServices {
            describer: Arc::new(GeminiClient::with_base_url(
                config.gemini_api_key.clone(),
                config.gemini_model.clone(),
                config.gemini_base_url.clone(),
            )),
            fetcher: Arc::new(HttpImageFetcher::new(
                config.download_connect_timeout(),
                config.download_read_timeout(),
            )?),
            loader: Arc::new(FsImageLoader),
            favorites,
        };

        let photographer = first.user.full_name();
        let detail = DetailViewModel::new(
            services,
            DisplayContext {
                image_resource: None,
                image_url: Some(first.urls.regular.clone()),
                photographer_name: Some(photographer.clone()),
                photo_id: Some(first.id.clone()),
                alt_description: first.alt_description.clone(),
            },
        );

        detail
            .describe_from_url(first.urls.regular.clone(), photographer, Some(first.id.clone()))
            .await?;

        match detail.current().phase {
            DetailPhase::Success { output_text, is_favorite } => {
                log::info!("Description (favorite: {}): {}", is_favorite, output_text)
            }
            DetailPhase::Error { message } => log::error!("Describe failed: {}", message),
            DetailPhase::Initial | DetailPhase::Loading => {}
        }
    }

    Ok(())
}
