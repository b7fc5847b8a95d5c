// tests/common/mod.rs
// Shared fixtures and mock collaborators for the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use baking_gallery::config::init_memory_pool;
use baking_gallery::errors::GalleryError;
use baking_gallery::models::{ImageResource, PhotoRecord, PhotoUrls, PhotoUser, SearchRequest};
use baking_gallery::services::{
    DetailServices, FavoritesStore, ImageDescriber, ImageFetcher, ImageLoader, PhotoSearch,
};
use sqlx::SqlitePool;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

pub fn photo(id: &str) -> PhotoRecord {
    PhotoRecord {
        id: id.to_string(),
        width: 1080,
        height: 720,
        description: Some(format!("Pastry {}", id)),
        alt_description: None,
        urls: PhotoUrls {
            raw: format!("https://images.example/{}/raw", id),
            full: format!("https://images.example/{}/full", id),
            regular: format!("https://images.example/{}/regular", id),
            small: format!("https://images.example/{}/small", id),
            thumb: format!("https://images.example/{}/thumb", id),
        },
        user: PhotoUser {
            first_name: Some("Jane".to_string()),
            last_name: None,
            username: "jane".to_string(),
        },
    }
}

pub fn ids(photos: &[PhotoRecord]) -> Vec<&str> {
    photos.iter().map(|p| p.id.as_str()).collect()
}

pub async fn store() -> (Arc<FavoritesStore>, SqlitePool) {
    let pool = init_memory_pool().await.unwrap();
    let store = FavoritesStore::open(pool.clone()).await.unwrap();
    (Arc::new(store), pool)
}

/// Wait (bounded) until the receiver's value satisfies `predicate`
pub async fn wait_for<T: Clone>(
    rx: &mut watch::Receiver<T>,
    predicate: impl FnMut(&T) -> bool,
) -> T {
    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(predicate))
        .await
        .expect("timed out waiting for state")
        .expect("state holder dropped")
        .clone()
}

/// One scripted search answer
pub struct ScriptedSearch {
    pub delay: Duration,
    pub result: Result<Vec<PhotoRecord>, GalleryError>,
}

/// Search mock answering calls in order, recording each request
#[derive(Default)]
pub struct MockSearch {
    script: Mutex<VecDeque<ScriptedSearch>>,
    pub requests: Mutex<Vec<SearchRequest>>,
}

impl MockSearch {
    pub fn returning(result: Result<Vec<PhotoRecord>, GalleryError>) -> Arc<Self> {
        let mock = MockSearch::default();
        mock.push(Duration::ZERO, result);
        Arc::new(mock)
    }

    pub fn push(&self, delay: Duration, result: Result<Vec<PhotoRecord>, GalleryError>) {
        self.script
            .lock()
            .unwrap()
            .push_back(ScriptedSearch { delay, result });
    }
}

#[async_trait]
impl PhotoSearch for MockSearch {
    async fn search_photos(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<PhotoRecord>, GalleryError> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(scripted) => {
                tokio::time::sleep(scripted.delay).await;
                scripted.result
            }
            None => Err(GalleryError::ExternalApiError("no scripted answer".to_string())),
        }
    }
}

/// Describer mock with a fixed answer; records prompts
pub struct MockDescriber {
    pub result: Result<Option<String>, GalleryError>,
    pub prompts: Mutex<Vec<String>>,
}

impl MockDescriber {
    pub fn returning(result: Result<Option<String>, GalleryError>) -> Arc<Self> {
        Arc::new(MockDescriber {
            result,
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ImageDescriber for MockDescriber {
    async fn describe(&self, _image: &[u8], prompt: &str) -> Result<Option<String>, GalleryError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.result.clone()
    }
}

/// Fetcher mock with a fixed answer
pub struct MockFetcher {
    pub result: Result<Vec<u8>, GalleryError>,
}

#[async_trait]
impl ImageFetcher for MockFetcher {
    async fn fetch(&self, _url: &str) -> Result<Vec<u8>, GalleryError> {
        self.result.clone()
    }
}

/// Loader mock with a fixed answer
pub struct MockLoader {
    pub result: Result<Vec<u8>, GalleryError>,
}

#[async_trait]
impl ImageLoader for MockLoader {
    async fn load(&self, _resource: &ImageResource) -> Result<Vec<u8>, GalleryError> {
        self.result.clone()
    }
}

pub fn jpeg() -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]
}

pub fn services(
    describer: Arc<MockDescriber>,
    fetch: Result<Vec<u8>, GalleryError>,
    favorites: Arc<FavoritesStore>,
) -> DetailServices {
    DetailServices {
        describer,
        fetcher: Arc::new(MockFetcher { result: fetch }),
        loader: Arc::new(MockLoader { result: Ok(jpeg()) }),
        favorites,
    }
}
