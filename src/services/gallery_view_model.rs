// src/services/gallery_view_model.rs
// DOCUMENTATION: Gallery screen state machine
// PURPOSE: Reduce photo fetches, favorites pushes and user toggles into HomeState

use crate::models::{HomeState, PhotoRecord, SearchRequest};
use crate::services::{FavoritesStore, PhotoSearch, StateHolder};
use futures::StreamExt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Message used when a failed fetch carries no description
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load photos";

struct GalleryInner {
    state: StateHolder<HomeState>,
    search: Arc<dyn PhotoSearch>,
    favorites: Arc<FavoritesStore>,
    request: SearchRequest,
    /// Bumped by every load; only the newest load may publish its result
    generation: AtomicU64,
    /// Filter flag of the last Success, carried across Loading
    show_favorites_only: AtomicBool,
}

/// Gallery view model
/// DOCUMENTATION: Owns one HomeState holder. Starts in Loading and keeps a
/// standing subscription to the favorites store for its whole lifetime.
/// Async work runs on spawned tasks; the returned handles may be ignored
pub struct GalleryViewModel {
    inner: Arc<GalleryInner>,
    favorites_task: JoinHandle<()>,
}

impl GalleryViewModel {
    /// Create the view model and subscribe to favorites
    /// DOCUMENTATION: Must be called inside a tokio runtime. Does not fetch;
    /// call `load` on activation
    pub fn new(
        search: Arc<dyn PhotoSearch>,
        favorites: Arc<FavoritesStore>,
        request: SearchRequest,
    ) -> Self {
        let inner = Arc::new(GalleryInner {
            state: StateHolder::new(HomeState::Loading),
            search,
            favorites,
            request,
            generation: AtomicU64::new(0),
            show_favorites_only: AtomicBool::new(false),
        });

        let favorites_task = tokio::spawn(collect_favorites(inner.clone()));

        Self {
            inner,
            favorites_task,
        }
    }

    /// Subscribe to state snapshots
    pub fn state(&self) -> watch::Receiver<HomeState> {
        self.inner.state.subscribe()
    }

    /// Current state snapshot
    pub fn current(&self) -> HomeState {
        self.inner.state.get()
    }

    /// Fetch the photo page
    /// DOCUMENTATION: Publishes Loading now, then Success or Error when the
    /// fetch completes. Calling again restarts the cycle; results of older
    /// calls are discarded. The favorites filter of the last Success survives
    /// reloads, including overlapping ones
    pub fn load(&self) -> JoinHandle<()> {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;

        self.inner.state.set(HomeState::Loading);

        log::debug!("Gallery load #{} started", generation);

        let inner = self.inner.clone();
        tokio::spawn(async move {
            let result = inner.search.search_photos(&inner.request).await;

            let published = inner.state.update(|_| {
                if inner.generation.load(Ordering::SeqCst) != generation {
                    return None;
                }
                Some(match &result {
                    Ok(photos) => HomeState::Success {
                        photos: photos.clone(),
                        favorite_photos: inner.favorites.snapshot(),
                        show_favorites_only: inner.show_favorites_only.load(Ordering::SeqCst),
                    },
                    Err(e) => {
                        // A load after Error starts unfiltered
                        inner.show_favorites_only.store(false, Ordering::SeqCst);
                        HomeState::Error {
                            message: e.message_or(LOAD_FAILED_MESSAGE),
                        }
                    }
                })
            });

            match (&result, published) {
                (Ok(photos), true) => {
                    log::info!("Gallery load #{} loaded {} photos", generation, photos.len())
                }
                (Err(e), true) => log::error!("Gallery load #{} failed: {}", generation, e),
                (_, false) => log::debug!("Gallery load #{} result discarded", generation),
            }
        })
    }

    /// Flip the favorites-only filter
    /// DOCUMENTATION: No-op unless the state is Success
    pub fn toggle_favorites_filter(&self) {
        self.inner.state.update(|state| match state {
            HomeState::Success {
                photos,
                favorite_photos,
                show_favorites_only,
            } => {
                self.inner
                    .show_favorites_only
                    .store(!show_favorites_only, Ordering::SeqCst);
                Some(HomeState::Success {
                    photos: photos.clone(),
                    favorite_photos: favorite_photos.clone(),
                    show_favorites_only: !show_favorites_only,
                })
            }
            HomeState::Loading | HomeState::Error { .. } => None,
        });
    }

    /// Toggle favorite membership of `photo`
    /// DOCUMENTATION: The state is not touched here; the new favorites list
    /// arrives later through the store subscription
    pub fn toggle_favorite(&self, photo: PhotoRecord) -> JoinHandle<()> {
        let favorites = self.inner.favorites.clone();
        tokio::spawn(async move {
            if let Err(e) = favorites.toggle(&photo).await {
                log::error!("Failed to toggle favorite {}: {}", photo.id, e);
            }
        })
    }

    /// Whether a photo is currently a favorite (false on lookup failure)
    pub async fn is_photo_favorite(&self, photo_id: &str) -> bool {
        match self.inner.favorites.is_favorite(photo_id).await {
            Ok(is_favorite) => is_favorite,
            Err(e) => {
                log::error!("Favorite lookup for {} failed: {}", photo_id, e);
                false
            }
        }
    }

    /// Tear down: stop the subscription and drop all later writes
    pub fn close(&self) {
        self.inner.state.close();
        self.favorites_task.abort();
    }
}

impl Drop for GalleryViewModel {
    fn drop(&mut self) {
        self.close();
    }
}

/// Mirror every favorites snapshot into a Success state
/// DOCUMENTATION: Snapshots arriving while Loading or Error are dropped
async fn collect_favorites(inner: Arc<GalleryInner>) {
    let mut updates = inner.favorites.observe();

    while let Some(favorites) = updates.next().await {
        if !inner.state.is_live() {
            break;
        }

        let applied = inner.state.update(|state| match state {
            HomeState::Success {
                photos,
                show_favorites_only,
                ..
            } => Some(HomeState::Success {
                photos: photos.clone(),
                favorite_photos: favorites.clone(),
                show_favorites_only: *show_favorites_only,
            }),
            HomeState::Loading | HomeState::Error { .. } => None,
        });

        if !applied {
            log::debug!("Favorites update dropped: gallery not loaded");
        }
    }
}
