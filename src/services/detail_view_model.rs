// src/services/detail_view_model.rs
// DOCUMENTATION: Detail screen state machine
// PURPOSE: Drive one photo's describe request and favorite toggle into DetailState

use crate::errors::GalleryError;
use crate::models::{
    DetailPhase, DetailState, DisplayContext, ImageResource, PhotoRecord, PhotoUrls, PhotoUser,
};
use crate::services::{FavoritesStore, ImageDescriber, ImageFetcher, ImageLoader, StateHolder};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Prompt sent with every image
pub const CAPTION_PROMPT: &str = "Describe this baked good or dessert in detail. What is it called? What ingredients might be in it? What flavors would it have?";

/// Message used when a failed describe call carries no description
pub const DESCRIBE_FAILED_MESSAGE: &str = "Error processing image";

/// Message used when a bundled image cannot be read
pub const LOCAL_IMAGE_FAILED_MESSAGE: &str = "Failed to load image from resources";

/// Collaborators of the detail screen
#[derive(Clone)]
pub struct DetailServices {
    pub describer: Arc<dyn ImageDescriber>,
    pub fetcher: Arc<dyn ImageFetcher>,
    pub loader: Arc<dyn ImageLoader>,
    pub favorites: Arc<FavoritesStore>,
}

struct DetailInner {
    state: StateHolder<DetailState>,
    services: DetailServices,
    /// Photo the favorite toggle acts on, if the context allows one
    current_photo: Mutex<Option<PhotoRecord>>,
    /// Bumped by every describe; only the newest may publish its outcome
    generation: AtomicU64,
}

/// Detail view model
/// DOCUMENTATION: Owns one DetailState holder. The display context is set
/// synchronously and carried through every phase change. Async work runs on
/// spawned tasks whose handles may be ignored
pub struct DetailViewModel {
    inner: Arc<DetailInner>,
}

impl DetailViewModel {
    /// Create the view model in Initial with `context` already applied
    pub fn new(services: DetailServices, context: DisplayContext) -> Self {
        let vm = Self {
            inner: Arc::new(DetailInner {
                state: StateHolder::new(DetailState::default()),
                services,
                current_photo: Mutex::new(None),
                generation: AtomicU64::new(0),
            }),
        };
        vm.set_display_context(context);
        vm
    }

    /// Subscribe to state snapshots
    pub fn state(&self) -> watch::Receiver<DetailState> {
        self.inner.state.subscribe()
    }

    /// Current state snapshot
    pub fn current(&self) -> DetailState {
        self.inner.state.get()
    }

    /// Stamp a new display context onto the current phase
    /// DOCUMENTATION: The phase payload is untouched. When the context names
    /// both a photo id and a URL it also becomes the favorite target
    pub fn set_display_context(&self, context: DisplayContext) {
        *self.current_photo_slot() = favorite_target(&context);

        self.inner.state.update(|state| {
            Some(DetailState {
                context: context.clone(),
                phase: state.phase.clone(),
            })
        });
    }

    /// Describe a remote photo
    /// DOCUMENTATION: A failed download is not an error: the outcome is an
    /// attribution-only Success. A failed model call ends in Error. When
    /// `photo_id` is given its favorite status is looked up alongside
    pub fn describe_from_url(
        &self,
        url: String,
        photographer_name: String,
        photo_id: Option<String>,
    ) -> JoinHandle<()> {
        let generation = self.begin_loading();

        if let Some(id) = photo_id.clone() {
            tokio::spawn(refresh_favorite(self.inner.clone(), id));
        }

        let inner = self.inner.clone();
        tokio::spawn(async move {
            match inner.services.fetcher.fetch(&url).await {
                Ok(image) => {
                    let favorite_id = inner.state.get().context.photo_id;
                    run_describe(&inner, generation, image, favorite_id).await;
                }
                Err(e) => {
                    log::warn!("Image download failed for {}: {}; using attribution", url, e);
                    let is_favorite = lookup_favorite(&inner, photo_id.as_deref()).await;
                    publish(
                        &inner,
                        generation,
                        DetailPhase::Success {
                            output_text: format!("Photo by {} on Unsplash", photographer_name),
                            is_favorite,
                        },
                    );
                }
            }
        })
    }

    /// Describe a bundled image
    /// DOCUMENTATION: Local images are never favorites; no lookup is made
    pub fn describe_local(&self, resource: ImageResource) -> JoinHandle<()> {
        let generation = self.begin_loading();
        *self.current_photo_slot() = None;

        let inner = self.inner.clone();
        tokio::spawn(async move {
            match inner.services.loader.load(&resource).await {
                Ok(image) => run_describe(&inner, generation, image, None).await,
                Err(e) => {
                    log::error!("Local image {} unusable: {}", resource.path().display(), e);
                    publish(
                        &inner,
                        generation,
                        DetailPhase::Error {
                            message: LOCAL_IMAGE_FAILED_MESSAGE.to_string(),
                        },
                    );
                }
            }
        })
    }

    /// Toggle the shown photo's favorite status
    /// DOCUMENTATION: Does nothing without a favorite target. The result is
    /// applied only if the state is still Success when the toggle completes
    pub fn toggle_favorite(&self) -> Option<JoinHandle<()>> {
        let photo = self.current_photo_slot().clone()?;

        let inner = self.inner.clone();
        Some(tokio::spawn(async move {
            match inner.services.favorites.toggle(&photo).await {
                Ok(is_favorite) => set_favorite_flag(&inner, is_favorite),
                Err(e) => log::error!("Failed to toggle favorite {}: {}", photo.id, e),
            }
        }))
    }

    /// Tear down: every later write is dropped
    pub fn close(&self) {
        self.inner.state.close();
    }

    fn begin_loading(&self) -> u64 {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner
            .state
            .update(|state| Some(state.with_phase(DetailPhase::Loading)));
        generation
    }

    fn current_photo_slot(&self) -> std::sync::MutexGuard<'_, Option<PhotoRecord>> {
        // A poisoned slot still holds a valid Option
        self.inner
            .current_photo
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for DetailViewModel {
    fn drop(&mut self) {
        self.close();
    }
}

/// Photo reconstructed from navigation parameters
fn favorite_target(context: &DisplayContext) -> Option<PhotoRecord> {
    let photo_id = context.photo_id.as_ref()?;
    let image_url = context.image_url.as_ref()?;

    Some(PhotoRecord {
        id: photo_id.clone(),
        width: 0,
        height: 0,
        description: None,
        alt_description: context.alt_description.clone(),
        urls: PhotoUrls::uniform(image_url),
        user: PhotoUser {
            first_name: context.photographer_name.clone(),
            last_name: None,
            username: context
                .photographer_name
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
        },
    })
}

async fn run_describe(
    inner: &DetailInner,
    generation: u64,
    image: Vec<u8>,
    favorite_id: Option<String>,
) {
    let phase = match inner.services.describer.describe(&image, CAPTION_PROMPT).await {
        Ok(Some(output_text)) => DetailPhase::Success {
            output_text,
            is_favorite: lookup_favorite(inner, favorite_id.as_deref()).await,
        },
        Ok(None) => {
            log::warn!("Describe call returned no text");
            DetailPhase::Error {
                message: GalleryError::EmptyResponse.message_or(DESCRIBE_FAILED_MESSAGE),
            }
        }
        Err(e) => {
            log::error!("Describe call failed: {}", e);
            DetailPhase::Error {
                message: e.message_or(DESCRIBE_FAILED_MESSAGE),
            }
        }
    };

    publish(inner, generation, phase);
}

/// Publish a terminal phase if `generation` is still the newest describe
fn publish(inner: &DetailInner, generation: u64, phase: DetailPhase) {
    let published = inner.state.update(|state| {
        if inner.generation.load(Ordering::SeqCst) != generation {
            return None;
        }
        Some(state.with_phase(phase))
    });

    if !published {
        log::debug!("Describe #{} outcome discarded", generation);
    }
}

async fn lookup_favorite(inner: &DetailInner, photo_id: Option<&str>) -> bool {
    let Some(id) = photo_id else {
        return false;
    };

    match inner.services.favorites.is_favorite(id).await {
        Ok(is_favorite) => is_favorite,
        Err(e) => {
            log::error!("Favorite lookup for {} failed: {}", id, e);
            false
        }
    }
}

async fn refresh_favorite(inner: Arc<DetailInner>, photo_id: String) {
    let is_favorite = lookup_favorite(&inner, Some(&photo_id)).await;
    set_favorite_flag(&inner, is_favorite);
}

/// Set is_favorite on a Success state; any other phase is left alone
fn set_favorite_flag(inner: &DetailInner, is_favorite: bool) {
    inner.state.update(|state| match &state.phase {
        DetailPhase::Success { output_text, .. } => Some(state.with_phase(DetailPhase::Success {
            output_text: output_text.clone(),
            is_favorite,
        })),
        DetailPhase::Initial | DetailPhase::Loading | DetailPhase::Error { .. } => None,
    });
}
