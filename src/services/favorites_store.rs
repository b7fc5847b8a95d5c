// src/services/favorites_store.rs
// DOCUMENTATION: Live favorites collection
// PURPOSE: Toggle/add/remove favorites and push full snapshots to observers

use crate::db::FavoriteRepository;
use crate::errors::GalleryError;
use crate::models::{FavoriteRecord, PhotoRecord};
use chrono::Utc;
use futures::stream::{self, BoxStream, StreamExt};
use sqlx::SqlitePool;
use std::collections::HashMap;
use tokio::sync::{watch, Mutex};

/// Outcome slot shared by toggles coalesced onto one in-flight toggle
type ToggleOutcome = Option<Result<bool, GalleryError>>;

/// Favorites store over the favorite_photos table
/// DOCUMENTATION: Every successful insert or delete republishes the whole
/// collection (newest first) to all observers. Mutations are serialized by
/// a write lock. Toggles of one photo that overlap in time share a single
/// check-then-act, so they never double-insert or double-delete
pub struct FavoritesStore {
    pool: SqlitePool,
    snapshot: watch::Sender<Vec<PhotoRecord>>,
    /// Guards mutations; holds the last timestamp handed out
    write_lock: Mutex<i64>,
    /// Toggles currently running, by photo id
    in_flight: std::sync::Mutex<HashMap<String, watch::Receiver<ToggleOutcome>>>,
}

/// Role of one toggle call
enum ToggleSlot<'a> {
    /// Another toggle of the same photo is running; wait for its outcome
    Joined(watch::Receiver<ToggleOutcome>),
    /// This call performs the toggle
    Leader(watch::Sender<ToggleOutcome>, InFlightGuard<'a>),
}

/// Clears the in-flight entry when the leading toggle ends or is cancelled
struct InFlightGuard<'a> {
    store: &'a FavoritesStore,
    photo_id: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.store.in_flight_map().remove(&self.photo_id);
    }
}

impl FavoritesStore {
    /// Open the store and load the initial snapshot
    pub async fn open(pool: SqlitePool) -> Result<Self, GalleryError> {
        let initial = Self::load_snapshot(&pool).await?;
        log::info!("Favorites store opened with {} favorites", initial.len());

        let (snapshot, _) = watch::channel(initial);
        Ok(Self {
            pool,
            snapshot,
            write_lock: Mutex::new(0),
            in_flight: std::sync::Mutex::new(HashMap::new()),
        })
    }

    /// Live favorites collection
    /// DOCUMENTATION: Yields the current snapshot immediately, then a new
    /// snapshot after every change. Each call starts an independent stream.
    /// Slow consumers skip to the latest snapshot
    pub fn observe(&self) -> BoxStream<'static, Vec<PhotoRecord>> {
        let rx = self.snapshot.subscribe();
        stream::unfold((rx, true), |(mut rx, first)| async move {
            if !first {
                rx.changed().await.ok()?;
            }
            let current = rx.borrow_and_update().clone();
            Some((current, (rx, false)))
        })
        .boxed()
    }

    /// Last published snapshot
    pub fn snapshot(&self) -> Vec<PhotoRecord> {
        self.snapshot.borrow().clone()
    }

    /// Point-in-time membership check
    pub async fn is_favorite(&self, photo_id: &str) -> Result<bool, GalleryError> {
        FavoriteRepository::exists(&self.pool, photo_id).await
    }

    /// Add (or refresh) a favorite
    pub async fn add(&self, photo: &PhotoRecord) -> Result<(), GalleryError> {
        let mut last = self.write_lock.lock().await;
        self.insert_locked(&mut *last, photo).await?;
        self.publish().await;
        Ok(())
    }

    /// Remove a favorite; absent ids are ignored
    pub async fn remove(&self, photo_id: &str) -> Result<(), GalleryError> {
        let _guard = self.write_lock.lock().await;
        FavoriteRepository::delete_by_id(&self.pool, photo_id).await?;
        self.publish().await;
        Ok(())
    }

    /// Flip membership of `photo`
    /// DOCUMENTATION: Returns true if the photo is a favorite afterwards.
    /// A toggle issued while another toggle of the same photo is still
    /// running joins it and reports the same outcome
    pub async fn toggle(&self, photo: &PhotoRecord) -> Result<bool, GalleryError> {
        match self.claim_toggle(&photo.id) {
            ToggleSlot::Joined(mut rx) => {
                log::debug!("Toggle of {} joined a running toggle", photo.id);
                let outcome = match rx.wait_for(Option::is_some).await {
                    Ok(outcome) => outcome.clone(),
                    Err(_) => None,
                };
                outcome.unwrap_or_else(|| {
                    Err(GalleryError::DatabaseError(format!(
                        "Toggle of {} was abandoned",
                        photo.id
                    )))
                })
            }
            ToggleSlot::Leader(tx, guard) => {
                let outcome = self.toggle_now(photo).await;
                // Later toggles start afresh; joined waiters still hold the channel
                drop(guard);
                tx.send_replace(Some(outcome.clone()));
                outcome
            }
        }
    }

    fn claim_toggle(&self, photo_id: &str) -> ToggleSlot<'_> {
        let mut in_flight = self.in_flight_map();
        if let Some(rx) = in_flight.get(photo_id) {
            return ToggleSlot::Joined(rx.clone());
        }

        let (tx, rx) = watch::channel(None);
        in_flight.insert(photo_id.to_string(), rx);
        ToggleSlot::Leader(
            tx,
            InFlightGuard {
                store: self,
                photo_id: photo_id.to_string(),
            },
        )
    }

    async fn toggle_now(&self, photo: &PhotoRecord) -> Result<bool, GalleryError> {
        let mut last = self.write_lock.lock().await;

        let was_favorite = FavoriteRepository::exists(&self.pool, &photo.id).await?;
        if was_favorite {
            FavoriteRepository::delete_by_id(&self.pool, &photo.id).await?;
        } else {
            self.insert_locked(&mut *last, photo).await?;
        }
        self.publish().await;

        log::debug!("Toggled favorite {} -> {}", photo.id, !was_favorite);
        Ok(!was_favorite)
    }

    async fn insert_locked(&self, last: &mut i64, photo: &PhotoRecord) -> Result<(), GalleryError> {
        // Strictly increasing even when two inserts land in the same millisecond
        let timestamp = Utc::now().timestamp_millis().max(*last + 1);
        *last = timestamp;

        let favorite = FavoriteRecord::from_photo(photo, timestamp);
        FavoriteRepository::insert_or_replace(&self.pool, &favorite).await
    }

    /// Republish the collection after a committed write
    /// DOCUMENTATION: The write already happened, so a failed reload is only
    /// logged; observers catch up on the next successful publish
    async fn publish(&self) {
        match Self::load_snapshot(&self.pool).await {
            Ok(current) => {
                self.snapshot.send_replace(current);
            }
            Err(e) => log::error!("Failed to republish favorites: {}", e),
        }
    }

    fn in_flight_map(
        &self,
    ) -> std::sync::MutexGuard<'_, HashMap<String, watch::Receiver<ToggleOutcome>>> {
        // The map stays consistent even if a holder panicked
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn load_snapshot(pool: &SqlitePool) -> Result<Vec<PhotoRecord>, GalleryError> {
        Ok(FavoriteRepository::get_all(pool)
            .await?
            .iter()
            .map(FavoriteRecord::to_photo)
            .collect())
    }
}
