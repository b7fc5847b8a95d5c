// src/models/favorite.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::photo::{PhotoRecord, PhotoUrls, PhotoUser};

/// Favorited photo as persisted in `favorite_photos`
/// DOCUMENTATION: Stores only what the gallery grid needs. Converting back
/// to a PhotoRecord is lossy (no dimensions, no alt text)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FavoriteRecord {
    pub photo_id: String,
    pub image_url: String,
    pub thumbnail_url: String,
    pub description: String,
    pub user_name: String,
    pub user_username: String,
    /// Epoch milliseconds at insert time
    pub timestamp: i64,
}

impl FavoriteRecord {
    /// Snapshot the favorite-relevant fields of a photo
    pub fn from_photo(photo: &PhotoRecord, timestamp: i64) -> Self {
        FavoriteRecord {
            photo_id: photo.id.clone(),
            image_url: photo.urls.regular.clone(),
            thumbnail_url: photo.urls.thumb.clone(),
            description: photo.best_description().to_string(),
            user_name: photo.user.full_name(),
            user_username: photo.user.username.clone(),
            timestamp,
        }
    }

    /// Rebuild a displayable photo
    pub fn to_photo(&self) -> PhotoRecord {
        PhotoRecord {
            id: self.photo_id.clone(),
            width: 0,
            height: 0,
            description: Some(self.description.clone()),
            alt_description: None,
            urls: PhotoUrls {
                raw: self.image_url.clone(),
                full: self.image_url.clone(),
                regular: self.image_url.clone(),
                small: self.thumbnail_url.clone(),
                thumb: self.thumbnail_url.clone(),
            },
            user: PhotoUser {
                first_name: Some(self.user_name.clone()),
                last_name: None,
                username: self.user_username.clone(),
            },
        }
    }
}
