// src/db/favorite_repository.rs
// DOCUMENTATION: Favorite photo database operations
// PURPOSE: Handle CRUD operations for the favorite_photos table

use crate::errors::GalleryError;
use crate::models::FavoriteRecord;
use sqlx::SqlitePool;

pub struct FavoriteRepository;

impl FavoriteRepository {
    /// Insert a favorite, replacing any row with the same photo_id
    /// DOCUMENTATION: A replaced row is re-inserted, so it moves to the
    /// front of the timestamp ordering
    pub async fn insert_or_replace(
        pool: &SqlitePool,
        favorite: &FavoriteRecord,
    ) -> Result<(), GalleryError> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO favorite_photos (
                photo_id, image_url, thumbnail_url, description,
                user_name, user_username, timestamp
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&favorite.photo_id)
        .bind(&favorite.image_url)
        .bind(&favorite.thumbnail_url)
        .bind(&favorite.description)
        .bind(&favorite.user_name)
        .bind(&favorite.user_username)
        .bind(favorite.timestamp)
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to insert favorite {}: {}", favorite.photo_id, e);
            GalleryError::DatabaseError(format!("Insert favorite failed: {}", e))
        })?;

        Ok(())
    }

    /// Delete a favorite by photo id
    /// DOCUMENTATION: Returns the number of rows removed (0 or 1)
    pub async fn delete_by_id(pool: &SqlitePool, photo_id: &str) -> Result<u64, GalleryError> {
        let result = sqlx::query(
            r#"
            DELETE FROM favorite_photos
            WHERE photo_id = ?1
            "#,
        )
        .bind(photo_id)
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to delete favorite {}: {}", photo_id, e);
            GalleryError::DatabaseError(format!("Delete favorite failed: {}", e))
        })?;

        Ok(result.rows_affected())
    }

    /// Get every favorite, newest first
    pub async fn get_all(pool: &SqlitePool) -> Result<Vec<FavoriteRecord>, GalleryError> {
        let favorites = sqlx::query_as::<_, FavoriteRecord>(
            r#"
            SELECT photo_id, image_url, thumbnail_url, description,
                   user_name, user_username, timestamp
            FROM favorite_photos
            ORDER BY timestamp DESC, rowid DESC
            "#,
        )
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch favorites: {}", e);
            GalleryError::DatabaseError(format!("Fetch favorites failed: {}", e))
        })?;

        Ok(favorites)
    }

    /// Get one favorite by photo id
    pub async fn get_by_id(
        pool: &SqlitePool,
        photo_id: &str,
    ) -> Result<Option<FavoriteRecord>, GalleryError> {
        let favorite = sqlx::query_as::<_, FavoriteRecord>(
            r#"
            SELECT photo_id, image_url, thumbnail_url, description,
                   user_name, user_username, timestamp
            FROM favorite_photos
            WHERE photo_id = ?1
            "#,
        )
        .bind(photo_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch favorite {}: {}", photo_id, e);
            GalleryError::DatabaseError(format!("Fetch favorite failed: {}", e))
        })?;

        Ok(favorite)
    }

    /// Whether a photo is favorited
    pub async fn exists(pool: &SqlitePool, photo_id: &str) -> Result<bool, GalleryError> {
        let found: i64 = sqlx::query_scalar(
            r#"
            SELECT EXISTS(SELECT 1 FROM favorite_photos WHERE photo_id = ?1)
            "#,
        )
        .bind(photo_id)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to check favorite {}: {}", photo_id, e);
            GalleryError::DatabaseError(format!("Check favorite failed: {}", e))
        })?;

        Ok(found != 0)
    }

    /// Number of favorites
    pub async fn count(pool: &SqlitePool) -> Result<i64, GalleryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM favorite_photos")
            .fetch_one(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to count favorites: {}", e);
                GalleryError::DatabaseError(format!("Count favorites failed: {}", e))
            })?;

        Ok(count)
    }
}
