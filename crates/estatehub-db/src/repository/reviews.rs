//! Review operations

use uuid::Uuid;

use crate::error::DbError;
use crate::models::{NewReview, Review};
use crate::repository::Database;
use crate::utils::{format_datetime, now_micros};

impl Database {
    /// Insert a new review
    pub async fn insert_review(&self, review: NewReview) -> Result<Review, DbError> {
        let now = now_micros();
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO reviews (id, listing_id, user_id, username, rating, comment, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(review.listing_id.to_string())
        .bind(review.user_id.to_string())
        .bind(&review.username)
        .bind(review.rating)
        .bind(&review.comment)
        .bind(format_datetime(&now))
        .execute(&self.pool)
        .await?;

        Ok(Review {
            id,
            listing_id: review.listing_id,
            user_id: review.user_id,
            username: review.username,
            rating: review.rating,
            comment: review.comment,
            created_at: now,
        })
    }

    /// List reviews for a listing, newest first
    pub async fn list_reviews_for_listing(&self, listing_id: Uuid) -> Result<Vec<Review>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, listing_id, user_id, username, rating, comment, created_at
            FROM reviews
            WHERE listing_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(listing_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Review::try_from(row).map_err(DbError::from))
            .collect()
    }
}
