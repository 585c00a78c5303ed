//! Listing reviews

use estatehub_auth::AuthenticatedIdentity;
use estatehub_db::{Database, NewReview, Review};
use tracing::info;

use crate::error::CoreError;
use crate::validation::{parse_id, validate_rating};

/// Maximum allowed review comment length
pub const MAX_COMMENT_LENGTH: usize = 2000;

/// Review submission; every field must be present
#[derive(Debug, Clone, Default)]
pub struct ReviewDraft {
    pub listing_id: Option<String>,
    pub rating: Option<i64>,
    pub comment: Option<String>,
}

/// Review service
pub struct ReviewService {
    db: Database,
}

impl ReviewService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Post a review on an existing listing as the caller
    pub async fn create(
        &self,
        identity: &AuthenticatedIdentity,
        draft: ReviewDraft,
    ) -> Result<Review, CoreError> {
        let (Some(raw_id), Some(rating), Some(comment)) =
            (draft.listing_id, draft.rating, draft.comment)
        else {
            return Err(CoreError::Validation("All fields are required".to_string()));
        };
        let comment = comment.trim().to_string();
        if comment.is_empty() {
            return Err(CoreError::Validation("All fields are required".to_string()));
        }
        if comment.chars().count() > MAX_COMMENT_LENGTH {
            return Err(CoreError::Validation(format!(
                "Comment exceeds maximum length of {MAX_COMMENT_LENGTH} characters"
            )));
        }
        validate_rating(rating)?;

        let listing_id = parse_id(&raw_id, "listing")?;
        if self.db.get_listing(listing_id).await?.is_none() {
            return Err(CoreError::NotFound("Listing not found!".to_string()));
        }
        let user = self
            .db
            .get_user_by_id(identity.subject_id)
            .await?
            .ok_or_else(|| CoreError::NotFound("User not found!".to_string()))?;

        let review = self
            .db
            .insert_review(NewReview {
                listing_id,
                user_id: user.id,
                username: user.username,
                rating,
                comment,
            })
            .await?;
        info!("User {} reviewed listing {}", review.username, listing_id);
        Ok(review)
    }

    /// Reviews for a listing, newest first
    pub async fn list_for_listing(&self, raw_id: &str) -> Result<Vec<Review>, CoreError> {
        let listing_id = parse_id(raw_id, "listing")?;
        Ok(self.db.list_reviews_for_listing(listing_id).await?)
    }
}
