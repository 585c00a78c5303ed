//! Listing lifecycle and search

use estatehub_auth::{AuthenticatedIdentity, ensure_owner};
use estatehub_db::{Database, Listing, ListingFields, ListingQuery};
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::CoreError;
use crate::validation::{parse_id, validate_listing};

/// Listing service
pub struct ListingService {
    db: Database,
}

impl ListingService {
    /// Create a new listing service
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Create a listing owned by the caller
    pub async fn create(
        &self,
        identity: &AuthenticatedIdentity,
        fields: ListingFields,
    ) -> Result<Listing, CoreError> {
        validate_listing(&fields)?;
        if self.db.get_user_by_id(identity.subject_id).await?.is_none() {
            return Err(CoreError::NotFound("User not found!".to_string()));
        }

        let listing = self.db.insert_listing(identity.subject_id, fields).await?;
        info!(
            "Created listing {} for user {}",
            listing.id, identity.subject_id
        );
        Ok(listing)
    }

    /// Fetch a single listing
    pub async fn get(&self, raw_id: &str) -> Result<Listing, CoreError> {
        let id = parse_id(raw_id, "listing")?;
        self.find(id).await
    }

    async fn find(&self, id: Uuid) -> Result<Listing, CoreError> {
        self.db
            .get_listing(id)
            .await?
            .ok_or_else(|| CoreError::NotFound("Listing not found!".to_string()))
    }

    /// Resolve a listing the caller is about to mutate.
    ///
    /// Checked in order: id shape (400), existence (404), ownership (403).
    async fn owned(
        &self,
        identity: &AuthenticatedIdentity,
        raw_id: &str,
        action: &str,
    ) -> Result<Listing, CoreError> {
        let id = parse_id(raw_id, "listing")?;
        let listing = self.find(id).await?;
        ensure_owner(identity, listing.owner_id).map_err(|_| {
            debug!(
                "User {} denied {} on listing {}",
                identity.subject_id, action, listing.id
            );
            CoreError::Forbidden(format!("You are not authorized to {action} this listing"))
        })?;
        Ok(listing)
    }

    /// Replace the attributes of a listing the caller owns
    pub async fn update(
        &self,
        identity: &AuthenticatedIdentity,
        raw_id: &str,
        fields: ListingFields,
    ) -> Result<Listing, CoreError> {
        let listing = self.owned(identity, raw_id, "update").await?;
        validate_listing(&fields)?;

        let updated = self
            .db
            .update_listing(listing.id, fields)
            .await?
            .ok_or_else(|| CoreError::NotFound("Listing not found!".to_string()))?;
        info!("Updated listing {}", updated.id);
        Ok(updated)
    }

    /// Delete a listing the caller owns
    pub async fn delete(
        &self,
        identity: &AuthenticatedIdentity,
        raw_id: &str,
    ) -> Result<(), CoreError> {
        let listing = self.owned(identity, raw_id, "delete").await?;

        if !self.db.delete_listing(listing.id).await? {
            return Err(CoreError::NotFound("Listing not found!".to_string()));
        }
        info!("Deleted listing {}", listing.id);
        Ok(())
    }

    /// Search listings from raw query-string parameters
    ///
    /// Unknown or malformed parameters fall back to their defaults.
    pub async fn search(&self, params: &HashMap<String, String>) -> Result<Vec<Listing>, CoreError> {
        let query = ListingQuery::from_params(params).validated();
        debug!("Listing search: {:?}", query);
        Ok(self.db.search_listings(&query).await?)
    }
}
