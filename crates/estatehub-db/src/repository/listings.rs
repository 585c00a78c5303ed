//! Listing operations and the listing search query

use chrono::{DateTime, SubsecRound, Utc};
use sqlx::{QueryBuilder, Sqlite};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::DbError;
use crate::models::{Listing, ListingFields};
use crate::repository::Database;
use crate::utils::{escape_like, format_datetime, now_micros};

const LISTING_COLUMNS: &str = "id, owner_id, name, description, address, contact_numbers, \
    regular_price, discount_price, bathrooms, bedrooms, furnished, parking, offer, \
    listing_type, image_urls, created_at, updated_at";

/// Page size used when the client sends no usable `limit`
pub const DEFAULT_LIMIT: i64 = 8;
/// Largest page a single search may return
pub const MAX_LIMIT: i64 = 100;

/// Type value that disables type filtering
const ALL_TYPES: &str = "all";

/// Sortable listing columns (whitelist to prevent SQL injection)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    RegularPrice,
    DiscountPrice,
    Name,
    Bedrooms,
    Bathrooms,
}

impl SortField {
    /// Resolve a client-facing field name; unknown names yield `None`
    pub fn from_param(name: &str) -> Option<Self> {
        match name {
            "createdAt" => Some(SortField::CreatedAt),
            "updatedAt" => Some(SortField::UpdatedAt),
            "regularPrice" => Some(SortField::RegularPrice),
            "discountPrice" => Some(SortField::DiscountPrice),
            "name" => Some(SortField::Name),
            "bedrooms" => Some(SortField::Bedrooms),
            "bathrooms" => Some(SortField::Bathrooms),
            _ => None,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::RegularPrice => "regular_price",
            SortField::DiscountPrice => "discount_price",
            SortField::Name => "name",
            SortField::Bedrooms => "bedrooms",
            SortField::Bathrooms => "bathrooms",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// `asc` (any case) sorts ascending; everything else, absence included,
    /// sorts descending.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some(s) if s.eq_ignore_ascii_case("asc") => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Normalized listing search request
///
/// Built from untyped query-string pairs by [`ListingQuery::from_params`];
/// every field is already validated, so the query builder never sees raw
/// client input outside of bound parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    /// Case-insensitive substring matched against the listing name
    pub search_term: String,
    /// Tri-state flags: `None` means "don't filter on this field"
    pub offer: Option<bool>,
    pub furnished: Option<bool>,
    pub parking: Option<bool>,
    /// Exact listing type; `None` matches every type
    pub listing_type: Option<String>,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    /// Page size, in `1..=MAX_LIMIT`
    pub limit: i64,
    /// Number of matching listings to skip
    pub offset: i64,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            offer: None,
            furnished: None,
            parking: None,
            listing_type: None,
            sort_field: SortField::default(),
            sort_direction: SortDirection::default(),
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl ListingQuery {
    /// Build a query from raw query-string parameters.
    ///
    /// Never fails: unusable values fall back to their defaults.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let get = |key: &str| params.get(key).map(String::as_str);
        let flag = |key: &str| get(key).map(|v| v == "true");

        let listing_type = get("type")
            .filter(|t| !t.is_empty() && *t != ALL_TYPES)
            .map(str::to_string);

        Self {
            search_term: get("searchTerm").unwrap_or_default().to_string(),
            offer: flag("offer"),
            furnished: flag("furnished"),
            parking: flag("parking"),
            listing_type,
            sort_field: get("sort")
                .and_then(SortField::from_param)
                .unwrap_or_default(),
            sort_direction: SortDirection::from_param(get("order")),
            limit: get("limit")
                .and_then(|v| v.trim().parse::<i64>().ok())
                .unwrap_or(DEFAULT_LIMIT),
            offset: get("startIndex")
                .and_then(|v| v.trim().parse::<i64>().ok())
                .unwrap_or(0),
        }
        .validated()
    }

    /// Clamp pagination into its allowed range
    pub fn validated(mut self) -> Self {
        if self.limit <= 0 {
            self.limit = DEFAULT_LIMIT;
        } else if self.limit > MAX_LIMIT {
            self.limit = MAX_LIMIT;
        }
        if self.offset < 0 {
            self.offset = 0;
        }
        self
    }

    fn push_filters<'q>(&'q self, builder: &mut QueryBuilder<'q, Sqlite>) {
        if !self.search_term.is_empty() {
            builder
                .push(" AND name_search LIKE ")
                .push_bind(format!(
                    "%{}%",
                    escape_like(&self.search_term.to_lowercase())
                ))
                .push(" ESCAPE '\\'");
        }
        if let Some(offer) = self.offer {
            builder.push(" AND offer = ").push_bind(offer);
        }
        if let Some(furnished) = self.furnished {
            builder.push(" AND furnished = ").push_bind(furnished);
        }
        if let Some(parking) = self.parking {
            builder.push(" AND parking = ").push_bind(parking);
        }
        if let Some(listing_type) = &self.listing_type {
            builder.push(" AND listing_type = ").push_bind(listing_type.as_str());
        }
    }
}

impl Database {
    // ==================== Listing Operations ====================

    /// Insert a new listing owned by `owner_id`
    pub async fn insert_listing(
        &self,
        owner_id: Uuid,
        fields: ListingFields,
    ) -> Result<Listing, DbError> {
        self.insert_listing_at(owner_id, fields, now_micros()).await
    }

    /// Insert a listing with an explicit creation time (imports, backfills)
    pub async fn insert_listing_at(
        &self,
        owner_id: Uuid,
        fields: ListingFields,
        created_at: DateTime<Utc>,
    ) -> Result<Listing, DbError> {
        let created_at = created_at.trunc_subsecs(6);
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO listings (id, owner_id, name, name_search, description, address,
                                  contact_numbers, regular_price, discount_price, bathrooms,
                                  bedrooms, furnished, parking, offer, listing_type, image_urls,
                                  created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(owner_id.to_string())
        .bind(&fields.name)
        .bind(fields.name.to_lowercase())
        .bind(&fields.description)
        .bind(&fields.address)
        .bind(serde_json::to_string(&fields.contact_numbers)?)
        .bind(fields.regular_price)
        .bind(fields.discount_price)
        .bind(fields.bathrooms)
        .bind(fields.bedrooms)
        .bind(fields.furnished)
        .bind(fields.parking)
        .bind(fields.offer)
        .bind(fields.listing_type.as_str())
        .bind(serde_json::to_string(&fields.image_urls)?)
        .bind(format_datetime(&created_at))
        .bind(format_datetime(&created_at))
        .execute(&self.pool)
        .await?;

        Ok(Listing {
            id,
            owner_id,
            name: fields.name,
            description: fields.description,
            address: fields.address,
            contact_numbers: fields.contact_numbers,
            regular_price: fields.regular_price,
            discount_price: fields.discount_price,
            bathrooms: fields.bathrooms,
            bedrooms: fields.bedrooms,
            furnished: fields.furnished,
            parking: fields.parking,
            offer: fields.offer,
            listing_type: fields.listing_type,
            image_urls: fields.image_urls,
            created_at,
            updated_at: created_at,
        })
    }

    /// Get a listing by ID
    pub async fn get_listing(&self, id: Uuid) -> Result<Option<Listing>, DbError> {
        let sql = format!("SELECT {LISTING_COLUMNS} FROM listings WHERE id = ?");
        let result = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        result
            .map(|row| Listing::try_from(&row).map_err(DbError::from))
            .transpose()
    }

    /// Replace the owner-editable fields of a listing
    ///
    /// Returns the updated record, or `None` if the listing does not exist.
    pub async fn update_listing(
        &self,
        id: Uuid,
        fields: ListingFields,
    ) -> Result<Option<Listing>, DbError> {
        let now = now_micros();
        let result = sqlx::query(
            r#"
            UPDATE listings
            SET name = ?, name_search = ?, description = ?, address = ?, contact_numbers = ?,
                regular_price = ?, discount_price = ?, bathrooms = ?, bedrooms = ?,
                furnished = ?, parking = ?, offer = ?, listing_type = ?, image_urls = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&fields.name)
        .bind(fields.name.to_lowercase())
        .bind(&fields.description)
        .bind(&fields.address)
        .bind(serde_json::to_string(&fields.contact_numbers)?)
        .bind(fields.regular_price)
        .bind(fields.discount_price)
        .bind(fields.bathrooms)
        .bind(fields.bedrooms)
        .bind(fields.furnished)
        .bind(fields.parking)
        .bind(fields.offer)
        .bind(fields.listing_type.as_str())
        .bind(serde_json::to_string(&fields.image_urls)?)
        .bind(format_datetime(&now))
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_listing(id).await
    }

    /// Delete a listing by ID
    pub async fn delete_listing(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM listings WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List every listing owned by a user, newest first
    pub async fn list_listings_by_owner(&self, owner_id: Uuid) -> Result<Vec<Listing>, DbError> {
        let sql = format!(
            "SELECT {LISTING_COLUMNS} FROM listings WHERE owner_id = ? \
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(owner_id.to_string())
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| Listing::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Search listings with filtering, sorting and pagination
    ///
    /// The query is re-validated here so callers building a `ListingQuery`
    /// by hand still get bounded pages.
    pub async fn search_listings(&self, query: &ListingQuery) -> Result<Vec<Listing>, DbError> {
        let query = query.clone().validated();

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {LISTING_COLUMNS} FROM listings WHERE 1 = 1"
        ));
        query.push_filters(&mut builder);

        // Sort fragments come from the whitelist only; `id` breaks ties so
        // equal sort keys still page deterministically.
        let direction = query.sort_direction.as_sql();
        builder.push(format!(
            " ORDER BY {} {}, id {}",
            query.sort_field.column(),
            direction,
            direction
        ));
        builder
            .push(" LIMIT ")
            .push_bind(query.limit)
            .push(" OFFSET ")
            .push_bind(query.offset);

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| Listing::try_from(row).map_err(DbError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ListingType, NewUser};
    use chrono::Duration;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn fields(name: &str, listing_type: ListingType, offer: bool) -> ListingFields {
        ListingFields {
            name: name.to_string(),
            description: "Bright corner unit".to_string(),
            address: "12 Lake Road".to_string(),
            contact_numbers: vec!["9876543210".to_string()],
            regular_price: 50_000,
            discount_price: 45_000,
            bathrooms: 2,
            bedrooms: 3,
            furnished: false,
            parking: true,
            offer,
            listing_type,
            image_urls: vec!["https://img.example.com/1.jpg".to_string()],
        }
    }

    async fn seeded_owner(db: &Database) -> Uuid {
        db.insert_user(NewUser {
            username: "owner".to_string(),
            email: "owner@example.com".to_string(),
            password_hash: "hash".to_string(),
        })
        .await
        .unwrap()
        .id
    }

    #[test]
    fn test_from_params_defaults() {
        let query = ListingQuery::from_params(&HashMap::new());
        assert_eq!(query, ListingQuery::default());
        assert_eq!(query.limit, 8);
        assert_eq!(query.offset, 0);
        assert_eq!(query.sort_field, SortField::CreatedAt);
        assert_eq!(query.sort_direction, SortDirection::Desc);
    }

    #[test]
    fn test_from_params_tri_state_flags() {
        let query = ListingQuery::from_params(&params(&[
            ("offer", "true"),
            ("furnished", "false"),
        ]));
        assert_eq!(query.offer, Some(true));
        assert_eq!(query.furnished, Some(false));
        assert_eq!(query.parking, None);
    }

    #[test]
    fn test_from_params_type_sentinel() {
        let all = ListingQuery::from_params(&params(&[("type", "all")]));
        assert_eq!(all.listing_type, None);

        let rent = ListingQuery::from_params(&params(&[("type", "rent")]));
        assert_eq!(rent.listing_type.as_deref(), Some("rent"));
    }

    #[test]
    fn test_from_params_sort_fails_safe() {
        let asc = ListingQuery::from_params(&params(&[("sort", "regularPrice"), ("order", "ASC")]));
        assert_eq!(asc.sort_field, SortField::RegularPrice);
        assert_eq!(asc.sort_direction, SortDirection::Asc);

        let bogus = ListingQuery::from_params(&params(&[
            ("sort", "password_hash; DROP TABLE users"),
            ("order", "sideways"),
        ]));
        assert_eq!(bogus.sort_field, SortField::CreatedAt);
        assert_eq!(bogus.sort_direction, SortDirection::Desc);
    }

    #[test]
    fn test_from_params_pagination_bounds() {
        let junk = ListingQuery::from_params(&params(&[("limit", "lots"), ("startIndex", "-4")]));
        assert_eq!(junk.limit, DEFAULT_LIMIT);
        assert_eq!(junk.offset, 0);

        let zero = ListingQuery::from_params(&params(&[("limit", "0")]));
        assert_eq!(zero.limit, DEFAULT_LIMIT);

        let huge = ListingQuery::from_params(&params(&[("limit", "100000"), ("startIndex", "16")]));
        assert_eq!(huge.limit, MAX_LIMIT);
        assert_eq!(huge.offset, 16);
    }

    #[tokio::test]
    async fn test_rent_pagination_scenario() {
        let db = Database::in_memory().await.unwrap();
        let owner = seeded_owner(&db).await;
        let base = Utc::now() - Duration::days(1);

        // 10 listings, of which indices 2, 5 and 8 are rentals
        let mut rentals = Vec::new();
        for i in 0..10 {
            let listing_type = if i % 3 == 2 { ListingType::Rent } else { ListingType::Sale };
            let listing = db
                .insert_listing_at(
                    owner,
                    fields(&format!("Home {i}"), listing_type, false),
                    base + Duration::minutes(i),
                )
                .await
                .unwrap();
            if listing_type == ListingType::Rent {
                rentals.push(listing.id);
            }
        }
        assert_eq!(rentals.len(), 3);

        let first_page = db
            .search_listings(&ListingQuery::from_params(&params(&[
                ("type", "rent"),
                ("limit", "2"),
            ])))
            .await
            .unwrap();
        let first_ids: Vec<Uuid> = first_page.iter().map(|l| l.id).collect();
        assert_eq!(first_ids, vec![rentals[2], rentals[1]]);

        let second_page = db
            .search_listings(&ListingQuery::from_params(&params(&[
                ("type", "rent"),
                ("limit", "2"),
                ("startIndex", "2"),
            ])))
            .await
            .unwrap();
        let second_ids: Vec<Uuid> = second_page.iter().map(|l| l.id).collect();
        assert_eq!(second_ids, vec![rentals[0]]);
    }

    #[tokio::test]
    async fn test_offer_filter_tri_state() {
        let db = Database::in_memory().await.unwrap();
        let owner = seeded_owner(&db).await;
        db.insert_listing(owner, fields("Offer flat", ListingType::Sale, true))
            .await
            .unwrap();
        db.insert_listing(owner, fields("Plain flat", ListingType::Sale, false))
            .await
            .unwrap();

        let any = db
            .search_listings(&ListingQuery::from_params(&HashMap::new()))
            .await
            .unwrap();
        assert_eq!(any.len(), 2);

        let offers = db
            .search_listings(&ListingQuery::from_params(&params(&[("offer", "true")])))
            .await
            .unwrap();
        assert_eq!(offers.len(), 1);
        assert!(offers[0].offer);

        let no_offers = db
            .search_listings(&ListingQuery::from_params(&params(&[("offer", "false")])))
            .await
            .unwrap();
        assert_eq!(no_offers.len(), 1);
        assert!(!no_offers[0].offer);
    }

    #[tokio::test]
    async fn test_search_term_is_case_insensitive_and_literal() {
        let db = Database::in_memory().await.unwrap();
        let owner = seeded_owner(&db).await;
        db.insert_listing(owner, fields("Sea View Villa", ListingType::Sale, false))
            .await
            .unwrap();
        db.insert_listing(owner, fields("100% Garden Cottage", ListingType::Rent, false))
            .await
            .unwrap();

        let villas = db
            .search_listings(&ListingQuery::from_params(&params(&[("searchTerm", "view vil")])))
            .await
            .unwrap();
        assert_eq!(villas.len(), 1);
        assert_eq!(villas[0].name, "Sea View Villa");

        let percent = db
            .search_listings(&ListingQuery::from_params(&params(&[("searchTerm", "%")])))
            .await
            .unwrap();
        assert_eq!(percent.len(), 1);
        assert_eq!(percent[0].name, "100% Garden Cottage");

        let empty = db
            .search_listings(&ListingQuery::from_params(&params(&[("searchTerm", "")])))
            .await
            .unwrap();
        assert_eq!(empty.len(), 2);
    }

    #[tokio::test]
    async fn test_search_term_folds_non_ascii_case() {
        let db = Database::in_memory().await.unwrap();
        let owner = seeded_owner(&db).await;
        let listing = db
            .insert_listing(owner, fields("Über Villa", ListingType::Sale, false))
            .await
            .unwrap();

        let search = |term: &str| ListingQuery::from_params(&params(&[("searchTerm", term)]));
        let found = db.search_listings(&search("ÜBER")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Über Villa");

        // Renaming refreshes the folded name
        db.update_listing(listing.id, fields("Ελιά House", ListingType::Sale, false))
            .await
            .unwrap();
        assert!(db.search_listings(&search("über")).await.unwrap().is_empty());
        let renamed = db.search_listings(&search("ΕΛΙΆ")).await.unwrap();
        assert_eq!(renamed.len(), 1);
        assert_eq!(renamed[0].name, "Ελιά House");
    }

    #[tokio::test]
    async fn test_search_is_idempotent() {
        let db = Database::in_memory().await.unwrap();
        let owner = seeded_owner(&db).await;
        let created = Utc::now();
        // Identical timestamps force the id tiebreaker to decide the order
        for i in 0..5 {
            db.insert_listing_at(owner, fields(&format!("Twin {i}"), ListingType::Sale, false), created)
                .await
                .unwrap();
        }

        let query = ListingQuery::from_params(&params(&[("limit", "3"), ("startIndex", "1")]));
        let first = db.search_listings(&query).await.unwrap();
        let second = db.search_listings(&query).await.unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_update_and_delete_listing() {
        let db = Database::in_memory().await.unwrap();
        let owner = seeded_owner(&db).await;
        let listing = db
            .insert_listing(owner, fields("Old name", ListingType::Sale, false))
            .await
            .unwrap();

        let updated = db
            .update_listing(listing.id, fields("New name", ListingType::Rent, true))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "New name");
        assert_eq!(updated.listing_type, ListingType::Rent);
        assert_eq!(updated.owner_id, owner);

        assert_eq!(db.list_listings_by_owner(owner).await.unwrap().len(), 1);
        assert!(db.delete_listing(listing.id).await.unwrap());
        assert!(!db.delete_listing(listing.id).await.unwrap());
        assert!(db.get_listing(listing.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_deleting_owner_cascades_to_listings() {
        let db = Database::in_memory().await.unwrap();
        let owner = seeded_owner(&db).await;
        let listing = db
            .insert_listing(owner, fields("Doomed", ListingType::Sale, false))
            .await
            .unwrap();

        assert!(db.delete_user(owner).await.unwrap());
        assert!(db.get_listing(listing.id).await.unwrap().is_none());
    }
}
