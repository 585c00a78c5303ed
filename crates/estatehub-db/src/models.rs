//! Database models

use crate::utils::parse_datetime_or_now;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Error type for parsing models from strings
#[derive(Debug, Clone)]
pub enum ParseError {
    InvalidListingType(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidListingType(s) => write!(f, "Invalid listing type: {}", s),
        }
    }
}

impl std::error::Error for ParseError {}

/// Listing type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Sale,
    Rent,
}

impl ListingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingType::Sale => "sale",
            ListingType::Rent => "rent",
        }
    }
}

impl FromStr for ListingType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sale" => Ok(ListingType::Sale),
            "rent" => Ok(ListingType::Rent),
            _ => Err(ParseError::InvalidListingType(s.to_string())),
        }
    }
}

/// User model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
    pub address: String,
    pub contact_numbers: Vec<String>,
    pub regular_price: i64,
    pub discount_price: i64,
    pub bathrooms: i64,
    pub bedrooms: i64,
    pub furnished: bool,
    pub parking: bool,
    pub offer: bool,
    #[serde(rename = "type")]
    pub listing_type: ListingType,
    pub image_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Review model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub rating: i64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// New user (for insertion)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Partial user update; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

/// Listing attributes supplied by the owner.
///
/// Used both for insertion and for full replacement on update; the owner
/// and timestamps are managed by the repository.
#[derive(Debug, Clone)]
pub struct ListingFields {
    pub name: String,
    pub description: String,
    pub address: String,
    pub contact_numbers: Vec<String>,
    pub regular_price: i64,
    pub discount_price: i64,
    pub bathrooms: i64,
    pub bedrooms: i64,
    pub furnished: bool,
    pub parking: bool,
    pub offer: bool,
    pub listing_type: ListingType,
    pub image_urls: Vec<String>,
}

/// New review (for insertion)
#[derive(Debug, Clone)]
pub struct NewReview {
    pub listing_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub rating: i64,
    pub comment: String,
}

// ==================== TryFrom Implementations ====================

fn decode_uuid(row: &sqlx::sqlite::SqliteRow, column: &str) -> Result<Uuid, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    Uuid::parse_str(&raw).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

fn decode_json_list(
    row: &sqlx::sqlite::SqliteRow,
    column: &str,
) -> Result<Vec<String>, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    serde_json::from_str(&raw).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for User {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: decode_uuid(row, "id")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for Listing {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        let listing_type_str: String = row.try_get("listing_type")?;
        let listing_type =
            ListingType::from_str(&listing_type_str).map_err(|e| sqlx::Error::ColumnDecode {
                index: "listing_type".to_string(),
                source: Box::new(e),
            })?;
        Ok(Listing {
            id: decode_uuid(row, "id")?,
            owner_id: decode_uuid(row, "owner_id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            address: row.try_get("address")?,
            contact_numbers: decode_json_list(row, "contact_numbers")?,
            regular_price: row.try_get("regular_price")?,
            discount_price: row.try_get("discount_price")?,
            bathrooms: row.try_get("bathrooms")?,
            bedrooms: row.try_get("bedrooms")?,
            furnished: row.try_get("furnished")?,
            parking: row.try_get("parking")?,
            offer: row.try_get("offer")?,
            listing_type,
            image_urls: decode_json_list(row, "image_urls")?,
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for Review {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(Review {
            id: decode_uuid(row, "id")?,
            listing_id: decode_uuid(row, "listing_id")?,
            user_id: decode_uuid(row, "user_id")?,
            username: row.try_get("username")?,
            rating: row.try_get("rating")?,
            comment: row.try_get("comment")?,
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
        })
    }
}
