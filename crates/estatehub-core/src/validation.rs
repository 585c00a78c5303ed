//! Input validation shared by the services

use regex::Regex;
use std::sync::LazyLock;
use uuid::Uuid;

use crate::error::CoreError;

/// Maximum allowed username length
pub const MAX_USERNAME_LENGTH: usize = 64;
/// Maximum allowed email length (RFC 5321 path limit)
pub const MAX_EMAIL_LENGTH: usize = 254;
/// Minimum allowed password length
pub const MIN_PASSWORD_LENGTH: usize = 8;
/// Maximum allowed password length (prevent DoS with very large passwords)
pub const MAX_PASSWORD_LENGTH: usize = 256;

pub const MIN_ROOMS: i64 = 1;
pub const MAX_ROOMS: i64 = 10;
pub const MIN_REGULAR_PRICE: i64 = 50;
pub const MAX_PRICE: i64 = 1_000_000_000;
pub const MAX_IMAGES: usize = 6;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

/// Indian mobile numbers, optionally prefixed with +91
static CONTACT_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\+91)?[6-9][0-9]{9}$").expect("contact pattern is valid"));

/// Parse a resource id from a path segment
pub fn parse_id(raw: &str, resource: &str) -> Result<Uuid, CoreError> {
    Uuid::parse_str(raw).map_err(|_| CoreError::Validation(format!("Invalid {resource} ID")))
}

/// Validate username format and length
pub fn validate_username(username: &str) -> Result<(), CoreError> {
    if username.is_empty() {
        return Err(CoreError::Validation("Username cannot be empty".to_string()));
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Username exceeds maximum length of {} characters",
            MAX_USERNAME_LENGTH
        )));
    }
    // Only allow alphanumeric characters, underscores, and hyphens
    if !username.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err(CoreError::Validation(
            "Username can only contain alphanumeric characters, underscores, and hyphens"
                .to_string(),
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if email.len() > MAX_EMAIL_LENGTH || !EMAIL_RE.is_match(email) {
        return Err(CoreError::Validation("Invalid email address".to_string()));
    }
    Ok(())
}

/// Validate password length
pub fn validate_password(password: &str) -> Result<(), CoreError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password exceeds maximum length of {} characters",
            MAX_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

pub fn validate_contact_number(number: &str) -> bool {
    CONTACT_NUMBER_RE.is_match(number)
}

fn require_text(value: &str, field: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Validate the owner-supplied attributes of a listing
pub fn validate_listing(fields: &estatehub_db::ListingFields) -> Result<(), CoreError> {
    require_text(&fields.name, "Name")?;
    require_text(&fields.description, "Description")?;
    require_text(&fields.address, "Address")?;

    for (rooms, label) in [(fields.bedrooms, "Bedrooms"), (fields.bathrooms, "Bathrooms")] {
        if !(MIN_ROOMS..=MAX_ROOMS).contains(&rooms) {
            return Err(CoreError::Validation(format!(
                "{label} must be between {MIN_ROOMS} and {MAX_ROOMS}"
            )));
        }
    }

    if !(MIN_REGULAR_PRICE..=MAX_PRICE).contains(&fields.regular_price) {
        return Err(CoreError::Validation(format!(
            "Regular price must be between {MIN_REGULAR_PRICE} and {MAX_PRICE}"
        )));
    }
    if !(0..=MAX_PRICE).contains(&fields.discount_price) {
        return Err(CoreError::Validation(format!(
            "Discount price must be between 0 and {MAX_PRICE}"
        )));
    }
    if fields.offer && fields.discount_price >= fields.regular_price {
        return Err(CoreError::Validation(
            "Discount price must be lower than regular price".to_string(),
        ));
    }

    if fields.image_urls.is_empty() {
        return Err(CoreError::Validation(
            "You must upload at least one image".to_string(),
        ));
    }
    if fields.image_urls.len() > MAX_IMAGES {
        return Err(CoreError::Validation(format!(
            "Maximum {MAX_IMAGES} images allowed"
        )));
    }
    if fields.image_urls.iter().any(|url| url.trim().is_empty()) {
        return Err(CoreError::Validation("Image URLs cannot be empty".to_string()));
    }

    if fields.contact_numbers.is_empty() {
        return Err(CoreError::Validation(
            "At least one contact number is required".to_string(),
        ));
    }
    if !fields
        .contact_numbers
        .iter()
        .all(|n| validate_contact_number(n))
    {
        return Err(CoreError::Validation(
            "All contact numbers must be valid Indian numbers (e.g. +919876543210 or 9876543210)"
                .to_string(),
        ));
    }

    Ok(())
}

pub fn validate_rating(rating: i64) -> Result<(), CoreError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(CoreError::Validation(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use estatehub_db::{ListingFields, ListingType};

    fn valid_fields() -> ListingFields {
        ListingFields {
            name: "Lake view flat".to_string(),
            description: "Two bedroom flat".to_string(),
            address: "4 MG Road".to_string(),
            contact_numbers: vec!["+919876543210".to_string()],
            regular_price: 50_000,
            discount_price: 3_400,
            bathrooms: 1,
            bedrooms: 2,
            furnished: true,
            parking: false,
            offer: true,
            listing_type: ListingType::Rent,
            image_urls: vec!["https://img.example.com/a.jpg".to_string()],
        }
    }

    #[test]
    fn test_parse_id() {
        let id = uuid::Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "listing").unwrap(), id);
        assert!(matches!(
            parse_id("64f1c0ffee", "listing"),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_account_fields() {
        assert!(validate_username("asha_k-1").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("has space").is_err());

        assert!(validate_email("asha@example.com").is_ok());
        assert!(validate_email("asha@example").is_err());
        assert!(validate_email("not an email").is_err());

        assert!(validate_password("longenough").is_ok());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn test_valid_listing() {
        assert!(validate_listing(&valid_fields()).is_ok());
    }

    #[test]
    fn test_discount_must_undercut_regular_price_on_offer() {
        let mut fields = valid_fields();
        fields.discount_price = fields.regular_price;
        assert!(validate_listing(&fields).is_err());

        // Without an offer the discount price is not compared
        fields.offer = false;
        assert!(validate_listing(&fields).is_ok());
    }

    #[test]
    fn test_listing_limits() {
        let mut fields = valid_fields();
        fields.bedrooms = 11;
        assert!(validate_listing(&fields).is_err());

        let mut fields = valid_fields();
        fields.image_urls = vec!["https://img.example.com/a.jpg".to_string(); 7];
        assert!(validate_listing(&fields).is_err());

        let mut fields = valid_fields();
        fields.image_urls.clear();
        assert!(validate_listing(&fields).is_err());

        let mut fields = valid_fields();
        fields.name = "   ".to_string();
        assert!(validate_listing(&fields).is_err());
    }

    #[test]
    fn test_contact_numbers() {
        assert!(validate_contact_number("9876543210"));
        assert!(validate_contact_number("+919876543210"));
        assert!(!validate_contact_number("1234567890"));
        assert!(!validate_contact_number("98765"));
        // Only ASCII digits count, not other Unicode decimal digits
        assert!(!validate_contact_number("9८७६५४३२१०"));
        assert!(!validate_contact_number("+919८७६५४३२१०"));

        let mut fields = valid_fields();
        fields.contact_numbers.push("555-0100".to_string());
        assert!(validate_listing(&fields).is_err());
    }

    #[test]
    fn test_rating_bounds() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
    }
}
