//! Request/Response DTOs

use estatehub_core::{ProfileUpdate, ReviewDraft, Signup};
use estatehub_db::{ListingFields, ListingType, User};
use serde::{Deserialize, Serialize};

// ==================== Common Types ====================

/// Plain acknowledgement body
#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }
}

// ==================== Auth Types ====================

/// Signup request
#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl From<SignupRequest> for Signup {
    fn from(req: SignupRequest) -> Self {
        Signup {
            username: req.username,
            email: req.email,
            password: req.password,
        }
    }
}

/// Signin request
#[derive(Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

/// Signin response: the public user record plus the session token
#[derive(Serialize)]
pub struct SigninResponse {
    #[serde(flatten)]
    pub user: User,
    pub token: String,
}

// ==================== User Types ====================

/// Profile update request; omitted fields are unchanged
#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(req: UpdateProfileRequest) -> Self {
        ProfileUpdate {
            username: req.username,
            email: req.email,
            password: req.password,
        }
    }
}

// ==================== Listing Types ====================

/// Listing create/update request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRequest {
    pub name: String,
    pub description: String,
    pub address: String,
    pub contact_numbers: Vec<String>,
    pub regular_price: i64,
    #[serde(default)]
    pub discount_price: i64,
    pub bathrooms: i64,
    pub bedrooms: i64,
    #[serde(default)]
    pub furnished: bool,
    #[serde(default)]
    pub parking: bool,
    #[serde(default)]
    pub offer: bool,
    #[serde(rename = "type")]
    pub listing_type: ListingType,
    pub image_urls: Vec<String>,
}

impl From<ListingRequest> for ListingFields {
    fn from(req: ListingRequest) -> Self {
        ListingFields {
            name: req.name,
            description: req.description,
            address: req.address,
            contact_numbers: req.contact_numbers,
            regular_price: req.regular_price,
            discount_price: req.discount_price,
            bathrooms: req.bathrooms,
            bedrooms: req.bedrooms,
            furnished: req.furnished,
            parking: req.parking,
            offer: req.offer,
            listing_type: req.listing_type,
            image_urls: req.image_urls,
        }
    }
}

// ==================== Review Types ====================

/// Review request; missing fields are reported together
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub listing_id: Option<String>,
    pub rating: Option<i64>,
    pub comment: Option<String>,
}

impl From<ReviewRequest> for ReviewDraft {
    fn from(req: ReviewRequest) -> Self {
        ReviewDraft {
            listing_id: req.listing_id,
            rating: req.rating,
            comment: req.comment,
        }
    }
}
