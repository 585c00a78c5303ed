//! EstateHub Core Business Logic
//!
//! This crate provides the domain services behind the HTTP surface:
//! accounts (signup, signin and self-service profile changes), the listing
//! lifecycle with its query engine, and listing reviews.

pub mod accounts;
pub mod error;
pub mod listings;
pub mod reviews;
pub mod validation;

pub use accounts::{AccountService, ProfileUpdate, SignedIn, Signup};
pub use error::CoreError;
pub use listings::ListingService;
pub use reviews::{ReviewDraft, ReviewService};
