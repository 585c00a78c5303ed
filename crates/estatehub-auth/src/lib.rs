//! EstateHub Authentication and Authorization
//!
//! This crate provides password hashing, stateless JWT session tokens,
//! session token extraction from cookies or bearer headers, and the
//! ownership guard used before mutating a resource.

pub mod error;
pub mod guard;
pub mod jwt;
pub mod password;
pub mod session;

pub use error::{AuthError, TokenError};
pub use guard::{AuthenticatedIdentity, authorize, ensure_owner};
pub use jwt::{Claims, JwtManager};
pub use password::{hash_password, verify_password};
pub use session::{CookieSettings, SESSION_COOKIE, SessionToken, TokenSource, extract_session_token};
