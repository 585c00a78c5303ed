//! Ownership-based authorization

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;
use crate::session::TokenSource;

/// Identity established by a verified session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedIdentity {
    pub subject_id: Uuid,
    #[serde(skip)]
    pub source: Option<TokenSource>,
}

impl AuthenticatedIdentity {
    pub fn new(subject_id: Uuid, source: TokenSource) -> Self {
        Self {
            subject_id,
            source: Some(source),
        }
    }
}

/// True when the subject owns the resource
pub fn authorize(subject_id: Uuid, owner_id: Uuid) -> bool {
    subject_id == owner_id
}

/// Require that the authenticated caller owns the resource
pub fn ensure_owner(identity: &AuthenticatedIdentity, owner_id: Uuid) -> Result<(), AuthError> {
    if authorize(identity.subject_id, owner_id) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_is_authorized() {
        let owner = Uuid::new_v4();
        let identity = AuthenticatedIdentity::new(owner, TokenSource::Cookie);

        assert!(authorize(owner, owner));
        assert!(ensure_owner(&identity, owner).is_ok());
    }

    #[test]
    fn test_other_subject_is_forbidden() {
        let identity = AuthenticatedIdentity::new(Uuid::new_v4(), TokenSource::Bearer);

        assert!(!authorize(identity.subject_id, Uuid::new_v4()));
        assert!(matches!(
            ensure_owner(&identity, Uuid::new_v4()),
            Err(AuthError::Forbidden)
        ));
    }
}
