//! Account service: signup, signin and self-service profile management

use estatehub_auth::{
    AuthError, AuthenticatedIdentity, JwtManager, ensure_owner, hash_password, verify_password,
};
use estatehub_db::{Database, Listing, NewUser, UpdateUser, User};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::CoreError;
use crate::validation::{parse_id, validate_email, validate_password, validate_username};

/// Signup request
#[derive(Debug, Clone)]
pub struct Signup {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Profile changes requested by the account owner
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Successful signin: the identity and its session token
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub user: User,
    pub token: String,
}

/// Account service handling identities and credentials
pub struct AccountService {
    db: Database,
    jwt: Arc<JwtManager>,
}

impl AccountService {
    /// Create a new account service
    pub fn new(db: Database, jwt: Arc<JwtManager>) -> Self {
        Self { db, jwt }
    }

    /// Register a new identity
    pub async fn signup(&self, request: Signup) -> Result<User, CoreError> {
        let username = request.username.trim().to_string();
        let email = request.email.trim().to_lowercase();
        validate_username(&username)?;
        validate_email(&email)?;
        validate_password(&request.password)?;

        debug!("Signing up user: {}", username);

        let password_hash = hash_password(&request.password)?;
        let user = self
            .db
            .insert_user(NewUser {
                username,
                email,
                password_hash,
            })
            .await
            .map_err(|e| CoreError::from_db(e, "User"))?;

        info!("Created user: {}", user.username);
        Ok(user)
    }

    /// Authenticate with email and password, issuing a session token
    ///
    /// An unknown email is `NotFound`; a known email with the wrong
    /// password is `InvalidCredentials`.
    pub async fn signin(&self, email: &str, password: &str) -> Result<SignedIn, CoreError> {
        let email = email.trim().to_lowercase();
        debug!("Signin attempt for: {}", email);

        let user = self
            .db
            .get_user_by_email(&email)
            .await?
            .ok_or_else(|| CoreError::NotFound("User not found!".to_string()))?;

        if !verify_password(password, &user.password_hash)? {
            debug!("Wrong password for user: {}", user.username);
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = self.jwt.issue(user.id)?;
        info!("User {} signed in", user.username);
        Ok(SignedIn { user, token })
    }

    /// Fetch an account the caller owns
    async fn owned_account(
        &self,
        identity: &AuthenticatedIdentity,
        raw_id: &str,
    ) -> Result<User, CoreError> {
        let id = parse_id(raw_id, "user")?;
        let user = self
            .db
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| CoreError::NotFound("User not found!".to_string()))?;
        ensure_owner(identity, user.id)
            .map_err(|_| CoreError::Forbidden("You can only manage your own account!".to_string()))?;
        Ok(user)
    }

    /// Update the caller's own profile
    pub async fn update_profile(
        &self,
        identity: &AuthenticatedIdentity,
        raw_id: &str,
        update: ProfileUpdate,
    ) -> Result<User, CoreError> {
        let user = self.owned_account(identity, raw_id).await?;

        let username = update.username.map(|u| u.trim().to_string());
        let email = update.email.map(|e| e.trim().to_lowercase());
        if let Some(username) = &username {
            validate_username(username)?;
        }
        if let Some(email) = &email {
            validate_email(email)?;
        }
        let password_hash = match &update.password {
            Some(password) => {
                validate_password(password)?;
                Some(hash_password(password)?)
            }
            None => None,
        };

        let updated = self
            .db
            .update_user(
                user.id,
                UpdateUser {
                    username,
                    email,
                    password_hash,
                },
            )
            .await
            .map_err(|e| CoreError::from_db(e, "User"))?
            .ok_or_else(|| CoreError::NotFound("User not found!".to_string()))?;

        info!("Updated user: {}", updated.username);
        Ok(updated)
    }

    /// Delete the caller's own account along with its listings and reviews
    pub async fn delete_account(
        &self,
        identity: &AuthenticatedIdentity,
        raw_id: &str,
    ) -> Result<(), CoreError> {
        let user = self.owned_account(identity, raw_id).await?;

        if !self.db.delete_user(user.id).await? {
            return Err(CoreError::NotFound("User not found!".to_string()));
        }
        info!("Deleted user: {}", user.username);
        Ok(())
    }

    /// List the caller's own listings
    pub async fn owned_listings(
        &self,
        identity: &AuthenticatedIdentity,
        raw_id: &str,
    ) -> Result<Vec<Listing>, CoreError> {
        let user = self.owned_account(identity, raw_id).await?;
        Ok(self.db.list_listings_by_owner(user.id).await?)
    }
}
