//! User operations

use uuid::Uuid;

use crate::error::DbError;
use crate::models::{NewUser, UpdateUser, User};
use crate::repository::Database;
use crate::utils::{format_datetime, now_micros};

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at, updated_at";

impl Database {
    // ==================== User Operations ====================

    /// Insert a new user
    ///
    /// Both `email` and `username` must be unused; a collision on either is
    /// reported as `DbError::Duplicate` naming the field.
    pub async fn insert_user(&self, user: NewUser) -> Result<User, DbError> {
        let now = now_micros();

        if self.get_user_by_email(&user.email).await?.is_some() {
            return Err(DbError::Duplicate("email".to_string()));
        }
        if self.get_user_by_username(&user.username).await?.is_some() {
            return Err(DbError::Duplicate("username".to_string()));
        }

        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(format_datetime(&now))
        .bind(format_datetime(&now))
        .execute(&self.pool)
        .await
        .map_err(DbError::from_unique_violation)?;

        Ok(User {
            id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a user by email
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?");
        let result = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        result
            .map(|row| User::try_from(&row).map_err(DbError::from))
            .transpose()
    }

    /// Get a user by username
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?");
        let result = sqlx::query(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        result
            .map(|row| User::try_from(&row).map_err(DbError::from))
            .transpose()
    }

    /// Get a user by ID
    pub async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>, DbError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        let result = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        result
            .map(|row| User::try_from(&row).map_err(DbError::from))
            .transpose()
    }

    /// Apply a partial update to a user
    ///
    /// Returns the updated record, or `None` if the user does not exist.
    pub async fn update_user(&self, id: Uuid, update: UpdateUser) -> Result<Option<User>, DbError> {
        if let Some(email) = &update.email
            && let Some(existing) = self.get_user_by_email(email).await?
            && existing.id != id
        {
            return Err(DbError::Duplicate("email".to_string()));
        }
        if let Some(username) = &update.username
            && let Some(existing) = self.get_user_by_username(username).await?
            && existing.id != id
        {
            return Err(DbError::Duplicate("username".to_string()));
        }

        let now = now_micros();
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = COALESCE(?, username),
                email = COALESCE(?, email),
                password_hash = COALESCE(?, password_hash),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&update.username)
        .bind(&update.email)
        .bind(&update.password_hash)
        .bind(format_datetime(&now))
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(DbError::from_unique_violation)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_user_by_id(id).await
    }

    /// Delete a user; their listings and reviews go with them
    pub async fn delete_user(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_fetch_user() {
        let db = Database::in_memory().await.unwrap();

        let user = db.insert_user(new_user("asha", "asha@example.com")).await.unwrap();

        let by_email = db.get_user_by_email("asha@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
        let by_id = db.get_user_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "asha");
        let by_username = db.get_user_by_username("asha").await.unwrap().unwrap();
        assert_eq!(by_username.email, "asha@example.com");
    }

    #[tokio::test]
    async fn test_duplicate_email_and_username_rejected() {
        let db = Database::in_memory().await.unwrap();
        db.insert_user(new_user("asha", "asha@example.com")).await.unwrap();

        let err = db
            .insert_user(new_user("other", "asha@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Duplicate(ref f) if f == "email"));

        let err = db
            .insert_user(new_user("asha", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Duplicate(ref f) if f == "username"));

        assert!(db.get_user_by_username("other").await.unwrap().is_none());
        assert!(db.get_user_by_email("other@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_user_partial_and_duplicate() {
        let db = Database::in_memory().await.unwrap();
        let asha = db.insert_user(new_user("asha", "asha@example.com")).await.unwrap();
        db.insert_user(new_user("ravi", "ravi@example.com")).await.unwrap();

        let updated = db
            .update_user(
                asha.id,
                UpdateUser {
                    password_hash: Some("new-hash".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.password_hash, "new-hash");
        assert_eq!(updated.email, "asha@example.com");

        let err = db
            .update_user(
                asha.id,
                UpdateUser {
                    email: Some("ravi@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Duplicate(_)));

        let missing = db
            .update_user(Uuid::new_v4(), UpdateUser::default())
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
