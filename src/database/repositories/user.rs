//! User repository implementation

use std::collections::HashSet;
use sqlx::PgPool;
use chrono::Utc;
use crate::models::user::{User, UserProfile, CreateUserRequest};
use crate::utils::errors::EventHubError;

const USER_COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, is_active, is_superuser, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user. Accounts start inactive until the activation
    /// link is followed.
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, EventHubError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, first_name, last_name, is_active, is_superuser, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, FALSE, FALSE, $6, $6)
            RETURNING id, username, email, password_hash, first_name, last_name, is_active, is_superuser, created_at, updated_at
            "#
        )
        .bind(request.username)
        .bind(request.email)
        .bind(request.password_hash)
        .bind(request.first_name)
        .bind(request.last_name)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, EventHubError> {
        let user = sqlx::query_as::<_, User>(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1")
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by username
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, EventHubError> {
        let user = sqlx::query_as::<_, User>(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1")
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, EventHubError> {
        let user = sqlx::query_as::<_, User>(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1")
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// List all users, oldest first
    pub async fn list_all(&self) -> Result<Vec<User>, EventHubError> {
        let users = sqlx::query_as::<_, User>(
            &format!("SELECT {USER_COLUMNS} FROM users ORDER BY id ASC")
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Mark a user active
    pub async fn activate(&self, id: i64) -> Result<User, EventHubError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET is_active = TRUE, updated_at = $2
            WHERE id = $1
            RETURNING id, username, email, password_hash, first_name, last_name, is_active, is_superuser, created_at, updated_at
            "#
        )
        .bind(id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Delete user
    pub async fn delete(&self, id: i64) -> Result<(), EventHubError> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Count total user accounts
    pub async fn count(&self) -> Result<i64, EventHubError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Store a single-use activation token, replacing any earlier one
    pub async fn store_activation_token(&self, user_id: i64, token: &str) -> Result<(), EventHubError> {
        sqlx::query(
            r#"
            INSERT INTO activation_tokens (user_id, token, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE SET token = $2, created_at = $3
            "#
        )
        .bind(user_id)
        .bind(token)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Fetch the stored activation token for a user, if any
    pub async fn find_activation_token(&self, user_id: i64) -> Result<Option<String>, EventHubError> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT token FROM activation_tokens WHERE user_id = $1"
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(token,)| token))
    }

    /// Remove the activation token after use
    pub async fn delete_activation_token(&self, user_id: i64) -> Result<(), EventHubError> {
        sqlx::query("DELETE FROM activation_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Names of the groups the user belongs to
    pub async fn group_names(&self, user_id: i64) -> Result<Vec<String>, EventHubError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT g.name
            FROM groups g
            INNER JOIN user_groups ug ON ug.group_id = g.id
            WHERE ug.user_id = $1
            ORDER BY g.id ASC
            "#
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    /// Permission codenames granted to the user through any of its groups
    pub async fn permission_codenames(&self, user_id: i64) -> Result<HashSet<String>, EventHubError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT p.codename
            FROM permissions p
            INNER JOIN group_permissions gp ON gp.permission_id = p.id
            INNER JOIN user_groups ug ON ug.group_id = gp.group_id
            WHERE ug.user_id = $1
            "#
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(codename,)| codename).collect())
    }

    /// Load a user together with its groups and permissions for the
    /// access gate
    pub async fn load_profile(&self, user_id: i64) -> Result<Option<UserProfile>, EventHubError> {
        let Some(user) = self.find_by_id(user_id).await? else {
            return Ok(None);
        };

        let groups = self.group_names(user_id).await?;
        let permissions = self.permission_codenames(user_id).await?;

        Ok(Some(UserProfile { user, groups, permissions }))
    }
}
