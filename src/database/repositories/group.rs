//! Group repository implementation

use sqlx::PgPool;
use crate::models::group::{Group, GroupWithMembers};
use crate::models::user::User;
use crate::utils::errors::EventHubError;

#[derive(Debug, Clone)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new group
    pub async fn create(&self, name: &str) -> Result<Group, EventHubError> {
        let group = sqlx::query_as::<_, Group>(
            "INSERT INTO groups (name) VALUES ($1) RETURNING id, name"
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(group)
    }

    /// Find group by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Group>, EventHubError> {
        let group = sqlx::query_as::<_, Group>(
            "SELECT id, name FROM groups WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    /// Find group by name
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Group>, EventHubError> {
        let group = sqlx::query_as::<_, Group>(
            "SELECT id, name FROM groups WHERE name = $1"
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    /// Find a group by name, creating it when missing
    pub async fn get_or_create(&self, name: &str) -> Result<Group, EventHubError> {
        if let Some(group) = self.find_by_name(name).await? {
            return Ok(group);
        }

        let group = sqlx::query_as::<_, Group>(
            r#"
            INSERT INTO groups (name) VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name
            "#
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(group)
    }

    /// Delete group
    pub async fn delete(&self, id: i64) -> Result<(), EventHubError> {
        sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List all groups
    pub async fn list_all(&self) -> Result<Vec<Group>, EventHubError> {
        let groups = sqlx::query_as::<_, Group>(
            "SELECT id, name FROM groups ORDER BY id ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(groups)
    }

    /// List all groups together with their members
    pub async fn list_with_members(&self) -> Result<Vec<GroupWithMembers>, EventHubError> {
        let groups = self.list_all().await?;
        let mut result = Vec::with_capacity(groups.len());

        for group in groups {
            let members = self.members(group.id).await?;
            result.push(GroupWithMembers { group, members });
        }

        Ok(result)
    }

    /// Users belonging to a group
    pub async fn members(&self, group_id: i64) -> Result<Vec<User>, EventHubError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.username, u.email, u.password_hash, u.first_name, u.last_name,
                   u.is_active, u.is_superuser, u.created_at, u.updated_at
            FROM users u
            INNER JOIN user_groups ug ON ug.user_id = u.id
            WHERE ug.group_id = $1
            ORDER BY u.id ASC
            "#
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Add a user to a group; a second add is a no-op
    pub async fn add_user(&self, user_id: i64, group_id: i64) -> Result<(), EventHubError> {
        sqlx::query(
            r#"
            INSERT INTO user_groups (user_id, group_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#
        )
        .bind(user_id)
        .bind(group_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Remove a user from a group
    pub async fn remove_user(&self, user_id: i64, group_id: i64) -> Result<(), EventHubError> {
        sqlx::query("DELETE FROM user_groups WHERE user_id = $1 AND group_id = $2")
            .bind(user_id)
            .bind(group_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Remove a user from every group
    pub async fn clear_user_groups(&self, user_id: i64) -> Result<(), EventHubError> {
        sqlx::query("DELETE FROM user_groups WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Check if user belongs to a group
    pub async fn is_member(&self, user_id: i64, group_id: i64) -> Result<bool, EventHubError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM user_groups WHERE user_id = $1 AND group_id = $2"
        )
        .bind(user_id)
        .bind(group_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }
}
