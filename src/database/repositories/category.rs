//! Category repository implementation

use sqlx::PgPool;
use crate::models::category::{Category, CreateCategoryRequest};
use crate::utils::errors::EventHubError;

#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new category
    pub async fn create(&self, request: CreateCategoryRequest) -> Result<Category, EventHubError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description
            "#
        )
        .bind(request.name)
        .bind(request.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    /// Find category by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Category>, EventHubError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, description FROM categories WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Find category by name
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Category>, EventHubError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, description FROM categories WHERE name = $1"
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// List all categories
    pub async fn list_all(&self) -> Result<Vec<Category>, EventHubError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description FROM categories ORDER BY name ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Number of events referencing a category
    pub async fn event_count(&self, category_id: i64) -> Result<i64, EventHubError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM events WHERE category_id = $1"
        )
        .bind(category_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Delete category. The schema restricts deletion while events
    /// reference the row; callers are expected to check first.
    pub async fn delete(&self, id: i64) -> Result<(), EventHubError> {
        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
