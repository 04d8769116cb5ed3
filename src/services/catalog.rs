//! Catalog service implementation
//!
//! Event and category management: validation, the category-must-exist
//! invariant on events, and protect-on-delete for referenced
//! categories.

use std::collections::HashMap;
use tracing::info;

use crate::database::repositories::{CategoryRepository, EventRepository};
use crate::models::category::{Category, CreateCategoryRequest};
use crate::models::event::{CreateEventRequest, Event, UpdateEventRequest};
use crate::utils::errors::{EventHubError, Result};

/// Catalog management service
#[derive(Debug, Clone)]
pub struct CatalogService {
    events: EventRepository,
    categories: CategoryRepository,
}

impl CatalogService {
    pub fn new(events: EventRepository, categories: CategoryRepository) -> Self {
        Self { events, categories }
    }

    /// Create a new event
    pub async fn create_event(&self, request: CreateEventRequest) -> Result<Event> {
        let mut errors = HashMap::new();

        if request.name.trim().is_empty() {
            errors.insert("name".to_string(), "This field is required".to_string());
        }
        if request.location.trim().is_empty() {
            errors.insert("location".to_string(), "This field is required".to_string());
        }
        if self.categories.find_by_id(request.category_id).await?.is_none() {
            errors.insert("category_id".to_string(), "Select a valid category".to_string());
        }

        if !errors.is_empty() {
            return Err(EventHubError::Validation(errors));
        }

        let event = self.events.create(request).await?;
        info!(event_id = event.id, name = %event.name, "Event created");

        Ok(event)
    }

    /// Update an existing event
    pub async fn update_event(&self, event_id: i64, request: UpdateEventRequest) -> Result<Event> {
        self.events.find_by_id(event_id).await?
            .ok_or(EventHubError::EventNotFound { event_id })?;

        if let Some(name) = &request.name {
            if name.trim().is_empty() {
                return Err(EventHubError::field("name", "This field is required"));
            }
        }

        if let Some(category_id) = request.category_id {
            if self.categories.find_by_id(category_id).await?.is_none() {
                return Err(EventHubError::field("category_id", "Select a valid category"));
            }
        }

        let event = self.events.update(event_id, request).await?;
        info!(event_id = event.id, "Event updated");

        Ok(event)
    }

    /// Delete an event
    pub async fn delete_event(&self, event_id: i64) -> Result<()> {
        let deleted = self.events.delete(event_id).await?;

        if !deleted {
            return Err(EventHubError::EventNotFound { event_id });
        }

        info!(event_id = event_id, "Event deleted");
        Ok(())
    }

    /// Add a category with a unique name
    pub async fn add_category(&self, request: CreateCategoryRequest) -> Result<Category> {
        let name = request.name.trim().to_string();

        if name.is_empty() {
            return Err(EventHubError::field("name", "This field is required"));
        }

        if self.categories.find_by_name(&name).await?.is_some() {
            return Err(EventHubError::field("name", "A category with that name already exists"));
        }

        let category = self.categories.create(CreateCategoryRequest {
            name,
            description: request.description,
        }).await?;
        info!(category_id = category.id, name = %category.name, "Category created");

        Ok(category)
    }

    /// Delete a category. Rejected while events still reference it.
    pub async fn delete_category(&self, category_id: i64) -> Result<()> {
        let category = self.categories.find_by_id(category_id).await?
            .ok_or(EventHubError::CategoryNotFound { category_id })?;

        let referencing = self.categories.event_count(category.id).await?;
        if referencing > 0 {
            return Err(EventHubError::Protected(format!(
                "Cannot delete category '{}': {} event(s) still reference it",
                category.name, referencing
            )));
        }

        self.categories.delete(category.id).await?;
        info!(category_id = category.id, "Category deleted");

        Ok(())
    }

    /// List all categories
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.categories.list_all().await
    }
}
