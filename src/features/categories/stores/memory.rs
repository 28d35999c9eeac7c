use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{slug_conflict, CategoryStore};
use crate::core::error::Result;
use crate::features::categories::models::{Category, CategoryFields};

/// Process-local store kept in insertion order.
///
/// The slug check and the write happen under the same write lock.
#[derive(Default)]
pub struct InMemoryCategoryStore {
    rows: RwLock<Vec<Category>>,
}

impl InMemoryCategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing rows, kept as given (no validation)
    #[cfg(test)]
    pub fn with_rows(rows: Vec<Category>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }
}

#[async_trait]
impl CategoryStore for InMemoryCategoryStore {
    async fn insert(&self, fields: &CategoryFields) -> Result<Category> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|c| c.slug == fields.slug) {
            return Err(slug_conflict(&fields.slug));
        }

        let now = Utc::now();
        let category = Category {
            id: Uuid::now_v7(),
            parent_id: fields.parent_id,
            name: fields.name.clone(),
            slug: fields.slug.clone(),
            description: fields.description.clone(),
            is_active: fields.is_active,
            created_at: now,
            updated_at: now,
        };
        rows.push(category.clone());

        Ok(category)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Category>> {
        Ok(self.rows.read().await.iter().find(|c| c.id == id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Category>> {
        Ok(self.rows.read().await.clone())
    }

    async fn get_children(&self, parent_id: Uuid) -> Result<Vec<Category>> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|c| c.parent_id == Some(parent_id))
            .cloned()
            .collect())
    }

    async fn update(&self, id: Uuid, fields: &CategoryFields) -> Result<Option<Category>> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|c| c.id != id && c.slug == fields.slug) {
            return Err(slug_conflict(&fields.slug));
        }

        let Some(row) = rows.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        row.parent_id = fields.parent_id;
        row.name = fields.name.clone();
        row.slug = fields.slug.clone();
        row.description = fields.description.clone();
        row.is_active = fields.is_active;
        row.updated_at = Utc::now();

        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|c| c.id != id);
        Ok(rows.len() < before)
    }
}
