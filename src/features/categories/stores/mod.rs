//! Persistence of individual category records.
//!
//! Stores own id assignment and the global slug uniqueness constraint: a write
//! that would duplicate a slug fails with [`AppError::Conflict`] and leaves the
//! store unchanged. Listings come back in a stable order (creation order), which
//! the tree assembler preserves within sibling groups.
//!
//! [`AppError::Conflict`]: crate::core::error::AppError::Conflict

mod memory;
mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::categories::models::{Category, CategoryFields};

pub use memory::InMemoryCategoryStore;
pub use postgres::PgCategoryStore;

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn insert(&self, fields: &CategoryFields) -> Result<Category>;
    async fn get(&self, id: Uuid) -> Result<Option<Category>>;
    async fn get_all(&self) -> Result<Vec<Category>>;
    async fn get_children(&self, parent_id: Uuid) -> Result<Vec<Category>>;
    /// Replace the writable columns of `id`. `Ok(None)` when the row does not exist.
    async fn update(&self, id: Uuid, fields: &CategoryFields) -> Result<Option<Category>>;
    /// `Ok(false)` when the row does not exist.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

pub(crate) fn slug_conflict(slug: &str) -> crate::core::error::AppError {
    crate::core::error::AppError::Conflict(format!(
        "Category with slug '{}' already exists",
        slug
    ))
}
