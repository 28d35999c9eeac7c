use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for category
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable columns of a category, used for both insert and full-row update
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFields {
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_active: bool,
}

impl From<&Category> for CategoryFields {
    fn from(c: &Category) -> Self {
        Self {
            parent_id: c.parent_id,
            name: c.name.clone(),
            slug: c.slug.clone(),
            description: c.description.clone(),
            is_active: c.is_active,
        }
    }
}
