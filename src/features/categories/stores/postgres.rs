use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{slug_conflict, CategoryStore};
use crate::core::error::{AppError, Result};
use crate::features::categories::models::{Category, CategoryFields};

const CATEGORY_COLUMNS: &str =
    "id, parent_id, name, slug, description, is_active, created_at, updated_at";

/// PostgreSQL unique violation
const UNIQUE_VIOLATION: &str = "23505";

/// Convert database error to a more specific AppError
fn handle_db_error(e: sqlx::Error, slug: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return slug_conflict(slug);
        }
    }

    tracing::error!("Category store query failed: {:?}", e);
    AppError::Database(e)
}

fn log_db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        tracing::error!("Failed to {}: {:?}", context, e);
        AppError::Database(e)
    }
}

pub struct PgCategoryStore {
    pool: PgPool,
}

impl PgCategoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryStore for PgCategoryStore {
    async fn insert(&self, fields: &CategoryFields) -> Result<Category> {
        let query = format!(
            r#"
            INSERT INTO categories (parent_id, name, slug, description, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            CATEGORY_COLUMNS
        );

        sqlx::query_as::<_, Category>(&query)
            .bind(fields.parent_id)
            .bind(&fields.name)
            .bind(&fields.slug)
            .bind(&fields.description)
            .bind(fields.is_active)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| handle_db_error(e, &fields.slug))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Category>> {
        let query = format!("SELECT {} FROM categories WHERE id = $1", CATEGORY_COLUMNS);

        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(log_db_error("get category"))
    }

    async fn get_all(&self) -> Result<Vec<Category>> {
        let query = format!(
            "SELECT {} FROM categories ORDER BY created_at, id",
            CATEGORY_COLUMNS
        );

        sqlx::query_as::<_, Category>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(log_db_error("list categories"))
    }

    async fn get_children(&self, parent_id: Uuid) -> Result<Vec<Category>> {
        let query = format!(
            "SELECT {} FROM categories WHERE parent_id = $1 ORDER BY created_at, id",
            CATEGORY_COLUMNS
        );

        sqlx::query_as::<_, Category>(&query)
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await
            .map_err(log_db_error("list child categories"))
    }

    async fn update(&self, id: Uuid, fields: &CategoryFields) -> Result<Option<Category>> {
        let query = format!(
            r#"
            UPDATE categories
            SET parent_id = $2,
                name = $3,
                slug = $4,
                description = $5,
                is_active = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            CATEGORY_COLUMNS
        );

        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(fields.parent_id)
            .bind(&fields.name)
            .bind(&fields.slug)
            .bind(&fields.description)
            .bind(fields.is_active)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| handle_db_error(e, &fields.slug))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(log_db_error("delete category"))?;

        Ok(result.rows_affected() > 0)
    }
}
