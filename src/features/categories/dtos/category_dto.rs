use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::models::Category;
use crate::shared::validation::{validate_not_blank, SLUG_REGEX};

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`)
fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn default_true() -> bool {
    true
}

/// Query params for listing categories
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListCategoriesQuery {
    /// `true` returns the nested tree. Any other value, or none, returns the
    /// flat list with parents.
    pub tree: Option<String>,
}

impl ListCategoriesQuery {
    pub fn wants_tree(&self) -> bool {
        self.tree.as_deref() == Some("true")
    }
}

/// Create request.
///
/// `name` and `slug` default to empty so that a missing field is reported as a
/// validation error rather than a JSON parse error.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryDto {
    #[serde(default)]
    #[validate(
        length(min = 1, max = 200, message = "name is required (max 200 characters)"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,

    #[serde(default)]
    #[validate(
        length(min = 1, max = 200, message = "slug is required (max 200 characters)"),
        regex(path = *SLUG_REGEX, message = "slug must be lowercase alphanumeric segments separated by single hyphens (e.g., 'office-chairs')")
    )]
    pub slug: String,

    pub description: Option<String>,

    pub parent_id: Option<Uuid>,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Partial update request. Absent fields are left unchanged.
///
/// `parentId: null` turns the category into a root; `description: null` clears it.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryDto {
    #[validate(
        length(min = 1, max = 200, message = "name must be 1-200 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,

    #[validate(
        length(min = 1, max = 200, message = "slug must be 1-200 characters"),
        regex(path = *SLUG_REGEX, message = "slug must be lowercase alphanumeric segments separated by single hyphens (e.g., 'office-chairs')")
    )]
    pub slug: Option<String>,

    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>, nullable)]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<Uuid>, nullable)]
    pub parent_id: Option<Option<Uuid>>,

    pub is_active: Option<bool>,
}

/// Response DTO for category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponseDto {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            parent_id: c.parent_id,
            name: c.name,
            slug: c.slug,
            description: c.description,
            is_active: c.is_active,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Flat listing entry: the category plus its immediate parent (if it still exists)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithParentDto {
    #[serde(flatten)]
    pub category: CategoryResponseDto,
    pub parent: Option<CategoryResponseDto>,
}

/// Single category with one level of relations in each direction
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDetailDto {
    #[serde(flatten)]
    pub category: CategoryResponseDto,
    pub parent: Option<CategoryResponseDto>,
    pub children: Vec<CategoryResponseDto>,
}

/// Response DTO for category tree (hierarchical structure)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(no_recursion)]
pub struct CategoryTreeDto {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub children: Vec<CategoryTreeDto>,
}

impl CategoryTreeDto {
    pub fn from_parts(c: Category, children: Vec<CategoryTreeDto>) -> Self {
        Self {
            id: c.id,
            parent_id: c.parent_id,
            name: c.name,
            slug: c.slug,
            description: c.description,
            is_active: c.is_active,
            created_at: c.created_at,
            updated_at: c.updated_at,
            children,
        }
    }

    /// Number of nodes in this subtree, including itself
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}

/// Body of `GET /api/categories`: flat list or nested forest
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(untagged)]
pub enum CategoryListDto {
    Flat(Vec<CategoryWithParentDto>),
    Tree(Vec<CategoryTreeDto>),
}

impl CategoryListDto {
    /// Top-level entries (records for a flat list, roots for a tree)
    pub fn total(&self) -> usize {
        match self {
            CategoryListDto::Flat(items) => items.len(),
            CategoryListDto::Tree(roots) => roots.len(),
        }
    }
}
