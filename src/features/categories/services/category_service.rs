use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::{
    CategoryDetailDto, CategoryResponseDto, CategoryTreeDto, CategoryWithParentDto,
    CreateCategoryDto, UpdateCategoryDto,
};
use crate::features::categories::models::{Category, CategoryFields};
use crate::features::categories::stores::CategoryStore;
use crate::features::categories::tree;

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Category with id {} not found", id))
}

fn validate<T: Validate>(dto: &T) -> Result<()> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))
}

/// Service for category operations
pub struct CategoryService {
    store: Arc<dyn CategoryStore>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn CategoryStore>) -> Self {
        Self { store }
    }

    /// Create a category. A supplied parent must already exist.
    pub async fn create(&self, dto: CreateCategoryDto) -> Result<CategoryResponseDto> {
        validate(&dto)?;

        if let Some(parent_id) = dto.parent_id {
            self.ensure_parent_exists(parent_id).await?;
        }

        let fields = CategoryFields {
            parent_id: dto.parent_id,
            name: dto.name,
            slug: dto.slug,
            description: dto.description,
            is_active: dto.is_active,
        };

        let category = self.store.insert(&fields).await?;
        tracing::info!(id = %category.id, slug = %category.slug, "Category created");

        Ok(category.into())
    }

    /// List all categories (flat), each with its immediate parent
    pub async fn list(&self) -> Result<Vec<CategoryWithParentDto>> {
        let categories = self.store.get_all().await?;
        let by_id: HashMap<Uuid, &Category> = categories.iter().map(|c| (c.id, c)).collect();

        let items = categories
            .iter()
            .map(|c| CategoryWithParentDto {
                category: c.clone().into(),
                parent: c
                    .parent_id
                    .and_then(|parent_id| by_id.get(&parent_id))
                    .map(|parent| (*parent).clone().into()),
            })
            .collect();

        Ok(items)
    }

    /// List all categories as a nested forest.
    ///
    /// Records unreachable from a root (cycles, dangling parents) are omitted
    /// and logged.
    pub async fn list_tree(&self) -> Result<Vec<CategoryTreeDto>> {
        let categories = self.store.get_all().await?;
        let forest = tree::assemble(categories);

        if !forest.unreachable.is_empty() {
            tracing::warn!(
                count = forest.unreachable.len(),
                ids = ?forest.unreachable,
                "Categories unreachable from any root were omitted from the tree"
            );
        }
        tracing::debug!(
            roots = forest.roots.len(),
            nodes = forest.node_count(),
            "Category tree assembled"
        );

        Ok(forest.roots)
    }

    /// Get one category with its parent and direct children
    pub async fn find_one(&self, id: Uuid) -> Result<CategoryDetailDto> {
        let category = self.store.get(id).await?.ok_or_else(|| not_found(id))?;

        let parent = match category.parent_id {
            Some(parent_id) => self.store.get(parent_id).await?,
            None => None,
        };
        let children = self.store.get_children(id).await?;

        Ok(CategoryDetailDto {
            category: category.into(),
            parent: parent.map(Into::into),
            children: children.into_iter().map(Into::into).collect(),
        })
    }

    /// Apply a partial update
    pub async fn update(&self, id: Uuid, dto: UpdateCategoryDto) -> Result<CategoryResponseDto> {
        validate(&dto)?;

        let current = self.store.get(id).await?.ok_or_else(|| not_found(id))?;
        let mut fields = CategoryFields::from(&current);

        if let Some(name) = dto.name {
            fields.name = name;
        }
        if let Some(slug) = dto.slug {
            fields.slug = slug;
        }
        if let Some(description) = dto.description {
            fields.description = description;
        }
        if let Some(is_active) = dto.is_active {
            fields.is_active = is_active;
        }
        if let Some(parent_id) = dto.parent_id {
            // Keeping the current parent is always allowed, even a dangling one.
            if let Some(new_parent) = parent_id.filter(|p| Some(*p) != current.parent_id) {
                self.ensure_reparent_allowed(id, new_parent).await?;
            }
            fields.parent_id = parent_id;
        }

        let updated = self
            .store
            .update(id, &fields)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!(id = %updated.id, slug = %updated.slug, "Category updated");

        Ok(updated.into())
    }

    /// Delete a category.
    ///
    /// Children are neither deleted nor re-parented; their `parent_id` keeps
    /// pointing at the removed id.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let children = self.store.get_children(id).await?;

        if !self.store.delete(id).await? {
            return Err(not_found(id));
        }

        if children.is_empty() {
            tracing::info!(id = %id, "Category deleted");
        } else {
            tracing::warn!(
                id = %id,
                dangling_children = children.len(),
                "Category deleted; its children now reference a missing parent"
            );
        }

        Ok(())
    }

    async fn ensure_parent_exists(&self, parent_id: Uuid) -> Result<()> {
        match self.store.get(parent_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::Validation(format!(
                "Parent category {} does not exist",
                parent_id
            ))),
        }
    }

    /// Reject moving `id` under itself or under one of its descendants
    async fn ensure_reparent_allowed(&self, id: Uuid, new_parent: Uuid) -> Result<()> {
        if new_parent == id {
            return Err(AppError::Integrity(
                "A category cannot be its own parent".to_string(),
            ));
        }

        let parents: HashMap<Uuid, Option<Uuid>> = self
            .store
            .get_all()
            .await?
            .into_iter()
            .map(|c| (c.id, c.parent_id))
            .collect();

        if !parents.contains_key(&new_parent) {
            return Err(AppError::Validation(format!(
                "Parent category {} does not exist",
                new_parent
            )));
        }

        // Walk the ancestor chain of the new parent; the visited set bounds the
        // walk when the stored graph already contains a cycle.
        let mut visited: HashSet<Uuid> = HashSet::new();
        let mut cursor = Some(new_parent);
        while let Some(ancestor) = cursor {
            if ancestor == id {
                return Err(AppError::Integrity(format!(
                    "Moving category {} under {} would create a cycle",
                    id, new_parent
                )));
            }
            if !visited.insert(ancestor) {
                break;
            }
            cursor = parents.get(&ancestor).copied().flatten();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::stores::InMemoryCategoryStore;
    use crate::shared::test_helpers::category;

    fn service() -> CategoryService {
        CategoryService::new(Arc::new(InMemoryCategoryStore::new()))
    }

    fn seeded(rows: Vec<Category>) -> CategoryService {
        CategoryService::new(Arc::new(InMemoryCategoryStore::with_rows(rows)))
    }

    fn create_dto(name: &str, slug: &str, parent_id: Option<Uuid>) -> CreateCategoryDto {
        CreateCategoryDto {
            name: name.to_string(),
            slug: slug.to_string(),
            description: None,
            parent_id,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_create_then_find_one_round_trips() {
        let service = service();
        let dto = CreateCategoryDto {
            description: Some("Seating and tables".to_string()),
            is_active: false,
            ..create_dto("Furniture", "furniture", None)
        };

        let created = service.create(dto.clone()).await.unwrap();
        let found = service.find_one(created.id).await.unwrap();

        assert_eq!(found.category, created);
        assert_eq!(found.category.name, dto.name);
        assert_eq!(found.category.slug, dto.slug);
        assert_eq!(found.category.description, dto.description);
        assert_eq!(found.category.parent_id, None);
        assert!(!found.category.is_active);
        assert!(found.parent.is_none());
        assert!(found.children.is_empty());
    }

    #[tokio::test]
    async fn test_create_duplicate_slug_conflicts_without_write() {
        let service = service();
        service
            .create(create_dto("Chairs", "chairs", None))
            .await
            .unwrap();

        let err = service
            .create(create_dto("Other Chairs", "chairs", None))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_requires_name_and_slug() {
        let service = service();

        let err = service.create(create_dto("", "chairs", None)).await;
        assert!(matches!(err, Err(AppError::Validation(_))));

        let err = service.create(create_dto("Chairs", "", None)).await;
        assert!(matches!(err, Err(AppError::Validation(_))));

        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_with_unknown_parent_is_rejected() {
        let service = service();
        let err = service
            .create(create_dto("Chairs", "chairs", Some(Uuid::new_v4())))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_then_find_one_keeps_name_as_given() {
        let service = service();
        let created = service
            .create(create_dto(" Lamps ", "lamps", None))
            .await
            .unwrap();

        let found = service.find_one(created.id).await.unwrap();
        assert_eq!(found.category.name, " Lamps ");
        assert_eq!(found.category.slug, "lamps");
        assert_eq!(found.category, created);
    }

    #[tokio::test]
    async fn test_update_keeps_name_as_given() {
        let service = service();
        let created = service
            .create(create_dto("Lamps", "lamps", None))
            .await
            .unwrap();

        let updated = service
            .update(
                created.id,
                UpdateCategoryDto {
                    name: Some("  Floor Lamps".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "  Floor Lamps");
    }

    #[tokio::test]
    async fn test_list_annotates_parent_only() {
        let service = service();
        let furniture = service
            .create(create_dto("Furniture", "furniture", None))
            .await
            .unwrap();
        let chairs = service
            .create(create_dto("Chairs", "chairs", Some(furniture.id)))
            .await
            .unwrap();

        let items = service.list().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].category.id, furniture.id);
        assert!(items[0].parent.is_none());
        assert_eq!(items[1].category.id, chairs.id);
        assert_eq!(items[1].parent.as_ref().map(|p| p.id), Some(furniture.id));
    }

    #[tokio::test]
    async fn test_list_tree_scenario() {
        let service = service();
        let furniture = service
            .create(create_dto("Furniture", "furniture", None))
            .await
            .unwrap();
        let chairs = service
            .create(create_dto("Chairs", "chairs", Some(furniture.id)))
            .await
            .unwrap();
        service
            .create(create_dto("Office Chairs", "office-chairs", Some(chairs.id)))
            .await
            .unwrap();

        let roots = service.list_tree().await.unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].name, "Furniture");
        assert_eq!(roots[0].children[0].name, "Chairs");
        assert_eq!(roots[0].children[0].children[0].name, "Office Chairs");

        // No writes in between: identical output.
        assert_eq!(service.list_tree().await.unwrap(), roots);
    }

    #[tokio::test]
    async fn test_list_tree_with_mutual_cycle_is_empty() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let service = seeded(vec![
            category(a, "A", "a", Some(b), 1),
            category(b, "B", "b", Some(a), 2),
        ]);

        assert!(service.list_tree().await.unwrap().is_empty());
        assert_eq!(service.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_find_one_includes_parent_and_children() {
        let service = service();
        let furniture = service
            .create(create_dto("Furniture", "furniture", None))
            .await
            .unwrap();
        let chairs = service
            .create(create_dto("Chairs", "chairs", Some(furniture.id)))
            .await
            .unwrap();
        let office = service
            .create(create_dto("Office Chairs", "office-chairs", Some(chairs.id)))
            .await
            .unwrap();

        let detail = service.find_one(chairs.id).await.unwrap();
        assert_eq!(detail.parent.map(|p| p.id), Some(furniture.id));
        assert_eq!(
            detail.children.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![office.id]
        );
    }

    #[tokio::test]
    async fn test_find_one_missing() {
        let err = service().find_one(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_changes_only_given_fields() {
        let service = service();
        let root = service
            .create(CreateCategoryDto {
                description: Some("Everything to sit on".to_string()),
                ..create_dto("Seating", "seating", None)
            })
            .await
            .unwrap();

        let updated = service
            .update(
                root.id,
                UpdateCategoryDto {
                    name: Some("Seats".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Seats");
        assert_eq!(updated.slug, "seating");
        assert_eq!(updated.description.as_deref(), Some("Everything to sit on"));
        assert!(updated.is_active);
    }

    #[tokio::test]
    async fn test_update_can_clear_description_and_parent() {
        let service = service();
        let furniture = service
            .create(create_dto("Furniture", "furniture", None))
            .await
            .unwrap();
        let chairs = service
            .create(CreateCategoryDto {
                description: Some("Chairs".to_string()),
                ..create_dto("Chairs", "chairs", Some(furniture.id))
            })
            .await
            .unwrap();

        let updated = service
            .update(
                chairs.id,
                UpdateCategoryDto {
                    description: Some(None),
                    parent_id: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.description, None);
        assert_eq!(updated.parent_id, None);
        assert_eq!(service.list_tree().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_slug_collision_conflicts() {
        let service = service();
        service
            .create(create_dto("Tables", "tables", None))
            .await
            .unwrap();
        let chairs = service
            .create(create_dto("Chairs", "chairs", None))
            .await
            .unwrap();

        let err = service
            .update(
                chairs.id,
                UpdateCategoryDto {
                    slug: Some("tables".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(service.find_one(chairs.id).await.unwrap().category.slug, "chairs");
    }

    #[tokio::test]
    async fn test_update_missing_category() {
        let err = service()
            .update(Uuid::new_v4(), UpdateCategoryDto::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_rejects_cycles() {
        let service = service();
        let furniture = service
            .create(create_dto("Furniture", "furniture", None))
            .await
            .unwrap();
        let chairs = service
            .create(create_dto("Chairs", "chairs", Some(furniture.id)))
            .await
            .unwrap();
        let office = service
            .create(create_dto("Office Chairs", "office-chairs", Some(chairs.id)))
            .await
            .unwrap();

        let under_self = service
            .update(
                furniture.id,
                UpdateCategoryDto {
                    parent_id: Some(Some(furniture.id)),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(under_self, Err(AppError::Integrity(_))));

        let under_descendant = service
            .update(
                furniture.id,
                UpdateCategoryDto {
                    parent_id: Some(Some(office.id)),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(under_descendant, Err(AppError::Integrity(_))));

        // Tree is untouched.
        let roots = service.list_tree().await.unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].node_count(), 3);
    }

    #[tokio::test]
    async fn test_update_reparent_to_sibling_subtree() {
        let service = service();
        let furniture = service
            .create(create_dto("Furniture", "furniture", None))
            .await
            .unwrap();
        let office = service
            .create(create_dto("Office", "office", None))
            .await
            .unwrap();
        let desks = service
            .create(create_dto("Desks", "desks", Some(furniture.id)))
            .await
            .unwrap();

        let moved = service
            .update(
                desks.id,
                UpdateCategoryDto {
                    parent_id: Some(Some(office.id)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.parent_id, Some(office.id));

        let err = service
            .update(
                desks.id,
                UpdateCategoryDto {
                    parent_id: Some(Some(Uuid::new_v4())),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_leaves_children_dangling() {
        let service = service();
        let furniture = service
            .create(create_dto("Furniture", "furniture", None))
            .await
            .unwrap();
        let chairs = service
            .create(create_dto("Chairs", "chairs", Some(furniture.id)))
            .await
            .unwrap();

        service.delete(furniture.id).await.unwrap();

        let detail = service.find_one(chairs.id).await.unwrap();
        assert_eq!(detail.category.parent_id, Some(furniture.id));
        assert!(detail.parent.is_none());

        let items = service.list().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].category.parent_id, Some(furniture.id));
        assert!(items[0].parent.is_none());

        // The orphan is no longer reachable from a root.
        assert!(service.list_tree().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_keeps_dangling_parent_when_not_reparenting() {
        let gone = Uuid::new_v4();
        let orphan = Uuid::new_v4();
        let service = seeded(vec![category(orphan, "Orphan", "orphan", Some(gone), 1)]);

        let updated = service
            .update(
                orphan,
                UpdateCategoryDto {
                    name: Some("Still Orphan".to_string()),
                    parent_id: Some(Some(gone)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.parent_id, Some(gone));
        assert_eq!(updated.name, "Still Orphan");
    }

    #[tokio::test]
    async fn test_delete_missing_category() {
        let err = service().delete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
